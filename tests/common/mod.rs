// Shared fixtures for the integration tests.
#![allow(dead_code)]

use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Writes customers, plan tiers and a small knowledge base into `dir`.
pub fn write_data_dir(dir: &Path) {
    write_file(
        dir,
        "customers.json",
        &json!([
            {"email": "ops@bigcorp.com", "name": "Big Corp Ops", "plan": "enterprise", "seats": 400},
            {"email": "solo@maker.dev", "name": "Solo Maker"},
            {"email": "odd@plan.io", "name": "Odd Plan", "plan": "platinum"}
        ])
        .to_string(),
    );
    write_file(
        dir,
        "plan_tiers.json",
        &json!({
            "free": {"label": "Free", "priority": "low", "support_channel": "community", "features": ["forum"]},
            "enterprise": {
                "label": "Enterprise", "sla_hours": 4, "priority": "critical",
                "support_channel": "dedicated_manager", "features": ["sso", "phone"],
                "auto_escalate": true
            }
        })
        .to_string(),
    );
    write_file(
        dir,
        "knowledge_base.json",
        &json!([
            {
                "id": "KB-001", "topic": "Password reset",
                "content": "Reset your password from the login page.",
                "category": "account", "applies_to_plans": ["free", "enterprise"],
                "guideline": {"action": "auto_respond", "conditions": "Always"}
            },
            {
                "id": "KB-002", "topic": "Service outage",
                "content": "Dashboards returning 502 errors indicate an outage.",
                "category": "infrastructure", "applies_to_plans": ["enterprise"],
                "guideline": {"action": "escalate_to_human", "conditions": "Enterprise"}
            },
            {
                "id": "KB-003", "topic": "Duplicate charge",
                "content": "Refunds for duplicate charges take five days.",
                "category": "billing", "applies_to_plans": ["enterprise"],
                "guideline": {"action": "route_to_specialist", "conditions": "Always"}
            },
            {
                "id": "KB-004", "topic": "CSV export",
                "content": "Export data as CSV from settings.",
                "category": "how_to", "applies_to_plans": ["free"],
                "guideline": {"action": "auto_respond", "conditions": "Always"}
            }
        ])
        .to_string(),
    );
}

pub fn answer(ticket_id: &str) -> Value {
    json!({
        "ticket_id": ticket_id,
        "analysis": {
            "urgency": "critical",
            "sentiment": "angry",
            "issue_type": "outage",
            "product_area": "infrastructure",
            "language": "en",
            "summary": "Dashboard returns 502 for the whole team"
        },
        "action": {
            "action": "escalate_to_human",
            "suggested_reply": "We have escalated this to our on-call engineers.",
            "reason": "Enterprise customer reporting an outage",
            "priority_score": 10,
            "auto_response": null,
            "routing_department": null,
            "escalation_notes": "4h SLA, auto escalate enabled"
        },
        "customer_context": "Enterprise plan, 400 seats",
        "kb_articles_used": ["KB-002"]
    })
}
