// Triage result schema tests - validating decoded model answers
//
// Tests focused on the public validation entry points: payload validation,
// normalisation and the parse path used for the model's final answer.

mod common;

use common::answer;
use serde_json::{Value, json};
use ticket_triage::agent::{AgentError, parse_final_answer};
use ticket_triage::domain::{ActionKind, TriageResult, Urgency};

#[test]
fn valid_payload_survives_reencoding() {
    let payload = answer("TKT-001");
    let result = TriageResult::from_payload(payload.clone()).expect("valid");
    assert_eq!(result.analysis.urgency, Urgency::Critical);
    assert_eq!(result.action.action, ActionKind::EscalateToHuman);

    let reencoded = serde_json::to_value(&result).expect("encode");
    assert_eq!(reencoded["ticket_id"], payload["ticket_id"]);
    assert_eq!(reencoded["analysis"], payload["analysis"]);
    assert_eq!(reencoded["action"]["priority_score"], 10);
    assert_eq!(reencoded["kb_articles_used"], json!(["KB-002"]));

    let again = TriageResult::from_payload(reencoded).expect("still valid");
    assert_eq!(again, result);
}

#[test]
fn every_priority_in_range_is_accepted() {
    for score in 1..=10 {
        let mut payload = answer("TKT-001");
        payload["action"]["priority_score"] = json!(score);
        let result = TriageResult::from_payload(payload).expect("in range");
        assert_eq!(i64::from(result.action.priority_score), score);
    }
}

#[test]
fn out_of_range_priority_is_rejected() {
    for score in [json!(0), json!(11), json!(-3), json!(7.5), json!("7")] {
        let mut payload = answer("TKT-001");
        payload["action"]["priority_score"] = score;
        let err = TriageResult::from_payload(payload).unwrap_err();
        assert_eq!(err.field, "action.priority_score");
    }
}

#[test]
fn enum_values_outside_the_set_are_rejected() {
    let cases = [
        ("analysis", "urgency", "urgent"),
        ("analysis", "sentiment", "happy"),
        ("action", "action", "close_ticket"),
    ];
    for (section, key, value) in cases {
        let mut payload = answer("TKT-001");
        payload[section][key] = Value::String(value.to_string());
        let err = TriageResult::from_payload(payload).unwrap_err();
        assert_eq!(err.field, format!("{section}.{key}"));
        assert!(err.constraint.starts_with("must be one of"));
    }
}

#[test]
fn structured_customer_context_becomes_json_text() {
    let mut payload = answer("TKT-001");
    payload["customer_context"] = json!({"plan": "enterprise", "seats": 400});
    let result = TriageResult::from_payload(payload).expect("valid");
    let decoded: Value = serde_json::from_str(&result.customer_context).expect("json text");
    assert_eq!(decoded, json!({"plan": "enterprise", "seats": 400}));
}

#[test]
fn null_article_list_is_treated_as_empty() {
    let mut payload = answer("TKT-001");
    payload["kb_articles_used"] = Value::Null;
    let result = TriageResult::from_payload(payload).expect("valid");
    assert!(result.kb_articles_used.is_empty());
}

#[test]
fn fenced_answer_parses_like_bare_answer() {
    let bare = answer("TKT-001").to_string();
    let fenced = format!("```json\n{bare}\n```");
    let plain_fence = format!("```\n{bare}\n```");

    let expected = parse_final_answer(Some(&bare), "TKT-001").expect("bare");
    assert_eq!(
        parse_final_answer(Some(&fenced), "TKT-001").expect("fenced"),
        expected
    );
    assert_eq!(
        parse_final_answer(Some(&plain_fence), "TKT-001").expect("plain fence"),
        expected
    );
}

#[test]
fn prose_answer_is_malformed() {
    let err = parse_final_answer(Some("Escalate this one, it is urgent."), "TKT-001").unwrap_err();
    assert!(matches!(err, AgentError::MalformedPayload { .. }));
    assert!(err.to_string().contains("TKT-001"));
}
