//! Validated shape of a triage decision.
//!
//! Payloads decoded from the model are checked field by field before they are
//! turned into typed values, so every failure names the offending field and
//! the constraint it broke. Validation is all-or-nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const PRIORITY_MIN: i64 = 1;
pub const PRIORITY_MAX: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl Urgency {
    pub const VALUES: &'static [&'static str] = &["critical", "high", "medium", "low"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Angry,
    Frustrated,
    Neutral,
    Positive,
}

impl Sentiment {
    pub const VALUES: &'static [&'static str] = &["angry", "frustrated", "neutral", "positive"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AutoRespond,
    RouteToSpecialist,
    EscalateToHuman,
}

impl ActionKind {
    pub const VALUES: &'static [&'static str] =
        &["auto_respond", "route_to_specialist", "escalate_to_human"];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::AutoRespond => "auto_respond",
            ActionKind::RouteToSpecialist => "route_to_specialist",
            ActionKind::EscalateToHuman => "escalate_to_human",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketAnalysis {
    pub urgency: Urgency,
    pub sentiment: Sentiment,
    pub issue_type: String,
    pub product_area: String,
    pub language: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub action: ActionKind,
    /// Draft reply for the customer, present for every action kind.
    pub suggested_reply: String,
    pub reason: String,
    pub priority_score: u8,
    #[serde(default)]
    pub auto_response: Option<String>,
    #[serde(default)]
    pub routing_department: Option<String>,
    #[serde(default)]
    pub escalation_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    pub ticket_id: String,
    pub analysis: TicketAnalysis,
    pub action: SuggestedAction,
    pub customer_context: String,
    #[serde(default)]
    pub kb_articles_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}` {constraint}")]
pub struct SchemaValidationError {
    pub field: String,
    pub constraint: String,
}

impl SchemaValidationError {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

const ENUM_FIELDS: &[(&str, &str, &[&str])] = &[
    ("analysis", "urgency", Urgency::VALUES),
    ("analysis", "sentiment", Sentiment::VALUES),
    ("action", "action", ActionKind::VALUES),
];

const REQUIRED_STRINGS: &[(&str, &str)] = &[
    ("analysis", "issue_type"),
    ("analysis", "product_area"),
    ("analysis", "language"),
    ("analysis", "summary"),
    ("action", "suggested_reply"),
    ("action", "reason"),
];

const OPTIONAL_STRINGS: &[(&str, &str)] = &[
    ("action", "auto_response"),
    ("action", "routing_department"),
    ("action", "escalation_notes"),
];

impl TriageResult {
    /// Validates a decoded payload and builds the result.
    pub fn from_payload(payload: Value) -> Result<Self, SchemaValidationError> {
        let Value::Object(mut root) = payload else {
            return Err(SchemaValidationError::new("$", "must be an object"));
        };

        check_enums(&root)?;
        let priority = check_priority(&root)?;
        check_required(&root)?;
        normalize_customer_context(&mut root);
        if let (Some(score), Some(Value::Object(action))) = (priority, root.get_mut("action")) {
            action.insert("priority_score".to_string(), Value::from(score));
        }
        check_types(&root)?;
        if root.get("kb_articles_used").is_some_and(Value::is_null) {
            root.remove("kb_articles_used");
        }

        serde_json::from_value(Value::Object(root))
            .map_err(|err| SchemaValidationError::new("$", format!("is invalid: {err}")))
    }
}

fn nested<'a>(root: &'a Map<String, Value>, section: &str) -> Option<&'a Map<String, Value>> {
    root.get(section).and_then(Value::as_object)
}

fn present<'a>(map: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    map.and_then(|m| m.get(key)).filter(|v| !v.is_null())
}

fn check_enums(root: &Map<String, Value>) -> Result<(), SchemaValidationError> {
    for (section, key, allowed) in ENUM_FIELDS {
        let Some(value) = present(nested(root, section), key) else {
            continue;
        };
        let matches = value.as_str().is_some_and(|s| allowed.contains(&s));
        if !matches {
            return Err(SchemaValidationError::new(
                format!("{section}.{key}"),
                format!("must be one of {}", allowed.join(", ")),
            ));
        }
    }
    Ok(())
}

fn check_priority(root: &Map<String, Value>) -> Result<Option<i64>, SchemaValidationError> {
    let Some(value) = present(nested(root, "action"), "priority_score") else {
        return Ok(None);
    };
    let field = "action.priority_score";
    let score = as_integer(value)
        .ok_or_else(|| SchemaValidationError::new(field, "must be an integer"))?;
    if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&score) {
        return Err(SchemaValidationError::new(
            field,
            format!("must be between {PRIORITY_MIN} and {PRIORITY_MAX}, got {score}"),
        ));
    }
    Ok(Some(score))
}

// Whole-valued floats such as `7.0` count as integers.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

fn check_required(root: &Map<String, Value>) -> Result<(), SchemaValidationError> {
    for key in ["ticket_id", "analysis", "action", "customer_context"] {
        if root.get(key).is_none_or(Value::is_null) {
            return Err(SchemaValidationError::new(key, "is required"));
        }
    }
    for section in ["analysis", "action"] {
        if nested(root, section).is_none() {
            return Err(SchemaValidationError::new(section, "must be an object"));
        }
    }

    let required = ENUM_FIELDS
        .iter()
        .map(|(section, key, _)| (*section, *key))
        .chain(REQUIRED_STRINGS.iter().copied())
        .chain(std::iter::once(("action", "priority_score")));
    for (section, key) in required {
        if present(nested(root, section), key).is_none() {
            return Err(SchemaValidationError::new(
                format!("{section}.{key}"),
                "is required",
            ));
        }
    }
    Ok(())
}

fn normalize_customer_context(root: &mut Map<String, Value>) {
    if let Some(context) = root.get_mut("customer_context") {
        if context.is_object() {
            *context = Value::String(context.to_string());
        }
    }
}

fn check_types(root: &Map<String, Value>) -> Result<(), SchemaValidationError> {
    for key in ["ticket_id", "customer_context"] {
        if !root.get(key).is_some_and(Value::is_string) {
            return Err(SchemaValidationError::new(key, "must be a string"));
        }
    }

    for (section, key) in REQUIRED_STRINGS {
        if !present(nested(root, section), key).is_some_and(Value::is_string) {
            return Err(SchemaValidationError::new(
                format!("{section}.{key}"),
                "must be a string",
            ));
        }
    }

    for (section, key) in OPTIONAL_STRINGS {
        if present(nested(root, section), key).is_some_and(|v| !v.is_string()) {
            return Err(SchemaValidationError::new(
                format!("{section}.{key}"),
                "must be a string or null",
            ));
        }
    }

    match root.get("kb_articles_used") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(SchemaValidationError::new(
            "kb_articles_used",
            "must be a list of strings",
        )),
    }
}
