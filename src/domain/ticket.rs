//! Support ticket input and its plain-text rendering for the model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMessage {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub content: String,
}

/// Customer support inquiry. Messages are ordered oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub customer_email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub messages: Vec<TicketMessage>,
}

impl Ticket {
    /// Renders the ticket as the user turn sent to the model.
    pub fn format_for_model(&self) -> String {
        let mut lines = vec![
            format!("## Support Ticket: {}", self.ticket_id),
            format!("**Customer Email:** {}", self.customer_email),
            format!("**Subject:** {}", self.subject.as_deref().unwrap_or("N/A")),
            String::new(),
            "### Messages (oldest to newest):".to_string(),
        ];

        for message in &self.messages {
            let timestamp = message.timestamp.as_deref().unwrap_or("unknown");
            lines.push(format!("\n[{timestamp}]\n{}", message.content));
        }

        lines.join("\n")
    }

    pub fn subject_or_placeholder(&self) -> &str {
        self.subject.as_deref().unwrap_or("N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> Ticket {
        Ticket {
            ticket_id: "TKT-001".into(),
            customer_email: "ana@example.com".into(),
            subject: Some("Invoice charged twice".into()),
            messages: vec![
                TicketMessage {
                    timestamp: Some("2024-03-01T10:00:00Z".into()),
                    content: "I was billed twice this month.".into(),
                },
                TicketMessage {
                    timestamp: None,
                    content: "Any update?".into(),
                },
            ],
        }
    }

    #[test]
    fn formats_heading_and_messages() {
        let text = ticket().format_for_model();
        let expected = "## Support Ticket: TKT-001\n\
**Customer Email:** ana@example.com\n\
**Subject:** Invoice charged twice\n\
\n\
### Messages (oldest to newest):\n\
\n[2024-03-01T10:00:00Z]\nI was billed twice this month.\n\
\n[unknown]\nAny update?";
        assert_eq!(text, expected);
    }

    #[test]
    fn missing_subject_uses_placeholder() {
        let mut ticket = ticket();
        ticket.subject = None;
        assert!(ticket.format_for_model().contains("**Subject:** N/A"));
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let ticket: Ticket = serde_json::from_str(
            r#"{"ticket_id":"T-9","customer_email":"x@y.z","messages":[{"content":"hi"}]}"#,
        )
        .expect("ticket parses");
        assert_eq!(ticket.subject, None);
        assert_eq!(ticket.messages[0].timestamp, None);
    }
}
