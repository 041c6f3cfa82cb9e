use serde::{Deserialize, Serialize};

/// Attachment color tag understood by Slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Good,
    Warning,
    Danger,
}

impl Color {
    /// Map a cost amount to an urgency color. Thresholds are plain numeric
    /// comparisons against the reported amount, whatever the currency unit.
    pub fn for_amount(amount: f64) -> Self {
        if amount >= 100.0 {
            Self::Danger
        } else if amount >= 50.0 {
            Self::Warning
        } else {
            Self::Good
        }
    }
}

/// A labeled value inside an attachment. Short fields render two per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// A visually distinct block within a notification message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub title: String,
    #[serde(default)]
    pub text: String,
    pub color: Color,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, rename = "ts", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// A notification message: lead-in text plus ordered attachments. The serde
/// shape is exactly what Slack incoming webhooks accept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub attachments: Vec<Attachment>,
}
