use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-evaluated status of a rule. The evaluation service is the sole
/// owner of this flag: there is no mutator here, and the client obtains a
/// new value only by re-fetching after a reset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    Normal,
    Triggered,
}

impl RuleStatus {
    pub fn from_flag(triggered: bool) -> Self {
        if triggered {
            Self::Triggered
        } else {
            Self::Normal
        }
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered)
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("Normal"),
            Self::Triggered => f.write_str("Triggered"),
        }
    }
}

/// An alert rule as the backend returns it. `triggerConditions` stays an
/// opaque encoded string until rendered through the codec. `hiveName` and
/// `createdAt` are server-supplied display fields, rendered as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "opaque_id")]
    pub hive_id: String,
    #[serde(default)]
    pub hive_name: String,
    #[serde(default)]
    pub trigger_conditions: Option<String>,
    #[serde(default)]
    is_triggered: bool,
    #[serde(default)]
    pub created_at: String,
}

impl AlertRecord {
    pub fn status(&self) -> RuleStatus {
        RuleStatus::from_flag(self.is_triggered)
    }
}

/// The body of a create-or-update request: the client owns the definition
/// while authoring, nothing more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub name: String,
    pub hive_id: String,
    pub trigger_conditions: String,
}

/// A hive as listed for the rule editor's selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiveRecord {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
}

impl HiveRecord {
    pub fn selector_label(&self) -> String {
        format!("{} ({})", self.name, self.location)
    }
}

/// The backend is inconsistent about id types (numeric in some tables,
/// UUID strings in others); the client treats every id as an opaque string.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
