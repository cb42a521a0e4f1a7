//! Draft state for authoring one alert rule. The draft is private to a
//! single editing session: it validates before any request is built, and on
//! remote rejection it keeps everything the operator entered so the rule
//! can be corrected and resubmitted.

use hivemon_common::codec;
use hivemon_common::condition::{ConditionField, ConditionSet};
use hivemon_common::rule::{AlertPayload, AlertRecord};

use crate::api::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum DraftMode {
    Create,
    Edit { rule_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingName,
    MissingHive,
    NoCompleteCondition,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "Alert name is required."),
            Self::MissingHive => write!(f, "Select a hive for this alert."),
            Self::NoCompleteCondition => {
                write!(f, "Please add at least one trigger condition.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum SubmitError {
    /// Caught locally; no request was issued.
    Invalid(ValidationError),
    /// The backend answered and said no (or could not be reached).
    Api(ApiError),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(v) => write!(f, "{v}"),
            Self::Api(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SubmitError {}

#[derive(Debug, Clone)]
pub struct RuleDraft {
    name: String,
    hive_id: String,
    conditions: ConditionSet,
    mode: DraftMode,
    error: Option<String>,
}

impl RuleDraft {
    /// A fresh draft: empty name, no hive selected, one blank condition.
    pub fn for_create() -> Self {
        Self {
            name: String::new(),
            hive_id: String::new(),
            conditions: ConditionSet::new_blank(),
            mode: DraftMode::Create,
            error: None,
        }
    }

    /// Seeds a draft from an existing rule. The hive binding becomes
    /// immutable for the remainder of the session.
    pub fn for_edit(record: &AlertRecord) -> Self {
        Self {
            name: record.name.clone(),
            hive_id: record.hive_id.clone(),
            conditions: codec::decode(record.trigger_conditions.as_deref()),
            mode: DraftMode::Edit {
                rule_id: record.id.clone(),
            },
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DraftMode::Edit { .. })
    }

    pub fn rule_id(&self) -> Option<&str> {
        match &self.mode {
            DraftMode::Edit { rule_id } => Some(rule_id),
            DraftMode::Create => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hive_id(&self) -> &str {
        &self.hive_id
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    /// The message from the last failed submission, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.error = None;
    }

    /// Selects the owning hive. Refused in edit mode: the binding is fixed
    /// at creation.
    pub fn set_hive(&mut self, hive_id: &str) -> bool {
        if self.is_edit() {
            return false;
        }
        self.hive_id = hive_id.to_string();
        self.error = None;
        true
    }

    pub fn add_condition(&mut self) -> bool {
        self.conditions.add_blank()
    }

    pub fn remove_condition(&mut self, index: usize) -> bool {
        self.conditions.remove(index)
    }

    pub fn update_condition(&mut self, index: usize, field: ConditionField, value: &str) -> bool {
        let updated = self.conditions.update_field(index, field, value);
        if updated {
            self.error = None;
        }
        updated
    }

    /// Replaces the whole condition set (flag-driven editing).
    pub fn replace_conditions(&mut self, conditions: ConditionSet) {
        self.conditions = conditions;
        self.error = None;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.hive_id.is_empty() {
            return Err(ValidationError::MissingHive);
        }
        if !self.conditions.has_complete() {
            return Err(ValidationError::NoCompleteCondition);
        }
        Ok(())
    }

    pub fn payload(&self) -> AlertPayload {
        AlertPayload {
            name: self.name.clone(),
            hive_id: self.hive_id.clone(),
            trigger_conditions: codec::encode(&self.conditions),
        }
    }

    /// Validates, encodes, and issues create-or-update. On failure the
    /// draft is left intact with the failure message recorded; a second
    /// submit simply retries the same draft.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<AlertRecord, SubmitError> {
        if let Err(v) = self.validate() {
            self.error = Some(v.to_string());
            return Err(SubmitError::Invalid(v));
        }

        let payload = self.payload();
        let result = match &self.mode {
            DraftMode::Create => api.create_alert(&payload).await,
            DraftMode::Edit { rule_id } => api.update_alert(rule_id, &payload).await,
        };

        match result {
            Ok(record) => {
                self.error = None;
                Ok(record)
            }
            Err(e) => {
                tracing::debug!(error = %e, "alert submission failed");
                self.error = Some(e.to_string());
                Err(SubmitError::Api(e))
            }
        }
    }
}
