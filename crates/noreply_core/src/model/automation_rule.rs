//! Automation rule model.
//!
//! Rules are stored configuration only: nothing in core evaluates
//! `trigger_days` against elapsed silence.

use super::tone::Tone;
use super::{require_id, require_text, Identified, RecordId, RecordValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRule {
    pub id: RecordId,
    pub name: String,
    /// Days of silence before the rule would fire. Always >= 1.
    pub trigger_days: u32,
    pub tone: Tone,
    pub enabled: bool,
}

impl AutomationRule {
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(&self.id)?;
        require_text("name", &self.name)?;
        if self.trigger_days == 0 {
            return Err(RecordValidationError::NonPositiveTriggerDays);
        }
        Ok(())
    }
}

impl Identified for AutomationRule {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Caller input for a new rule. New rules start enabled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRuleDraft {
    pub name: String,
    pub trigger_days: u32,
    pub tone: Tone,
}

impl AutomationRuleDraft {
    pub fn into_record(self, id: RecordId) -> AutomationRule {
        AutomationRule {
            id,
            name: self.name,
            trigger_days: self.trigger_days,
            tone: self.tone,
            enabled: true,
        }
    }
}

/// Rules materialized on first read of an empty rule collection.
pub fn default_rules() -> Vec<AutomationRule> {
    vec![
        AutomationRule {
            id: "1".to_string(),
            name: "Standard 3-Day Ping".to_string(),
            trigger_days: 3,
            tone: Tone::Polite,
            enabled: true,
        },
        AutomationRule {
            id: "2".to_string(),
            name: "Urgent 7-Day Push".to_string(),
            trigger_days: 7,
            tone: Tone::Urgent,
            enabled: false,
        },
    ]
}
