//! Reusable message template model.
//!
//! Content may embed placeholder tokens such as `[Name]`. Core detects them
//! but never substitutes them.

use super::tone::Tone;
use super::{require_id, require_text, Identified, RecordId, RecordValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([A-Za-z][A-Za-z0-9 _-]*)\]").expect("valid placeholder regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: RecordId,
    pub name: String,
    pub content: String,
    pub tone: Tone,
}

impl Template {
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(&self.id)?;
        require_text("name", &self.name)
    }

    /// Returns distinct placeholder names in first-appearance order.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER_RE.captures_iter(&self.content) {
            let name = caps[1].trim().to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

impl Identified for Template {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub content: String,
    pub tone: Tone,
}

impl TemplateDraft {
    pub fn into_record(self, id: RecordId) -> Template {
        Template {
            id,
            name: self.name,
            content: self.content,
            tone: self.tone,
        }
    }
}

/// Templates materialized on first read of an empty template collection.
pub fn default_templates() -> Vec<Template> {
    vec![Template {
        id: "1".to_string(),
        name: "Standard Follow-up".to_string(),
        content: "Hi [Name], just checking in on our previous conversation.".to_string(),
        tone: Tone::Polite,
    }]
}
