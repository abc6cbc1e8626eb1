//! Domain model for follow-ups, automation rules and message templates.
//!
//! # Responsibility
//! - Define the record shapes persisted by the document store.
//! - Own record-level validation shared by every collection service.
//!
//! # Invariants
//! - Every record is identified by a non-empty `RecordId`, unique within its
//!   collection.
//! - Records are replaced whole; there is no partial patch.
//! - Deletion is a hard delete; no tombstone is kept.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod automation_rule;
pub mod follow_up;
pub mod template;
pub mod tone;

/// Opaque stable identifier of a record within its collection.
///
/// Seed records use short literal ids (`"1"`, `"2"`), generated ids are
/// longer random strings, so the type stays a plain string.
pub type RecordId = String;

/// Record types that carry a collection-unique identifier.
pub trait Identified {
    fn record_id(&self) -> &str;
}

/// Validation errors raised before any record is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Record id is empty or whitespace-only.
    EmptyId,
    /// A required text field is blank.
    BlankField(&'static str),
    /// Automation rule trigger window must be at least one day.
    NonPositiveTriggerDays,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "record id must not be empty"),
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::NonPositiveTriggerDays => write!(f, "`triggerDays` must be a positive integer"),
        }
    }
}

impl Error for RecordValidationError {}

pub(crate) fn require_id(id: &str) -> Result<(), RecordValidationError> {
    if id.trim().is_empty() {
        return Err(RecordValidationError::EmptyId);
    }
    Ok(())
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::BlankField(field));
    }
    Ok(())
}
