//! Follow-up domain model.
//!
//! # Responsibility
//! - Define the outreach item a user must act on.
//! - Provide the id-less draft shape used when creating new follow-ups.
//!
//! # Invariants
//! - `id` is unique within the follow-up collection.
//! - `created_at` is set once on creation and never changed by updates.

use super::{require_id, require_text, Identified, RecordId, RecordValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Channel the follow-up is sent through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Email,
    LinkedIn,
    WhatsApp,
    Other,
}

/// Lifecycle state of a follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStatus {
    Pending,
    Completed,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Work,
    Sales,
    Networking,
    Personal,
}

/// Persisted follow-up record.
///
/// Serialized with camelCase keys (`dueDate`, `createdAt`, `mediaUrl`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: RecordId,
    pub title: String,
    pub recipient: String,
    pub platform: Platform,
    pub status: FollowUpStatus,
    pub priority: Priority,
    pub category: Category,
    /// Calendar date, serialized as `YYYY-MM-DD`.
    pub due_date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl FollowUp {
    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(&self.id)?;
        require_text("title", &self.title)
    }

    pub fn is_pending(&self) -> bool {
        self.status == FollowUpStatus::Pending
    }
}

impl Identified for FollowUp {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Caller input for a new follow-up; identity and creation time are assigned
/// by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpDraft {
    pub title: String,
    pub recipient: String,
    pub platform: Platform,
    pub priority: Priority,
    pub category: Category,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub media_url: Option<String>,
}

impl FollowUpDraft {
    /// Materializes a pending follow-up with the given identity.
    pub fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> FollowUp {
        FollowUp {
            id,
            title: self.title,
            recipient: self.recipient,
            platform: self.platform,
            status: FollowUpStatus::Pending,
            priority: self.priority,
            category: self.category,
            due_date: self.due_date,
            notes: self.notes,
            created_at,
            media_url: self.media_url,
        }
    }
}
