//! Typed collection services and bulk operations.
//!
//! # Responsibility
//! - Provide list/upsert/delete per entity kind over the document store.
//! - Own default-seed policy and identity assignment.
//! - Keep UI/FFI callers away from substrate keys and JSON.
//!
//! # Invariants
//! - Every upsert/delete reads the current collection, modifies it in memory
//!   and rewrites the whole entry.
//! - Upsert with an existing id replaces in place (position preserved).
//! - Delete of an absent id is a no-op, not an error.

use crate::model::{Identified, RecordId, RecordValidationError};
use crate::repo::document_store::StoreError;
use crate::repo::substrate::SubstrateError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod automation_rule_service;
pub mod bulk_service;
pub mod follow_up_service;
pub mod id_generator;
pub mod template_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Record failed validation; nothing was written.
    Validation(RecordValidationError),
    /// Targeted record does not exist.
    NotFound(RecordId),
    /// Persistence layer failure.
    Store(StoreError),
}

impl ServiceError {
    /// Whether the failure is the recoverable "storage unavailable" case.
    pub fn is_persistence_unavailable(&self) -> bool {
        matches!(self, Self::Store(StoreError::Unavailable { .. }))
    }

    /// Underlying substrate failure, when there is one.
    pub fn substrate_error(&self) -> Option<&SubstrateError> {
        match self {
            Self::Store(StoreError::Unavailable { source, .. }) => Some(source),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid record: {err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for ServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// What an upsert did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

impl UpsertOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Replaced => "replaced",
        }
    }
}

/// Where new records land in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertPosition {
    /// Most-recent-first collections.
    Front,
    Back,
}

pub(crate) fn upsert_record<T: Identified>(
    records: &mut Vec<T>,
    record: T,
    position: InsertPosition,
) -> UpsertOutcome {
    match records
        .iter()
        .position(|existing| existing.record_id() == record.record_id())
    {
        Some(index) => {
            records[index] = record;
            UpsertOutcome::Replaced
        }
        None => {
            match position {
                InsertPosition::Front => records.insert(0, record),
                InsertPosition::Back => records.push(record),
            }
            UpsertOutcome::Inserted
        }
    }
}

/// Removes every record with `id`; returns whether anything was removed.
pub(crate) fn remove_record<T: Identified>(records: &mut Vec<T>, id: &str) -> bool {
    let before = records.len();
    records.retain(|record| record.record_id() != id);
    records.len() != before
}
