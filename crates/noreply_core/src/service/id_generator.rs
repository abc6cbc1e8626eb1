//! Identifier generation for newly created records.
//!
//! Injected into services so tests and tooling can use deterministic ids.

use crate::model::RecordId;
use std::cell::Cell;
use uuid::Uuid;

pub trait IdGenerator {
    /// Returns an id not previously handed out by this generator.
    fn next_id(&self) -> RecordId;
}

/// UUID v4 ids in simple form: 32 lowercase hex characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> RecordId {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `<prefix>-<n>` ids, starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> RecordId {
        let value = self.next.get();
        self.next.set(value + 1);
        format!("{}-{value}", self.prefix)
    }
}
