//! Follow-up collection service.
//!
//! # Invariants
//! - New follow-ups are prepended (most-recent-first).
//! - Replacing a follow-up never changes its stored `created_at`.
//! - An absent collection lists as empty; follow-ups have no default seed.

use crate::model::follow_up::{FollowUp, FollowUpDraft, FollowUpStatus};
use crate::repo::document_store::{CollectionKey, DocumentStore};
use crate::repo::substrate::KvSubstrate;
use crate::service::id_generator::IdGenerator;
use crate::service::{
    remove_record, upsert_record, InsertPosition, ServiceError, ServiceResult, UpsertOutcome,
};
use chrono::Utc;
use log::debug;

const KEY: CollectionKey = CollectionKey::FollowUps;

/// Aggregate counters for the outreach insights view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutreachStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
    /// `completed / total` as a rounded percentage; 0 when there is nothing.
    pub success_rate_percent: u32,
}

pub struct FollowUpService<'a, S: KvSubstrate> {
    store: &'a DocumentStore<S>,
    ids: &'a dyn IdGenerator,
}

impl<'a, S: KvSubstrate> FollowUpService<'a, S> {
    pub fn new(store: &'a DocumentStore<S>, ids: &'a dyn IdGenerator) -> Self {
        Self { store, ids }
    }

    /// Lists follow-ups, most recently created first.
    pub fn list(&self) -> ServiceResult<Vec<FollowUp>> {
        Ok(self.store.read(KEY)?)
    }

    pub fn get(&self, id: &str) -> ServiceResult<Option<FollowUp>> {
        Ok(self.list()?.into_iter().find(|record| record.id == id))
    }

    /// Creates a pending follow-up with a fresh id and `created_at = now`.
    pub fn create(&self, draft: FollowUpDraft) -> ServiceResult<FollowUp> {
        let record = draft.into_record(self.ids.next_id(), Utc::now());
        self.upsert(record.clone())?;
        Ok(record)
    }

    /// Inserts or replaces a follow-up keyed by `id`.
    pub fn upsert(&self, mut record: FollowUp) -> ServiceResult<UpsertOutcome> {
        record.validate()?;
        let mut records = self.list()?;
        if let Some(existing) = records.iter().find(|existing| existing.id == record.id) {
            record.created_at = existing.created_at;
        }
        let outcome = upsert_record(&mut records, record, InsertPosition::Front);
        self.store.write(KEY, &records)?;
        debug!(
            "event=follow_up_upsert module=service status=ok outcome={}",
            outcome.as_str()
        );
        Ok(outcome)
    }

    /// Deletes by id; returns `false` when nothing matched.
    pub fn delete(&self, id: &str) -> ServiceResult<bool> {
        let mut records = self.list()?;
        let removed = remove_record(&mut records, id);
        self.store.write(KEY, &records)?;
        debug!("event=follow_up_delete module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Replaces the notes of one follow-up, e.g. with a generated draft.
    pub fn set_notes(&self, id: &str, notes: impl Into<String>) -> ServiceResult<FollowUp> {
        let mut record = self
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        record.notes = notes.into();
        self.upsert(record.clone())?;
        Ok(record)
    }

    /// Replaces the status of one follow-up.
    pub fn set_status(&self, id: &str, status: FollowUpStatus) -> ServiceResult<FollowUp> {
        let mut record = self
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        record.status = status;
        self.upsert(record.clone())?;
        Ok(record)
    }

    /// First `limit` pending follow-ups in collection order.
    pub fn recent_pending(&self, limit: usize) -> ServiceResult<Vec<FollowUp>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(FollowUp::is_pending)
            .take(limit)
            .collect())
    }

    pub fn stats(&self) -> ServiceResult<OutreachStats> {
        Ok(compute_stats(&self.list()?))
    }
}

pub fn compute_stats(records: &[FollowUp]) -> OutreachStats {
    let count = |status: FollowUpStatus| {
        records
            .iter()
            .filter(|record| record.status == status)
            .count()
    };
    let total = records.len();
    let completed = count(FollowUpStatus::Completed);
    let success_rate_percent = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    };

    OutreachStats {
        total,
        pending: count(FollowUpStatus::Pending),
        completed,
        overdue: count(FollowUpStatus::Overdue),
        success_rate_percent,
    }
}
