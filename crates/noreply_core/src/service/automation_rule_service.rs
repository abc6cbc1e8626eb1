//! Automation rule collection service.
//!
//! # Invariants
//! - First read of a never-written collection persists `default_rules()`.
//! - New rules are appended.

use crate::model::automation_rule::{default_rules, AutomationRule, AutomationRuleDraft};
use crate::repo::document_store::{CollectionKey, DocumentStore};
use crate::repo::substrate::KvSubstrate;
use crate::service::id_generator::IdGenerator;
use crate::service::{
    remove_record, upsert_record, InsertPosition, ServiceError, ServiceResult, UpsertOutcome,
};
use log::debug;

const KEY: CollectionKey = CollectionKey::AutomationRules;

pub struct AutomationRuleService<'a, S: KvSubstrate> {
    store: &'a DocumentStore<S>,
    ids: &'a dyn IdGenerator,
}

impl<'a, S: KvSubstrate> AutomationRuleService<'a, S> {
    pub fn new(store: &'a DocumentStore<S>, ids: &'a dyn IdGenerator) -> Self {
        Self { store, ids }
    }

    /// Lists rules, seeding and persisting the defaults on first access.
    pub fn list(&self) -> ServiceResult<Vec<AutomationRule>> {
        Ok(self.store.read_or_seed(KEY, default_rules)?)
    }

    /// Lists rules without writing; an absent collection shows the defaults.
    pub fn peek(&self) -> ServiceResult<Vec<AutomationRule>> {
        Ok(self.store.read_or_default(KEY, default_rules)?)
    }

    pub fn get(&self, id: &str) -> ServiceResult<Option<AutomationRule>> {
        Ok(self.list()?.into_iter().find(|record| record.id == id))
    }

    /// Creates an enabled rule with a fresh id.
    pub fn create(&self, draft: AutomationRuleDraft) -> ServiceResult<AutomationRule> {
        let record = draft.into_record(self.ids.next_id());
        self.upsert(record.clone())?;
        Ok(record)
    }

    pub fn upsert(&self, record: AutomationRule) -> ServiceResult<UpsertOutcome> {
        record.validate()?;
        let mut records = self.list()?;
        let outcome = upsert_record(&mut records, record, InsertPosition::Back);
        self.store.write(KEY, &records)?;
        debug!(
            "event=rule_upsert module=service status=ok outcome={}",
            outcome.as_str()
        );
        Ok(outcome)
    }

    pub fn delete(&self, id: &str) -> ServiceResult<bool> {
        let mut records = self.list()?;
        let removed = remove_record(&mut records, id);
        self.store.write(KEY, &records)?;
        debug!("event=rule_delete module=service status=ok removed={removed}");
        Ok(removed)
    }

    pub fn set_enabled(&self, id: &str, enabled: bool) -> ServiceResult<AutomationRule> {
        let mut record = self
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        record.enabled = enabled;
        self.upsert(record.clone())?;
        Ok(record)
    }

    pub fn enabled_count(&self) -> ServiceResult<usize> {
        Ok(self.list()?.iter().filter(|rule| rule.enabled).count())
    }
}
