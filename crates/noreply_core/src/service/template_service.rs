//! Template collection service.
//!
//! # Invariants
//! - First read of a never-written collection persists `default_templates()`.
//! - New templates are appended.

use crate::model::template::{default_templates, Template, TemplateDraft};
use crate::repo::document_store::{CollectionKey, DocumentStore};
use crate::repo::substrate::KvSubstrate;
use crate::service::id_generator::IdGenerator;
use crate::service::{remove_record, upsert_record, InsertPosition, ServiceResult, UpsertOutcome};
use log::debug;

const KEY: CollectionKey = CollectionKey::Templates;

pub struct TemplateService<'a, S: KvSubstrate> {
    store: &'a DocumentStore<S>,
    ids: &'a dyn IdGenerator,
}

impl<'a, S: KvSubstrate> TemplateService<'a, S> {
    pub fn new(store: &'a DocumentStore<S>, ids: &'a dyn IdGenerator) -> Self {
        Self { store, ids }
    }

    /// Lists templates, seeding and persisting the default on first access.
    pub fn list(&self) -> ServiceResult<Vec<Template>> {
        Ok(self.store.read_or_seed(KEY, default_templates)?)
    }

    /// Lists templates without writing.
    pub fn peek(&self) -> ServiceResult<Vec<Template>> {
        Ok(self.store.read_or_default(KEY, default_templates)?)
    }

    pub fn get(&self, id: &str) -> ServiceResult<Option<Template>> {
        Ok(self.list()?.into_iter().find(|record| record.id == id))
    }

    pub fn create(&self, draft: TemplateDraft) -> ServiceResult<Template> {
        let record = draft.into_record(self.ids.next_id());
        self.upsert(record.clone())?;
        Ok(record)
    }

    pub fn upsert(&self, record: Template) -> ServiceResult<UpsertOutcome> {
        record.validate()?;
        let mut records = self.list()?;
        let outcome = upsert_record(&mut records, record, InsertPosition::Back);
        self.store.write(KEY, &records)?;
        debug!(
            "event=template_upsert module=service status=ok outcome={}",
            outcome.as_str()
        );
        Ok(outcome)
    }

    pub fn delete(&self, id: &str) -> ServiceResult<bool> {
        let mut records = self.list()?;
        let removed = remove_record(&mut records, id);
        self.store.write(KEY, &records)?;
        debug!("event=template_delete module=service status=ok removed={removed}");
        Ok(removed)
    }
}
