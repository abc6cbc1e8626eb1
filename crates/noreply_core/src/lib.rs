//! Local persistence core for NoReply follow-up tracking.
//!
//! Owns the document store, typed collection services, bulk export/purge,
//! and the seam to the external drafting collaborator.

pub mod config;
pub mod db;
pub mod drafting;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use drafting::{
    build_draft_prompt, draft_follow_up_notes, normalize_draft, DraftError, DraftFlowError,
    DraftGenerator, DraftRequest, DRAFT_FALLBACK_TEXT,
};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::automation_rule::{default_rules, AutomationRule, AutomationRuleDraft};
pub use model::follow_up::{Category, FollowUp, FollowUpDraft, FollowUpStatus, Platform, Priority};
pub use model::template::{default_templates, Template, TemplateDraft};
pub use model::tone::Tone;
pub use model::{Identified, RecordId, RecordValidationError};
pub use repo::document_store::{CollectionKey, DocumentStore, Loaded, StoreError, StoreResult};
pub use repo::memory_substrate::MemorySubstrate;
pub use repo::sqlite_substrate::SqliteSubstrate;
pub use repo::substrate::{KvSubstrate, SubstrateError, SubstrateResult};
pub use service::automation_rule_service::AutomationRuleService;
pub use service::bulk_service::{export_file_name, BulkService, ExportError, Snapshot};
pub use service::follow_up_service::{compute_stats, FollowUpService, OutreachStats};
pub use service::id_generator::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use service::template_service::TemplateService;
pub use service::{ServiceError, ServiceResult, UpsertOutcome};

/// Minimal health-check API for integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
