//! FFI use-case API for the UI collaborator.
//!
//! # Responsibility
//! - Expose list/create/upsert/delete per collection, export and purge.
//! - Exchange records as JSON using the persisted camelCase shape.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Failures are reported in the response envelope; a storage failure sets
//!   `persistence_unavailable` so the UI can offer a retry.
//! - The store database path is resolved once per process.

use log::warn;
use noreply_core::db::open_db;
use noreply_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AutomationRule, AutomationRuleDraft, AutomationRuleService, BulkService, DocumentStore,
    ExportError, FollowUp, FollowUpDraft, FollowUpService, RandomIdGenerator, ServiceError,
    SqliteSubstrate, StoreConfig, Template, TemplateDraft, TemplateService,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::OnceLock;

static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the store database path before first use.
///
/// Returns an empty string on success. Pinning a different path after the
/// store was already used is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "store db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORE_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "store db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Response envelope shared by every store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Set when storage could not be opened or written.
    pub persistence_unavailable: bool,
    /// JSON payload (records, record, snapshot) when the call returns data.
    pub payload_json: Option<String>,
    /// Human-readable diagnostics.
    pub message: String,
}

impl StoreResponse {
    fn success(message: impl Into<String>, payload_json: Option<String>) -> Self {
        Self {
            ok: true,
            persistence_unavailable: false,
            payload_json,
            message: message.into(),
        }
    }

    fn failure(operation: &str, failure: CallFailure) -> Self {
        Self {
            ok: false,
            persistence_unavailable: failure.persistence_unavailable,
            payload_json: None,
            message: format!("{operation} failed: {}", failure.message),
        }
    }
}

/// Outreach counters for the insights view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsResponse {
    pub ok: bool,
    pub total: u32,
    pub pending: u32,
    pub completed: u32,
    pub overdue: u32,
    pub success_rate_percent: u32,
    pub message: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn follow_ups_list() -> StoreResponse {
    respond("follow_ups_list", |store| {
        let service = FollowUpService::new(store, &RandomIdGenerator);
        to_json(&service.list()?)
    })
}

/// Creates a follow-up from a draft JSON object (no `id`).
#[flutter_rust_bridge::frb(sync)]
pub fn follow_up_create(draft_json: String) -> StoreResponse {
    respond("follow_up_create", |store| {
        let draft: FollowUpDraft = from_json(&draft_json)?;
        let service = FollowUpService::new(store, &RandomIdGenerator);
        to_json(&service.create(draft)?)
    })
}

/// Replaces (or inserts) a full follow-up record keyed by its `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn follow_up_upsert(record_json: String) -> StoreResponse {
    respond("follow_up_upsert", |store| {
        let record: FollowUp = from_json(&record_json)?;
        let service = FollowUpService::new(store, &RandomIdGenerator);
        Ok(service.upsert(record)?.as_str().to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn follow_up_delete(id: String) -> StoreResponse {
    respond("follow_up_delete", |store| {
        let service = FollowUpService::new(store, &RandomIdGenerator);
        to_json(&service.delete(id.trim())?)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn follow_up_stats() -> StatsResponse {
    let result = with_store(|store| {
        FollowUpService::new(store, &RandomIdGenerator)
            .stats()
            .map_err(CallFailure::from)
    });
    match result {
        Ok(stats) => StatsResponse {
            ok: true,
            total: saturating_u32(stats.total),
            pending: saturating_u32(stats.pending),
            completed: saturating_u32(stats.completed),
            overdue: saturating_u32(stats.overdue),
            success_rate_percent: stats.success_rate_percent,
            message: String::new(),
        },
        Err(failure) => StatsResponse {
            ok: false,
            total: 0,
            pending: 0,
            completed: 0,
            overdue: 0,
            success_rate_percent: 0,
            message: format!("follow_up_stats failed: {}", failure.message),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn rules_list() -> StoreResponse {
    respond("rules_list", |store| {
        let service = AutomationRuleService::new(store, &RandomIdGenerator);
        to_json(&service.list()?)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn rule_create(draft_json: String) -> StoreResponse {
    respond("rule_create", |store| {
        let draft: AutomationRuleDraft = from_json(&draft_json)?;
        let service = AutomationRuleService::new(store, &RandomIdGenerator);
        to_json(&service.create(draft)?)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn rule_upsert(record_json: String) -> StoreResponse {
    respond("rule_upsert", |store| {
        let record: AutomationRule = from_json(&record_json)?;
        let service = AutomationRuleService::new(store, &RandomIdGenerator);
        Ok(service.upsert(record)?.as_str().to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn rule_delete(id: String) -> StoreResponse {
    respond("rule_delete", |store| {
        let service = AutomationRuleService::new(store, &RandomIdGenerator);
        to_json(&service.delete(id.trim())?)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn templates_list() -> StoreResponse {
    respond("templates_list", |store| {
        let service = TemplateService::new(store, &RandomIdGenerator);
        to_json(&service.list()?)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn template_create(draft_json: String) -> StoreResponse {
    respond("template_create", |store| {
        let draft: TemplateDraft = from_json(&draft_json)?;
        let service = TemplateService::new(store, &RandomIdGenerator);
        to_json(&service.create(draft)?)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn template_upsert(record_json: String) -> StoreResponse {
    respond("template_upsert", |store| {
        let record: Template = from_json(&record_json)?;
        let service = TemplateService::new(store, &RandomIdGenerator);
        Ok(service.upsert(record)?.as_str().to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn template_delete(id: String) -> StoreResponse {
    respond("template_delete", |store| {
        let service = TemplateService::new(store, &RandomIdGenerator);
        to_json(&service.delete(id.trim())?)
    })
}

/// Returns the pretty-printed export snapshot as payload.
#[flutter_rust_bridge::frb(sync)]
pub fn store_export() -> StoreResponse {
    respond("store_export", |store| {
        BulkService::new(store)
            .export_json()
            .map_err(CallFailure::from)
    })
}

/// Erases every collection. The UI must confirm with the user first.
#[flutter_rust_bridge::frb(sync)]
pub fn store_purge() -> StoreResponse {
    match with_store(|store| BulkService::new(store).purge_all().map_err(CallFailure::from)) {
        Ok(()) => StoreResponse::success("All local data erased.", None),
        Err(failure) => StoreResponse::failure("store_purge", failure),
    }
}

struct CallFailure {
    message: String,
    persistence_unavailable: bool,
}

impl CallFailure {
    fn invalid(message: String) -> Self {
        Self {
            message,
            persistence_unavailable: false,
        }
    }
}

impl From<ExportError> for CallFailure {
    fn from(value: ExportError) -> Self {
        match value {
            ExportError::Service(err) => err.into(),
            other => Self::invalid(other.to_string()),
        }
    }
}

impl From<ServiceError> for CallFailure {
    fn from(value: ServiceError) -> Self {
        Self {
            persistence_unavailable: value.is_persistence_unavailable(),
            message: value.to_string(),
        }
    }
}

type Store<'conn> = DocumentStore<SqliteSubstrate<'conn>>;

fn respond(
    operation: &str,
    f: impl FnOnce(&Store<'_>) -> Result<String, CallFailure>,
) -> StoreResponse {
    match with_store(f) {
        Ok(payload) => StoreResponse::success("ok", Some(payload)),
        Err(failure) => StoreResponse::failure(operation, failure),
    }
}

fn with_store<T>(f: impl FnOnce(&Store<'_>) -> Result<T, CallFailure>) -> Result<T, CallFailure> {
    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_store_open module=ffi status=error error={err}");
        CallFailure {
            message: format!("store DB open failed: {err}"),
            persistence_unavailable: true,
        }
    })?;
    let store = DocumentStore::new(SqliteSubstrate::new(&conn));
    f(&store)
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| match StoreConfig::from_env() {
            Ok(config) => config.db_path,
            Err(err) => {
                warn!("event=ffi_config module=ffi status=degraded error={err}");
                noreply_core::config::default_db_path()
            }
        })
        .clone()
}

fn from_json<T: DeserializeOwned>(raw: &str) -> Result<T, CallFailure> {
    serde_json::from_str(raw).map_err(|err| CallFailure::invalid(format!("invalid JSON: {err}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CallFailure> {
    serde_json::to_string(value).map_err(|err| CallFailure::invalid(err.to_string()))
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
