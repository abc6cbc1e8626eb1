//! Whole-store export and purge.
//!
//! # Responsibility
//! - Aggregate all collections into one timestamped snapshot document.
//! - Remove every collection entry on request.
//!
//! # Invariants
//! - Export never writes; never-written rule/template collections appear
//!   with their default seed but are not persisted.
//! - Purge is unconditional and irreversible. Confirmation is the caller's.

use crate::model::automation_rule::AutomationRule;
use crate::model::follow_up::FollowUp;
use crate::model::template::Template;
use crate::repo::document_store::{CollectionKey, DocumentStore};
use crate::repo::substrate::KvSubstrate;
use crate::service::automation_rule_service::AutomationRuleService;
use crate::service::follow_up_service::FollowUpService;
use crate::service::id_generator::RandomIdGenerator;
use crate::service::template_service::TemplateService;
use crate::service::{ServiceError, ServiceResult};
use chrono::{DateTime, NaiveDate, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Aggregate document written by export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub follow_ups: Vec<FollowUp>,
    pub rules: Vec<AutomationRule>,
    pub templates: Vec<Template>,
    pub exported_at: DateTime<Utc>,
}

impl Snapshot {
    /// Compares collection contents, ignoring the capture timestamp.
    pub fn same_contents(&self, other: &Snapshot) -> bool {
        self.follow_ups == other.follow_ups
            && self.rules == other.rules
            && self.templates == other.templates
    }
}

#[derive(Debug)]
pub enum ExportError {
    Service(ServiceError),
    Encode(serde_json::Error),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ServiceError> for ExportError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// File name used for exports captured on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("noreply-export-{}.json", date.format("%Y-%m-%d"))
}

pub struct BulkService<'a, S: KvSubstrate> {
    store: &'a DocumentStore<S>,
}

impl<'a, S: KvSubstrate> BulkService<'a, S> {
    pub fn new(store: &'a DocumentStore<S>) -> Self {
        Self { store }
    }

    /// Captures every collection plus the current time.
    pub fn export_snapshot(&self) -> ServiceResult<Snapshot> {
        // Export only reads, so no ids are ever drawn.
        let ids = RandomIdGenerator;
        let snapshot = Snapshot {
            follow_ups: FollowUpService::new(self.store, &ids).list()?,
            rules: AutomationRuleService::new(self.store, &ids).peek()?,
            templates: TemplateService::new(self.store, &ids).peek()?,
            exported_at: Utc::now(),
        };
        info!(
            "event=export_snapshot module=service status=ok follow_ups={} rules={} templates={}",
            snapshot.follow_ups.len(),
            snapshot.rules.len(),
            snapshot.templates.len()
        );
        Ok(snapshot)
    }

    /// Pretty-printed snapshot JSON.
    pub fn export_json(&self) -> Result<String, ExportError> {
        let snapshot = self.export_snapshot()?;
        serde_json::to_string_pretty(&snapshot).map_err(ExportError::Encode)
    }

    /// Writes the pretty snapshot into `dir` using `export_file_name`.
    ///
    /// Returns the written file path.
    pub fn write_export(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let json = self.export_json()?;
        let path = dir
            .as_ref()
            .join(export_file_name(Utc::now().date_naive()));
        if let Err(source) = std::fs::write(&path, json) {
            error!(
                "event=export_write module=service status=error error_code=io_failed error={source}"
            );
            return Err(ExportError::Io { path, source });
        }
        info!("event=export_write module=service status=ok");
        Ok(path)
    }

    /// Removes every collection entry. Seeds re-materialize on next list.
    pub fn purge_all(&self) -> ServiceResult<()> {
        for key in CollectionKey::ALL {
            self.store.remove(key)?;
        }
        info!("event=purge_all module=service status=ok");
        Ok(())
    }
}
