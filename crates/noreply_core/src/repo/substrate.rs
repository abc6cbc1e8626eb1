//! Key-value substrate contract.
//!
//! # Responsibility
//! - Define the synchronous get/set/remove surface the document store
//!   persists through.
//!
//! # Invariants
//! - `set` replaces the whole value for a key in one call; no partial value
//!   is ever observable by a later `get`.
//! - Implementations are single-writer; callers needing concurrent writers
//!   must serialize access per key themselves.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SubstrateResult<T> = Result<T, SubstrateError>;

/// Failure raised by a substrate when it cannot serve a request.
#[derive(Debug)]
pub enum SubstrateError {
    /// Backing SQLite database failed.
    Db(DbError),
    /// Write would exceed the configured storage quota.
    QuotaExceeded {
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// Storage has been disabled by the host environment.
    Disabled,
}

impl Display for SubstrateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded: {required_bytes} bytes required, {quota_bytes} allowed"
            ),
            Self::Disabled => write!(f, "storage is disabled"),
        }
    }
}

impl Error for SubstrateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::Disabled => None,
        }
    }
}

impl From<DbError> for SubstrateError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SubstrateError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string key-value storage.
pub trait KvSubstrate {
    fn get(&self, key: &str) -> SubstrateResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> SubstrateResult<()>;
    fn remove(&self, key: &str) -> SubstrateResult<()>;
}

impl<S: KvSubstrate + ?Sized> KvSubstrate for &S {
    fn get(&self, key: &str) -> SubstrateResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> SubstrateResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> SubstrateResult<()> {
        (**self).remove(key)
    }
}
