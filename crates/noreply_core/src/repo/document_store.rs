//! Document store over a key-value substrate.
//!
//! # Responsibility
//! - Map each collection to one substrate key holding a JSON array.
//! - Encode/decode records at the boundary; callers only see typed records.
//!
//! # Invariants
//! - Every mutation rewrites a whole collection entry; there are no partial
//!   updates of a single key.
//! - Malformed persisted data is never propagated as an error. An entry that
//!   is not a JSON array loads as empty; inside an array, only the elements
//!   that fail to decode are skipped.
//! - Substrate failures surface as `StoreError::Unavailable`.

use crate::repo::substrate::{KvSubstrate, SubstrateError};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Named collections and their substrate keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    FollowUps,
    AutomationRules,
    Templates,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 3] = [
        CollectionKey::FollowUps,
        CollectionKey::AutomationRules,
        CollectionKey::Templates,
    ];

    /// Substrate key; kept stable so existing local data stays readable.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::FollowUps => "noreply_pro_db_v2",
            Self::AutomationRules => "noreply_pro_rules_v2",
            Self::Templates => "noreply_pro_templates_v2",
        }
    }

    /// Short label used in log events.
    pub fn label(self) -> &'static str {
        match self {
            Self::FollowUps => "follow_ups",
            Self::AutomationRules => "rules",
            Self::Templates => "templates",
        }
    }
}

impl Display for CollectionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// The substrate refused or failed the operation; nothing was changed.
    Unavailable {
        key: CollectionKey,
        operation: &'static str,
        source: SubstrateError,
    },
    /// Records could not be encoded as JSON.
    Encode {
        key: CollectionKey,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable {
                key,
                operation,
                source,
            } => write!(f, "persistence unavailable ({operation} {key}): {source}"),
            Self::Encode { key, source } => write!(f, "failed to encode {key}: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable { source, .. } => Some(source),
            Self::Encode { source, .. } => Some(source),
        }
    }
}

/// Result of loading one collection entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<T> {
    /// The key has never been written (or was removed).
    Absent,
    /// The key exists. Undecodable elements are dropped; a non-array entry
    /// loads as an empty sequence.
    Present(Vec<T>),
}

impl<T> Loaded<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn into_records(self) -> Vec<T> {
        match self {
            Self::Absent => Vec::new(),
            Self::Present(records) => records,
        }
    }
}

/// Collection-granular JSON store. Construct once and share by reference.
pub struct DocumentStore<S: KvSubstrate> {
    substrate: S,
}

impl<S: KvSubstrate> DocumentStore<S> {
    pub fn new(substrate: S) -> Self {
        Self { substrate }
    }

    pub fn substrate(&self) -> &S {
        &self.substrate
    }

    /// Loads a collection, distinguishing a missing entry from a present one.
    pub fn load<T: DeserializeOwned>(&self, key: CollectionKey) -> StoreResult<Loaded<T>> {
        let raw = self
            .substrate
            .get(key.storage_key())
            .map_err(|source| unavailable(key, "read", source))?;

        let Some(raw) = raw else {
            debug!("event=collection_read module=store status=absent key={key}");
            return Ok(Loaded::Absent);
        };

        let elements = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(elements) => elements,
            Err(err) => {
                warn!(
                    "event=collection_read module=store status=degraded key={key} error_code=malformed_json line={} column={}",
                    err.line(),
                    err.column()
                );
                return Ok(Loaded::Present(Vec::new()));
            }
        };

        let total = elements.len();
        let mut records = Vec::with_capacity(total);
        for (index, element) in elements.into_iter().enumerate() {
            match serde_json::from_value::<T>(element) {
                Ok(record) => records.push(record),
                Err(err) => warn!(
                    "event=collection_read module=store status=degraded key={key} error_code=malformed_record index={index} error={err}"
                ),
            }
        }

        debug!(
            "event=collection_read module=store status=ok key={key} records={} skipped={}",
            records.len(),
            total - records.len()
        );
        Ok(Loaded::Present(records))
    }

    /// Reads a collection; absent and unparseable entries both yield empty.
    pub fn read<T: DeserializeOwned>(&self, key: CollectionKey) -> StoreResult<Vec<T>> {
        Ok(self.load(key)?.into_records())
    }

    /// Reads a collection, materializing and persisting `seed` when the key
    /// has never been written.
    ///
    /// A present-but-malformed entry is not re-seeded.
    pub fn read_or_seed<T, F>(&self, key: CollectionKey, seed: F) -> StoreResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        match self.load(key)? {
            Loaded::Present(records) => Ok(records),
            Loaded::Absent => {
                let records = seed();
                self.write(key, &records)?;
                info!(
                    "event=collection_seed module=store status=ok key={key} records={}",
                    records.len()
                );
                Ok(records)
            }
        }
    }

    /// Reads a collection without writing; a never-written entry yields
    /// `seed` instead of being persisted.
    pub fn read_or_default<T, F>(&self, key: CollectionKey, seed: F) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        Ok(match self.load(key)? {
            Loaded::Absent => seed(),
            Loaded::Present(records) => records,
        })
    }

    /// Serializes and overwrites the whole collection entry.
    pub fn write<T: Serialize>(&self, key: CollectionKey, records: &[T]) -> StoreResult<()> {
        let started_at = Instant::now();
        let encoded =
            serde_json::to_string(records).map_err(|source| StoreError::Encode { key, source })?;

        if let Err(source) = self.substrate.set(key.storage_key(), &encoded) {
            warn!(
                "event=collection_write module=store status=error key={key} error_code=substrate_unavailable error={source}"
            );
            return Err(unavailable(key, "write", source));
        }

        info!(
            "event=collection_write module=store status=ok key={key} records={} bytes={} duration_ms={}",
            records.len(),
            encoded.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Deletes the collection entry, returning it to the unseeded state.
    pub fn remove(&self, key: CollectionKey) -> StoreResult<()> {
        self.substrate
            .remove(key.storage_key())
            .map_err(|source| unavailable(key, "remove", source))?;
        info!("event=collection_remove module=store status=ok key={key}");
        Ok(())
    }
}

fn unavailable(key: CollectionKey, operation: &'static str, source: SubstrateError) -> StoreError {
    StoreError::Unavailable {
        key,
        operation,
        source,
    }
}
