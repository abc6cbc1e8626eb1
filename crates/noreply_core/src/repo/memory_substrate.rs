//! In-process substrate with browser-storage failure modes.

use crate::repo::substrate::{KvSubstrate, SubstrateError, SubstrateResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Map-backed substrate with an optional byte quota.
///
/// Quota accounting counts key and value bytes of every entry, the way a
/// browser accounts local storage per origin.
#[derive(Debug, Default)]
pub struct MemorySubstrate {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
    disabled: Cell<bool>,
}

impl MemorySubstrate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a substrate that rejects writes growing it past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Toggles the disabled state; a disabled substrate rejects every call.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn ensure_enabled(&self) -> SubstrateResult<()> {
        if self.disabled.get() {
            return Err(SubstrateError::Disabled);
        }
        Ok(())
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KvSubstrate for MemorySubstrate {
    fn get(&self, key: &str) -> SubstrateResult<Option<String>> {
        self.ensure_enabled()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SubstrateResult<()> {
        self.ensure_enabled()?;
        if let Some(quota_bytes) = self.quota_bytes {
            let required_bytes = self.used_bytes_without(key) + key.len() + value.len();
            if required_bytes > quota_bytes {
                return Err(SubstrateError::QuotaExceeded {
                    required_bytes,
                    quota_bytes,
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SubstrateResult<()> {
        self.ensure_enabled()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySubstrate;
    use crate::repo::substrate::{KvSubstrate, SubstrateError};

    #[test]
    fn set_get_remove_roundtrip() {
        let substrate = MemorySubstrate::new();
        substrate.set("k", "[1]").expect("set");
        assert_eq!(substrate.get("k").expect("get").as_deref(), Some("[1]"));
        substrate.remove("k").expect("remove");
        assert_eq!(substrate.get("k").expect("get"), None);
        substrate.remove("k").expect("removing an absent key is fine");
    }

    #[test]
    fn quota_rejects_growth_but_keeps_previous_value() {
        let substrate = MemorySubstrate::with_quota(8);
        substrate.set("k", "12345").expect("fits quota");
        let err = substrate.set("k", "1234567890").expect_err("exceeds quota");
        assert!(matches!(
            err,
            SubstrateError::QuotaExceeded {
                required_bytes: 11,
                quota_bytes: 8
            }
        ));
        assert_eq!(substrate.get("k").expect("get").as_deref(), Some("12345"));
    }

    #[test]
    fn disabled_substrate_rejects_all_calls() {
        let substrate = MemorySubstrate::new();
        substrate.set_disabled(true);
        assert!(matches!(substrate.get("k"), Err(SubstrateError::Disabled)));
        assert!(matches!(substrate.set("k", "v"), Err(SubstrateError::Disabled)));
        substrate.set_disabled(false);
        assert!(substrate.is_empty());
    }
}
