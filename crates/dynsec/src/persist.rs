// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Persistence of the default access policy
//!
//! The policy is kept in the dynamic-security state file under the
//! `defaultACLAccess` key, using the same entry shape as the admin wire
//! format:
//!
//! ```json
//! {
//!   "defaultACLAccess": [
//!     { "acltype": "publishClientSend", "allow": false },
//!     { "acltype": "publishClientReceive", "allow": true },
//!     { "acltype": "subscribe", "allow": false },
//!     { "acltype": "unsubscribe", "allow": true }
//!   ]
//! }
//! ```
//!
//! Other top-level keys (clients, groups, roles) belong to other stores and
//! are carried over untouched on save.

use crate::acl_type::AclType;
use crate::command::{raw_acl_entry, AclEntry};
use crate::error::PersistError;
use crate::policy::DefaultAccess;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Key of the default access section in the state file
pub const DEFAULT_ACCESS_KEY: &str = "defaultACLAccess";

/// Persistence trigger called after every `setDefaultACLAccess`.
pub trait PolicyPersistence: Send + Sync {
    /// Durably store the full policy
    fn save(&self, policy: &DefaultAccess) -> Result<(), PersistError>;
}

/// Serialize a policy as the `defaultACLAccess` array
pub fn policy_to_value(policy: &DefaultAccess) -> Result<Value, PersistError> {
    let entries: Vec<AclEntry> = policy
        .entries()
        .iter()
        .map(|(t, allow)| AclEntry::new(*t, *allow))
        .collect();
    Ok(serde_json::to_value(entries)?)
}

/// Read a policy from a `defaultACLAccess` array.
///
/// Uses the same tolerance as the admin command: malformed or unknown
/// entries are skipped and leave the startup default in place.
pub fn policy_from_value(section: &Value) -> DefaultAccess {
    let mut policy = DefaultAccess::default();
    if let Some(entries) = section.as_array() {
        for (acltype, allow) in entries.iter().filter_map(raw_acl_entry) {
            if let Some(t) = AclType::from_name(acltype) {
                policy.set(t, allow);
            }
        }
    }
    policy
}

// ---------------------------------------------------------------------------
// JSON state file
// ---------------------------------------------------------------------------

/// Stores the policy in a JSON state file.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the policy from disk.
    ///
    /// A missing file or a missing section yields the startup defaults.
    pub fn load(&self) -> Result<DefaultAccess, PersistError> {
        let doc = match self.read_document()? {
            Some(doc) => doc,
            None => {
                tracing::debug!(
                    "State file '{}' not found, using startup defaults",
                    self.path.display()
                );
                return Ok(DefaultAccess::default());
            }
        };

        match doc.get(DEFAULT_ACCESS_KEY) {
            Some(section) => Ok(policy_from_value(section)),
            None => Ok(DefaultAccess::default()),
        }
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>, PersistError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(PersistError::Format(format!(
                "'{}' is not a JSON object",
                self.path.display()
            ))),
        }
    }

    /// Path of the staging file renamed over the state file
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".new");
        self.path.with_file_name(name)
    }
}

impl PolicyPersistence for JsonFilePersistence {
    fn save(&self, policy: &DefaultAccess) -> Result<(), PersistError> {
        let mut doc = self.read_document()?.unwrap_or_default();
        doc.insert(DEFAULT_ACCESS_KEY.to_string(), policy_to_value(policy)?);

        let json = serde_json::to_string_pretty(&Value::Object(doc))?;
        let staging = self.staging_path();
        let mut file = File::create(&staging)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&staging, &self.path)?;

        tracing::debug!("Saved default ACL access to '{}'", self.path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Records every saved snapshot instead of writing to disk.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Mutex<Vec<DefaultAccess>>,
    fail: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail with an I/O error
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of save calls, including failed ones
    pub fn save_count(&self) -> usize {
        self.saved.lock().len()
    }

    pub fn last_saved(&self) -> Option<DefaultAccess> {
        self.saved.lock().last().copied()
    }
}

impl PolicyPersistence for MemoryPersistence {
    fn save(&self, policy: &DefaultAccess) -> Result<(), PersistError> {
        self.saved.lock().push(*policy);
        if self.fail.load(Ordering::SeqCst) {
            return Err(PersistError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated save failure",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let persist = JsonFilePersistence::new(dir.path().join("absent.json"));
        assert_eq!(persist.load().unwrap(), DefaultAccess::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let persist = JsonFilePersistence::new(dir.path().join("dynsec.json"));

        let policy = DefaultAccess {
            publish_client_send: true,
            publish_client_receive: false,
            subscribe: true,
            unsubscribe: false,
        };
        persist.save(&policy).unwrap();

        assert_eq!(persist.load().unwrap(), policy);
        assert!(!persist.staging_path().exists());
    }

    #[test]
    fn test_save_overwrites_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let persist = JsonFilePersistence::new(dir.path().join("dynsec.json"));

        persist
            .save(&DefaultAccess {
                subscribe: true,
                ..Default::default()
            })
            .unwrap();
        persist.save(&DefaultAccess::default()).unwrap();

        assert_eq!(persist.load().unwrap(), DefaultAccess::default());
        assert!(!persist.staging_path().exists());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let persist = JsonFilePersistence::new(dir.path().join("absent").join("dynsec.json"));

        let err = persist.save(&DefaultAccess::default()).unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
        assert!(!persist.path().exists());
    }

    #[test]
    fn test_save_preserves_other_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynsec.json");
        std::fs::write(
            &path,
            r#"{"clients":[{"username":"alice"}],"roles":[],"defaultACLAccess":[]}"#,
        )
        .unwrap();

        let persist = JsonFilePersistence::new(&path);
        persist
            .save(&DefaultAccess {
                unsubscribe: true,
                ..Default::default()
            })
            .unwrap();

        let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["clients"], json!([{"username": "alice"}]));
        assert_eq!(doc["roles"], json!([]));
        assert_eq!(
            doc[DEFAULT_ACCESS_KEY],
            json!([
                {"acltype": "publishClientSend", "allow": false},
                {"acltype": "publishClientReceive", "allow": false},
                {"acltype": "subscribe", "allow": false},
                {"acltype": "unsubscribe", "allow": true}
            ])
        );
    }

    #[test]
    fn test_load_is_tolerant_of_bad_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynsec.json");
        std::fs::write(
            &path,
            r#"{"defaultACLAccess":[
                {"acltype":"SUBSCRIBE","allow":true},
                {"acltype":"bogus","allow":true},
                {"acltype":"unsubscribe"},
                {"acltype":"publishClientSend","allow":"yes"}
            ]}"#,
        )
        .unwrap();

        let policy = JsonFilePersistence::new(&path).load().unwrap();
        assert_eq!(
            policy,
            DefaultAccess {
                subscribe: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_load_rejects_non_object_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynsec.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = JsonFilePersistence::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistError::Format(_)));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynsec.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFilePersistence::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistError::Json(_)));
    }

    #[test]
    fn test_memory_persistence_failure_still_counts() {
        let persist = MemoryPersistence::new();
        persist.save(&DefaultAccess::default()).unwrap();
        persist.set_failing(true);
        assert!(persist.save(&DefaultAccess::default()).is_err());
        assert_eq!(persist.save_count(), 2);
    }
}
