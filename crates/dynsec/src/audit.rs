// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Audit trail for admin commands
//!
//! Every accepted policy change and every policy read is recorded as one line
//! naming the admin actor:
//!
//! ```text
//! dynsec: admin-tool/alice | setDefaultACLAccess | acltype=subscribe | allow=true
//! dynsec: admin-tool/alice | getDefaultACLAccess
//! ```

use parking_lot::Mutex;

/// Severity of an audit line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warning,
}

/// Sink receiving audit lines.
pub trait AuditSink: Send + Sync {
    /// Record one formatted line
    fn log(&self, level: AuditLevel, message: &str);
}

/// Forwards audit lines to `tracing` under the `dynsec::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn log(&self, level: AuditLevel, message: &str) {
        match level {
            AuditLevel::Info => tracing::info!(target: "dynsec::audit", "{}", message),
            AuditLevel::Warning => tracing::warn!(target: "dynsec::audit", "{}", message),
        }
    }
}

/// One recorded audit line
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub level: AuditLevel,
    pub message: String,
}

/// Keeps audit lines in memory (tooling and tests).
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded lines
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// Recorded messages only
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl AuditSink for MemoryAuditSink {
    fn log(&self, level: AuditLevel, message: &str) {
        self.records.lock().push(AuditRecord {
            level,
            message: message.to_string(),
        });
    }
}

/// Format the `<clientid>/<username>` actor prefix.
pub(crate) fn actor(client_id: Option<&str>, username: Option<&str>) -> String {
    format!(
        "{}/{}",
        client_id.unwrap_or("<none>"),
        username.unwrap_or("<none>")
    )
}
