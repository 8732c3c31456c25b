// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types

use thiserror::Error;

/// Errors raised while handling an admin command.
#[derive(Debug, Error)]
pub enum DynsecError {
    /// Malformed request; the message is shown to the caller as-is
    #[error("{0}")]
    InvalidArgument(String),

    /// Response could not be built; the cause is kept for logs only
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistError),
}

impl DynsecError {
    /// Text placed in the `error` field of the reply.
    ///
    /// Internal failures collapse to a generic message.
    pub fn reply_message(&self) -> String {
        match self {
            Self::InvalidArgument(msg) => msg.clone(),
            Self::Internal(_) | Self::Persistence(_) => "Internal error".to_string(),
            Self::UnknownCommand(_) => "Unknown command".to_string(),
        }
    }
}

/// Errors from the persistence backend.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid state file: {0}")]
    Format(String),
}
