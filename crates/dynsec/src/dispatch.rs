// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Admin command envelope dispatch
//!
//! Admin payloads carry a batch of commands and get one reply per command,
//! in the same order:
//!
//! ```json
//! {"commands": [{"command": "getDefaultACLAccess", "correlationData": "7"}]}
//! ```
//!
//! ```json
//! {"responses": [{"command": "getDefaultACLAccess", "data": {...}, "correlationData": "7"}]}
//! ```

use crate::command::{CommandContext, CommandResponse};
use crate::error::DynsecError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Command name used in replies when the real name is unavailable
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// A component answering one or more admin commands.
pub trait CommandHandler: Send + Sync {
    /// Whether this handler owns `command`
    fn handles(&self, command: &str) -> bool;

    /// Execute `command`; must always produce a reply
    fn handle(&self, command: &str, ctx: &CommandContext, body: &Value) -> CommandResponse;
}

/// Reply envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Responses {
    pub responses: Vec<CommandResponse>,
}

/// Routes commands to registered handlers.
#[derive(Default)]
pub struct CommandDispatcher {
    handlers: Vec<Arc<dyn CommandHandler>>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler. The first registered handler owning a name wins.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) {
        self.handlers.push(handler);
    }

    /// Dispatch a single command object.
    pub fn dispatch(&self, ctx: &CommandContext, command: &Value) -> CommandResponse {
        if !command.is_object() {
            return CommandResponse::reply(
                UNKNOWN_COMMAND,
                Some("Command not an object".to_string()),
                None,
            );
        }

        let correlation_data = match command.get("correlationData") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                let name = command
                    .get("command")
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_COMMAND);
                return CommandResponse::reply(
                    name,
                    Some("Invalid correlationData data type.".to_string()),
                    None,
                );
            }
        };
        let ctx = ctx.with_correlation(correlation_data);

        let name = match command.get("command").and_then(Value::as_str) {
            Some(name) => name,
            None => {
                return CommandResponse::reply(
                    UNKNOWN_COMMAND,
                    Some("Missing command".to_string()),
                    ctx.correlation_data,
                );
            }
        };

        match self.handlers.iter().find(|h| h.handles(name)) {
            Some(handler) => handler.handle(name, &ctx, command),
            None => {
                tracing::debug!("No handler for admin command '{}'", name);
                crate::gateway::finish(
                    name,
                    &ctx,
                    Err(DynsecError::UnknownCommand(name.to_string())),
                )
            }
        }
    }

    /// Dispatch every command of a JSON payload.
    ///
    /// Fails only when the payload itself is unusable; per-command problems
    /// are reported inside the returned replies.
    pub fn handle_payload(
        &self,
        ctx: &CommandContext,
        payload: &[u8],
    ) -> Result<Responses, DynsecError> {
        let tree: Value = serde_json::from_slice(payload)
            .map_err(|e| DynsecError::InvalidArgument(format!("Payload not valid JSON: {}", e)))?;

        let commands = tree
            .get("commands")
            .and_then(Value::as_array)
            .ok_or_else(|| DynsecError::InvalidArgument("Invalid/missing commands".to_string()))?;

        let responses = commands.iter().map(|c| self.dispatch(ctx, c)).collect();
        Ok(Responses { responses })
    }
}
