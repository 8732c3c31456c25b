// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Admin command gateway for the default access policy
//!
//! Handles `setDefaultACLAccess` and `getDefaultACLAccess`:
//!
//! ```text
//! command ──► DefaultAclGateway ──► DefaultAccessStore (apply / get)
//!                    │
//!                    ├──► PolicyPersistence::save   (after every set)
//!                    └──► AuditSink::log            (one line per entry / read)
//! ```
//!
//! Entries inside `acls` are applied independently: anything that is not a
//! `{acltype: string, allow: bool}` pair is skipped without failing the
//! command, and unknown action classes change nothing.

use crate::acl_type::AclType;
use crate::audit::{AuditLevel, AuditSink};
use crate::command::{
    raw_acl_entry, AclEntry, AclList, CommandContext, CommandResponse, GET_DEFAULT_ACL_ACCESS,
    SET_DEFAULT_ACL_ACCESS,
};
use crate::dispatch::CommandHandler;
use crate::error::DynsecError;
use crate::persist::PolicyPersistence;
use crate::policy::DefaultAccessStore;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Reply text when `acls` is missing or not an array
pub const MISSING_ACTIONS: &str = "Missing/invalid actions array";

/// Serializer for the `getDefaultACLAccess` payload
type ListingEncoder = fn(&AclList) -> Result<Value, serde_json::Error>;

/// Command gateway bound to one policy store.
///
/// Sets are serialized through `save_lock` so the persisted policy is always
/// the one most recently applied.
pub struct DefaultAclGateway<P, A> {
    store: Arc<DefaultAccessStore>,
    persistence: P,
    audit: A,
    save_lock: Mutex<()>,
    encode_listing: ListingEncoder,
}

impl<P: PolicyPersistence, A: AuditSink> DefaultAclGateway<P, A> {
    pub fn new(store: Arc<DefaultAccessStore>, persistence: P, audit: A) -> Self {
        Self {
            store,
            persistence,
            audit,
            save_lock: Mutex::new(()),
            encode_listing: encode_acl_list,
        }
    }

    #[cfg(test)]
    fn with_listing_encoder(mut self, encode: ListingEncoder) -> Self {
        self.encode_listing = encode;
        self
    }

    pub fn store(&self) -> &Arc<DefaultAccessStore> {
        &self.store
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// `setDefaultACLAccess`
    pub fn set_default_acl_access(&self, ctx: &CommandContext, command: &Value) -> CommandResponse {
        let result = self.process_set(ctx, command).map(|()| None);
        finish(SET_DEFAULT_ACL_ACCESS, ctx, result)
    }

    /// `getDefaultACLAccess`
    pub fn get_default_acl_access(&self, ctx: &CommandContext, _command: &Value) -> CommandResponse {
        self.audit.log(
            AuditLevel::Info,
            &format!("dynsec: {} | {}", ctx.actor(), GET_DEFAULT_ACL_ACCESS),
        );

        let result = self.render_acl_list().map(Some);
        finish(GET_DEFAULT_ACL_ACCESS, ctx, result)
    }

    fn process_set(&self, ctx: &CommandContext, command: &Value) -> Result<(), DynsecError> {
        let actions = command
            .get("acls")
            .and_then(Value::as_array)
            .ok_or_else(|| DynsecError::InvalidArgument(MISSING_ACTIONS.to_string()))?;

        let actor = ctx.actor();
        let mut updates: Vec<(AclType, bool)> = Vec::with_capacity(actions.len());

        for (acltype, allow) in actions
            .iter()
            .filter_map(raw_acl_entry)
            .filter(|(acltype, _)| !acltype.is_empty())
        {
            if let Some(acl_type) = AclType::from_name(acltype) {
                updates.push((acl_type, allow));
            }
            self.audit.log(
                AuditLevel::Info,
                &format!(
                    "dynsec: {} | {} | acltype={} | allow={}",
                    actor, SET_DEFAULT_ACL_ACCESS, acltype, allow
                ),
            );
        }

        let _ordered = self.save_lock.lock();
        let policy = self.store.apply(updates);

        // The reply does not depend on the save outcome
        if let Err(e) = self.persistence.save(&policy) {
            self.audit.log(
                AuditLevel::Warning,
                &format!(
                    "dynsec: {} | {} | save failed: {}",
                    actor, SET_DEFAULT_ACL_ACCESS, e
                ),
            );
        }

        Ok(())
    }

    fn render_acl_list(&self) -> Result<Value, DynsecError> {
        let policy = self.store.get();
        let list = AclList {
            acls: policy
                .entries()
                .iter()
                .map(|(t, allow)| AclEntry::new(*t, *allow))
                .collect(),
        };
        (self.encode_listing)(&list).map_err(|e| DynsecError::Internal(e.to_string()))
    }
}

impl<P: PolicyPersistence, A: AuditSink> CommandHandler for DefaultAclGateway<P, A> {
    fn handles(&self, command: &str) -> bool {
        command.eq_ignore_ascii_case(SET_DEFAULT_ACL_ACCESS)
            || command.eq_ignore_ascii_case(GET_DEFAULT_ACL_ACCESS)
    }

    fn handle(&self, command: &str, ctx: &CommandContext, body: &Value) -> CommandResponse {
        if command.eq_ignore_ascii_case(SET_DEFAULT_ACL_ACCESS) {
            self.set_default_acl_access(ctx, body)
        } else if command.eq_ignore_ascii_case(GET_DEFAULT_ACL_ACCESS) {
            self.get_default_acl_access(ctx, body)
        } else {
            let err = DynsecError::UnknownCommand(command.to_string());
            finish(command, ctx, Err(err))
        }
    }
}

fn encode_acl_list(list: &AclList) -> Result<Value, serde_json::Error> {
    serde_json::to_value(list)
}

/// Turn an operation result into exactly one reply.
///
/// On error, any payload is dropped and only the caller-facing message is
/// returned.
pub(crate) fn finish(
    command: &str,
    ctx: &CommandContext,
    result: Result<Option<Value>, DynsecError>,
) -> CommandResponse {
    match result {
        Ok(data) => CommandResponse {
            command: command.to_string(),
            error: None,
            data,
            correlation_data: ctx.correlation_data.clone(),
        },
        Err(e) => {
            tracing::debug!("{} rejected: {}", command, e);
            CommandResponse::reply(
                command,
                Some(e.reply_message()),
                ctx.correlation_data.clone(),
            )
        }
    }
}
