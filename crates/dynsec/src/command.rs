// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Admin command context and reply shapes.

use crate::acl_type::AclType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command names handled by this crate
pub const SET_DEFAULT_ACL_ACCESS: &str = "setDefaultACLAccess";
pub const GET_DEFAULT_ACL_ACCESS: &str = "getDefaultACLAccess";

/// Who issued a command, and the token to echo back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    /// Admin client identifier (absent for anonymous callers)
    pub client_id: Option<String>,
    /// Admin username (absent for anonymous callers)
    pub username: Option<String>,
    /// Opaque caller token echoed verbatim in the reply
    pub correlation_data: Option<String>,
}

impl CommandContext {
    pub fn new(client_id: Option<String>, username: Option<String>) -> Self {
        Self {
            client_id,
            username,
            correlation_data: None,
        }
    }

    /// Same actor, different correlation token
    pub fn with_correlation(&self, correlation_data: Option<String>) -> Self {
        Self {
            client_id: self.client_id.clone(),
            username: self.username.clone(),
            correlation_data,
        }
    }

    pub(crate) fn actor(&self) -> String {
        crate::audit::actor(self.client_id.as_deref(), self.username.as_deref())
    }
}

/// One reply object in the `responses` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(
        rename = "correlationData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correlation_data: Option<String>,
}

impl CommandResponse {
    /// Plain reply: success when `error` is `None`
    pub fn reply(command: &str, error: Option<String>, correlation_data: Option<String>) -> Self {
        Self {
            command: command.to_string(),
            error,
            data: None,
            correlation_data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// `{"acltype": ..., "allow": ...}` as it appears on the wire and on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub acltype: String,
    pub allow: bool,
}

impl AclEntry {
    pub fn new(acl_type: AclType, allow: bool) -> Self {
        Self {
            acltype: acl_type.as_str().to_string(),
            allow,
        }
    }
}

/// Payload of a `getDefaultACLAccess` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclList {
    pub acls: Vec<AclEntry>,
}

/// Extract `(acltype, allow)` from a raw entry.
///
/// Returns `None` unless `acltype` is a string and `allow` a JSON boolean.
/// The tag is returned unmapped so callers can still audit unknown names.
pub(crate) fn raw_acl_entry(entry: &Value) -> Option<(&str, bool)> {
    let acltype = entry.get("acltype")?.as_str()?;
    let allow = entry.get("allow")?.as_bool()?;
    Some((acltype, allow))
}
