// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Action classes a client can be authorized for.

use std::fmt;

/// Which class of client action an ACL decision applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclType {
    /// Client publishes a message it originated
    PublishClientSend,
    /// A message is about to be delivered to the client
    PublishClientReceive,
    /// Client subscription request
    Subscribe,
    /// Client unsubscription request
    Unsubscribe,
}

impl AclType {
    /// All action classes, in the order they are reported to admin callers.
    pub const ALL: [AclType; 4] = [
        AclType::PublishClientSend,
        AclType::PublishClientReceive,
        AclType::Subscribe,
        AclType::Unsubscribe,
    ];

    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublishClientSend => "publishClientSend",
            Self::PublishClientReceive => "publishClientReceive",
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
        }
    }

    /// Map an external `acltype` string to an action class.
    ///
    /// Matching is ASCII case-insensitive. Returns `None` for anything that is
    /// not one of the four canonical names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for AclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
