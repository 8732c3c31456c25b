// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default access policy store
//!
//! Holds the fallback allow/deny flag for each [`AclType`]. The store is the
//! last tier of the authorization pipeline: it only decides when no client,
//! group or role rule matched.
//!
//! # Thread Safety
//!
//! All four flags live behind one `RwLock`. Batched updates are applied under
//! a single write guard, so a reader snapshot never sees half of an admin
//! command.

use crate::acl_type::AclType;
use parking_lot::RwLock;

/// Snapshot of the default access flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DefaultAccess {
    /// Client publishes a message it originated
    pub publish_client_send: bool,
    /// Message delivered to a client
    pub publish_client_receive: bool,
    /// Subscription requests
    pub subscribe: bool,
    /// Unsubscription requests
    pub unsubscribe: bool,
}

impl DefaultAccess {
    /// Current value for one action class
    pub fn get(&self, acl_type: AclType) -> bool {
        match acl_type {
            AclType::PublishClientSend => self.publish_client_send,
            AclType::PublishClientReceive => self.publish_client_receive,
            AclType::Subscribe => self.subscribe,
            AclType::Unsubscribe => self.unsubscribe,
        }
    }

    /// Overwrite one action class
    pub fn set(&mut self, acl_type: AclType, allow: bool) {
        let slot = match acl_type {
            AclType::PublishClientSend => &mut self.publish_client_send,
            AclType::PublishClientReceive => &mut self.publish_client_receive,
            AclType::Subscribe => &mut self.subscribe,
            AclType::Unsubscribe => &mut self.unsubscribe,
        };
        *slot = allow;
    }

    /// Flags in report order
    pub fn entries(&self) -> [(AclType, bool); 4] {
        AclType::ALL.map(|t| (t, self.get(t)))
    }
}

/// Process-wide holder for [`DefaultAccess`].
///
/// Owned by the broker integration layer and shared (via `Arc`) with the
/// command gateway and the access evaluator.
#[derive(Debug, Default)]
pub struct DefaultAccessStore {
    inner: RwLock<DefaultAccess>,
}

impl DefaultAccessStore {
    /// Store initialised with the startup defaults (everything denied)
    pub fn new() -> Self {
        Self::default()
    }

    /// Store restored from previously persisted state
    pub fn with_access(access: DefaultAccess) -> Self {
        Self {
            inner: RwLock::new(access),
        }
    }

    /// Current snapshot
    pub fn get(&self) -> DefaultAccess {
        *self.inner.read()
    }

    /// Overwrite a single flag
    pub fn set_field(&self, acl_type: AclType, allow: bool) {
        self.inner.write().set(acl_type, allow);
    }

    /// Apply updates in order under one write guard.
    ///
    /// Later entries for the same action class override earlier ones.
    /// Returns the resulting snapshot.
    pub fn apply<I>(&self, updates: I) -> DefaultAccess
    where
        I: IntoIterator<Item = (AclType, bool)>,
    {
        let mut guard = self.inner.write();
        for (acl_type, allow) in updates {
            guard.set(acl_type, allow);
        }
        *guard
    }
}
