// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic-security default ACL access
//!
//! Fallback tier of a broker's dynamic access control: one allow/deny flag per
//! action class (publish send, publish receive, subscribe, unsubscribe),
//! consulted when no client, group or role rule matches. The flags start out
//! denied and change only through the `setDefaultACLAccess` admin command.
//!
//! # Architecture
//!
//! ```text
//! admin payload ──► CommandDispatcher ──► DefaultAclGateway ──► DefaultAccessStore
//!                                              │                       ▲
//!                                              ├─► PolicyPersistence   │
//!                                              └─► AuditSink           │
//! client action ──► AccessEvaluator (rule layers) ─────── fallback ────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use dynsec::{
//!     AccessEvaluator, AccessRequest, AclType, CommandContext, CommandDispatcher,
//!     DefaultAccessStore, DefaultAclGateway, JsonFilePersistence, TracingAuditSink,
//! };
//! use std::sync::Arc;
//!
//! let persistence = JsonFilePersistence::new("dynamic-security.json");
//! let store = Arc::new(DefaultAccessStore::with_access(persistence.load()?));
//!
//! let mut dispatcher = CommandDispatcher::new();
//! dispatcher.register(Arc::new(DefaultAclGateway::new(
//!     Arc::clone(&store),
//!     persistence,
//!     TracingAuditSink,
//! )));
//!
//! let ctx = CommandContext::new(Some("admin".into()), None);
//! let replies = dispatcher.handle_payload(&ctx, payload)?;
//!
//! let evaluator = AccessEvaluator::new(store);
//! let allowed = evaluator.is_allowed(&AccessRequest::new(AclType::Subscribe, "a/b"));
//! ```

pub mod acl_type;
pub mod audit;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod evaluate;
pub mod gateway;
pub mod persist;
pub mod policy;

pub use acl_type::AclType;
pub use audit::{AuditLevel, AuditRecord, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use command::{
    AclEntry, AclList, CommandContext, CommandResponse, GET_DEFAULT_ACL_ACCESS,
    SET_DEFAULT_ACL_ACCESS,
};
pub use config::{ConfigError, DynsecConfig};
pub use dispatch::{CommandDispatcher, CommandHandler, Responses};
pub use error::{DynsecError, PersistError};
pub use evaluate::{AccessDecision, AccessEvaluator, AccessRequest, DecisionSource, RuleLayer};
pub use gateway::DefaultAclGateway;
pub use persist::{JsonFilePersistence, MemoryPersistence, PolicyPersistence};
pub use policy::{DefaultAccess, DefaultAccessStore};
