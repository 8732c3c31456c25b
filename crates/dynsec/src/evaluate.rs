// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Access evaluation with default-access fallback
//!
//! Rule layers (client grants, group membership, role assignments) are
//! consulted in registration order; the first one with an opinion decides.
//! When no layer matches, the default access store decides:
//!
//! ```text
//! AccessRequest ──► layer 1 ──► layer 2 ──► ... ──► DefaultAccessStore
//!                    Some(b)     Some(b)              (always decides)
//! ```

use crate::acl_type::AclType;
use crate::policy::DefaultAccessStore;
use std::sync::Arc;

/// One client action to authorize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    pub client_id: Option<String>,
    pub username: Option<String>,
    pub topic: String,
    pub acl_type: AclType,
}

impl AccessRequest {
    pub fn new(acl_type: AclType, topic: impl Into<String>) -> Self {
        Self {
            client_id: None,
            username: None,
            topic: topic.into(),
            acl_type,
        }
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// A higher-priority rule tier.
pub trait RuleLayer: Send + Sync {
    /// Short name reported in [`DecisionSource::Layer`]
    fn name(&self) -> &str;

    /// `Some(allow)` when a rule matches, `None` to defer
    fn decide(&self, request: &AccessRequest) -> Option<bool>;
}

/// Which tier produced a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionSource {
    Layer(String),
    DefaultAccess,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub source: DecisionSource,
}

/// Layered evaluator ending in the default access store.
pub struct AccessEvaluator {
    layers: Vec<Arc<dyn RuleLayer>>,
    defaults: Arc<DefaultAccessStore>,
}

impl AccessEvaluator {
    pub fn new(defaults: Arc<DefaultAccessStore>) -> Self {
        Self {
            layers: Vec::new(),
            defaults,
        }
    }

    /// Append a layer below the ones already registered
    pub fn with_layer(mut self, layer: Arc<dyn RuleLayer>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn evaluate(&self, request: &AccessRequest) -> AccessDecision {
        for layer in &self.layers {
            if let Some(allowed) = layer.decide(request) {
                tracing::trace!(
                    "{} on '{}' decided by {}: {}",
                    request.acl_type,
                    request.topic,
                    layer.name(),
                    allowed
                );
                return AccessDecision {
                    allowed,
                    source: DecisionSource::Layer(layer.name().to_string()),
                };
            }
        }

        let allowed = self.defaults.get().get(request.acl_type);
        tracing::trace!(
            "{} on '{}' fell back to default access: {}",
            request.acl_type,
            request.topic,
            allowed
        );
        AccessDecision {
            allowed,
            source: DecisionSource::DefaultAccess,
        }
    }

    /// Shorthand for `evaluate(..).allowed`
    pub fn is_allowed(&self, request: &AccessRequest) -> bool {
        self.evaluate(request).allowed
    }
}
