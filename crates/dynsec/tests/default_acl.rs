// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end tests: admin payloads through the dispatcher, state file on
//! disk, and fallback decisions through the evaluator.

use dynsec::{
    AccessEvaluator, AccessRequest, AclType, CommandContext, CommandDispatcher, DefaultAccess,
    DefaultAccessStore, DefaultAclGateway, JsonFilePersistence, MemoryAuditSink,
    PolicyPersistence,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

struct Broker {
    store: Arc<DefaultAccessStore>,
    dispatcher: CommandDispatcher,
    gateway: Arc<DefaultAclGateway<JsonFilePersistence, MemoryAuditSink>>,
}

impl Broker {
    fn start(state_file: &Path) -> Self {
        let persistence = JsonFilePersistence::new(state_file);
        let store = Arc::new(DefaultAccessStore::with_access(
            persistence.load().expect("load state"),
        ));
        let gateway = Arc::new(DefaultAclGateway::new(
            Arc::clone(&store),
            persistence,
            MemoryAuditSink::new(),
        ));
        let mut dispatcher = CommandDispatcher::new();
        dispatcher.register(gateway.clone());
        Self {
            store,
            dispatcher,
            gateway,
        }
    }

    fn send(&self, payload: Value) -> Vec<Value> {
        let ctx = CommandContext::new(Some("mosq-admin".into()), Some("admin".into()));
        let bytes = serde_json::to_vec(&payload).unwrap();
        let out = self.dispatcher.handle_payload(&ctx, &bytes).unwrap();
        match serde_json::to_value(out).unwrap() {
            Value::Object(mut map) => match map.remove("responses") {
                Some(Value::Array(items)) => items,
                other => panic!("unexpected responses: {:?}", other),
            },
            other => panic!("unexpected envelope: {:?}", other),
        }
    }

    fn get_acls(&self) -> Value {
        let replies = self.send(json!({"commands": [{"command": "getDefaultACLAccess"}]}));
        replies[0]["data"]["acls"].clone()
    }
}

#[test]
fn test_fresh_broker_is_fail_closed() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Broker::start(&dir.path().join("dynsec.json"));

    let eval = AccessEvaluator::new(Arc::clone(&broker.store));
    for t in AclType::ALL {
        assert!(!eval.is_allowed(&AccessRequest::new(t, "any/topic").username("u")));
    }

    assert_eq!(
        broker.get_acls(),
        json!([
            {"acltype": "publishClientSend", "allow": false},
            {"acltype": "publishClientReceive", "allow": false},
            {"acltype": "subscribe", "allow": false},
            {"acltype": "unsubscribe", "allow": false}
        ])
    );
}

#[test]
fn test_set_then_get_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Broker::start(&dir.path().join("dynsec.json"));

    let replies = broker.send(json!({"commands": [{
        "command": "setDefaultACLAccess",
        "acls": [
            {"acltype": "publishClientSend", "allow": true},
            {"acltype": "subscribe", "allow": true}
        ]
    }]}));
    assert_eq!(replies, vec![json!({"command": "setDefaultACLAccess"})]);

    let first = broker.get_acls();
    assert_eq!(
        first,
        json!([
            {"acltype": "publishClientSend", "allow": true},
            {"acltype": "publishClientReceive", "allow": false},
            {"acltype": "subscribe", "allow": true},
            {"acltype": "unsubscribe", "allow": false}
        ])
    );
    // Repeated reads without a set are identical
    assert_eq!(broker.get_acls(), first);
}

#[test]
fn test_policy_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dynsec.json");

    {
        let broker = Broker::start(&path);
        broker.send(json!({"commands": [{
            "command": "setDefaultACLAccess",
            "acls": [{"acltype": "unsubscribe", "allow": true}]
        }]}));
    }

    let restarted = Broker::start(&path);
    assert_eq!(
        restarted.store.get(),
        DefaultAccess {
            unsubscribe: true,
            ..Default::default()
        }
    );
}

#[test]
fn test_rejected_set_leaves_state_and_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dynsec.json");
    let broker = Broker::start(&path);

    let replies = broker.send(json!({"commands": [{
        "command": "setDefaultACLAccess",
        "correlationData": "req-6"
    }]}));

    assert_eq!(
        replies,
        vec![json!({
            "command": "setDefaultACLAccess",
            "error": "Missing/invalid actions array",
            "correlationData": "req-6"
        })]
    );
    assert_eq!(broker.store.get(), DefaultAccess::default());
    assert!(!path.exists());
    assert!(broker.gateway.audit().messages().is_empty());
}

#[test]
fn test_partial_batch_applies_valid_entries_only() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Broker::start(&dir.path().join("dynsec.json"));

    let replies = broker.send(json!({"commands": [{
        "command": "setDefaultACLAccess",
        "acls": [
            {"acltype": "subscribe", "allow": true},
            {"acltype": "bogus", "allow": true},
            {"acltype": "unsubscribe"}
        ]
    }]}));

    assert!(replies[0].get("error").is_none());
    assert_eq!(
        broker.store.get(),
        DefaultAccess {
            subscribe: true,
            ..Default::default()
        }
    );
}

#[test]
fn test_set_persists_and_preserves_other_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dynsec.json");
    std::fs::write(&path, r#"{"clients":[{"username":"admin"}]}"#).unwrap();

    let broker = Broker::start(&path);
    broker.send(json!({"commands": [{
        "command": "setDefaultACLAccess",
        "acls": [{"acltype": "publishClientReceive", "allow": true}]
    }]}));

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["clients"], json!([{"username": "admin"}]));
    assert_eq!(doc["defaultACLAccess"][1], json!({"acltype": "publishClientReceive", "allow": true}));

    // Saving again through the trait object path writes the same content
    broker.gateway.persistence().save(&broker.store.get()).unwrap();
    let again: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(again, doc);
}

#[test]
fn test_audit_trail_names_actor() {
    let dir = tempfile::tempdir().unwrap();
    let broker = Broker::start(&dir.path().join("dynsec.json"));

    broker.send(json!({"commands": [
        {"command": "setDefaultACLAccess", "acls": [{"acltype": "Subscribe", "allow": false}]},
        {"command": "getDefaultACLAccess"}
    ]}));

    assert_eq!(
        broker.gateway.audit().messages(),
        vec![
            "dynsec: mosq-admin/admin | setDefaultACLAccess | acltype=Subscribe | allow=false",
            "dynsec: mosq-admin/admin | getDefaultACLAccess",
        ]
    );
}
