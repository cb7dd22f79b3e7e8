//! End-to-end tests for running documents through the version chain.
mod common;
use common::*;
use ikou::migrations::{describe_chain, pending_versions};
use ikou::prelude::*;
use serde_json::json;

#[test]
fn test_legacy_document_reaches_latest_version() {
    let document = load(legacy_flow(legacy_ruleset(
        "@flow.age",
        Some("C"),
        Some("http://x"),
    )));

    let outcome = deterministic_migrator()
        .migrate(document)
        .expect("migration should succeed");

    assert_eq!(outcome.from_version, 4);
    assert_eq!(outcome.to_version, LATEST_VERSION);
    assert_eq!(outcome.applied, vec![5, 6]);
    assert!(outcome.notices.is_empty());

    let document = outcome.document;
    assert_eq!(document.version, 6);
    assert_eq!(document.base_language.as_deref(), Some("base"));
    assert_eq!(document.decision_nodes.len(), 3);

    let value = document.to_value().expect("document should serialize");
    let wait = value["rule_sets"]
        .as_array()
        .and_then(|nodes| nodes.iter().find(|n| n["uuid"] == json!("question")))
        .expect("wait node");
    assert_eq!(wait["ruleset_type"], json!("wait_message"));
    assert_eq!(wait["rules"][0]["category"], json!({ "base": "All Responses" }));
    assert!(wait.get("response_type").is_none());
    assert!(wait.get("webhook").is_none());

    assert_eq!(
        value["action_sets"][0]["actions"][0]["msg"],
        json!({ "base": "How old are you?" })
    );
    // keys the model does not know about survive the round trip
    assert_eq!(value["action_sets"][1]["actions"][0]["contacts"], json!([]));
    assert_eq!(value["action_sets"][0]["x"], json!(100));

    let reachable = document.reachable_from_entry();
    assert_eq!(reachable.len(), 5);
}

#[test]
fn test_only_pending_steps_run() {
    let document = load(unlocalized_flow());

    let outcome = deterministic_migrator()
        .migrate(document)
        .expect("migration should succeed");

    assert_eq!(outcome.from_version, 5);
    assert_eq!(outcome.applied, vec![6]);
    assert_eq!(outcome.document.decision_nodes.len(), 1);
    assert_eq!(outcome.document.base_language.as_deref(), Some("base"));
}

#[test]
fn test_current_document_is_returned_unchanged() {
    let mut flow = unlocalized_flow();
    flow["version"] = json!(6);
    let document = load(flow);
    let before = document.clone();

    let outcome = deterministic_migrator()
        .migrate(document)
        .expect("migration should succeed");

    assert!(outcome.applied.is_empty());
    assert_eq!(outcome.document, before);
}

#[test]
fn test_newer_document_is_rejected() {
    let mut flow = unlocalized_flow();
    flow["version"] = json!(7);
    let document = load(flow);

    let result = deterministic_migrator().migrate(document);

    match result {
        Err(MigrationError::UnsupportedVersion { found, latest }) => {
            assert_eq!(found, 7);
            assert_eq!(latest, LATEST_VERSION);
        }
        other => panic!("Expected UnsupportedVersion error, got {:?}", other),
    }
}

#[test]
fn test_migrate_to_intermediate_version() {
    let document = load(legacy_flow(legacy_ruleset("@step.value", Some("K"), None)));

    let outcome = deterministic_migrator()
        .migrate_to(document, 5)
        .expect("migration should succeed");

    assert_eq!(outcome.applied, vec![5]);
    assert_eq!(outcome.to_version, 5);
    assert_eq!(outcome.document.base_language, Nullable::Missing);
    assert_eq!(
        outcome.document.decision_nodes[0].decision_type.as_ref(),
        Some(&DecisionType::WaitDigits)
    );
}

#[test]
fn test_target_beyond_latest_is_rejected() {
    let document = load(unlocalized_flow());

    let result = deterministic_migrator().migrate_to(document, 9);

    assert_eq!(
        result.map(|outcome| outcome.to_version),
        Err(MigrationError::UnsupportedVersion {
            found: 9,
            latest: LATEST_VERSION,
        })
    );
}

#[test]
fn test_failing_step_aborts_the_run() {
    let mut flow = legacy_flow(legacy_ruleset("@step.value", Some("C"), None));
    flow["rule_sets"][0]["rules"][0]["test"] = json!({ "type": "between", "max": 5 });
    flow["rule_sets"][0]["rules"][0]
        .as_object_mut()
        .expect("rule object")
        .remove("category");
    let document = load(flow);

    let result = deterministic_migrator().migrate(document);

    match result {
        Err(MigrationError::MalformedDocument { path, .. }) => {
            assert_eq!(path, "rule_sets[0].rules[0].test");
        }
        other => panic!("Expected MalformedDocument error, got {:?}", other),
    }
}

#[test]
fn test_custom_base_language() {
    let migrator = Migrator::builder()
        .with_base_language("eng")
        .with_id_generator(SequentialIdGenerator::new("new"))
        .build();

    let outcome = migrator
        .migrate(load(unlocalized_flow()))
        .expect("migration should succeed");

    assert_eq!(migrator.config().base_language, "eng");
    assert_eq!(outcome.document.base_language.as_deref(), Some("eng"));
    assert_eq!(
        outcome.document.decision_nodes[0].rules[3].category,
        Some(LocalizedText::translated("eng", "Other"))
    );
}

#[test]
fn test_custom_layout_margin() {
    let migrator = Migrator::builder()
        .with_layout_margin(50)
        .with_id_generator(SequentialIdGenerator::new("new"))
        .build();
    let document = load(legacy_flow(legacy_ruleset(
        "=(step.value + 1)",
        Some("C"),
        None,
    )));

    let outcome = migrator.migrate(document).expect("migration should succeed");

    let document = outcome.document;
    assert_eq!(document.decision_node("new-1").and_then(|n| n.y()), Some(250.0));
    assert_eq!(document.action_node("done").and_then(|n| n.y()), Some(450.0));
}

#[test]
fn test_json_migration_is_idempotent() {
    let migrator = deterministic_migrator();
    let input = legacy_flow(legacy_ruleset("@contact.age", Some("C"), Some("http://x"))).to_string();

    let once = migrator.migrate_json(&input).expect("first run should succeed");
    let twice = migrator.migrate_json(&once).expect("second run should succeed");

    assert_eq!(once, twice);
}

#[test]
fn test_invalid_json_is_rejected() {
    let result = Migrator::default().migrate_json("{ not json");
    assert!(matches!(result, Err(MigrationError::InvalidJson(_))));
}

#[test]
fn test_migrate_value() {
    let value = Migrator::default()
        .migrate_value(unlocalized_flow())
        .expect("migration should succeed");

    assert_eq!(value["version"], json!(6));
    assert_eq!(value["base_language"], json!("base"));
}

#[test]
fn test_batch_keeps_input_order() {
    let mut current = unlocalized_flow();
    current["version"] = json!(6);
    let broken = json!({ "version": 4, "action_sets": [] });
    let documents = vec![
        legacy_flow(legacy_ruleset("@flow.age", Some("C"), Some("http://x"))),
        broken,
        current,
    ];

    let results = Migrator::default().migrate_batch(documents);

    assert_eq!(results.len(), 3);
    let first = results[0].as_ref().expect("first document should migrate");
    assert_eq!(first.applied, vec![5, 6]);
    assert_eq!(first.document.decision_nodes.len(), 3);

    match &results[1] {
        Err(MigrationError::MalformedDocument { path, .. }) => assert_eq!(path, "rule_sets"),
        other => panic!("Expected MalformedDocument error, got {:?}", other),
    }

    let third = results[2].as_ref().expect("third document should migrate");
    assert!(third.applied.is_empty());
}

#[test]
fn test_pending_versions_and_chain_description() {
    assert_eq!(pending_versions(4), vec![5, 6]);
    assert_eq!(pending_versions(5), vec![6]);
    assert!(pending_versions(6).is_empty());

    let description = describe_chain();
    assert_eq!(description.lines().count(), 2);
    assert!(description.starts_with("v5: "));
}

#[test]
fn test_current_document_round_trips_nulls_and_missing_keys() {
    let flow = json!({
        "version": 6,
        "base_language": "eng",
        "entry": "greet",
        "action_sets": [
            {
                "uuid": "greet",
                "y": 12.5,
                "actions": [
                    { "type": "say", "msg": { "eng": "Hi" }, "recording": null },
                    { "type": "reply", "msg": null },
                ],
                "destination": "color",
            },
            { "uuid": "end", "actions": [] },
        ],
        "rule_sets": [
            {
                "uuid": "color",
                "label": null,
                "operand": null,
                "ruleset_type": "wait_message",
                "rules": [
                    {
                        "test": { "type": "contains_any", "test": null },
                        "category": null,
                        "destination": null,
                    },
                    { "test": { "type": "true" }, "category": { "eng": "Other" } },
                ],
            },
        ],
    });

    let out = Migrator::default()
        .migrate_value(flow.clone())
        .expect("migration should succeed");

    assert_eq!(out, flow);
}

#[test]
fn test_localized_document_keeps_null_and_missing_keys_apart() {
    let mut flow = unlocalized_flow();
    flow["rule_sets"][0]["label"] = json!(null);
    flow["rule_sets"][0]["rules"][0]["destination"] = json!(null);
    flow["rule_sets"][0]["rules"][3]
        .as_object_mut()
        .expect("rule object")
        .remove("destination");
    flow["action_sets"][0]
        .as_object_mut()
        .expect("node object")
        .remove("y");

    let value = Migrator::default()
        .migrate_value(flow)
        .expect("migration should succeed");

    let node = &value["rule_sets"][0];
    assert_eq!(node.get("label"), Some(&json!(null)));
    assert_eq!(node["rules"][0].get("destination"), Some(&json!(null)));
    assert!(node["rules"][3].get("destination").is_none());
    assert!(value["action_sets"][0].get("y").is_none());
}
