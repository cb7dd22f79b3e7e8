//! Common test utilities for building flow documents and running steps.
use ikou::migrations::{MigrationConfig, MigrationContext, MigrationFn};
use ikou::prelude::*;
use serde_json::{Value, json};

/// Creates a legacy decision node with a number branch and a catch-all.
///
/// Layout: sits at `y = 200` with identifier `"question"`, both rules lead to
/// `"done"`.
#[allow(dead_code)]
pub fn legacy_ruleset(operand: &str, response_type: Option<&str>, webhook: Option<&str>) -> Value {
    let mut node = json!({
        "uuid": "question",
        "x": 120,
        "y": 200,
        "label": "Age",
        "operand": operand,
        "rules": [
            {
                "uuid": "rule-number",
                "test": { "type": "number" },
                "category": "Number",
                "destination": "done",
                "config": { "type": "number", "verbose_name": "has a number" },
            },
            {
                "uuid": "rule-other",
                "test": { "type": "true" },
                "category": "Other",
                "destination": "done",
            },
        ],
    });
    if let Some(code) = response_type {
        node["response_type"] = json!(code);
    }
    if let Some(url) = webhook {
        node["webhook"] = json!(url);
        node["webhook_action"] = json!("POST");
    }
    node
}

/// Creates a version 4 flow around a single decision node.
///
/// Graph: `start (y 0) -> question (y 200) -> done (y 400)`, with `start` as
/// the entry node.
#[allow(dead_code)]
pub fn legacy_flow(ruleset: Value) -> Value {
    json!({
        "version": 4,
        "entry": "start",
        "action_sets": [
            {
                "uuid": "start",
                "x": 100,
                "y": 0,
                "actions": [{ "type": "reply", "msg": "How old are you?" }],
                "destination": "question",
            },
            {
                "uuid": "done",
                "x": 100,
                "y": 400,
                "actions": [{ "type": "send", "msg": "Thanks!", "contacts": [] }],
                "destination": null,
            },
        ],
        "rule_sets": [ruleset],
    })
}

/// Creates a flow that has already been through the v5 step but not v6.
#[allow(dead_code)]
pub fn unlocalized_flow() -> Value {
    json!({
        "version": 5,
        "entry": "greet",
        "action_sets": [
            {
                "uuid": "greet",
                "y": 0,
                "actions": [
                    { "type": "reply", "msg": "Hi there" },
                    { "type": "say", "uuid": "say-1", "msg": "Welcome", "recording": "welcome.wav" },
                    { "type": "add_group", "groups": [{ "name": "Callers" }] },
                ],
                "destination": "color",
            },
        ],
        "rule_sets": [
            {
                "uuid": "color",
                "y": 150,
                "label": "Color",
                "operand": "@step.value",
                "ruleset_type": "wait_message",
                "rules": [
                    { "uuid": "red", "test": { "type": "contains_any", "test": "red" }, "category": "Red", "destination": null },
                    { "uuid": "range", "test": { "type": "between", "min": 1, "max": 5 }, "destination": null },
                    { "uuid": "num", "test": { "type": "lt", "test": "10" }, "category": "Small", "destination": null },
                    { "uuid": "other", "test": { "type": "true" }, "category": "Other", "destination": null },
                ],
            },
        ],
    })
}

#[allow(dead_code)]
pub fn load(value: Value) -> FlowDocument {
    FlowDocument::from_value(value).expect("fixture should be a valid document")
}

/// Runs a single migration step with default settings and sequential ids.
#[allow(dead_code)]
pub fn apply_step(
    step: MigrationFn,
    document: &mut FlowDocument,
) -> std::result::Result<Vec<Notice>, MigrationError> {
    let config = MigrationConfig::default();
    let ids = SequentialIdGenerator::new("new");
    let mut context = MigrationContext::new(&config, &ids);
    step(document, &mut context)?;
    Ok(context.into_notices())
}

/// A migrator whose generated identifiers are `new-1`, `new-2`, ...
#[allow(dead_code)]
pub fn deterministic_migrator() -> Migrator {
    Migrator::builder()
        .with_id_generator(SequentialIdGenerator::new("new"))
        .build()
}

/// The node identifiers that `identifier`'s outgoing edges lead to.
#[allow(dead_code)]
pub fn destinations(document: &FlowDocument, identifier: &str) -> Vec<String> {
    document
        .successors(identifier)
        .into_iter()
        .map(str::to_string)
        .collect()
}
