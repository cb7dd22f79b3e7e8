use super::MigrationContext;
use crate::document::{FlowDocument, LocalizedText, Nullable, RuleTest, TestKind};
use crate::error::{MigrationError, Notice};
use serde_json::Value;

/// Version 6: turns every user-facing text field into a language-keyed map.
///
/// Documents that already carry a `base_language` key, even a `null` one,
/// are left untouched. Otherwise the configured base language is recorded on
/// the document and rule categories, free-text rule tests, and message and
/// recording actions are wrapped as `{"<base>": <old value>}`. A field that
/// is present but `null` becomes `{"<base>": null}`. Missing fields stay
/// missing.
pub fn localize(
    document: &mut FlowDocument,
    ctx: &mut MigrationContext<'_>,
) -> Result<(), MigrationError> {
    if !document.base_language.is_missing() {
        return Ok(());
    }

    let language = ctx.config().base_language.as_str();
    document.base_language = Nullable::Value(language.to_string());

    for (node_index, node) in document.decision_nodes.iter_mut().enumerate() {
        for (rule_index, rule) in node.rules.iter_mut().enumerate() {
            // ranges never required a category name, derive one from the bounds
            if rule.test.kind == TestKind::Between && rule.category.is_none() {
                let path = format!("rule_sets[{}].rules[{}].test", node_index, rule_index);
                rule.category = Some(LocalizedText::bare(range_category(&rule.test, &path)?));
            }

            if let Some(category) = rule.category.as_mut() {
                category.localize(language);
            }

            if rule.test.kind.has_localizable_text() {
                if let Some(text) = rule.test.text.as_mut() {
                    text.localize(language);
                }
            } else if !rule.test.kind.is_known() {
                ctx.notice(Notice::UnknownTestType {
                    node_id: node.identifier.clone(),
                    type_name: rule.test.kind.to_string(),
                });
            }
        }
    }

    for node in document.action_nodes.iter_mut() {
        for action in node.actions.iter_mut() {
            if !action.kind.is_known() {
                ctx.notice(Notice::UnknownActionType {
                    node_id: node.identifier.clone(),
                    type_name: action.kind.to_string(),
                });
                continue;
            }
            if action.kind.has_message() {
                if let Some(msg) = action.msg.as_mut() {
                    msg.localize(language);
                }
            }
            if action.kind.has_recording() {
                if let Some(recording) = action.recording.as_mut() {
                    recording.localize(language);
                }
            }
        }
    }

    Ok(())
}

/// `"<min>-<max>"` for a range test.
fn range_category(test: &RuleTest, path: &str) -> Result<String, MigrationError> {
    match (&test.min, &test.max) {
        (Some(min), Some(max)) => Ok(format!("{}-{}", bound_text(min), bound_text(max))),
        _ => Err(MigrationError::malformed(
            path,
            "range test without a category needs both 'min' and 'max'",
        )),
    }
}

fn bound_text(bound: &Value) -> String {
    match bound {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
