use super::ids::IdGenerator;
use crate::document::{
    DecisionNode, FlowDocument, FlowNode, LocalizedText, Nullable, Rule, RuleTest, TestKind,
};
use crate::error::MigrationError;
use serde_json::{Map, Number, Value};

/// Category given to the single branch of a synthesized node.
pub const ALL_RESPONSES: &str = "All Responses";

const MAX_ID_ATTEMPTS: usize = 8;

/// Inserts `node` into the graph immediately before `successor_id`.
///
/// The new node takes over the successor's identifier, so every edge that
/// used to lead into the successor now leads into the new node. The successor
/// is renamed to a fresh identifier, the new node's outgoing edges are pointed
/// at it, and every node at or below the new node's `y` is moved down by
/// `margin`. Nodes without a numeric `y` are never moved, and nothing moves
/// when the new node has none.
///
/// Returns the successor's new identifier.
pub fn insert_before(
    document: &mut FlowDocument,
    node: FlowNode,
    successor_id: &str,
    ids: &dyn IdGenerator,
    margin: i64,
) -> Result<String, MigrationError> {
    if !document.contains_node(successor_id) {
        return Err(MigrationError::NodeNotFound(successor_id.to_string()));
    }

    let fresh_id = fresh_identifier(document, ids)?;
    rename_node(document, successor_id, &fresh_id);

    let insertion_y = node.y();
    if let Some(from) = insertion_y {
        for existing in document.action_nodes.iter_mut() {
            shift_down(&mut existing.layout_y, from, margin);
        }
        for existing in document.decision_nodes.iter_mut() {
            shift_down(&mut existing.layout_y, from, margin);
        }
    }

    match node {
        FlowNode::Action(mut action_node) => {
            action_node.identifier = successor_id.to_string();
            action_node.destination = Nullable::Value(fresh_id.clone());
            document.action_nodes.push(action_node);
        }
        FlowNode::Decision(mut decision_node) => {
            decision_node.identifier = successor_id.to_string();
            decision_node.route_all_to(&fresh_id);
            document.decision_nodes.push(decision_node);
        }
    }

    tracing::debug!(
        inserted = successor_id,
        successor = %fresh_id,
        y = ?insertion_y,
        "inserted node before successor"
    );
    Ok(fresh_id)
}

/// Replaces the node's rules with only its catch-all rules, each relabeled
/// "All Responses".
///
/// The label is written in `base_language` when the document is already
/// localized and as a bare string otherwise. A node with no catch-all rule
/// gets a new one so that it keeps an outgoing edge.
pub fn retain_catch_all(
    node: &mut DecisionNode,
    base_language: Option<&str>,
    ids: &dyn IdGenerator,
) {
    node.rules.retain(|rule| rule.test.kind.is_catch_all());

    if node.rules.is_empty() {
        let mut extra = Map::new();
        extra.insert("uuid".to_string(), Value::String(ids.next_id()));
        node.rules.push(Rule {
            test: RuleTest {
                kind: TestKind::True,
                text: None,
                min: None,
                max: None,
                extra: Map::new(),
            },
            category: None,
            destination: Nullable::Missing,
            config: None,
            extra,
        });
    }

    for rule in &mut node.rules {
        match base_language {
            Some(language) => rule
                .category
                .get_or_insert_with(|| LocalizedText::translated(language, ALL_RESPONSES))
                .set(language, ALL_RESPONSES),
            None => rule.category = Some(LocalizedText::bare(ALL_RESPONSES)),
        }
    }
}

fn fresh_identifier(document: &FlowDocument, ids: &dyn IdGenerator) -> Result<String, MigrationError> {
    let taken = document.node_ids();
    let mut last = String::new();
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = ids.next_id();
        if !taken.contains(candidate.as_str()) {
            return Ok(candidate);
        }
        last = candidate;
    }
    Err(MigrationError::DuplicateIdentifier(last))
}

/// Adds `margin` to a coordinate at or below `from`, keeping integers integral.
fn shift_down(layout_y: &mut Nullable<Number>, from: f64, margin: i64) {
    let Nullable::Value(y) = layout_y else {
        return;
    };
    if y.as_f64().is_none_or(|value| value < from) {
        return;
    }

    let shifted = if let Some(value) = y.as_i64() {
        Number::from(value.saturating_add(margin))
    } else if let Some(value) = y.as_u64() {
        Number::from(value.saturating_add_signed(margin))
    } else {
        match y.as_f64().and_then(|value| Number::from_f64(value + margin as f64)) {
            Some(number) => number,
            None => return,
        }
    };
    *y = shifted;
}

fn rename_node(document: &mut FlowDocument, from: &str, to: &str) {
    if let Some(node) = document
        .action_nodes
        .iter_mut()
        .find(|n| n.identifier == from)
    {
        node.identifier = to.to_string();
    } else if let Some(node) = document
        .decision_nodes
        .iter_mut()
        .find(|n| n.identifier == from)
    {
        node.identifier = to.to_string();
    }
}
