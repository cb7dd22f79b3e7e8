use super::localized::LocalizedText;
use super::nullable::{Nullable, present};
use super::tags::{ActionKind, DecisionType, TestKind};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// The root of a flow document: a directed graph of action and decision nodes.
///
/// Keys the model does not name are kept in `extra`, and modelled keys keep
/// their absent or `null` state, so a document is written back as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub base_language: Nullable<String>,
    /// Identifier of the node the flow starts at.
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub entry: Nullable<String>,
    #[serde(rename = "action_sets")]
    pub action_nodes: Vec<ActionNode>,
    #[serde(rename = "rule_sets")]
    pub decision_nodes: Vec<DecisionNode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node that runs its actions in order and then moves to `destination`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionNode {
    #[serde(rename = "uuid")]
    pub identifier: String,
    #[serde(rename = "y", default, skip_serializing_if = "Nullable::is_missing")]
    pub layout_y: Nullable<Number>,
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub destination: Nullable<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node that evaluates its rules against `operand` and follows the first
/// matching rule's destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionNode {
    #[serde(rename = "uuid")]
    pub identifier: String,
    #[serde(rename = "y", default, skip_serializing_if = "Nullable::is_missing")]
    pub layout_y: Nullable<Number>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub operand: Nullable<String>,
    #[serde(rename = "ruleset_type", default, skip_serializing_if = "Nullable::is_missing")]
    pub decision_type: Nullable<DecisionType>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub label: Nullable<String>,
    pub rules: Vec<Rule>,
    /// Legacy single-character wait mode, removed by the v5 migration.
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub response_type: Nullable<String>,
    #[serde(rename = "webhook", default, skip_serializing_if = "Nullable::is_missing")]
    pub webhook_url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub webhook_action: Nullable<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One branch of a decision node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub test: RuleTest,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub category: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub destination: Nullable<String>,
    /// Legacy per-rule configuration with no meaning in later versions.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The condition half of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTest {
    #[serde(rename = "type")]
    pub kind: TestKind,
    /// The comparison value. Free text for the text-matching tests.
    #[serde(
        rename = "test",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<LocalizedText>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Text fields hold `Some(LocalizedText::Bare(Value::Null))` for an explicit
/// `null`, and `None` only when the key is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub msg: Option<LocalizedText>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub recording: Option<LocalizedText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node of either kind, as handed to the insertion primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowNode {
    Action(ActionNode),
    Decision(DecisionNode),
}

impl FlowNode {
    pub fn identifier(&self) -> &str {
        match self {
            FlowNode::Action(node) => &node.identifier,
            FlowNode::Decision(node) => &node.identifier,
        }
    }

    pub fn y(&self) -> Option<f64> {
        match self {
            FlowNode::Action(node) => node.y(),
            FlowNode::Decision(node) => node.y(),
        }
    }
}

/// The numeric value of a `y` key, if it has one.
fn coordinate(layout_y: &Nullable<Number>) -> Option<f64> {
    layout_y.as_ref().and_then(Number::as_f64)
}

impl ActionNode {
    pub fn y(&self) -> Option<f64> {
        coordinate(&self.layout_y)
    }
}

impl FlowDocument {
    /// Every node identifier in the document, across both collections.
    pub fn node_ids(&self) -> AHashSet<&str> {
        self.action_nodes
            .iter()
            .map(|n| n.identifier.as_str())
            .chain(self.decision_nodes.iter().map(|n| n.identifier.as_str()))
            .collect()
    }

    pub fn contains_node(&self, identifier: &str) -> bool {
        self.action_nodes.iter().any(|n| n.identifier == identifier)
            || self.decision_nodes.iter().any(|n| n.identifier == identifier)
    }

    pub fn action_node(&self, identifier: &str) -> Option<&ActionNode> {
        self.action_nodes.iter().find(|n| n.identifier == identifier)
    }

    pub fn decision_node(&self, identifier: &str) -> Option<&DecisionNode> {
        self.decision_nodes
            .iter()
            .find(|n| n.identifier == identifier)
    }

    /// Identifiers of the nodes directly reachable from `identifier`.
    pub fn successors(&self, identifier: &str) -> Vec<&str> {
        if let Some(node) = self.action_node(identifier) {
            return node.destination.as_deref().into_iter().collect();
        }
        self.decision_node(identifier)
            .map(|node| {
                node.rules
                    .iter()
                    .filter_map(|r| r.destination.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All node identifiers reachable from the entry node, entry included.
    pub fn reachable_from_entry(&self) -> AHashSet<String> {
        let mut seen = AHashSet::new();
        let mut stack: Vec<&str> = self.entry.as_deref().into_iter().collect();
        while let Some(id) = stack.pop() {
            if !self.contains_node(id) || !seen.insert(id.to_string()) {
                continue;
            }
            stack.extend(self.successors(id));
        }
        seen
    }
}

impl DecisionNode {
    pub fn y(&self) -> Option<f64> {
        coordinate(&self.layout_y)
    }

    /// Points every rule of this node at `destination`.
    pub fn route_all_to(&mut self, destination: &str) {
        for rule in &mut self.rules {
            rule.destination = Nullable::Value(destination.to_string());
        }
    }
}
