//! Operand classification for legacy decision nodes.

use crate::document::{DecisionType, ResponseType};

/// The operand that evaluates to the contact's latest response.
pub const STEP_VALUE: &str = "@step.value";

const STEP_MARKER: &str = "@step";
const STEP_WORD: &str = "step";
const EXPRESSION_OPEN: &str = "=(";
const CONTACT_PREFIX: &str = "@contact.";
const FLOW_PREFIX: &str = "@flow.";
const CONTACT_GROUPS: &str = "@contact.groups";

/// What a legacy decision node turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub decision_type: DecisionType,
    /// A wait-for-message node must be inserted in front of the node.
    pub needs_wait: bool,
    /// The operand matched no known pattern and fell back to an expression.
    pub ambiguous: bool,
}

pub fn is_expression(operand: &str) -> bool {
    operand.len() > 2 && operand.starts_with(EXPRESSION_OPEN)
}

/// True when evaluating `operand` needs the contact's response, which in the
/// legacy runtime meant the node implicitly paused for input.
pub fn requires_step(operand: &str) -> bool {
    operand.contains(STEP_MARKER) || (is_expression(operand) && operand.contains(STEP_WORD))
}

/// Classifies a trimmed operand. A blank operand falls through to an
/// ambiguous expression split.
///
/// `had_webhook` is whether the node called a webhook in the legacy runtime,
/// which always paused afterwards.
pub fn classify(operand: &str, response_type: ResponseType, had_webhook: bool) -> Classification {
    if requires_step(operand) {
        let (decision_type, needs_wait) = match response_type {
            ResponseType::Digits => (DecisionType::WaitDigits, false),
            ResponseType::Digit => (DecisionType::WaitDigit, false),
            ResponseType::Recording => (DecisionType::WaitRecording, false),
            ResponseType::Message if operand == STEP_VALUE => (DecisionType::WaitMessage, false),
            // evaluating the expression still needs a reply to pause for
            ResponseType::Message => (DecisionType::Expression, true),
        };
        return Classification {
            decision_type,
            needs_wait,
            ambiguous: false,
        };
    }

    let decision_type = split_type(operand);
    let ambiguous = decision_type == DecisionType::Expression
        && !operand.starts_with('@')
        && !is_expression(operand);

    Classification {
        decision_type,
        needs_wait: had_webhook,
        ambiguous,
    }
}

/// Picks the split type for an operand that does not reference the step.
fn split_type(operand: &str) -> DecisionType {
    if operand.contains(' ') || operand.contains('|') || operand == CONTACT_GROUPS {
        DecisionType::Expression
    } else if operand.starts_with(CONTACT_PREFIX) {
        DecisionType::ContactField
    } else if operand.starts_with(FLOW_PREFIX) {
        DecisionType::FlowField
    } else {
        DecisionType::Expression
    }
}

