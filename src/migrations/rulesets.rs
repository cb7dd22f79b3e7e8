use super::MigrationContext;
use super::classify::{STEP_VALUE, classify};
use crate::document::{
    DecisionNode, DecisionType, FlowDocument, FlowNode, Nullable, ResponseType,
};
use crate::error::{MigrationError, Notice};
use crate::graph::{insert_before, retain_catch_all};

/// What has to be inserted in front of a node once it has been classified.
struct Expansion {
    node_id: String,
    needs_wait: bool,
    webhook: Option<(String, Option<String>)>,
}

/// Version 5: gives every legacy decision node an explicit type.
///
/// Older documents waited for a response implicitly, inferred from the
/// node's response code and operand, and could call a webhook before
/// evaluating their rules. Each such node is typed, and where one node stood
/// for several runtime phases the extra phases become their own nodes,
/// chained in front of it as `[wait_message] -> [webhook] -> node`.
///
/// Nodes that already have a type are not touched.
pub fn expand_rulesets(
    document: &mut FlowDocument,
    ctx: &mut MigrationContext<'_>,
) -> Result<(), MigrationError> {
    let margin = ctx.config().layout_margin;

    // synthesized nodes are appended behind the original ones and never revisited
    let original_count = document.decision_nodes.len();
    for index in 0..original_count {
        let Some(expansion) = resolve_node(&mut document.decision_nodes[index], ctx) else {
            continue;
        };

        let mut successor_id = expansion.node_id;

        if expansion.needs_wait {
            let wait = synthesize(
                &document.decision_nodes[index],
                DecisionType::WaitMessage,
                "Response",
                document.base_language.as_deref(),
                ctx,
            );
            successor_id = insert_before(
                document,
                FlowNode::Decision(wait),
                &successor_id,
                ctx.ids(),
                margin,
            )?;
        }

        if let Some((url, action)) = expansion.webhook {
            let mut webhook = synthesize(
                &document.decision_nodes[index],
                DecisionType::Webhook,
                "Webhook",
                document.base_language.as_deref(),
                ctx,
            );
            webhook.webhook_url = Nullable::Value(url);
            webhook.webhook_action = Nullable::from(action);
            insert_before(
                document,
                FlowNode::Decision(webhook),
                &successor_id,
                ctx.ids(),
                margin,
            )?;
        }
    }

    Ok(())
}

/// Types a single legacy node in place and strips its legacy fields.
///
/// Returns `None` for nodes that were already typed, and for modern nodes
/// carrying neither a response code nor a webhook.
fn resolve_node(node: &mut DecisionNode, ctx: &mut MigrationContext<'_>) -> Option<Expansion> {
    if node.decision_type.as_ref().is_some() {
        return None;
    }

    for rule in &mut node.rules {
        rule.config = None;
    }

    let code = node.response_type.take().filter(|code| !code.is_empty());
    let has_webhook = node.webhook_url.as_deref().is_some_and(|url| !url.is_empty());
    if code.is_none() && !has_webhook {
        return None;
    }
    // a missing code behaves like any other message wait
    let code = code.unwrap_or_default();

    let webhook_url = node.webhook_url.take().filter(|url| !url.is_empty());
    let webhook_action = node.webhook_action.take();
    // untyped here, so the node cannot already be a webhook node
    let had_webhook = webhook_url.is_some();

    // the fallback applies before trimming, a blank operand stays blank
    let operand = match node.operand.as_deref() {
        Some(operand) if !operand.is_empty() => operand.trim().to_string(),
        _ => STEP_VALUE.to_string(),
    };

    let classification = classify(&operand, ResponseType::from_code(&code), had_webhook);
    tracing::debug!(
        node = %node.identifier,
        operand = %operand,
        response_type = %code,
        decision_type = %classification.decision_type,
        "classified decision node"
    );

    if classification.ambiguous {
        ctx.notice(Notice::AmbiguousOperand {
            node_id: node.identifier.clone(),
            operand: operand.clone(),
        });
    }
    node.decision_type = Nullable::Value(classification.decision_type);

    Some(Expansion {
        node_id: node.identifier.clone(),
        needs_wait: classification.needs_wait,
        webhook: webhook_url.map(|url| (url, webhook_action)),
    })
}

/// A copy of `source` reduced to a single-purpose node with one catch-all branch.
fn synthesize(
    source: &DecisionNode,
    decision_type: DecisionType,
    suffix: &str,
    base_language: Option<&str>,
    ctx: &MigrationContext<'_>,
) -> DecisionNode {
    let mut node = source.clone();
    node.decision_type = Nullable::Value(decision_type);
    node.operand = Nullable::Value(STEP_VALUE.to_string());
    node.label = Nullable::Value(match source.label.as_deref() {
        Some(label) => format!("{} {}", label, suffix),
        None => suffix.to_string(),
    });
    retain_catch_all(&mut node, base_language, ctx.ids());
    node
}
