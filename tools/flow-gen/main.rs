use clap::Parser;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};
use std::fs;

/// A CLI tool to generate random legacy flow documents for the ikou migrator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// The number of decision nodes to generate
    #[arg(long, default_value_t = 20)]
    nodes: usize,

    /// Fraction of decision nodes that call a webhook, between 0 and 1
    #[arg(long, default_value_t = 0.25)]
    webhook_ratio: f64,

    /// The version the generated document declares
    #[arg(long, default_value_t = 4)]
    version: u32,
}

/// Operands covering every classification path of the v5 migration.
const OPERANDS: &[&str] = &[
    "@step.value",
    "",
    "=(step.value + 1)",
    "@step.value|upper_case",
    "@contact.age",
    "@contact.groups",
    "@flow.color",
    "@flow.color.category",
    "@contact.name|upper_case",
    "=(contact.age + 1)",
    "hello world",
];

const RESPONSE_TYPES: &[&str] = &["C", "O", "N", "K", "M", "R"];

const TEXT_TESTS: &[&str] = &["contains", "contains_any", "starts", "regex"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..=1.0).contains(&cli.webhook_ratio) {
        eprintln!(
            "Error: --webhook-ratio ({}) must be between 0 and 1",
            cli.webhook_ratio
        );
        std::process::exit(1);
    }

    println!(
        "Generating a version {} flow with {} decision nodes...",
        cli.version, cli.nodes
    );

    let document = generate_flow(&mut rng, &cli);
    let json_output = serde_json::to_string_pretty(&document)?;
    fs::write(&cli.output, json_output)?;

    println!("Successfully generated and saved flow to '{}'", cli.output);
    Ok(())
}

/// Lays out alternating action and decision nodes top to bottom, each leading
/// to the next, so the whole flow is one reachable chain.
fn generate_flow(rng: &mut impl Rng, cli: &Cli) -> Value {
    let mut action_sets = Vec::new();
    let mut rule_sets = Vec::new();
    let mut y = 0;

    for index in 0..cli.nodes {
        let action_id = format!("action-{}", index);
        let decision_id = format!("decision-{}", index);
        let next_id = if index + 1 < cli.nodes {
            Value::String(format!("action-{}", index + 1))
        } else {
            Value::Null
        };

        action_sets.push(generate_action_node(rng, &action_id, &decision_id, y));
        y += 100;
        rule_sets.push(generate_decision_node(rng, cli, &decision_id, &next_id, y));
        y += 150;
    }

    println!(
        "-> Generated {} action nodes and {} decision nodes.",
        action_sets.len(),
        rule_sets.len()
    );

    let entry = if cli.nodes > 0 {
        Value::String("action-0".to_string())
    } else {
        Value::Null
    };

    json!({
        "version": cli.version,
        "entry": entry,
        "action_sets": action_sets,
        "rule_sets": rule_sets,
    })
}

fn generate_action_node(rng: &mut impl Rng, id: &str, destination: &str, y: i64) -> Value {
    let action = if rng.random_bool(0.2) {
        json!({
            "type": "say",
            "uuid": format!("{}-say", id),
            "msg": "Please leave a message after the tone",
            "recording": "recording.wav",
        })
    } else {
        json!({ "type": "reply", "msg": format!("Question {}", id) })
    };

    json!({
        "uuid": id,
        "x": 100,
        "y": y,
        "actions": [action],
        "destination": destination,
    })
}

fn generate_decision_node(
    rng: &mut impl Rng,
    cli: &Cli,
    id: &str,
    next_id: &Value,
    y: i64,
) -> Value {
    let operand = *OPERANDS.choose(rng).unwrap_or(&"@step.value");
    let response_type = *RESPONSE_TYPES.choose(rng).unwrap_or(&"C");
    let text_test = *TEXT_TESTS.choose(rng).unwrap_or(&"contains");

    let low = rng.random_range(0..50);
    let high = low + rng.random_range(1..50);

    let mut node = json!({
        "uuid": id,
        "x": 400,
        "y": y,
        "label": format!("Question {}", id),
        "operand": operand,
        "response_type": response_type,
        "rules": [
            {
                "uuid": format!("{}-text", id),
                "test": { "type": text_test, "test": "yes" },
                "category": "Yes",
                "destination": next_id,
                "config": { "type": text_test, "verbose_name": "has text" },
            },
            {
                "uuid": format!("{}-range", id),
                "test": { "type": "between", "min": low, "max": high },
                "destination": next_id,
            },
            {
                "uuid": format!("{}-other", id),
                "test": { "type": "true" },
                "category": "Other",
                "destination": next_id,
            },
        ],
    });

    if rng.random_bool(cli.webhook_ratio) {
        node["webhook"] = json!(format!("http://example.com/hook/{}", id));
        let method = if rng.random_bool(0.5) { "GET" } else { "POST" };
        node["webhook_action"] = json!(method);
    }
    node
}
