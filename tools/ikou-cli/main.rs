use clap::Parser;
use ikou::migrations::{LATEST_VERSION, describe_chain, pending_versions};
use ikou::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Upgrades a legacy flow document to the current schema version
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow document JSON file
    input: Option<String>,

    /// Where to write the migrated document (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Language tag used when localizing a document without one
    #[arg(long, default_value = "base")]
    base_language: String,

    /// Stop at this version instead of the latest
    #[arg(long)]
    target: Option<u32>,

    /// Generate new node identifiers as a readable sequence instead of UUIDs
    #[arg(long)]
    deterministic_ids: bool,

    /// List the known migration steps and exit
    #[arg(long)]
    list: bool,

    /// Log every classified node and inserted node
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list {
        println!("{}", describe_chain());
        return;
    }

    let input = cli
        .input
        .clone()
        .unwrap_or_else(|| exit_with_error("An input document path is required."));
    run_migration(&cli, &input);
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_migration(cli: &Cli, input: &str) {
    let total_start = Instant::now();

    // --- 1. Loading ---
    let json = fs::read_to_string(input)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", input, e)));
    let document = FlowDocument::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", input, e)));
    let load_duration = total_start.elapsed();

    let pending = pending_versions(document.version);
    eprintln!(
        "Loaded '{}' at version {} ({} action nodes, {} decision nodes, {} pending steps)",
        input,
        document.version,
        document.action_nodes.len(),
        document.decision_nodes.len(),
        pending.len()
    );

    // --- 2. Migration ---
    let mut builder = Migrator::builder().with_base_language(&cli.base_language);
    if cli.deterministic_ids {
        builder = builder.with_id_generator(SequentialIdGenerator::default());
    }
    let migrator = builder.build();

    let migrate_start = Instant::now();
    let outcome = migrator
        .migrate_to(document, cli.target.unwrap_or(LATEST_VERSION))
        .unwrap_or_else(|e| exit_with_error(&format!("Migration failed: {}", e)));
    let migrate_duration = migrate_start.elapsed();

    // --- 3. Output ---
    let rendered = outcome
        .document
        .to_json_pretty()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize document: {}", e)));
    match &cli.output {
        Some(path) => fs::write(path, rendered).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write '{}': {}", path, e))
        }),
        None => println!("{}", rendered),
    }

    // --- 4. Summary ---
    eprintln!("\n--- Migration Summary ---");
    eprintln!(
        "Version:              {} -> {}",
        outcome.from_version, outcome.to_version
    );
    eprintln!("Applied Steps:        {:?}", outcome.applied);
    eprintln!(
        "Nodes:                {} action, {} decision",
        outcome.document.action_nodes.len(),
        outcome.document.decision_nodes.len()
    );
    eprintln!("Notices:              {}", outcome.notices.len());
    for notice in &outcome.notices {
        eprintln!("  - {}", notice);
    }
    eprintln!("\n--- Performance Summary ---");
    eprintln!("Loading:              {:?}", load_duration);
    eprintln!("Migration:            {:?}", migrate_duration);
    eprintln!("Total Execution:      {:?}", total_start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
