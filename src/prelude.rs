//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the ikou
//! crate. Import this module to get access to the core functionality without
//! having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use ikou::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/flow.json")?;
//! let migrated = Migrator::default().migrate_json(&json)?;
//! println!("{}", migrated);
//! # Ok(())
//! # }
//! ```

// Migration driver
pub use crate::migrations::{
    LATEST_VERSION, MigrationConfig, MigrationContext, MigrationOutcome, Migrator,
    MigratorBuilder,
};

// Document model
pub use crate::document::{
    Action, ActionKind, ActionNode, DecisionNode, DecisionType, FlowDocument, FlowNode,
    LocalizedText, Nullable, Rule, RuleTest, TestKind,
};

// Graph editing
pub use crate::graph::{IdGenerator, SequentialIdGenerator, UuidGenerator};

// Error types
pub use crate::error::{MigrationError, Notice};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
