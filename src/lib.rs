//! # Ikou - Flow Document Migration Engine
//!
//! **Ikou** upgrades serialized flow definitions (directed graphs of decision
//! and action nodes describing an automated conversation) from whatever schema
//! version they were saved with to the current one. Each migration step is a
//! pure, in-memory transformation of the whole document from version N to
//! N+1, and steps are applied in ascending order, so a document of any age can
//! be loaded and run against current execution logic.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Parse a document with [`FlowDocument::from_json`] or
//!     [`FlowDocument::from_value`]. Structurally broken documents are rejected
//!     here, before any migration runs.
//! 2.  **Configure**: Use [`Migrator::builder`] to choose the base language,
//!     layout margin, and identifier generator.
//! 3.  **Migrate**: Call [`Migrator::migrate`] (or `migrate_to` for an
//!     intermediate version). The outcome carries the upgraded document, the
//!     steps that ran, and any non-fatal notices.
//!
//! The two steps currently in the chain are:
//!
//! - **v5, ruleset expansion**: legacy "wait for response" nodes get an
//!   explicit decision type, and nodes that implied a webhook call or an
//!   implicit pause are split into a short chain of single-purpose nodes.
//! - **v6, localization**: every user-facing text field becomes a
//!   language-keyed map under the document's base language.
//!
//! Both steps are idempotent: running them over a document that already has
//! what they introduce changes nothing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ikou::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let json = std::fs::read_to_string("path/to/flow.json")?;
//!     let document = FlowDocument::from_json(&json)?;
//!
//!     let migrator = Migrator::builder().with_base_language("eng").build();
//!     let outcome = migrator.migrate(document)?;
//!
//!     println!(
//!         "Migrated from v{} to v{} ({} steps)",
//!         outcome.from_version,
//!         outcome.to_version,
//!         outcome.applied.len()
//!     );
//!     for notice in &outcome.notices {
//!         println!("  note: {}", notice);
//!     }
//!     println!("{}", outcome.document.to_json_pretty()?);
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod graph;
pub mod migrations;
pub mod prelude;

#[cfg(feature = "python-bindings")]
mod python;

pub use document::FlowDocument;
pub use migrations::Migrator;
