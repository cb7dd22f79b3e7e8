use crate::document::FlowDocument;
use crate::error::{MigrationError, Notice};
use crate::graph::{IdGenerator, UuidGenerator};
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub mod classify;
mod localize;
mod rulesets;

pub use localize::localize;
pub use rulesets::expand_rulesets;

/// Language tag used for every localized field of a document that had none.
pub const DEFAULT_BASE_LANGUAGE: &str = "base";

/// Vertical distance every node below an inserted node is moved down by.
pub const LAYOUT_MARGIN: i64 = 100;

/// The version every migration run ends at unless told otherwise.
pub const LATEST_VERSION: u32 = 6;

/// A single migration step, upgrading a document to `version` in place.
pub type MigrationFn =
    fn(&mut FlowDocument, &mut MigrationContext<'_>) -> Result<(), MigrationError>;

pub struct MigrationStep {
    /// The version a document has after this step ran.
    pub version: u32,
    pub description: &'static str,
    pub apply: MigrationFn,
}

/// All known steps, in ascending version order.
pub const MIGRATIONS: &[MigrationStep] = &[
    MigrationStep {
        version: 5,
        description: "make waits explicit and split webhook rulesets into their own nodes",
        apply: expand_rulesets,
    },
    MigrationStep {
        version: 6,
        description: "localize all user-facing text into the base language",
        apply: localize,
    },
];

/// Settings shared by every step of a migration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub base_language: String,
    pub layout_margin: i64,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            base_language: DEFAULT_BASE_LANGUAGE.to_string(),
            layout_margin: LAYOUT_MARGIN,
        }
    }
}

/// Per-document state handed to each step.
pub struct MigrationContext<'a> {
    config: &'a MigrationConfig,
    ids: &'a dyn IdGenerator,
    notices: Vec<Notice>,
}

impl<'a> MigrationContext<'a> {
    pub fn new(config: &'a MigrationConfig, ids: &'a dyn IdGenerator) -> Self {
        Self {
            config,
            ids,
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &'a MigrationConfig {
        self.config
    }

    pub fn ids(&self) -> &'a dyn IdGenerator {
        self.ids
    }

    pub fn notice(&mut self, notice: Notice) {
        tracing::warn!("{}", notice);
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }
}

/// The result of migrating one document.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub document: FlowDocument,
    pub from_version: u32,
    pub to_version: u32,
    /// Target versions of the steps that ran, in order.
    pub applied: Vec<u32>,
    pub notices: Vec<Notice>,
}

/// Drives documents through the version chain.
///
/// A `Migrator` holds no per-document state and can migrate many documents
/// concurrently.
pub struct Migrator {
    config: MigrationConfig,
    ids: Arc<dyn IdGenerator>,
}

pub struct MigratorBuilder {
    config: MigrationConfig,
    ids: Arc<dyn IdGenerator>,
}

impl MigratorBuilder {
    pub fn new() -> Self {
        Self {
            config: MigrationConfig::default(),
            ids: Arc::new(UuidGenerator),
        }
    }

    pub fn with_config(mut self, config: MigrationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_base_language(mut self, language: &str) -> Self {
        self.config.base_language = language.to_string();
        self
    }

    pub fn with_layout_margin(mut self, margin: i64) -> Self {
        self.config.layout_margin = margin;
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn build(self) -> Migrator {
        Migrator {
            config: self.config,
            ids: self.ids,
        }
    }
}

impl Default for MigratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Migrator {
    fn default() -> Self {
        MigratorBuilder::new().build()
    }
}

impl Migrator {
    pub fn builder() -> MigratorBuilder {
        MigratorBuilder::new()
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Upgrades a document to [`LATEST_VERSION`].
    pub fn migrate(&self, document: FlowDocument) -> Result<MigrationOutcome, MigrationError> {
        self.migrate_to(document, LATEST_VERSION)
    }

    /// Applies, in ascending order, every step above the document's declared
    /// version and at or below `target`.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedVersion` when either the document or `target` is
    /// newer than [`LATEST_VERSION`], and with whatever error a step raises.
    /// The document is consumed, so a failed run never leaks a half-migrated
    /// document.
    pub fn migrate_to(
        &self,
        mut document: FlowDocument,
        target: u32,
    ) -> Result<MigrationOutcome, MigrationError> {
        let from_version = document.version;
        for version in [from_version, target] {
            if version > LATEST_VERSION {
                return Err(MigrationError::UnsupportedVersion {
                    found: version,
                    latest: LATEST_VERSION,
                });
            }
        }

        let pending = MIGRATIONS
            .iter()
            .filter(|step| step.version > from_version && step.version <= target)
            .collect_vec();

        if pending.is_empty() {
            tracing::debug!(
                version = from_version,
                target_version = target,
                "no migration needed"
            );
        } else {
            tracing::info!(
                from = from_version,
                to = target,
                steps = pending.len(),
                "migrating flow document"
            );
        }

        let mut context = MigrationContext::new(&self.config, self.ids.as_ref());
        let mut applied = Vec::with_capacity(pending.len());
        for step in pending {
            tracing::info!(version = step.version, "{}", step.description);
            (step.apply)(&mut document, &mut context)?;
            document.version = step.version;
            applied.push(step.version);
        }

        Ok(MigrationOutcome {
            to_version: document.version,
            document,
            from_version,
            applied,
            notices: context.into_notices(),
        })
    }

    pub fn migrate_value(&self, value: Value) -> Result<Value, MigrationError> {
        let document = FlowDocument::from_value(value)?;
        self.migrate(document)?.document.to_value()
    }

    pub fn migrate_json(&self, json: &str) -> Result<String, MigrationError> {
        let document = FlowDocument::from_json(json)?;
        self.migrate(document)?.document.to_json_pretty()
    }

    /// Migrates independent documents in parallel. Results keep input order.
    pub fn migrate_batch(
        &self,
        documents: Vec<Value>,
    ) -> Vec<Result<MigrationOutcome, MigrationError>> {
        documents
            .into_par_iter()
            .map(|value| FlowDocument::from_value(value).and_then(|doc| self.migrate(doc)))
            .collect()
    }
}

/// The target versions of the steps a document at `version` still needs.
pub fn pending_versions(version: u32) -> Vec<u32> {
    MIGRATIONS
        .iter()
        .filter(|step| step.version > version)
        .map(|step| step.version)
        .collect()
}

impl std::fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}: {}", self.version, self.description)
    }
}

/// One line per known step, e.g. for `--help` output or logs.
pub fn describe_chain() -> String {
    MIGRATIONS.iter().map(ToString::to_string).join("\n")
}
