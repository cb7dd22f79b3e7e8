use thiserror::Error;

/// Errors that abort the migration of a single document.
///
/// A failed migration never hands back a partially upgraded document, and
/// migrating the same input again fails in exactly the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("Failed to parse flow document JSON: {0}")]
    InvalidJson(String),

    #[error("Malformed flow document at '{path}': {reason}")]
    MalformedDocument { path: String, reason: String },

    #[error("Node '{0}' not found in the flow document")]
    NodeNotFound(String),

    #[error("Could not generate an identifier that is not already used by the document (last: '{0}')")]
    DuplicateIdentifier(String),

    #[error("Document version {found} is newer than the latest supported version {latest}")]
    UnsupportedVersion { found: u32, latest: u32 },
}

impl MigrationError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        MigrationError::MalformedDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal findings recorded while migrating.
///
/// These never stop a migration. The affected field or node is resolved by
/// a fallback rule and the notice is reported alongside the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A rule test carries a type tag outside the recognized set and was
    /// passed through unlocalized.
    UnknownTestType { node_id: String, type_name: String },

    /// An action carries a type tag outside the recognized set and was
    /// passed through unlocalized.
    UnknownActionType { node_id: String, type_name: String },

    /// An operand matched no known pattern and was classified as a generic
    /// expression split.
    AmbiguousOperand { node_id: String, operand: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::UnknownTestType { node_id, type_name } => write!(
                f,
                "node '{}' has a rule with unknown test type '{}', left unlocalized",
                node_id, type_name
            ),
            Notice::UnknownActionType { node_id, type_name } => write!(
                f,
                "node '{}' has an action with unknown type '{}', left unlocalized",
                node_id, type_name
            ),
            Notice::AmbiguousOperand { node_id, operand } => write!(
                f,
                "node '{}' has an unrecognized operand '{}', classified as expression",
                node_id, operand
            ),
        }
    }
}
