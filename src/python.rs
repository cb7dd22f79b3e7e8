use crate::migrations::{LATEST_VERSION, Migrator};
use pyo3::prelude::*;

/// Upgrades legacy flow documents to the current schema.
///
/// A migrator is configured once and can then migrate any number of
/// documents. It keeps no state between calls.
#[pyclass(name = "Migrator")]
struct MigratorPy {
    migrator: Migrator,
}

#[pymethods]
impl MigratorPy {
    /// Creates a migrator.
    ///
    /// Args:
    ///     base_language (str | None): The language tag that text fields are
    ///         localized under when a document has no base language yet.
    ///         Defaults to "base".
    ///
    /// Returns:
    ///     Migrator: A configured migrator.
    #[new]
    #[pyo3(signature = (base_language=None))]
    fn new(base_language: Option<String>) -> Self {
        let mut builder = Migrator::builder();
        if let Some(language) = base_language {
            builder = builder.with_base_language(&language);
        }
        MigratorPy {
            migrator: builder.build(),
        }
    }

    /// Migrates a flow document to the latest version.
    ///
    /// Args:
    ///     document_json (str): The flow document as a JSON string.
    ///
    /// Returns:
    ///     str: The migrated document as pretty-printed JSON.
    ///
    /// Raises:
    ///     ValueError: If the input is not JSON, is missing a required
    ///         collection, or declares a version newer than this library
    ///         supports.
    fn migrate(&self, document_json: &str) -> PyResult<String> {
        self.migrator
            .migrate_json(document_json)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
    }

    /// The version every document is migrated to.
    #[staticmethod]
    fn latest_version() -> u32 {
        LATEST_VERSION
    }
}

/// Python bindings for the ikou flow document migration engine.
#[pymodule]
fn ikou(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<MigratorPy>()?;
    Ok(())
}
