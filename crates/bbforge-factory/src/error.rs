//! Factory error types.

use bbforge_configurator::{CompileError, DefinitionError};
use bbforge_templates::StyleId;

use crate::data_access::DataAccessError;

/// Error returned by [`Factory`](crate::Factory) operations.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// Board data could not be read.
    #[error("Failed to read board data: {0}")]
    DataAccess(#[from] DataAccessError),

    /// The assembled configuration could not be compiled.
    #[error("Failed to compile formatter: {0}")]
    Compile(#[from] CompileError),
}

/// BBCode, or one style's version of it, left out of an assembled configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDefinition {
    /// Usage as it was given.
    pub usage: String,
    /// Style whose override was replaced by the built-in template.
    /// `None` when the whole definition was skipped.
    pub style_id: Option<StyleId>,
    /// Why the definition was rejected.
    pub reason: DefinitionError,
}

/// Recoverable problems met while assembling a configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyReport {
    /// Definitions that were skipped, in the order they were met.
    pub skipped: Vec<SkippedDefinition>,
}

impl AssemblyReport {
    /// Whether every definition was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    pub(crate) fn skip(&mut self, usage: &str, reason: DefinitionError) {
        tracing::warn!(usage = %usage, error = %reason, "Skipped BBCode definition");
        self.skipped.push(SkippedDefinition {
            usage: usage.to_owned(),
            style_id: None,
            reason,
        });
    }

    pub(crate) fn reject_override(&mut self, style_id: StyleId, usage: &str, reason: DefinitionError) {
        tracing::warn!(
            style_id = %style_id,
            usage = %usage,
            error = %reason,
            "Style override rejected, using built-in template"
        );
        self.skipped.push(SkippedDefinition {
            usage: usage.to_owned(),
            style_id: Some(style_id),
            reason,
        });
    }
}
