//! Error types for the configurator.

use std::path::PathBuf;

/// A BBCode definition that could not be registered.
///
/// These are per-definition failures: the configurator is left untouched
/// and other definitions can still be added.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// The usage string does not start with `[NAME`.
    #[error("invalid usage {usage:?}: {reason}")]
    InvalidUsage {
        /// Offending usage.
        usage: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A BBCode or tag with the same name already exists.
    #[error("BBCode {name} already exists")]
    Duplicate {
        /// BBCode name.
        name: String,
    },

    /// A token or filter option refers to a filter nobody registered.
    #[error("unknown filter {filter} in BBCode {name}")]
    UnknownFilter {
        /// BBCode name.
        name: String,
        /// Filter name, including the leading `#`.
        filter: String,
    },

    /// The template uses a token the usage does not define.
    #[error("token {{{token}}} is undefined in BBCode {name}")]
    UndefinedToken {
        /// BBCode name.
        name: String,
        /// Token id, without braces.
        token: String,
    },

    /// The template is not well-formed markup.
    #[error("malformed template for BBCode {name}: {reason}")]
    MalformedTemplate {
        /// BBCode name.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// A checked template contains markup that would be unsafe to render.
    #[error("unsafe template for BBCode {name}: {reason}")]
    UnsafeTemplate {
        /// BBCode name.
        name: String,
        /// What was found.
        reason: String,
    },
}

/// Failure while compiling a configurator into parser and renderer.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The rendering engine has no cache directory to write to.
    #[error("rendering engine has no cache directory")]
    MissingCacheDir,

    /// The renderer class prefix is empty.
    #[error("renderer class prefix is empty")]
    EmptyClassPrefix,

    /// A tag template became malformed after registration.
    #[error("malformed template for tag {tag}: {reason}")]
    MalformedTemplate {
        /// Tag name.
        tag: String,
        /// Parser message.
        reason: String,
    },

    /// A BBCode refers to a filter that is no longer registered.
    #[error("unknown filter {filter} in BBCode {name}")]
    UnknownFilter {
        /// BBCode name.
        name: String,
        /// Filter name.
        filter: String,
    },

    /// Serializing an artifact failed.
    #[error("failed to serialize renderer: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the generated renderer file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Compiler-specific failure.
    #[error("{0}")]
    Other(String),
}
