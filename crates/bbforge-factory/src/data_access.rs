//! Board data the factory reads from.
//!
//! Provides the [`DataAccess`] trait for reading style templates, custom
//! BBCodes, smilies and censored words, along with [`DataAccessError`].

use bbforge_templates::StyleId;

/// Template document of one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTemplate {
    /// Style identifier.
    pub style_id: StyleId,
    /// Raw template document (`bbcode.html`).
    pub template: String,
    /// Base64 bitfield of the BBCodes the style overrides.
    pub bbcode_bitfield: String,
}

/// Custom BBCode defined by a board administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomBBCode {
    /// BBCode usage, e.g. `[spoiler]{TEXT}[/spoiler]`.
    pub usage: String,
    /// Template, possibly containing `{LOCAL_URL}` tokens.
    pub template: String,
}

/// A smiley.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Smiley {
    /// Text replaced by the smiley, e.g. `:)`.
    pub code: String,
    /// Image path relative to the smilies directory.
    pub smiley_url: String,
    /// Description shown as title.
    pub emotion: String,
}

/// A censored word, stored HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensoredWordRow {
    /// Word, `*` being a wildcard.
    pub word: String,
    /// Replacement text.
    pub replacement: String,
}

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DataAccessErrorKind {
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Permission denied.
    PermissionDenied,
    /// Stored data could not be decoded.
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Data access error with semantic kind and backend-specific source.
#[derive(Debug, thiserror::Error)]
#[error("{kind:?} while reading {query}{}", source_suffix(.source.as_deref()))]
pub struct DataAccessError {
    /// Semantic error category.
    pub kind: DataAccessErrorKind,
    /// Query that failed (e.g. "smilies").
    pub query: &'static str,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

fn source_suffix(source: Option<&(dyn std::error::Error + Send + Sync)>) -> String {
    source.map(|s| format!(": {s}")).unwrap_or_default()
}

impl DataAccessError {
    /// Create a new error for `query`.
    #[must_use]
    pub fn new(kind: DataAccessErrorKind, query: &'static str) -> Self {
        Self {
            kind,
            query,
            source: None,
        }
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Read-only access to the board data the formatter is built from.
pub trait DataAccess: Send + Sync {
    /// Template document and bitfield of every style.
    fn styles_templates(&self) -> Result<Vec<StyleTemplate>, DataAccessError>;

    /// Custom BBCodes.
    fn custom_bbcodes(&self) -> Result<Vec<CustomBBCode>, DataAccessError>;

    /// Smilies.
    fn smilies(&self) -> Result<Vec<Smiley>, DataAccessError>;

    /// Censored words.
    fn censored_words(&self) -> Result<Vec<CensoredWordRow>, DataAccessError>;
}
