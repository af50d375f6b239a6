//! Mock data access for testing.
//!
//! Provides [`MockDataAccess`] for unit testing without a database.

use std::sync::RwLock;

use bbforge_templates::StyleId;

use crate::data_access::{
    CensoredWordRow, CustomBBCode, DataAccess, DataAccessError, DataAccessErrorKind, Smiley,
    StyleTemplate,
};

/// Mock data access for testing.
///
/// Stores rows in memory. Use the builder methods to configure the mock
/// with test data, and the `add_*` methods to change it between two
/// factory calls.
///
/// # Example
///
/// ```
/// use bbforge_factory::{DataAccess, MockDataAccess};
///
/// let data = MockDataAccess::new()
///     .with_style(1, "<!-- BEGIN b_open --><b><!-- END b_open -->", "QA==")
///     .with_smiley(":)", "smile.gif", "Smile");
///
/// assert_eq!(data.styles_templates().unwrap().len(), 1);
/// assert_eq!(data.smilies().unwrap()[0].code, ":)");
/// ```
#[derive(Debug, Default)]
pub struct MockDataAccess {
    styles: RwLock<Vec<StyleTemplate>>,
    bbcodes: RwLock<Vec<CustomBBCode>>,
    smilies: RwLock<Vec<Smiley>>,
    censored: RwLock<Vec<CensoredWordRow>>,
    failing: RwLock<Option<&'static str>>,
}

impl MockDataAccess {
    /// Create a new empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a style.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_style(
        self,
        style_id: u32,
        template: impl Into<String>,
        bbcode_bitfield: impl Into<String>,
    ) -> Self {
        self.styles.write().unwrap().push(StyleTemplate {
            style_id: StyleId(style_id),
            template: template.into(),
            bbcode_bitfield: bbcode_bitfield.into(),
        });
        self
    }

    /// Add a custom BBCode.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_bbcode(self, usage: impl Into<String>, template: impl Into<String>) -> Self {
        self.add_bbcode(usage, template);
        self
    }

    /// Add a smiley.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_smiley(
        self,
        code: impl Into<String>,
        smiley_url: impl Into<String>,
        emotion: impl Into<String>,
    ) -> Self {
        self.smilies.write().unwrap().push(Smiley {
            code: code.into(),
            smiley_url: smiley_url.into(),
            emotion: emotion.into(),
        });
        self
    }

    /// Add a censored word, given HTML-escaped as stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_censored_word(
        self,
        word: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.add_censored_word(word, replacement);
        self
    }

    /// Add a custom BBCode to an existing mock.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_bbcode(&self, usage: impl Into<String>, template: impl Into<String>) {
        self.bbcodes.write().unwrap().push(CustomBBCode {
            usage: usage.into(),
            template: template.into(),
        });
    }

    /// Add a censored word to an existing mock.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_censored_word(&self, word: impl Into<String>, replacement: impl Into<String>) {
        self.censored.write().unwrap().push(CensoredWordRow {
            word: word.into(),
            replacement: replacement.into(),
        });
    }

    /// Make the named query fail with [`DataAccessErrorKind::Unavailable`].
    ///
    /// Query names are `"styles"`, `"bbcodes"`, `"smilies"` and `"censored words"`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_on(&self, query: &'static str) {
        *self.failing.write().unwrap() = Some(query);
    }

    fn check(&self, query: &'static str) -> Result<(), DataAccessError> {
        if *self.failing.read().unwrap() == Some(query) {
            return Err(DataAccessError::new(DataAccessErrorKind::Unavailable, query));
        }
        Ok(())
    }
}

impl DataAccess for MockDataAccess {
    fn styles_templates(&self) -> Result<Vec<StyleTemplate>, DataAccessError> {
        self.check("styles")?;
        Ok(self.styles.read().unwrap().clone())
    }

    fn custom_bbcodes(&self) -> Result<Vec<CustomBBCode>, DataAccessError> {
        self.check("bbcodes")?;
        Ok(self.bbcodes.read().unwrap().clone())
    }

    fn smilies(&self) -> Result<Vec<Smiley>, DataAccessError> {
        self.check("smilies")?;
        Ok(self.smilies.read().unwrap().clone())
    }

    fn censored_words(&self) -> Result<Vec<CensoredWordRow>, DataAccessError> {
        self.check("censored words")?;
        Ok(self.censored.read().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let data = MockDataAccess::new()
            .with_style(2, "doc", "kNg=")
            .with_bbcode("[x]{TEXT}[/x]", "<x/>")
            .with_censored_word("darn", "d**n");

        let styles = data.styles_templates().unwrap();
        assert_eq!(styles[0].style_id, StyleId(2));
        assert_eq!(styles[0].bbcode_bitfield, "kNg=");
        assert_eq!(data.custom_bbcodes().unwrap().len(), 1);
        assert_eq!(data.censored_words().unwrap()[0].replacement, "d**n");
        assert!(data.smilies().unwrap().is_empty());
    }

    #[test]
    fn test_add_after_construction() {
        let data = MockDataAccess::new();
        data.add_bbcode("[x]{TEXT}[/x]", "<x/>");
        assert_eq!(data.custom_bbcodes().unwrap().len(), 1);
    }

    #[test]
    fn test_fail_on() {
        let data = MockDataAccess::new();
        data.fail_on("smilies");

        let err = data.smilies().unwrap_err();
        assert_eq!(err.kind, DataAccessErrorKind::Unavailable);
        assert_eq!(err.query, "smilies");
        assert!(data.custom_bbcodes().is_ok());
    }
}
