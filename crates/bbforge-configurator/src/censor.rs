//! Word censoring.
//!
//! The [`Censor`] plugin marks censored words in parsed text with its own
//! tag. Its [`CensorHelper`] holds the word list separately so that text can
//! be censored again at render time, after the word list changed, without
//! recompiling the renderer.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Replacement used for words registered without one.
pub const DEFAULT_REPLACEMENT: &str = "****";

/// A censored word and its optional replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensoredWord {
    /// Word, where `*` matches any run of letters and digits.
    pub word: String,
    /// Replacement, [`DEFAULT_REPLACEMENT`] when absent.
    pub replacement: Option<String>,
}

/// Censor plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Censor {
    tag_name: String,
    words: Vec<CensoredWord>,
}

impl Censor {
    /// Plugin marking censored words with `tag_name`.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            words: Vec::new(),
        }
    }

    /// Name of the tag wrapping censored words.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Censor `word`, replacing it with `replacement` or the default one.
    ///
    /// Words made only of wildcards are ignored.
    pub fn add(&mut self, word: impl Into<String>, replacement: Option<String>) -> &mut Self {
        let word = word.into();
        if word.trim_matches('*').is_empty() {
            tracing::debug!(word = %word, "Ignoring censored word without letters");
            return self;
        }
        self.words.push(CensoredWord {
            word,
            replacement: replacement.filter(|r| !r.is_empty()),
        });
        self
    }

    /// Registered words.
    #[must_use]
    pub fn words(&self) -> &[CensoredWord] {
        &self.words
    }

    /// Template of the censor tag.
    #[must_use]
    pub fn tag_template() -> String {
        format!(
            "<xsl:choose>\
             <xsl:when test=\"@with\"><xsl:value-of select=\"@with\"/></xsl:when>\
             <xsl:otherwise>{DEFAULT_REPLACEMENT}</xsl:otherwise>\
             </xsl:choose>"
        )
    }

    /// Detach a helper holding the current word list.
    #[must_use]
    pub fn helper(&self) -> CensorHelper {
        CensorHelper {
            words: self.words.clone(),
        }
    }
}

/// Serializable word list able to censor plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensorHelper {
    words: Vec<CensoredWord>,
}

impl CensorHelper {
    /// Censored words.
    #[must_use]
    pub fn words(&self) -> &[CensoredWord] {
        &self.words
    }

    /// Replace every censored word in `text`.
    ///
    /// Matching is case-insensitive and only applies to whole words. When
    /// several words match at the same position, the first registered wins.
    #[must_use]
    pub fn censor_text(&self, text: &str) -> String {
        let matchers: Vec<(Regex, &str)> = self
            .words
            .iter()
            .filter_map(|w| {
                let replacement = w.replacement.as_deref().unwrap_or(DEFAULT_REPLACEMENT);
                match word_regex(&w.word) {
                    Ok(regex) => Some((regex, replacement)),
                    Err(e) => {
                        tracing::warn!(word = %w.word, error = %e, "Skipping censored word");
                        None
                    }
                }
            })
            .collect();

        let mut output = String::with_capacity(text.len());
        let mut pos = 0;
        while pos < text.len() {
            let next = matchers
                .iter()
                .filter_map(|(regex, replacement)| {
                    regex.find_at(text, pos).map(|m| (m.start(), m.end(), *replacement))
                })
                .min_by_key(|(start, _, _)| *start);

            match next {
                Some((start, end, replacement)) if end > start => {
                    output.push_str(&text[pos..start]);
                    output.push_str(replacement);
                    pos = end;
                }
                _ => break,
            }
        }
        output.push_str(&text[pos..]);
        output
    }
}

fn word_regex(word: &str) -> Result<Regex, regex::Error> {
    let body = word
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[\p{L}\p{N}]*");
    RegexBuilder::new(&format!(r"(?:^|\b){body}(?:\b|$)"))
        .case_insensitive(true)
        .build()
}
