//! Emoticon and magic-link plugins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Emoticon plugin: replaces codes such as `:)` with a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Emoticons {
    entries: BTreeMap<String, String>,
    /// XPath condition under which emoticons render as plain text.
    pub not_if_condition: Option<String>,
    /// Regexp of characters that must not precede an emoticon.
    pub not_after: Option<String>,
}

impl Emoticons {
    /// Register `code`, replacing any previous template for it.
    pub fn add(&mut self, code: impl Into<String>, template: impl Into<String>) -> &mut Self {
        self.entries.insert(code.into(), template.into());
        self
    }

    /// Template of `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// Registered emoticons, by code.
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Number of emoticons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no emoticon is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns bare e-mail addresses into links, through the `EMAIL` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autoemail {
    /// Tag used for the generated links.
    pub tag_name: String,
    /// Attribute receiving the address.
    pub attr_name: String,
}

impl Default for Autoemail {
    fn default() -> Self {
        Self {
            tag_name: "EMAIL".to_owned(),
            attr_name: "email".to_owned(),
        }
    }
}

/// Turns bare URLs into links, through the `URL` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autolink {
    /// Tag used for the generated links.
    pub tag_name: String,
    /// Attribute receiving the URL.
    pub attr_name: String,
    /// Also link `www.` hosts without a scheme.
    pub match_www: bool,
}

impl Default for Autolink {
    fn default() -> Self {
        Self {
            tag_name: "URL".to_owned(),
            attr_name: "url".to_owned(),
            match_www: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emoticons_replace_same_code() {
        let mut emoticons = Emoticons::default();
        emoticons.add(":)", "<img alt=\"smile\"/>").add(":)", "<img alt=\"grin\"/>");

        assert_eq!(emoticons.len(), 1);
        assert_eq!(emoticons.get(":)"), Some("<img alt=\"grin\"/>"));
        assert_eq!(emoticons.get(":("), None);
    }

    #[test]
    fn test_magic_link_defaults() {
        assert_eq!(Autoemail::default().tag_name, "EMAIL");
        let autolink = Autolink::default();
        assert_eq!(autolink.tag_name, "URL");
        assert!(!autolink.match_www);
    }
}
