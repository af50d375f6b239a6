//! Attribute filters.
//!
//! Every BBCode token is validated by the filter named after its type: a
//! `{URL}` token goes through `#url`, a `{LOCAL_URL}` token through
//! `#local_url`, and so on. Built-in filters are always available; others
//! must be registered before a BBCode refers to them.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

/// Filters provided by the parser itself.
pub const BUILTIN_FILTERS: &[&str] = &[
    "#alnum",
    "#choice",
    "#color",
    "#email",
    "#false",
    "#float",
    "#fontfamily",
    "#hashmap",
    "#identifier",
    "#int",
    "#ip",
    "#ipport",
    "#ipv4",
    "#ipv6",
    "#map",
    "#number",
    "#range",
    "#regexp",
    "#simpletext",
    "#timestamp",
    "#uint",
    "#url",
];

/// Token types that accept any content and need no filter.
const UNFILTERED_TOKENS: &[&str] = &["ANYTHING", "PARSE", "TEXT"];

/// Filter validating a token of the given id, if it needs one.
///
/// Trailing digits are ignored, so `{NUMBER1}` uses `#number`.
#[must_use]
pub fn filter_for_token(token_id: &str) -> Option<String> {
    let kind = token_id.trim_end_matches(|c: char| c.is_ascii_digit());
    if UNFILTERED_TOKENS.contains(&kind) {
        return None;
    }
    Some(format!("#{}", kind.to_ascii_lowercase()))
}

/// How an attribute value is checked.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterKind {
    /// The whole value must match.
    Regexp {
        /// Anchored pattern.
        #[serde(with = "regex_str")]
        pattern: Regex,
    },
    /// A host-provided function, invoked with named parameters.
    Callback {
        /// Function name.
        callback: String,
        /// Parameters passed by name, in order.
        params: Vec<String>,
    },
}

/// A registered attribute filter.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeFilter {
    #[serde(flatten)]
    kind: FilterKind,
    safe_in_css: bool,
    safe_as_url: bool,
}

impl AttributeFilter {
    /// Filter accepting values matching `pattern` entirely.
    pub fn regexp(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::new(FilterKind::Regexp {
            pattern: Regex::new(pattern)?,
        }))
    }

    /// Filter delegating to a host callback.
    #[must_use]
    pub fn callback(callback: impl Into<String>) -> Self {
        Self::new(FilterKind::Callback {
            callback: callback.into(),
            params: Vec::new(),
        })
    }

    fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            safe_in_css: false,
            safe_as_url: false,
        }
    }

    /// Pass the named parameter to the callback. No-op for regexp filters.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>) -> Self {
        if let FilterKind::Callback { params, .. } = &mut self.kind {
            params.push(name.into());
        }
        self
    }

    /// Declare filtered values safe to use in CSS.
    #[must_use]
    pub fn safe_in_css(mut self) -> Self {
        self.safe_in_css = true;
        self
    }

    /// Declare filtered values safe to use as URLs.
    #[must_use]
    pub fn safe_as_url(mut self) -> Self {
        self.safe_as_url = true;
        self
    }

    /// Filter kind.
    #[must_use]
    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    /// Whether filtered values may be used in CSS.
    #[must_use]
    pub fn is_safe_in_css(&self) -> bool {
        self.safe_in_css
    }

    /// Whether filtered values may be used as URLs.
    #[must_use]
    pub fn is_safe_as_url(&self) -> bool {
        self.safe_as_url
    }

    /// Check `value` against a regexp filter.
    ///
    /// Returns `None` for callback filters, which only the host can run.
    #[must_use]
    pub fn accepts(&self, value: &str) -> Option<bool> {
        match &self.kind {
            FilterKind::Regexp { pattern } => Some(pattern.is_match(value)),
            FilterKind::Callback { .. } => None,
        }
    }
}

/// Registered filters, keyed by `#name`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AttributeFilterCollection {
    filters: BTreeMap<String, AttributeFilter>,
}

impl AttributeFilterCollection {
    /// Register `filter` under `name`, replacing any previous one.
    pub fn add(&mut self, name: impl Into<String>, filter: AttributeFilter) -> &mut Self {
        self.filters.insert(name.into(), filter);
        self
    }

    /// Registered filter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeFilter> {
        self.filters.get(name)
    }

    /// Remove a registered filter.
    pub fn remove(&mut self, name: &str) -> Option<AttributeFilter> {
        self.filters.remove(name)
    }

    /// Whether `name` resolves to a built-in or registered filter.
    #[must_use]
    pub fn is_available(&self, name: &str) -> bool {
        BUILTIN_FILTERS.contains(&name) || self.filters.contains_key(name)
    }

    /// Registered filter names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }
}

mod regex_str {
    use regex::Regex;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(pattern: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(pattern.as_str())
    }
}
