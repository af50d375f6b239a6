//! BBCode usage parsing.
//!
//! A usage describes a BBCode's syntax with `{TOKEN}` placeholders, e.g.
//! `[URL={URL;useContent}]{TEXT}[/URL]`. Tokens may carry options after a
//! `;` and a parameter after a `=`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::DefinitionError;
use crate::filters::filter_for_token;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\*|[A-Za-z][A-Za-z0-9_]*)").unwrap());

static TAG_NAME_OVERRIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$tagName=([A-Za-z_][A-Za-z0-9_:]*)").unwrap());

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Z][A-Z_]*[0-9]*)([;=][^}]*)?\}").unwrap());

/// Token type whose parameter is an attribute-parsing regexp.
const PARSE_TOKEN: &str = "PARSE";

/// A `{TOKEN}` declared by a usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageToken {
    /// Token id, e.g. `NUMBER1`.
    pub id: String,
    /// Text after `=`, up to the first `;`.
    pub param: Option<String>,
    /// Options after `;`, e.g. `optional` or `postFilter=#simpletext`.
    pub options: Vec<String>,
}

impl UsageToken {
    fn parse(id: &str, rest: Option<&str>) -> Self {
        let mut param = None;
        let mut options = Vec::new();
        if let Some(rest) = rest {
            let mut parts = rest[1..].split(';');
            if rest.starts_with('=') {
                param = parts.next().map(str::to_owned);
            }
            options.extend(parts.filter(|p| !p.is_empty()).map(str::to_owned));
        }
        Self {
            id: id.to_owned(),
            param,
            options,
        }
    }

    /// Filters named by `preFilter`/`postFilter` options.
    pub fn option_filters(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter_map(|o| {
                o.strip_prefix("preFilter=")
                    .or_else(|| o.strip_prefix("postFilter="))
            })
            .flat_map(|list| list.split(','))
            .filter(|name| name.starts_with('#'))
    }
}

/// A parsed BBCode usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BBCodeUsage {
    /// BBCode name, uppercased (`*` for list items).
    pub name: String,
    /// Name of the tag the BBCode produces.
    pub tag_name: String,
    /// Declared tokens, in order of first declaration.
    pub tokens: Vec<UsageToken>,
    /// `{PARSE=...}` regexps, in declaration order.
    pub parse_rules: Vec<String>,
    /// Original usage text.
    pub source: String,
}

impl BBCodeUsage {
    /// Parse a usage string.
    pub fn parse(usage: &str) -> Result<Self, DefinitionError> {
        let source = usage.trim();
        let name = HEADER
            .captures(source)
            .map(|caps| caps[1].to_ascii_uppercase())
            .ok_or_else(|| DefinitionError::InvalidUsage {
                usage: usage.to_owned(),
                reason: "expected [NAME at the start",
            })?;

        let tag_name = TAG_NAME_OVERRIDE
            .captures(source)
            .map_or_else(|| name.clone(), |caps| caps[1].to_ascii_uppercase());
        if tag_name == "*" {
            return Err(DefinitionError::InvalidUsage {
                usage: usage.to_owned(),
                reason: "[* needs a $tagName",
            });
        }

        let mut tokens: Vec<UsageToken> = Vec::new();
        let mut parse_rules = Vec::new();
        for caps in TOKEN.captures_iter(source) {
            let id = &caps[1];
            let rest = caps.get(2).map(|m| m.as_str());
            if id == PARSE_TOKEN {
                if let Some(rule) = rest.and_then(|r| r.strip_prefix('=')) {
                    parse_rules.push(rule.to_owned());
                }
                continue;
            }
            let token = UsageToken::parse(id, rest);
            match tokens.iter_mut().find(|t| t.id == id) {
                // Later occurrences only contribute their options
                Some(existing) => {
                    for option in token.options {
                        if !existing.options.contains(&option) {
                            existing.options.push(option);
                        }
                    }
                }
                None => tokens.push(token),
            }
        }

        Ok(Self {
            name,
            tag_name,
            tokens,
            parse_rules,
            source: source.to_owned(),
        })
    }

    /// Whether the usage declares token `id`.
    #[must_use]
    pub fn defines(&self, id: &str) -> bool {
        self.tokens.iter().any(|t| t.id == id)
    }

    /// Every filter the usage depends on, without duplicates.
    #[must_use]
    pub fn required_filters(&self) -> Vec<String> {
        let mut filters: Vec<String> = Vec::new();
        for token in &self.tokens {
            let implied = filter_for_token(&token.id);
            let named = token.option_filters().map(str::to_owned);
            for filter in implied.into_iter().chain(named) {
                if !filters.contains(&filter) {
                    filters.push(filter);
                }
            }
        }
        filters
    }
}
