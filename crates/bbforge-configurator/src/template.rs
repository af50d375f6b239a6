//! BBCode templates and their validation.

use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use crate::error::DefinitionError;
use crate::usage::BBCodeUsage;

const XSL_NAMESPACE: &str = "http://www.w3.org/1999/XSL/Transform";

static TEMPLATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Z][A-Z_]*[0-9]*)\}").unwrap());

/// Localized string tokens, resolved at render time.
const LANGUAGE_PREFIX: &str = "L_";

/// A BBCode template.
///
/// Checked templates are also scanned for markup that would let user input
/// run as script. Templates written by board administrators are usually
/// registered unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    checked: bool,
}

impl Template {
    /// A template subject to safety checks.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            checked: true,
        }
    }

    /// A template registered without safety checks.
    #[must_use]
    pub fn unchecked(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            checked: false,
        }
    }

    /// Template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Validate the template against the usage it is registered with.
    pub(crate) fn validate(&self, usage: &BBCodeUsage) -> Result<(), DefinitionError> {
        if let Some(token) = template_tokens(&self.source)
            .find(|token| !token.starts_with(LANGUAGE_PREFIX) && !usage.defines(token))
        {
            return Err(DefinitionError::UndefinedToken {
                name: usage.name.clone(),
                token: token.to_owned(),
            });
        }

        check_markup(&self.source, self.checked).map_err(|e| match e {
            MarkupError::Malformed(reason) => DefinitionError::MalformedTemplate {
                name: usage.name.clone(),
                reason,
            },
            MarkupError::Unsafe(reason) => DefinitionError::UnsafeTemplate {
                name: usage.name.clone(),
                reason,
            },
        })
    }
}

/// Ids of the `{TOKEN}` placeholders used by a template.
pub fn template_tokens(template: &str) -> impl Iterator<Item = &str> {
    TEMPLATE_TOKEN
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MarkupError {
    Malformed(String),
    Unsafe(String),
}

impl MarkupError {
    pub(crate) fn into_reason(self) -> String {
        match self {
            Self::Malformed(reason) | Self::Unsafe(reason) => reason,
        }
    }
}

/// Check that `template` is well-formed, and safe when `checked`.
///
/// Templates are fragments: they may hold several top-level elements and
/// bare text, and use the `xsl:` prefix without declaring it.
pub(crate) fn check_markup(template: &str, checked: bool) -> Result<(), MarkupError> {
    let wrapped = format!("<template xmlns:xsl=\"{XSL_NAMESPACE}\">{template}</template>");
    let mut reader = Reader::from_str(&wrapped);
    reader.config_mut().check_end_names = true;

    let mut depth = 0_usize;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                check_attributes(&e, checked)?;
            }
            Ok(Event::Empty(e)) => check_attributes(&e, checked)?,
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| MarkupError::Malformed("unexpected closing tag".to_owned()))?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(MarkupError::Malformed(e.to_string())),
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(MarkupError::Malformed("unclosed element".to_owned()))
    }
}

fn check_attributes(element: &BytesStart<'_>, checked: bool) -> Result<(), MarkupError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| MarkupError::Malformed(e.to_string()))?;
        if !checked {
            continue;
        }

        let name = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = String::from_utf8_lossy(&attr.value);
        if name == "disable-output-escaping" {
            return Err(MarkupError::Unsafe("output escaping disabled".to_owned()));
        }
        if name.starts_with("on") && value.contains('{') {
            return Err(MarkupError::Unsafe(format!(
                "dynamic content in {name} event handler"
            )));
        }
    }
    Ok(())
}
