//! Template fragment extraction.
//!
//! A style document wraps each fragment between a begin marker carrying the
//! fragment name and an end marker whose name is not checked:
//!
//! ```text
//! <!-- BEGIN b_open --><span style="font-weight: bold"><!-- END b_open -->
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Fragment name mapped to its normalized body.
pub type Fragments = BTreeMap<String, String>;

/// Line break followed by tab indentation between two tags.
static INTER_TAG_INDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\n\t*<").unwrap());

/// Begin/end marker syntax of a style document.
///
/// The begin marker is `{begin}{name}{suffix}`, the end marker is
/// `{end}{anything}{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSyntax {
    /// Text preceding the fragment name on the begin marker.
    pub begin: String,
    /// Text preceding the (ignored) name on the end marker.
    pub end: String,
    /// Text closing both markers.
    pub suffix: String,
}

impl Default for MarkerSyntax {
    fn default() -> Self {
        Self {
            begin: "<!-- BEGIN ".to_owned(),
            end: "<!-- END ".to_owned(),
            suffix: " -->".to_owned(),
        }
    }
}

/// Extracts named fragments from style documents.
#[derive(Debug, Clone)]
pub struct FragmentExtractor {
    pattern: Regex,
}

impl Default for FragmentExtractor {
    fn default() -> Self {
        Self::new(&MarkerSyntax::default())
    }
}

impl FragmentExtractor {
    /// Build an extractor for the given marker syntax.
    ///
    /// # Panics
    ///
    /// Never in practice: every marker part is regex-escaped.
    #[must_use]
    pub fn new(syntax: &MarkerSyntax) -> Self {
        let pattern = format!(
            "(?s){begin}(.*?){suffix}(.*?){end}.*?{suffix}",
            begin = regex::escape(&syntax.begin),
            end = regex::escape(&syntax.end),
            suffix = regex::escape(&syntax.suffix),
        );
        Self {
            pattern: Regex::new(&pattern).unwrap(),
        }
    }

    /// Extract every fragment of `document`, in document order.
    ///
    /// When two fragments share a name the later one wins. A document without
    /// markers yields an empty map.
    #[must_use]
    pub fn extract(&self, document: &str) -> Fragments {
        let mut fragments = Fragments::new();
        for caps in self.pattern.captures_iter(document) {
            let name = &caps[1];
            let body = normalize_fragment(&caps[2]);
            if fragments.insert(name.to_owned(), body).is_some() {
                tracing::debug!(fragment = %name, "Duplicate fragment, keeping the last one");
            }
        }
        fragments
    }
}

/// Trim a fragment body and drop the indentation between adjacent tags.
///
/// Only a single line break followed by tabs, sitting exactly between `>`
/// and `<`, is removed.
#[must_use]
pub fn normalize_fragment(body: &str) -> String {
    INTER_TAG_INDENT.replace_all(body.trim(), "><").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(document: &str) -> Fragments {
        FragmentExtractor::default().extract(document)
    }

    #[test]
    fn test_extracts_named_fragments() {
        let doc = "<!-- BEGIN b_open --><b><!-- END b_open -->\n\
                   <!-- BEGIN b_close --></b><!-- END b_close -->";

        let fragments = extract(doc);

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments["b_open"], "<b>");
        assert_eq!(fragments["b_close"], "</b>");
    }

    #[test]
    fn test_end_marker_name_is_not_checked() {
        let fragments = extract("<!-- BEGIN img --><img src=\"{URL}\"/><!-- END whatever -->");
        assert_eq!(fragments["img"], "<img src=\"{URL}\"/>");
    }

    #[test]
    fn test_last_fragment_wins() {
        let doc = "<!-- BEGIN b_open --><b><!-- END b_open -->\
                   <!-- BEGIN b_open --><strong><!-- END b_open -->";

        let fragments = extract(doc);

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments["b_open"], "<strong>");
    }

    #[test]
    fn test_no_markers_yields_empty_map() {
        assert!(extract("<div>no markers here</div>").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_unterminated_fragment_is_ignored() {
        let fragments = extract("<!-- BEGIN b_open --><b>");
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_multiline_fragment_is_normalized() {
        let doc = "<!-- BEGIN quote_open -->\n\
                   \t<blockquote>\n\
                   \t\t<div>\n\
                   <!-- END quote_open -->";

        assert_eq!(extract(doc)["quote_open"], "<blockquote><div>");
    }

    #[test]
    fn test_normalize_keeps_text_whitespace() {
        assert_eq!(normalize_fragment("  <b> bold </b>  "), "<b> bold </b>");
        assert_eq!(normalize_fragment("<a>\n  <b>"), "<a>\n  <b>");
        assert_eq!(normalize_fragment("a\n\t<b>"), "a\n\t<b>");
        assert_eq!(normalize_fragment("<a>\n\t\t<b>\n<c>"), "<a><b><c>");
    }

    #[test]
    fn test_custom_marker_syntax() {
        let syntax = MarkerSyntax {
            begin: "{% block ".to_owned(),
            end: "{% endblock ".to_owned(),
            suffix: " %}".to_owned(),
        };
        let extractor = FragmentExtractor::new(&syntax);

        let fragments = extractor.extract("{% block u_open %}<u>{% endblock u_open %}");

        assert_eq!(fragments["u_open"], "<u>");
    }
}
