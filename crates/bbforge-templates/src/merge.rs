//! Merging of per-style templates into one template.
//!
//! When several styles define the same directive differently, the merged
//! template switches on `$STYLE_ID` at render time. The most common variant
//! becomes the `xsl:otherwise` branch; every other variant gets an
//! `xsl:when` listing the styles that use it.

use std::fmt;

/// Identifier of a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleId(pub u32);

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for StyleId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Template variant shared by one or more styles.
struct Variant<'a> {
    template: &'a str,
    styles: Vec<StyleId>,
}

/// Merge the templates of several styles into a single template.
///
/// Returns `None` for an empty input and the template itself when every
/// style agrees. Otherwise variants are ordered by descending number of
/// styles; variants used by as many styles keep the order in which they
/// were first seen.
#[must_use]
pub fn merge_templates<S: AsRef<str>>(style_templates: &[(StyleId, S)]) -> Option<String> {
    let (_, first) = style_templates.first()?;
    if style_templates
        .iter()
        .all(|(_, template)| template.as_ref() == first.as_ref())
    {
        return Some(first.as_ref().to_owned());
    }

    let mut variants: Vec<Variant<'_>> = Vec::new();
    for (style_id, template) in style_templates {
        let template = template.as_ref();
        match variants.iter_mut().find(|v| v.template == template) {
            Some(variant) => variant.styles.push(*style_id),
            None => variants.push(Variant {
                template,
                styles: vec![*style_id],
            }),
        }
    }

    // Stable: ties keep first-seen order
    variants.sort_by(|a, b| b.styles.len().cmp(&a.styles.len()));
    let default = variants.remove(0);

    let mut merged = String::from("<xsl:choose>");
    for variant in &variants {
        let test = variant
            .styles
            .iter()
            .map(|id| format!("$STYLE_ID={id}"))
            .collect::<Vec<_>>()
            .join(" or ");
        merged.push_str(&format!(
            "<xsl:when test=\"{test}\">{}</xsl:when>",
            variant.template
        ));
    }
    merged.push_str(&format!(
        "<xsl:otherwise>{}</xsl:otherwise></xsl:choose>",
        default.template
    ));
    Some(merged)
}
