//! Template normalization.
//!
//! Templates coming from different styles are normalized before they are
//! compared, so that formatting differences alone never produce a
//! style switch.

use std::sync::LazyLock;

use regex::Regex;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").unwrap());

/// Whitespace run between two tags that contains at least one line break.
static INTER_ELEMENT_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">[ \t\r]*\n[ \t\r\n]*<").unwrap());

/// A single normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationPass {
    /// Drop `<!-- ... -->` comments.
    RemoveComments,
    /// Turn `<!-- ... -->` into `<xsl:comment>...</xsl:comment>`.
    TransposeComments,
    /// Drop line-broken whitespace between elements, outside `xsl:text`.
    RemoveInterElementWhitespace,
}

impl NormalizationPass {
    fn apply(self, template: &str) -> String {
        match self {
            Self::RemoveComments => COMMENT.replace_all(template, "").into_owned(),
            Self::TransposeComments => COMMENT
                .replace_all(template, "<xsl:comment>$1</xsl:comment>")
                .into_owned(),
            Self::RemoveInterElementWhitespace => remove_inter_element_whitespace(template),
        }
    }
}

/// Ordered list of normalization passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNormalizer {
    passes: Vec<NormalizationPass>,
}

impl Default for TemplateNormalizer {
    fn default() -> Self {
        Self {
            passes: vec![
                NormalizationPass::RemoveComments,
                NormalizationPass::RemoveInterElementWhitespace,
            ],
        }
    }
}

impl TemplateNormalizer {
    /// Normalizer without any pass.
    #[must_use]
    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    /// Append a pass unless it is already present.
    pub fn add(&mut self, pass: NormalizationPass) -> &mut Self {
        if !self.passes.contains(&pass) {
            self.passes.push(pass);
        }
        self
    }

    /// Remove a pass.
    pub fn remove(&mut self, pass: NormalizationPass) -> &mut Self {
        self.passes.retain(|p| *p != pass);
        self
    }

    /// Passes in application order.
    #[must_use]
    pub fn passes(&self) -> &[NormalizationPass] {
        &self.passes
    }

    /// Trim `template` and run every pass in order.
    #[must_use]
    pub fn normalize(&self, template: &str) -> String {
        self.passes
            .iter()
            .fold(template.trim().to_owned(), |acc, pass| pass.apply(&acc))
    }
}

fn remove_inter_element_whitespace(template: &str) -> String {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;
    for m in INTER_ELEMENT_WHITESPACE.find_iter(template) {
        let before = &template[..=m.start()];
        output.push_str(&template[last..=m.start()]);
        if before.ends_with("<xsl:text>") {
            output.push_str(&template[m.start() + 1..m.end()]);
        } else {
            output.push('<');
        }
        last = m.end();
    }
    output.push_str(&template[last..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_removes_comments_and_whitespace() {
        let normalizer = TemplateNormalizer::default();
        assert_eq!(
            normalizer.normalize("\n  <ul>\n    <!-- items -->\n    <li/>\n  </ul>\n"),
            "<ul><li/></ul>"
        );
    }

    #[test]
    fn test_same_line_whitespace_is_kept() {
        let normalizer = TemplateNormalizer::default();
        assert_eq!(normalizer.normalize("<b>x</b> <i>y</i>"), "<b>x</b> <i>y</i>");
    }

    #[test]
    fn test_xsl_text_whitespace_is_kept() {
        let normalizer = TemplateNormalizer::default();
        assert_eq!(
            normalizer.normalize("<xsl:text>\n</xsl:text>\n<br/>"),
            "<xsl:text>\n</xsl:text><br/>"
        );
    }

    #[test]
    fn test_transpose_comments() {
        let mut normalizer = TemplateNormalizer::default();
        normalizer
            .remove(NormalizationPass::RemoveComments)
            .add(NormalizationPass::TransposeComments);

        assert_eq!(
            normalizer.normalize("<div><!-- ia1 --></div>"),
            "<div><xsl:comment> ia1 </xsl:comment></div>"
        );
        assert_eq!(
            normalizer.passes(),
            &[
                NormalizationPass::RemoveInterElementWhitespace,
                NormalizationPass::TransposeComments
            ]
        );
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut normalizer = TemplateNormalizer::empty();
        normalizer
            .add(NormalizationPass::RemoveComments)
            .add(NormalizationPass::RemoveComments);
        assert_eq!(normalizer.passes().len(), 1);
    }

    #[test]
    fn test_empty_normalizer_only_trims() {
        assert_eq!(TemplateNormalizer::empty().normalize("  <a>\n<b>  "), "<a>\n<b>");
    }
}
