//! Resolution of the catalog directives across every style.

use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::bitfield::DirectiveBitfield;
use crate::catalog::{self, DirectiveDefinition};
use crate::fragment::FragmentExtractor;
use crate::merge::{StyleId, merge_templates};
use crate::normalize::TemplateNormalizer;
use crate::recompose::recompose;

/// One style's template document and activated directives.
#[derive(Debug, Clone, Copy)]
pub struct StyleSource<'a> {
    /// Style identifier, tested against `$STYLE_ID` at render time.
    pub style_id: StyleId,
    /// Raw template document.
    pub document: &'a str,
    /// Directives whose templates this style overrides.
    pub bitfield: &'a DirectiveBitfield,
}

/// A catalog directive with its merged template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirective {
    /// Catalog entry.
    pub definition: &'static DirectiveDefinition,
    /// Template merged across all styles.
    pub template: String,
}

impl ResolvedDirective {
    /// BBCode usage of the directive.
    #[must_use]
    pub fn usage(&self) -> &'static str {
        self.definition.usage
    }
}

/// Style override turned down by the check given to
/// [`DirectiveResolver::resolve_checked`].
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedOverride<E> {
    /// Style that carried the override.
    pub style_id: StyleId,
    /// Overridden directive.
    pub definition: &'static DirectiveDefinition,
    /// Why the override was rejected.
    pub error: E,
}

/// Resolves every catalog directive against a set of styles.
#[derive(Debug, Clone, Default)]
pub struct DirectiveResolver {
    extractor: FragmentExtractor,
}

impl DirectiveResolver {
    /// Resolver using a custom fragment extractor.
    #[must_use]
    pub fn new(extractor: FragmentExtractor) -> Self {
        Self { extractor }
    }

    /// Build the merged template of every catalog directive.
    ///
    /// For each style, a directive uses the style's recomposed template only
    /// when the style's bitfield activates it; otherwise the catalog default
    /// stands in. Templates are normalized before merging. Styles are
    /// merged in iteration order, which decides ties between variants.
    /// When several styles share an id, the last one replaces the others.
    #[must_use]
    pub fn resolve<'a>(
        &self,
        styles: impl IntoIterator<Item = StyleSource<'a>>,
        normalizer: &TemplateNormalizer,
    ) -> Vec<ResolvedDirective> {
        let (resolved, _) =
            self.resolve_checked(styles, normalizer, |_, _| Ok::<(), Infallible>(()));
        resolved
    }

    /// Same as [`DirectiveResolver::resolve`], passing every activated
    /// override through `check` first.
    ///
    /// `check` receives the normalized override. A rejected override is
    /// replaced by the catalog default for that style only, and returned
    /// alongside the resolved directives.
    #[must_use]
    pub fn resolve_checked<'a, E>(
        &self,
        styles: impl IntoIterator<Item = StyleSource<'a>>,
        normalizer: &TemplateNormalizer,
        mut check: impl FnMut(&'static DirectiveDefinition, &str) -> Result<(), E>,
    ) -> (Vec<ResolvedDirective>, Vec<RejectedOverride<E>>) {
        let mut per_directive: BTreeMap<&'static str, Vec<(StyleId, String)>> = BTreeMap::new();
        let mut rejected = Vec::new();

        for style in unique_styles(styles) {
            let mut overrides = recompose(&self.extractor.extract(style.document));
            let mut used = 0_usize;
            for def in catalog::CATALOG {
                let mut template = normalizer.normalize(def.default_template);
                if let Some(custom) = overrides.remove(def.name)
                    && style.bitfield.is_active(def.name)
                {
                    let custom = normalizer.normalize(&custom);
                    match check(def, &custom) {
                        Ok(()) => {
                            used += 1;
                            template = custom;
                        }
                        Err(error) => rejected.push(RejectedOverride {
                            style_id: style.style_id,
                            definition: def,
                            error,
                        }),
                    }
                }
                per_directive
                    .entry(def.name)
                    .or_default()
                    .push((style.style_id, template));
            }
            tracing::debug!(style_id = %style.style_id, overrides = used, "Resolved style templates");
        }

        let resolved = catalog::CATALOG
            .iter()
            .map(|def| {
                let template = per_directive
                    .get(def.name)
                    .and_then(|templates| merge_templates(templates))
                    .unwrap_or_else(|| normalizer.normalize(def.default_template));
                ResolvedDirective {
                    definition: def,
                    template,
                }
            })
            .collect();
        (resolved, rejected)
    }
}

/// Keep one source per style id: the last one, at the first one's position.
fn unique_styles<'a>(styles: impl IntoIterator<Item = StyleSource<'a>>) -> Vec<StyleSource<'a>> {
    let mut unique: Vec<StyleSource<'a>> = Vec::new();
    for style in styles {
        if let Some(slot) = unique.iter_mut().find(|s| s.style_id == style.style_id) {
            tracing::debug!(style_id = %style.style_id, "Duplicate style replaced");
            *slot = style;
        } else {
            unique.push(style);
        }
    }
    unique
}
