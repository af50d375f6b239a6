//! BBCode template extraction and multi-style merging.
//!
//! Every board style ships one template document in which each BBCode is
//! described by named fragments. This crate turns those documents into one
//! template per BBCode:
//!
//! - [`FragmentExtractor`]: splits a document into named fragments
//! - [`recompose`]: joins `_open`/`_close` pairs and the irregular layouts
//!   (list, quote, attachment) into directive templates
//! - [`DirectiveResolver`]: falls back to the [`CATALOG`] default whenever a
//!   style does not activate its own template, normalizes, then merges
//! - [`merge_templates`]: folds per-style variants into a single
//!   `$STYLE_ID` switch
//!
//! # Example
//!
//! ```
//! use bbforge_templates::{
//!     DirectiveBitfield, DirectiveResolver, StyleId, StyleSource, TemplateNormalizer,
//! };
//!
//! let document = "<!-- BEGIN b_open --><strong><!-- END b_open -->\
//!                 <!-- BEGIN b_close --></strong><!-- END b_close -->";
//! let bitfield = DirectiveBitfield::from_names(["b"]);
//!
//! let resolved = DirectiveResolver::default().resolve(
//!     [StyleSource { style_id: StyleId(1), document, bitfield: &bitfield }],
//!     &TemplateNormalizer::default(),
//! );
//!
//! let bold = resolved.iter().find(|d| d.definition.name == "b").unwrap();
//! assert_eq!(bold.template, "<strong><xsl:apply-templates/></strong>");
//! assert_eq!(bold.usage(), "[B]{TEXT}[/B]");
//! ```

mod bitfield;
pub mod catalog;
mod fragment;
mod merge;
mod normalize;
mod recompose;
mod replacements;
mod resolve;

pub use bitfield::{BitfieldError, DirectiveBitfield};
pub use catalog::{APPLY_TEMPLATES, Activation, CATALOG, Composition, DirectiveDefinition};
pub use fragment::{FragmentExtractor, Fragments, MarkerSyntax, normalize_fragment};
pub use merge::{StyleId, merge_templates};
pub use normalize::{NormalizationPass, TemplateNormalizer};
pub use recompose::{DirectiveTemplates, recompose};
pub use replacements::Replacements;
pub use resolve::{DirectiveResolver, RejectedOverride, ResolvedDirective, StyleSource};
