//! Recomposition of style fragments into directive templates.
//!
//! Most directives are split into `{name}_open` and `{name}_close` fragments
//! that wrap the content. A handful follow irregular layouts and are
//! assembled by the strategy named in their catalog entry. A fragment named
//! exactly after a directive always takes precedence.

use std::collections::BTreeMap;

use crate::Fragments;
use crate::catalog::{self, APPLY_TEMPLATES, Composition, DirectiveDefinition};
use crate::replacements::Replacements;

/// Directive name mapped to its template for one style.
pub type DirectiveTemplates = BTreeMap<&'static str, String>;

/// Recompose the catalog directives defined by `fragments`.
///
/// Directives whose fragments are missing are left out; callers fall back to
/// the catalog default. Fragments not belonging to a catalog directive are
/// ignored. Token aliases are applied to every returned template.
#[must_use]
pub fn recompose(fragments: &Fragments) -> DirectiveTemplates {
    let mut templates = DirectiveTemplates::new();
    for def in catalog::CATALOG {
        let template = fragments
            .get(def.name)
            .cloned()
            .or_else(|| compose(def, fragments))
            .or_else(|| paired(fragments, def.name));
        if let Some(template) = template {
            let aliases = Replacements::from_pairs(def.token_aliases);
            templates.insert(def.name, aliases.apply(&template));
        }
    }
    templates
}

/// Run the irregular strategy of `def`, if it has one.
fn compose(def: &DirectiveDefinition, fragments: &Fragments) -> Option<String> {
    match def.composition {
        Composition::Paired => None,
        Composition::List => list(fragments),
        Composition::ListItem => wrap(fragments, "listitem", "listitem_close"),
        Composition::Quote => quote(fragments),
        Composition::Attachment => attachment(fragments),
    }
}

/// `{name}_open` + content + `{name}_close`.
fn paired(fragments: &Fragments, name: &str) -> Option<String> {
    wrap(fragments, &format!("{name}_open"), &format!("{name}_close"))
}

fn wrap(fragments: &Fragments, open: &str, close: &str) -> Option<String> {
    let open = fragments.get(open)?;
    let close = fragments.get(close)?;
    Some(format!("{open}{APPLY_TEMPLATES}{close}"))
}

/// Unordered by default, ordered for `upper*`, `lower*` and `decim*` types,
/// unordered with an explicit marker otherwise.
fn list(fragments: &Fragments) -> Option<String> {
    let unordered_default = wrap(fragments, "ulist_open_default", "ulist_close")?;
    let ordered = wrap(fragments, "olist_open", "olist_close")?;
    let unordered = wrap(fragments, "ulist_open", "ulist_close")?;
    Some(format!(
        "<xsl:choose>\
         <xsl:when test=\"not(@type)\">{unordered_default}</xsl:when>\
         <xsl:when test=\"contains('upperlowerdecim',substring(@type,1,5))\">{ordered}</xsl:when>\
         <xsl:otherwise>{unordered}</xsl:otherwise>\
         </xsl:choose>"
    ))
}

/// Quote with an author uses the username header, linked to the author's
/// URL when one is present; without an author the plain header is used.
fn quote(fragments: &Fragments) -> Option<String> {
    let open = fragments.get("quote_open")?;
    let close = fragments.get("quote_close")?;
    let username_open = fragments.get("quote_username_open")?;

    let username_open = match fragments.get("url") {
        Some(url) => {
            let linked = url.replace("{DESCRIPTION}", "{USERNAME}");
            username_open.replace(
                "{USERNAME}",
                &format!(
                    "<xsl:choose>\
                     <xsl:when test=\"@url\">{linked}</xsl:when>\
                     <xsl:otherwise>{{USERNAME}}</xsl:otherwise>\
                     </xsl:choose>"
                ),
            )
        }
        None => username_open.clone(),
    };

    Some(format!(
        "<xsl:choose>\
         <xsl:when test=\"@author\">{username_open}{APPLY_TEMPLATES}{close}</xsl:when>\
         <xsl:otherwise>{open}{APPLY_TEMPLATES}{close}</xsl:otherwise>\
         </xsl:choose>"
    ))
}

/// The attachment body sits between two identical comment sentinels that a
/// later pass replaces with the attachment markup.
fn attachment(fragments: &Fragments) -> Option<String> {
    let open = fragments.get("inline_attachment_open")?;
    let close = fragments.get("inline_attachment_close")?;
    let sentinel = "<xsl:comment> ia<xsl:value-of select=\"@index\"/> </xsl:comment>";
    Some(format!(
        "{open}{sentinel}<xsl:value-of select=\"@filename\"/>{sentinel}{close}"
    ))
}
