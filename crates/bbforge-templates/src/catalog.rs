//! Built-in BBCode catalog.
//!
//! Every directive the factory knows about, with the BBCode usage that
//! describes its syntax, the template used when a style does not provide an
//! activated one, the style-specific tokens that must be renamed, and how its
//! template is recomposed from style fragments.

/// Placeholder telling the template engine to render the directive content.
pub const APPLY_TEMPLATES: &str = "<xsl:apply-templates/>";

/// How a directive's template is assembled from style fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    /// `{name}_open` + content + `{name}_close`.
    Paired,
    /// Three-way switch on the list `type` attribute.
    List,
    /// `listitem` + content + `listitem_close`.
    ListItem,
    /// Quote with optional author, itself optionally linked.
    Quote,
    /// Inline attachment wrapped in comment sentinels.
    Attachment,
}

/// Which bit of a style's bitfield activates a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Active when this bit id is set.
    Bit(usize),
    /// Active whenever the named directive is.
    Follows(&'static str),
}

/// One entry of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveDefinition {
    /// Directive name, as used in style fragment names.
    pub name: &'static str,
    /// BBCode usage handed to the configurator.
    pub usage: &'static str,
    /// Template used when a style has no activated override.
    pub default_template: &'static str,
    /// Style tokens renamed to the tokens declared in `usage`.
    pub token_aliases: &'static [(&'static str, &'static str)],
    /// Bitfield activation rule.
    pub activation: Activation,
    /// Recomposition strategy.
    pub composition: Composition,
}

/// Look up a catalog entry by name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static DirectiveDefinition> {
    CATALOG.iter().find(|def| def.name == name)
}

/// All built-in directives, in registration order.
pub static CATALOG: &[DirectiveDefinition] = &[
    DirectiveDefinition {
        name: "attachment",
        usage: "[ATTACHMENT index={NUMBER} filename={TEXT;useContent}]",
        default_template: concat!(
            "<xsl:comment> ia<xsl:value-of select=\"@index\"/> </xsl:comment>",
            "<xsl:value-of select=\"@filename\"/>",
            "<xsl:comment> ia<xsl:value-of select=\"@index\"/> </xsl:comment>",
        ),
        token_aliases: &[],
        activation: Activation::Bit(12),
        composition: Composition::Attachment,
    },
    DirectiveDefinition {
        name: "b",
        usage: "[B]{TEXT}[/B]",
        default_template: "<span style=\"font-weight: bold\"><xsl:apply-templates/></span>",
        token_aliases: &[],
        activation: Activation::Bit(1),
        composition: Composition::Paired,
    },
    DirectiveDefinition {
        name: "code",
        usage: "[CODE]{TEXT}[/CODE]",
        default_template: concat!(
            "<div class=\"codebox\"><p>Code:</p>",
            "<pre><code><xsl:apply-templates/></code></pre></div>",
        ),
        token_aliases: &[],
        activation: Activation::Bit(8),
        composition: Composition::Paired,
    },
    DirectiveDefinition {
        name: "color",
        usage: "[COLOR={COLOR}]{TEXT}[/COLOR]",
        default_template: "<span style=\"color: {COLOR}\"><xsl:apply-templates/></span>",
        token_aliases: &[],
        activation: Activation::Bit(6),
        composition: Composition::Paired,
    },
    DirectiveDefinition {
        name: "email",
        usage: concat!(
            "[EMAIL={EMAIL;useContent} ",
            "subject={TEXT;optional;postFilter=rawurlencode} ",
            "body={TEXT;optional;postFilter=rawurlencode}]{TEXT}[/EMAIL]",
        ),
        default_template: concat!(
            "<a><xsl:attribute name=\"href\"><xsl:text>mailto:</xsl:text>",
            "<xsl:value-of select=\"@email\"/>",
            "<xsl:if test=\"@subject or @body\"><xsl:text>?</xsl:text>",
            "<xsl:if test=\"@subject\">subject=<xsl:value-of select=\"@subject\"/></xsl:if>",
            "<xsl:if test=\"@body\"><xsl:if test=\"@subject\">&amp;</xsl:if>",
            "body=<xsl:value-of select=\"@body\"/></xsl:if>",
            "</xsl:if></xsl:attribute><xsl:apply-templates/></a>",
        ),
        token_aliases: &[("{DESCRIPTION}", "{TEXT}")],
        activation: Activation::Bit(10),
        composition: Composition::Paired,
    },
    DirectiveDefinition {
        name: "flash",
        usage: concat!(
            "[FLASH={NUMBER1},{NUMBER2} ",
            "width={NUMBER1;postFilter=#flashwidth} ",
            "height={NUMBER2;postFilter=#flashheight} ",
            "url={URL;useContent} /]",
        ),
        default_template: concat!(
            "<object classid=\"clsid:D27CDB6E-AE6D-11CF-96B8-444553540000\" ",
            "width=\"{NUMBER1}\" height=\"{NUMBER2}\">",
            "<param name=\"movie\" value=\"{URL}\"/>",
            "<param name=\"play\" value=\"false\"/>",
            "<embed src=\"{URL}\" type=\"application/x-shockwave-flash\" ",
            "width=\"{NUMBER1}\" height=\"{NUMBER2}\" play=\"false\"/></object>",
        ),
        token_aliases: &[("{WIDTH}", "{NUMBER1}"), ("{HEIGHT}", "{NUMBER2}")],
        activation: Activation::Bit(11),
        composition: Composition::Paired,
    },
    DirectiveDefinition {
        name: "i",
        usage: "[I]{TEXT}[/I]",
        default_template: "<span style=\"font-style: italic\"><xsl:apply-templates/></span>",
        token_aliases: &[],
        activation: Activation::Bit(2),
        composition: Composition::Paired,
    },
    DirectiveDefinition {
        name: "img",
        usage: "[IMG src={IMAGEURL;useContent}]",
        default_template: "<img src=\"{IMAGEURL}\" alt=\"{L_IMAGE}\"/>",
        token_aliases: &[("{URL}", "{IMAGEURL}")],
        activation: Activation::Bit(4),
        composition: Composition::Paired,
    },
    DirectiveDefinition {
        name: "list",
        usage: concat!(
            "[LIST type={HASHMAP=1:decimal,a:lower-alpha,A:upper-alpha,",
            "i:lower-roman,I:upper-roman;optional;postFilter=#simpletext}]{TEXT}[/LIST]",
        ),
        default_template: concat!(
            "<xsl:choose>",
            "<xsl:when test=\"not(@type)\"><ul><xsl:apply-templates/></ul></xsl:when>",
            "<xsl:when test=\"contains('upperlowerdecim',substring(@type,1,5))\">",
            "<ol style=\"list-style-type: {HASHMAP}\"><xsl:apply-templates/></ol></xsl:when>",
            "<xsl:otherwise><ul style=\"list-style-type: {HASHMAP}\">",
            "<xsl:apply-templates/></ul></xsl:otherwise>",
            "</xsl:choose>",
        ),
        token_aliases: &[("{LIST_TYPE}", "{HASHMAP}")],
        activation: Activation::Bit(9),
        composition: Composition::List,
    },
    DirectiveDefinition {
        name: "li",
        usage: "[* $tagName=LI]{TEXT}[/*]",
        default_template: "<li><xsl:apply-templates/></li>",
        token_aliases: &[],
        activation: Activation::Follows("list"),
        composition: Composition::ListItem,
    },
    DirectiveDefinition {
        name: "quote",
        usage: concat!(
            "[QUOTE\n",
            "\tauthor={TEXT1;optional}\n",
            "\turl={URL;optional}\n",
            "\tauthor={PARSE=/^\\[url=(?'url'.*?)](?'author'.*)\\[\\/url]$/i}\n",
            "\tauthor={PARSE=/^\\[url](?'author'(?'url'.*?))\\[\\/url]$/i}\n",
            "\tauthor={PARSE=/(?'url'https?:\\/\\/[^[\\]]+)/i}\n",
            "]{TEXT2}[/QUOTE]",
        ),
        default_template: concat!(
            "<blockquote><xsl:if test=\"@author\"><cite>",
            "<xsl:value-of select=\"@author\"/> wrote:</cite></xsl:if>",
            "<div><xsl:apply-templates/></div></blockquote>",
        ),
        token_aliases: &[("{USERNAME}", "{TEXT1}")],
        activation: Activation::Bit(0),
        composition: Composition::Quote,
    },
    DirectiveDefinition {
        name: "size",
        usage: "[SIZE={FONTSIZE}]{TEXT}[/SIZE]",
        default_template: concat!(
            "<span style=\"font-size: {FONTSIZE}%; line-height: normal\">",
            "<xsl:apply-templates/></span>",
        ),
        token_aliases: &[("{SIZE}", "{FONTSIZE}")],
        activation: Activation::Bit(5),
        composition: Composition::Paired,
    },
    DirectiveDefinition {
        name: "u",
        usage: "[U]{TEXT}[/U]",
        default_template: "<span style=\"text-decoration: underline\"><xsl:apply-templates/></span>",
        token_aliases: &[],
        activation: Activation::Bit(7),
        composition: Composition::Paired,
    },
    DirectiveDefinition {
        name: "url",
        usage: "[URL={URL;useContent}]{TEXT}[/URL]",
        default_template: "<a href=\"{URL}\" class=\"postlink\"><xsl:apply-templates/></a>",
        token_aliases: &[("{DESCRIPTION}", "{TEXT}")],
        activation: Activation::Bit(3),
        composition: Composition::Paired,
    },
];
