//! Formatter assembly and the compiled artifact cache.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use bbforge_cache::{CacheStore, CacheStoreExt};
use bbforge_config::Config;
use bbforge_configurator::{
    AttributeFilter, Autoemail, Autolink, CensorHelper, CompiledArtifacts, Compiler, Configurator,
    Template, renderer_file_name,
};
use bbforge_templates::{DirectiveBitfield, DirectiveResolver, NormalizationPass, StyleSource};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data_access::{DataAccess, StyleTemplate};
use crate::dispatcher::{CONFIGURE_AFTER, CONFIGURE_BEFORE, Dispatcher};
use crate::error::{AssemblyReport, FactoryError};
use crate::tidy;

/// Tag name of the censor plugin.
pub const CENSOR_TAG: &str = "censor:tag";

const RULE_IGNORE_TEXT: &str = "IgnoreTextIfDisallowed";

/// Relative URL: path, optional query and optional fragment.
static RELATIVE_URL_FILTER: LazyLock<AttributeFilter> = LazyLock::new(|| {
    AttributeFilter::regexp(concat!(
        r"^(?:[a-z0-9\-._~!$&'()*+,;=:@|]+|%[\dA-F]{2})*",
        r"(?:/(?:[a-z0-9\-._~!$&'()*+,;=:@|]+|%[\dA-F]{2})*)*",
        r"(?:\?(?:[a-z0-9\-._~!$&'()*+,;=:@/?|]+|%[\dA-F]{2})*)?",
        r"(?:#(?:[a-z0-9\-._~!$&'()*+,;=:@/?|]+|%[\dA-F]{2})*)?$",
    ))
    .unwrap()
});

static INTTEXT_FILTER: LazyLock<AttributeFilter> =
    LazyLock::new(|| AttributeFilter::regexp(r"^[\p{L}\p{N}\-+,_. ]+$").unwrap());

static LOCAL_URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{LOCAL_URL\d*\}").unwrap());

/// Entities decoded from stored censored words.
static HTML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(amp|quot|lt|gt|#0?39);").unwrap());

/// Settings the factory is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryOptions {
    /// Directory generated renderers are written to.
    pub cache_dir: PathBuf,
    /// Cache key of the parser.
    pub parser_key: String,
    /// Cache key of the renderer record.
    pub renderer_key: String,
    /// Prefix of generated renderer class ids.
    pub class_prefix: String,
    /// Board URL without trailing slash.
    pub board_url: String,
    /// Smilies directory, relative to the board URL.
    pub smilies_path: String,
}

impl FactoryOptions {
    /// Options from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache_dir: config.cache_resolved.dir.clone(),
            parser_key: config.cache_resolved.parser_key.clone(),
            renderer_key: config.cache_resolved.renderer_key.clone(),
            class_prefix: config.renderer.class_prefix.clone(),
            board_url: config.board_url().to_owned(),
            smilies_path: config.board.smilies_path.clone(),
        }
    }

    fn smilies_url(&self) -> String {
        format!(
            "{}/{}",
            self.board_url,
            self.smilies_path.trim_matches('/')
        )
    }
}

/// Renderer metadata stored next to the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererRecord {
    /// Class id of the generated renderer.
    pub class: String,
    /// Class prefix the renderer was generated with. Records written
    /// without one fall back to the configured prefix.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class_prefix: String,
    /// Censor helper, when censored words were configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub censor: Option<CensorHelper>,
}

/// Assembled configurator with the problems met on the way.
#[derive(Debug)]
pub struct Assembly {
    /// Configurator ready for compilation.
    pub configurator: Configurator,
    /// Skipped definitions.
    pub report: AssemblyReport,
}

/// Builds the formatter configuration of a board and manages its compiled artifacts.
///
/// The cache holds two independent keys: the parser and a [`RendererRecord`].
/// Concurrent regenerations write them without coordination, so the last
/// writer wins and a reader may briefly see a parser and a renderer record
/// coming from two different runs.
pub struct Factory {
    data: Arc<dyn DataAccess>,
    cache: Arc<dyn CacheStore>,
    dispatcher: Arc<dyn Dispatcher>,
    compiler: Arc<dyn Compiler>,
    options: FactoryOptions,
    resolver: DirectiveResolver,
}

impl Factory {
    /// Create a factory.
    #[must_use]
    pub fn new(
        data: Arc<dyn DataAccess>,
        cache: Arc<dyn CacheStore>,
        dispatcher: Arc<dyn Dispatcher>,
        compiler: Arc<dyn Compiler>,
        options: FactoryOptions,
    ) -> Self {
        Self {
            data,
            cache,
            dispatcher,
            compiler,
            options,
            resolver: DirectiveResolver::default(),
        }
    }

    /// Factory settings.
    #[must_use]
    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    /// Assemble a new configurator from the board data.
    ///
    /// Default BBCodes come from the catalog, merged across every style.
    /// Custom BBCodes, smilies and censored words are layered on top. A
    /// BBCode that cannot be registered is skipped and listed in the report.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::DataAccess`] if board data cannot be read.
    pub fn get_configuration(&self) -> Result<Assembly, FactoryError> {
        let mut configurator = Configurator::new();
        let mut report = AssemblyReport::default();

        self.dispatcher.trigger(CONFIGURE_BEFORE, &mut configurator);

        self.configure_engine(&mut configurator);
        Self::add_filters(&mut configurator);
        self.add_default_bbcodes(&mut configurator, &mut report)?;
        for name in ["FLASH", "IMG"] {
            if let Some(tag) = configurator.tags.get_mut(name) {
                tag.template = format!(
                    "<xsl:choose><xsl:when test=\"$S_VIEW{name}\">{}</xsl:when>\
                     <xsl:otherwise><xsl:apply-templates/></xsl:otherwise></xsl:choose>",
                    tag.template
                );
            }
        }
        self.add_custom_bbcodes(&mut configurator, &mut report)?;
        self.add_smilies(&mut configurator)?;
        self.add_censored_words(&mut configurator)?;

        configurator.autoemail = Some(Autoemail::default());
        configurator.autolink = Some(Autolink {
            match_www: true,
            ..Autolink::default()
        });
        for var in ["max_font_size", "max_img_height", "max_img_width"] {
            configurator.registered_vars.insert(var.to_owned(), 0);
        }

        self.dispatcher.trigger(CONFIGURE_AFTER, &mut configurator);

        tracing::debug!(
            bbcodes = configurator.bbcodes().count(),
            skipped = report.skipped.len(),
            "Assembled formatter configuration"
        );
        Ok(Assembly {
            configurator,
            report,
        })
    }

    /// Assemble, compile and cache a new parser and renderer.
    ///
    /// The censor helper is detached before compiling and stored in the
    /// [`RendererRecord`].
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError`] if board data cannot be read or compilation
    /// fails. Nothing is cached in that case.
    pub fn regenerate(&self) -> Result<CompiledArtifacts, FactoryError> {
        let Assembly {
            mut configurator,
            report,
        } = self.get_configuration()?;
        let censor = configurator.detach_censor();
        let class_prefix = configurator.rendering.class_prefix.clone();

        let artifacts = self.compiler.compile(&configurator)?;

        self.cache.put_json(&self.options.parser_key, &artifacts.parser);
        self.cache.put_json(
            &self.options.renderer_key,
            &RendererRecord {
                class: artifacts.renderer.class.clone(),
                class_prefix,
                censor,
            },
        );
        tracing::info!(
            class = %artifacts.renderer.class,
            skipped = report.skipped.len(),
            "Regenerated formatter"
        );
        Ok(artifacts)
    }

    /// Drop the cached artifacts by regenerating them.
    ///
    /// # Errors
    ///
    /// Same as [`Factory::regenerate`].
    pub fn invalidate(&self) -> Result<CompiledArtifacts, FactoryError> {
        self.regenerate()
    }

    /// Remove generated renderers other than the current one.
    ///
    /// Renderers are matched on the prefix stored in the renderer record,
    /// so a prefix changed by a hook is honored. Does nothing when no
    /// renderer record is cached. Returns the removed files. Best effort: a concurrent regeneration may change the
    /// current renderer while the sweep runs.
    pub fn tidy(&self) -> Vec<PathBuf> {
        let Some(record) = self.renderer_record() else {
            tracing::debug!(key = %self.options.renderer_key, "No renderer record, nothing to tidy");
            return Vec::new();
        };
        let prefix = if record.class_prefix.is_empty() {
            &self.options.class_prefix
        } else {
            &record.class_prefix
        };
        tidy::sweep(
            &self.options.cache_dir,
            prefix,
            &renderer_file_name(&record.class),
        )
    }

    /// Cached renderer record, if any.
    #[must_use]
    pub fn renderer_record(&self) -> Option<RendererRecord> {
        self.cache.get_json(&self.options.renderer_key)
    }

    fn configure_engine(&self, configurator: &mut Configurator) {
        configurator.root_rules.auto_line_breaks = true;
        configurator.rules_generator.remove(RULE_IGNORE_TEXT);
        configurator
            .template_normalizer
            .remove(NormalizationPass::RemoveComments)
            .add(NormalizationPass::TransposeComments);

        let rendering = &mut configurator.rendering;
        rendering.cache_dir = Some(self.options.cache_dir.clone());
        rendering.class_prefix.clone_from(&self.options.class_prefix);
        rendering.quick_renderer = true;
        rendering
            .parameters
            .insert("T_SMILIES_PATH".to_owned(), self.options.smilies_url());
    }

    fn add_filters(configurator: &mut Configurator) {
        configurator
            .attribute_filters
            .add("#local_url", RELATIVE_URL_FILTER.clone())
            .add("#relative_url", RELATIVE_URL_FILTER.clone())
            .add("#inttext", INTTEXT_FILTER.clone())
            .add(
                "#flashheight",
                AttributeFilter::callback("filter_flash_height")
                    .with_param("max_img_height")
                    .with_param("logger"),
            )
            .add(
                "#flashwidth",
                AttributeFilter::callback("filter_flash_width")
                    .with_param("max_img_width")
                    .with_param("logger"),
            )
            .add(
                "#fontsize",
                AttributeFilter::callback("filter_font_size")
                    .with_param("max_font_size")
                    .with_param("logger")
                    .safe_in_css(),
            )
            .add(
                "#imageurl",
                AttributeFilter::callback("filter_img_url")
                    .with_param("urlConfig")
                    .with_param("logger")
                    .with_param("max_img_height")
                    .with_param("max_img_width")
                    .safe_as_url(),
            );
    }

    fn add_default_bbcodes(
        &self,
        configurator: &mut Configurator,
        report: &mut AssemblyReport,
    ) -> Result<(), FactoryError> {
        let styles = self.data.styles_templates()?;
        let bitfields: Vec<DirectiveBitfield> = styles.iter().map(decode_bitfield).collect();
        let sources = styles
            .iter()
            .zip(&bitfields)
            .map(|(style, bitfield)| StyleSource {
                style_id: style.style_id,
                document: &style.template,
                bitfield,
            });

        let (resolved, rejected) = self.resolver.resolve_checked(
            sources,
            &configurator.template_normalizer,
            |def, template| configurator.check_bbcode(def.usage, &Template::new(template)),
        );
        for rejection in rejected {
            report.reject_override(rejection.style_id, rejection.definition.usage, rejection.error);
        }
        for directive in resolved {
            let usage = directive.usage();
            if let Err(e) = configurator.add_bbcode(usage, Template::new(directive.template)) {
                report.skip(usage, e);
            }
        }
        Ok(())
    }

    fn add_custom_bbcodes(
        &self,
        configurator: &mut Configurator,
        report: &mut AssemblyReport,
    ) -> Result<(), FactoryError> {
        for row in self.data.custom_bbcodes()? {
            let template = LOCAL_URL_TOKEN.replace_all(&row.template, |caps: &regex::Captures| {
                format!("{}/{}", self.options.board_url, &caps[0])
            });
            if let Err(e) = configurator.add_bbcode(&row.usage, Template::unchecked(template)) {
                report.skip(&row.usage, e);
            }
        }
        Ok(())
    }

    fn add_smilies(&self, configurator: &mut Configurator) -> Result<(), FactoryError> {
        let smilies = self.data.smilies()?;
        if smilies.is_empty() {
            return Ok(());
        }

        let emoticons = configurator.emoticons_mut();
        for smiley in &smilies {
            emoticons.add(
                smiley.code.as_str(),
                format!(
                    "<img class=\"smilies\" src=\"{{$T_SMILIES_PATH}}/{}\" alt=\"{{.}}\" title=\"{}\"/>",
                    escape_html(&smiley.smiley_url),
                    escape_html(&smiley.emotion)
                ),
            );
        }
        emoticons.not_if_condition = Some("not($S_VIEWSMILIES)".to_owned());
        emoticons.not_after = Some(r"[^\n .\]]".to_owned());
        Ok(())
    }

    fn add_censored_words(&self, configurator: &mut Configurator) -> Result<(), FactoryError> {
        let words = self.data.censored_words()?;
        if words.is_empty() {
            return Ok(());
        }

        let censor = configurator.load_censor(CENSOR_TAG);
        for row in &words {
            censor.add(
                unescape_html(&row.word),
                Some(unescape_html(&row.replacement)),
            );
        }
        Ok(())
    }
}

fn decode_bitfield(style: &StyleTemplate) -> DirectiveBitfield {
    DirectiveBitfield::from_base64(&style.bbcode_bitfield).unwrap_or_else(|e| {
        tracing::warn!(style_id = %style.style_id, error = %e, "Ignoring invalid style bitfield");
        DirectiveBitfield::new()
    })
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_html(value: &str) -> String {
    HTML_ENTITY
        .replace_all(value, |caps: &regex::Captures| {
            match &caps[1] {
                "amp" => "&",
                "quot" => "\"",
                "lt" => "<",
                "gt" => ">",
                _ => "'",
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::NullDispatcher;
    use crate::mock::MockDataAccess;
    use bbforge_cache::MemoryCache;
    use bbforge_configurator::{DefinitionError, FilterKind, SnapshotCompiler};
    use bbforge_templates::StyleId;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn options(dir: &std::path::Path) -> FactoryOptions {
        FactoryOptions {
            cache_dir: dir.to_path_buf(),
            parser_key: "_parser".to_owned(),
            renderer_key: "_renderer".to_owned(),
            class_prefix: "r_".to_owned(),
            board_url: "https://forum.example.com".to_owned(),
            smilies_path: "images/smilies".to_owned(),
        }
    }

    fn factory(data: MockDataAccess, dir: &std::path::Path) -> Factory {
        Factory::new(
            Arc::new(data),
            Arc::new(MemoryCache::new()),
            Arc::new(NullDispatcher),
            Arc::new(SnapshotCompiler::new()),
            options(dir),
        )
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("&lt;b&gt; &amp;amp; &#39;x&#039; &quot;"), "<b> &amp; 'x' \"");
        assert_eq!(unescape_html("AT&T &copy;"), "AT&T &copy;");
    }

    #[test]
    fn test_relative_url_filter() {
        assert_eq!(RELATIVE_URL_FILTER.accepts("viewtopic.php?t=1#p2"), Some(true));
        assert_eq!(RELATIVE_URL_FILTER.accepts("path/to%2Fpage"), Some(true));
        assert_eq!(RELATIVE_URL_FILTER.accepts("has space"), Some(false));
        assert_eq!(RELATIVE_URL_FILTER.accepts("Upper"), Some(false));
    }

    #[test]
    fn test_inttext_filter() {
        assert_eq!(INTTEXT_FILTER.accepts("Hello, wörld 42"), Some(true));
        assert_eq!(INTTEXT_FILTER.accepts("<script>"), Some(false));
        assert_eq!(INTTEXT_FILTER.accepts(""), Some(false));
    }

    #[test]
    fn test_configuration_defaults() {
        let tmp = TempDir::new().unwrap();
        let Assembly {
            configurator,
            report,
        } = factory(MockDataAccess::new(), tmp.path())
            .get_configuration()
            .unwrap();

        assert!(report.is_empty(), "{report:?}");
        assert!(configurator.root_rules.auto_line_breaks);
        assert!(
            !configurator
                .rules_generator
                .names()
                .iter()
                .any(|n| n == RULE_IGNORE_TEXT)
        );
        assert_eq!(configurator.rendering.cache_dir.as_deref(), Some(tmp.path()));
        assert_eq!(configurator.rendering.class_prefix, "r_");
        assert!(configurator.rendering.quick_renderer);
        assert_eq!(
            configurator.rendering.parameters["T_SMILIES_PATH"],
            "https://forum.example.com/images/smilies"
        );
        assert_eq!(configurator.registered_vars["max_img_width"], 0);
        assert!(configurator.autolink.as_ref().unwrap().match_www);
        assert!(configurator.autoemail.is_some());
        assert!(configurator.emoticons.is_none());
        assert!(configurator.censor.is_none());

        let fontsize = configurator.attribute_filters.get("#fontsize").unwrap();
        assert!(fontsize.is_safe_in_css());
        match fontsize.kind() {
            FilterKind::Callback { callback, params } => {
                assert_eq!(callback, "filter_font_size");
                assert_eq!(params, &["max_font_size", "logger"]);
            }
            FilterKind::Regexp { .. } => panic!("expected a callback filter"),
        }
        assert!(
            configurator
                .attribute_filters
                .get("#imageurl")
                .unwrap()
                .is_safe_as_url()
        );
    }

    #[test]
    fn test_viewer_toggles_wrap_img_and_flash() {
        let tmp = TempDir::new().unwrap();
        let configurator = factory(MockDataAccess::new(), tmp.path())
            .get_configuration()
            .unwrap()
            .configurator;

        let img = &configurator.tags["IMG"].template;
        assert!(img.starts_with("<xsl:choose><xsl:when test=\"$S_VIEWIMG\"><img src=\"{IMAGEURL}\""));
        assert!(img.ends_with("<xsl:otherwise><xsl:apply-templates/></xsl:otherwise></xsl:choose>"));
        assert!(
            configurator.tags["FLASH"]
                .template
                .starts_with("<xsl:choose><xsl:when test=\"$S_VIEWFLASH\">")
        );
    }

    #[test]
    fn test_local_url_is_prefixed() {
        let tmp = TempDir::new().unwrap();
        let data = MockDataAccess::new().with_bbcode(
            "[goto={LOCAL_URL1}]{TEXT}[/goto]",
            "<a href=\"{LOCAL_URL1}\">{TEXT}</a>",
        );
        let configurator = factory(data, tmp.path())
            .get_configuration()
            .unwrap()
            .configurator;

        assert_eq!(
            configurator.tags["GOTO"].template,
            "<a href=\"https://forum.example.com/{LOCAL_URL1}\">{TEXT}</a>"
        );
    }

    #[test]
    fn test_malformed_custom_bbcode_is_reported() {
        let tmp = TempDir::new().unwrap();
        let data = MockDataAccess::new()
            .with_bbcode("[broken]{TEXT}[/broken]", "<div>{TEXT}")
            .with_bbcode("[fine]{TEXT}[/fine]", "<span>{TEXT}</span>")
            .with_bbcode("[b]{TEXT}[/b]", "<b>{TEXT}</b>");

        let Assembly {
            configurator,
            report,
        } = factory(data, tmp.path()).get_configuration().unwrap();

        assert!(configurator.bbcode("fine").is_some());
        assert!(configurator.bbcode("broken").is_none());
        let usages: Vec<_> = report.skipped.iter().map(|s| s.usage.as_str()).collect();
        assert_eq!(usages, ["[broken]{TEXT}[/broken]", "[b]{TEXT}[/b]"]);
        assert_eq!(
            report.skipped[1].reason,
            DefinitionError::Duplicate {
                name: "B".to_owned()
            }
        );
    }

    #[test]
    fn test_smilies_are_escaped() {
        let tmp = TempDir::new().unwrap();
        let data = MockDataAccess::new().with_smiley(":D", "big\"grin.gif", "Very <happy>");
        let configurator = factory(data, tmp.path())
            .get_configuration()
            .unwrap()
            .configurator;

        let emoticons = configurator.emoticons.unwrap();
        assert_eq!(
            emoticons.get(":D"),
            Some(
                "<img class=\"smilies\" src=\"{$T_SMILIES_PATH}/big&quot;grin.gif\" alt=\"{.}\" \
                 title=\"Very &lt;happy&gt;\"/>"
            )
        );
        assert_eq!(emoticons.not_if_condition.as_deref(), Some("not($S_VIEWSMILIES)"));
        assert_eq!(emoticons.not_after.as_deref(), Some(r"[^\n .\]]"));
    }

    #[test]
    fn test_censored_words_are_unescaped() {
        let tmp = TempDir::new().unwrap();
        let data = MockDataAccess::new().with_censored_word("r&amp;d", "&lt;censored&gt;");
        let configurator = factory(data, tmp.path())
            .get_configuration()
            .unwrap()
            .configurator;

        let censor = configurator.censor.as_ref().unwrap();
        assert_eq!(censor.tag_name(), CENSOR_TAG);
        assert_eq!(censor.words()[0].word, "r&d");
        assert_eq!(censor.words()[0].replacement.as_deref(), Some("<censored>"));
        assert!(configurator.tags.contains_key(CENSOR_TAG));
    }

    #[test]
    fn test_invalid_bitfield_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let data = MockDataAccess::new().with_style(
            1,
            "<!-- BEGIN b_open --><strong><!-- END b_open --><!-- BEGIN b_close --></strong><!-- END b_close -->",
            "!!not base64!!",
        );
        let configurator = factory(data, tmp.path())
            .get_configuration()
            .unwrap()
            .configurator;

        assert_eq!(
            configurator.tags["B"].template,
            "<span style=\"font-weight: bold\"><xsl:apply-templates/></span>"
        );
    }

    #[test]
    fn test_rejected_style_override_keeps_directive() {
        let tmp = TempDir::new().unwrap();
        let data = MockDataAccess::new()
            .with_style(
                1,
                "<!-- BEGIN b_open --><strong><em><!-- END b_open -->\
                 <!-- BEGIN b_close --></strong><!-- END b_close -->",
                DirectiveBitfield::from_names(["b"]).to_base64(),
            )
            .with_style(2, "", "");
        let assembly = factory(data, tmp.path()).get_configuration().unwrap();

        assert_eq!(
            assembly.configurator.tags["B"].template,
            "<span style=\"font-weight: bold\"><xsl:apply-templates/></span>"
        );
        assert_eq!(assembly.report.skipped.len(), 1);
        let skipped = &assembly.report.skipped[0];
        assert_eq!(skipped.usage, "[B]{TEXT}[/B]");
        assert_eq!(skipped.style_id, Some(StyleId(1)));
        assert!(matches!(
            skipped.reason,
            DefinitionError::MalformedTemplate { .. }
        ));
    }

    #[test]
    fn test_data_access_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        let data = MockDataAccess::new();
        data.fail_on("smilies");

        let err = factory(data, tmp.path()).get_configuration().unwrap_err();
        assert!(matches!(err, FactoryError::DataAccess(e) if e.query == "smilies"));
    }

    #[test]
    fn test_tidy_without_record() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("r_old.json"), "{}").unwrap();

        let removed = factory(MockDataAccess::new(), tmp.path()).tidy();

        assert!(removed.is_empty());
        assert!(tmp.path().join("r_old.json").exists());
    }
}
