//! The configuration object handed to a [`Compiler`](crate::Compiler).

use std::collections::BTreeMap;
use std::path::PathBuf;

use bbforge_templates::TemplateNormalizer;
use serde::Serialize;

use crate::censor::{Censor, CensorHelper};
use crate::error::DefinitionError;
use crate::filters::AttributeFilterCollection;
use crate::plugins::{Autoemail, Autolink, Emoticons};
use crate::template::Template;
use crate::usage::BBCodeUsage;

/// Rules generators enabled on a fresh configurator.
const DEFAULT_RULES_GENERATORS: &[&str] = &[
    "AutoCloseIfVoid",
    "AutoReopenFormattingElements",
    "BlockElementsCloseFormattingElements",
    "BlockElementsFosterFormattingElements",
    "DisableAutoLineBreaksIfNewLinesArePreserved",
    "EnforceContentModels",
    "EnforceOptionalEndTags",
    "IgnoreTagsInCode",
    "IgnoreTextIfDisallowed",
    "IgnoreWhitespaceAroundBlockElements",
    "TrimFirstLineInCodeBlocks",
];

/// A registered BBCode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BBCode {
    /// Parsed usage.
    pub usage: BBCodeUsage,
}

impl BBCode {
    /// BBCode name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.usage.name
    }

    /// Tag produced by the BBCode.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.usage.tag_name
    }
}

/// A tag and its template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Template rendering the tag.
    pub template: String,
}

/// Rules applied to the root of the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RootRules {
    /// Turn new lines into `<br/>` elements.
    pub auto_line_breaks: bool,
}

/// Generators deriving tag rules from templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RulesGenerator {
    generators: Vec<String>,
}

impl Default for RulesGenerator {
    fn default() -> Self {
        Self {
            generators: DEFAULT_RULES_GENERATORS
                .iter()
                .map(|&g| g.to_owned())
                .collect(),
        }
    }
}

impl RulesGenerator {
    /// Enable a generator.
    pub fn add(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.generators.contains(&name) {
            self.generators.push(name);
        }
        self
    }

    /// Disable a generator. Returns whether it was enabled.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.generators.len();
        self.generators.retain(|g| g != name);
        self.generators.len() != before
    }

    /// Enabled generators.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.generators
    }
}

/// Rendering engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderingSettings {
    /// Directory receiving generated renderer files.
    pub cache_dir: Option<PathBuf>,
    /// Prefix of generated renderer class names.
    pub class_prefix: String,
    /// Let the renderer skip the full engine for simple texts.
    pub quick_renderer: bool,
    /// Default values of template parameters such as `$T_SMILIES_PATH`.
    pub parameters: BTreeMap<String, String>,
}

impl Default for RenderingSettings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            class_prefix: "Renderer_".to_owned(),
            quick_renderer: false,
            parameters: BTreeMap::new(),
        }
    }
}

/// Everything the compiler needs to build a parser and a renderer.
///
/// Plugins are optional fields: a plugin is loaded when its field is set.
#[derive(Debug, Clone, Default)]
pub struct Configurator {
    bbcodes: BTreeMap<String, BBCode>,
    /// Tags by name, with their templates.
    pub tags: BTreeMap<String, Tag>,
    /// Filters available to BBCode tokens.
    pub attribute_filters: AttributeFilterCollection,
    /// Emoticon plugin.
    pub emoticons: Option<Emoticons>,
    /// Censor plugin.
    pub censor: Option<Censor>,
    /// E-mail magic links.
    pub autoemail: Option<Autoemail>,
    /// URL magic links.
    pub autolink: Option<Autolink>,
    /// Variables the host sets at parse time, with their defaults.
    pub registered_vars: BTreeMap<String, i64>,
    /// Rules applied to the root of the text.
    pub root_rules: RootRules,
    /// Generators deriving tag rules.
    pub rules_generator: RulesGenerator,
    /// Normalization applied to every template.
    pub template_normalizer: TemplateNormalizer,
    /// Rendering engine settings.
    pub rendering: RenderingSettings,
}

impl Configurator {
    /// Create an empty configurator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a BBCode and the tag it produces.
    ///
    /// On error the configurator is left unchanged.
    pub fn add_bbcode(&mut self, usage: &str, template: Template) -> Result<&BBCode, DefinitionError> {
        let usage = BBCodeUsage::parse(usage)?;
        if self.bbcodes.contains_key(&usage.name) || self.tags.contains_key(&usage.tag_name) {
            return Err(DefinitionError::Duplicate { name: usage.name });
        }
        self.check_definition(&usage, &template)?;

        tracing::debug!(bbcode = %usage.name, tag = %usage.tag_name, "Registered BBCode");
        self.tags.insert(
            usage.tag_name.clone(),
            Tag {
                template: template.as_str().to_owned(),
            },
        );
        let name = usage.name.clone();
        Ok(self.bbcodes.entry(name).or_insert(BBCode { usage }))
    }

    /// Check that `template` would be accepted for `usage`, without
    /// registering anything.
    ///
    /// Runs the same checks as [`Configurator::add_bbcode`] except the
    /// duplicate check.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] if the usage is invalid, uses an unknown
    /// filter, or the template is rejected.
    pub fn check_bbcode(&self, usage: &str, template: &Template) -> Result<(), DefinitionError> {
        let usage = BBCodeUsage::parse(usage)?;
        self.check_definition(&usage, template)
    }

    fn check_definition(&self, usage: &BBCodeUsage, template: &Template) -> Result<(), DefinitionError> {
        if let Some(filter) = usage
            .required_filters()
            .into_iter()
            .find(|f| !self.attribute_filters.is_available(f))
        {
            return Err(DefinitionError::UnknownFilter {
                name: usage.name.clone(),
                filter,
            });
        }
        template.validate(usage)
    }

    /// Registered BBCode by name.
    #[must_use]
    pub fn bbcode(&self, name: &str) -> Option<&BBCode> {
        self.bbcodes.get(&name.to_ascii_uppercase())
    }

    /// Registered BBCodes, by name.
    pub fn bbcodes(&self) -> impl Iterator<Item = &BBCode> {
        self.bbcodes.values()
    }

    /// Remove a BBCode and its tag.
    pub fn remove_bbcode(&mut self, name: &str) -> Option<BBCode> {
        let bbcode = self.bbcodes.remove(&name.to_ascii_uppercase())?;
        self.tags.remove(bbcode.tag_name());
        Some(bbcode)
    }

    /// Emoticon plugin, loaded on first use.
    pub fn emoticons_mut(&mut self) -> &mut Emoticons {
        self.emoticons.get_or_insert_with(Emoticons::default)
    }

    /// Load the censor plugin with its tag.
    pub fn load_censor(&mut self, tag_name: &str) -> &mut Censor {
        self.tags.insert(
            tag_name.to_owned(),
            Tag {
                template: Censor::tag_template(),
            },
        );
        self.censor.insert(Censor::new(tag_name))
    }

    /// Unload the censor plugin and its tag, keeping a helper.
    ///
    /// Returns `None` when the plugin was not loaded.
    pub fn detach_censor(&mut self) -> Option<CensorHelper> {
        let censor = self.censor.take()?;
        self.tags.remove(censor.tag_name());
        Some(censor.helper())
    }
}
