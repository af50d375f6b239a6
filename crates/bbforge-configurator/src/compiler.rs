//! Compilation of a [`Configurator`] into a parser and a renderer.
//!
//! [`SnapshotCompiler`] is the built-in [`Compiler`]. The renderer it produces
//! is a JSON file in the rendering cache directory, named after a class id
//! derived from the renderer content, so identical configurations share one
//! file and a changed configuration always gets a new one.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::censor::CensoredWord;
use crate::configurator::Configurator;
use crate::error::CompileError;
use crate::plugins::{Autoemail, Autolink};
use crate::template::check_markup;

/// Hex digits of the content digest kept in class ids.
const CLASS_HASH_LEN: usize = 40;

/// Extension of generated renderer files.
pub const RENDERER_EXTENSION: &str = "json";

/// Turns a configurator into a parser and a renderer.
pub trait Compiler: Send + Sync {
    /// Compile `configurator`.
    ///
    /// Compilation may write the renderer into the rendering cache directory.
    fn compile(&self, configurator: &Configurator) -> Result<CompiledArtifacts, CompileError>;
}

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledArtifacts {
    /// Parser configuration.
    pub parser: ParserArtifact,
    /// Generated renderer.
    pub renderer: RendererArtifact,
}

/// BBCode entry of a compiled parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserBBCode {
    /// BBCode name.
    pub name: String,
    /// Tag produced.
    pub tag_name: String,
    /// Usage the BBCode was defined with.
    pub usage: String,
}

/// Serializable parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserArtifact {
    /// BBCodes, by name.
    pub bbcodes: Vec<ParserBBCode>,
    /// Tag names.
    pub tags: Vec<String>,
    /// Registered attribute filter names.
    pub attribute_filters: Vec<String>,
    /// Emoticon codes.
    pub emoticons: Vec<String>,
    /// Characters that must not precede an emoticon.
    pub emoticons_not_after: Option<String>,
    /// Censored words, when the censor plugin is still loaded.
    pub censored_words: Vec<CensoredWord>,
    /// E-mail magic links.
    pub autoemail: Option<Autoemail>,
    /// URL magic links.
    pub autolink: Option<Autolink>,
    /// Variables set at parse time, with their defaults.
    pub registered_vars: BTreeMap<String, i64>,
    /// Whether new lines become line breaks at the root.
    pub auto_line_breaks: bool,
    /// Enabled rules generators.
    pub rules_generators: Vec<String>,
}

impl ParserArtifact {
    fn from_configurator(configurator: &Configurator) -> Self {
        Self {
            bbcodes: configurator
                .bbcodes()
                .map(|b| ParserBBCode {
                    name: b.name().to_owned(),
                    tag_name: b.tag_name().to_owned(),
                    usage: b.usage.source.clone(),
                })
                .collect(),
            tags: configurator.tags.keys().cloned().collect(),
            attribute_filters: configurator
                .attribute_filters
                .names()
                .map(str::to_owned)
                .collect(),
            emoticons: configurator
                .emoticons
                .iter()
                .flat_map(|e| e.entries().keys().cloned())
                .collect(),
            emoticons_not_after: configurator
                .emoticons
                .as_ref()
                .and_then(|e| e.not_after.clone()),
            censored_words: configurator
                .censor
                .as_ref()
                .map(|c| c.words().to_vec())
                .unwrap_or_default(),
            autoemail: configurator.autoemail.clone(),
            autolink: configurator.autolink.clone(),
            registered_vars: configurator.registered_vars.clone(),
            auto_line_breaks: configurator.root_rules.auto_line_breaks,
            rules_generators: configurator.rules_generator.names().to_vec(),
        }
    }
}

/// Everything a generated renderer renders with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererSnapshot {
    /// Normalized template of every tag.
    pub templates: BTreeMap<String, String>,
    /// Emoticon templates, by code.
    pub emoticons: BTreeMap<String, String>,
    /// Condition under which emoticons render as text.
    pub emoticons_not_if_condition: Option<String>,
    /// Default template parameters.
    pub parameters: BTreeMap<String, String>,
    /// Whether the quick renderer is enabled.
    pub quick_renderer: bool,
}

impl RendererSnapshot {
    /// Content digest, as lowercase hex.
    fn digest(&self) -> Result<String, CompileError> {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(self)?);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// A generated renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererArtifact {
    /// Generated class id, also the file stem.
    pub class: String,
    /// Generated file.
    pub file: PathBuf,
    /// Renderer content.
    pub snapshot: RendererSnapshot,
}

/// On-disk layout of a generated renderer.
#[derive(Serialize)]
struct RendererFile<'a> {
    class: &'a str,
    #[serde(flatten)]
    snapshot: &'a RendererSnapshot,
}

/// File name of the renderer generated for `class`.
#[must_use]
pub fn renderer_file_name(class: &str) -> String {
    format!("{class}.{RENDERER_EXTENSION}")
}

/// Built-in compiler writing renderer snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotCompiler;

impl SnapshotCompiler {
    /// Create a new compiler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(configurator: &Configurator) -> Result<(), CompileError> {
        if configurator.rendering.class_prefix.is_empty() {
            return Err(CompileError::EmptyClassPrefix);
        }
        for bbcode in configurator.bbcodes() {
            if let Some(filter) = bbcode
                .usage
                .required_filters()
                .into_iter()
                .find(|f| !configurator.attribute_filters.is_available(f))
            {
                return Err(CompileError::UnknownFilter {
                    name: bbcode.name().to_owned(),
                    filter,
                });
            }
        }
        Ok(())
    }

    fn snapshot(configurator: &Configurator) -> Result<RendererSnapshot, CompileError> {
        let mut templates = BTreeMap::new();
        for (name, tag) in &configurator.tags {
            let template = configurator.template_normalizer.normalize(&tag.template);
            check_markup(&template, false).map_err(|e| CompileError::MalformedTemplate {
                tag: name.clone(),
                reason: e.into_reason(),
            })?;
            templates.insert(name.clone(), template);
        }

        let emoticons = configurator.emoticons.as_ref();
        Ok(RendererSnapshot {
            templates,
            emoticons: emoticons.map(|e| e.entries().clone()).unwrap_or_default(),
            emoticons_not_if_condition: emoticons.and_then(|e| e.not_if_condition.clone()),
            parameters: configurator.rendering.parameters.clone(),
            quick_renderer: configurator.rendering.quick_renderer,
        })
    }
}

impl Compiler for SnapshotCompiler {
    fn compile(&self, configurator: &Configurator) -> Result<CompiledArtifacts, CompileError> {
        let cache_dir = configurator
            .rendering
            .cache_dir
            .as_deref()
            .ok_or(CompileError::MissingCacheDir)?;
        Self::check(configurator)?;

        let snapshot = Self::snapshot(configurator)?;
        let digest = snapshot.digest()?;
        let class = format!(
            "{}{}",
            configurator.rendering.class_prefix,
            &digest[..CLASS_HASH_LEN]
        );
        let file = cache_dir.join(renderer_file_name(&class));

        let contents = serde_json::to_vec_pretty(&RendererFile {
            class: &class,
            snapshot: &snapshot,
        })?;
        write_file(&file, &contents)?;
        tracing::info!(class = %class, file = %file.display(), "Generated renderer");

        Ok(CompiledArtifacts {
            parser: ParserArtifact::from_configurator(configurator),
            renderer: RendererArtifact {
                class,
                file,
                snapshot,
            },
        })
    }
}

/// Write `contents` through a temporary sibling so readers never see a torn file.
fn write_file(path: &Path, contents: &[u8]) -> Result<(), CompileError> {
    let io_error = |source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let tmp = path.with_extension(format!("{RENDERER_EXTENSION}.tmp"));
    fs::write(&tmp, contents).map_err(io_error)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        io_error(e)
    })
}
