//! BBCode formatter configuration and compilation.
//!
//! A [`Configurator`] collects BBCodes with their templates, attribute
//! filters and plugins (emoticons, censor, magic links). A [`Compiler`] turns
//! it into a serializable [`ParserArtifact`] and a generated renderer whose
//! class id names the file it is written to.
//!
//! # Example
//!
//! ```
//! use bbforge_configurator::{Compiler, Configurator, SnapshotCompiler, Template};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut configurator = Configurator::new();
//! configurator.rendering.cache_dir = Some(dir.path().to_path_buf());
//! configurator
//!     .add_bbcode("[b]{TEXT}[/b]", Template::new("<b><xsl:apply-templates/></b>"))
//!     .unwrap();
//!
//! let artifacts = SnapshotCompiler::new().compile(&configurator).unwrap();
//! assert!(artifacts.renderer.file.exists());
//! assert_eq!(artifacts.parser.bbcodes[0].name, "B");
//! ```

mod censor;
mod compiler;
mod configurator;
mod error;
mod filters;
mod plugins;
mod template;
mod usage;

pub use censor::{Censor, CensorHelper, CensoredWord, DEFAULT_REPLACEMENT};
pub use compiler::{
    CompiledArtifacts, Compiler, ParserArtifact, ParserBBCode, RENDERER_EXTENSION,
    RendererArtifact, RendererSnapshot, SnapshotCompiler, renderer_file_name,
};
pub use configurator::{BBCode, Configurator, RenderingSettings, RootRules, RulesGenerator, Tag};
pub use error::{CompileError, DefinitionError};
pub use filters::{
    AttributeFilter, AttributeFilterCollection, BUILTIN_FILTERS, FilterKind, filter_for_token,
};
pub use plugins::{Autoemail, Autolink, Emoticons};
pub use template::{Template, template_tokens};
pub use usage::{BBCodeUsage, UsageToken};
