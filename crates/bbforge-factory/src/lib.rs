//! Formatter factory for a multi-style board.
//!
//! [`Factory`] assembles a [`Configurator`](bbforge_configurator::Configurator)
//! from the board's styles, custom BBCodes, smilies and censored words,
//! compiles it and caches the resulting parser and renderer record. It also
//! removes renderers left behind by earlier regenerations.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use bbforge_cache::MemoryCache;
//! use bbforge_configurator::SnapshotCompiler;
//! use bbforge_factory::{Factory, FactoryOptions, MockDataAccess, NullDispatcher};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let data = MockDataAccess::new().with_smiley(":)", "smile.gif", "Smile");
//! let factory = Factory::new(
//!     Arc::new(data),
//!     Arc::new(MemoryCache::new()),
//!     Arc::new(NullDispatcher),
//!     Arc::new(SnapshotCompiler::new()),
//!     FactoryOptions {
//!         cache_dir: dir.path().to_path_buf(),
//!         parser_key: "_parser".to_owned(),
//!         renderer_key: "_renderer".to_owned(),
//!         class_prefix: "bbforge_renderer_".to_owned(),
//!         board_url: "https://forum.example.com".to_owned(),
//!         smilies_path: "images/smilies".to_owned(),
//!     },
//! );
//!
//! let artifacts = factory.regenerate().unwrap();
//! assert!(artifacts.renderer.file.exists());
//! assert_eq!(factory.renderer_record().unwrap().class, artifacts.renderer.class);
//! assert!(factory.tidy().is_empty());
//! ```

mod data_access;
mod dispatcher;
mod error;
mod factory;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod tidy;

pub use data_access::{
    CensoredWordRow, CustomBBCode, DataAccess, DataAccessError, DataAccessErrorKind, Smiley,
    StyleTemplate,
};
pub use dispatcher::{CONFIGURE_AFTER, CONFIGURE_BEFORE, Dispatcher, HookDispatcher, NullDispatcher};
pub use error::{AssemblyReport, FactoryError, SkippedDefinition};
pub use factory::{Assembly, CENSOR_TAG, Factory, FactoryOptions, RendererRecord};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockDataAccess;
