//! Factory lifecycle: assemble, regenerate, invalidate and tidy.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use bbforge_cache::{CacheStoreExt, FileCache, MemoryCache};
use bbforge_config::Config;
use bbforge_configurator::{
    CompileError, CompiledArtifacts, Compiler, Configurator, ParserArtifact, SnapshotCompiler,
    Template,
};
use bbforge_factory::{
    CONFIGURE_AFTER, CONFIGURE_BEFORE, Dispatcher, Factory, FactoryError, FactoryOptions,
    HookDispatcher, MockDataAccess, NullDispatcher, RendererRecord,
};
use bbforge_templates::DirectiveBitfield;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const BOLD_STYLE: &str = "<!-- BEGIN b_open --><strong><!-- END b_open -->\n\
                          <!-- BEGIN b_close --></strong><!-- END b_close -->";

struct Board {
    dir: TempDir,
    data: Arc<MockDataAccess>,
    cache: Arc<MemoryCache>,
}

impl Board {
    fn new(data: MockDataAccess) -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            data: Arc::new(data),
            cache: Arc::new(MemoryCache::new()),
        }
    }

    fn options(&self) -> FactoryOptions {
        let mut config = Config::default_with_base(self.dir.path());
        config.board.url = "https://forum.example.com/".to_owned();
        config.renderer.class_prefix = "r_".to_owned();
        FactoryOptions::from_config(&config)
    }

    fn factory_with(
        &self,
        dispatcher: impl Dispatcher + 'static,
        compiler: impl Compiler + 'static,
    ) -> Factory {
        let data = Arc::clone(&self.data);
        let cache = Arc::clone(&self.cache);
        Factory::new(
            data,
            cache,
            Arc::new(dispatcher),
            Arc::new(compiler),
            self.options(),
        )
    }

    fn factory(&self) -> Factory {
        self.factory_with(NullDispatcher, SnapshotCompiler::new())
    }

    fn renderer_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("cache")
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

struct FailingCompiler;

impl Compiler for FailingCompiler {
    fn compile(&self, _configurator: &Configurator) -> Result<CompiledArtifacts, CompileError> {
        Err(CompileError::Other("renderer generation failed".to_owned()))
    }
}

#[test]
fn test_options_from_config() {
    let board = Board::new(MockDataAccess::new());
    let options = board.options();

    assert_eq!(options.cache_dir, board.renderer_dir());
    assert_eq!(options.board_url, "https://forum.example.com");
    assert_eq!(options.class_prefix, "r_");
    assert_eq!(options.parser_key, "_bbforge_parser");
    assert_eq!(options.renderer_key, "_bbforge_renderer");
}

#[test]
fn test_regenerate_writes_both_keys() {
    let board = Board::new(MockDataAccess::new());
    let factory = board.factory();

    let artifacts = factory.regenerate().unwrap();

    let options = factory.options();
    assert!(board.cache.contains(&options.parser_key));
    assert!(board.cache.contains(&options.renderer_key));

    let record: RendererRecord = board.cache.get_json(&options.renderer_key).unwrap();
    assert_eq!(record.class, artifacts.renderer.class);
    assert!(record.censor.is_none());
    assert!(
        board
            .renderer_dir()
            .join(format!("{}.json", record.class))
            .is_file()
    );

    let parser: ParserArtifact = board.cache.get_json(&options.parser_key).unwrap();
    assert_eq!(parser, artifacts.parser);
    assert!(parser.auto_line_breaks);
    assert!(
        !parser
            .rules_generators
            .iter()
            .any(|r| r == "IgnoreTextIfDisallowed")
    );
}

#[test]
fn test_regenerate_stores_censor_helper() {
    let board = Board::new(MockDataAccess::new().with_censored_word("darn", ""));
    let factory = board.factory();

    let artifacts = factory.regenerate().unwrap();

    assert!(artifacts.parser.censored_words.is_empty());
    assert!(!artifacts.renderer.snapshot.templates.contains_key("censor:tag"));
    let helper = factory.renderer_record().unwrap().censor.unwrap();
    assert_eq!(helper.censor_text("Darn it"), "**** it");
}

#[test]
fn test_compile_failure_propagates() {
    let board = Board::new(MockDataAccess::new());
    let factory = board.factory_with(NullDispatcher, FailingCompiler);

    let err = factory.regenerate().unwrap_err();

    assert!(matches!(err, FactoryError::Compile(CompileError::Other(_))));
    assert!(board.cache.is_empty());
    assert!(factory.invalidate().is_err());
}

#[test]
fn test_hooks_surround_defaults() {
    let board = Board::new(MockDataAccess::new());
    let dispatcher = HookDispatcher::new()
        .on(CONFIGURE_BEFORE, |configurator| {
            configurator.rendering.class_prefix = "hooked_".to_owned();
            configurator
                .add_bbcode("[b]{TEXT}[/b]", Template::new("<em><xsl:apply-templates/></em>"))
                .unwrap();
        })
        .on(CONFIGURE_AFTER, |configurator| {
            configurator.remove_bbcode("flash");
            configurator
                .registered_vars
                .insert("max_img_width".to_owned(), 640);
        });
    let factory = board.factory_with(dispatcher, SnapshotCompiler::new());

    let assembly = factory.get_configuration().unwrap();
    let configurator = &assembly.configurator;

    assert_eq!(configurator.rendering.class_prefix, "r_");
    assert_eq!(configurator.tags["B"].template, "<em><xsl:apply-templates/></em>");
    assert_eq!(assembly.report.skipped.len(), 1);
    assert_eq!(assembly.report.skipped[0].usage, "[B]{TEXT}[/B]");
    assert!(configurator.bbcode("flash").is_none());
    assert!(!configurator.tags.contains_key("FLASH"));
    assert_eq!(configurator.registered_vars["max_img_width"], 640);
    assert_eq!(configurator.registered_vars["max_img_height"], 0);
}

#[test]
fn test_styles_are_merged() {
    let active = DirectiveBitfield::from_names(["b"]).to_base64();
    let board = Board::new(
        MockDataAccess::new()
            .with_style(1, BOLD_STYLE, active)
            .with_style(2, BOLD_STYLE, ""),
    );

    let configurator = board.factory().get_configuration().unwrap().configurator;

    assert_eq!(
        configurator.tags["B"].template,
        "<xsl:choose>\
         <xsl:when test=\"$STYLE_ID=2\"><span style=\"font-weight: bold\"><xsl:apply-templates/></span></xsl:when>\
         <xsl:otherwise><strong><xsl:apply-templates/></strong></xsl:otherwise>\
         </xsl:choose>"
    );
}

#[test]
fn test_invalidate_picks_up_new_data() {
    let board = Board::new(MockDataAccess::new());
    let factory = board.factory();

    let first = factory.regenerate().unwrap();
    board
        .data
        .add_bbcode("[spoiler]{TEXT}[/spoiler]", "<details>{TEXT}</details>");
    let second = factory.invalidate().unwrap();

    assert_ne!(first.renderer.class, second.renderer.class);
    assert!(second.parser.bbcodes.iter().any(|b| b.name == "SPOILER"));
    assert_eq!(factory.renderer_record().unwrap().class, second.renderer.class);

    let removed = factory.tidy();
    assert_eq!(removed, vec![first.renderer.file.clone()]);
    assert_eq!(
        file_names(&board.renderer_dir()),
        vec![format!("{}.json", second.renderer.class)]
    );
}

#[test]
fn test_tidy_protects_current_renderer() {
    let board = Board::new(MockDataAccess::new());
    let dir = board.renderer_dir();
    fs::create_dir_all(&dir).unwrap();
    for class in ["r_3", "r_5", "r_7"] {
        fs::write(dir.join(format!("{class}.json")), "{}").unwrap();
    }
    fs::write(dir.join("unrelated.txt"), "keep").unwrap();
    let factory = board.factory();
    board.cache.put_json(
        &factory.options().renderer_key,
        &RendererRecord {
            class: "r_7".to_owned(),
            class_prefix: String::new(),
            censor: None,
        },
    );

    let removed = factory.tidy();

    assert_eq!(removed, vec![dir.join("r_3.json"), dir.join("r_5.json")]);
    assert_eq!(file_names(&dir), vec!["r_7.json", "unrelated.txt"]);
}

#[test]
fn test_tidy_follows_prefix_set_by_hook() {
    let board = Board::new(MockDataAccess::new());
    let dir = board.renderer_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("hooked_old.json"), "{}").unwrap();
    fs::write(dir.join("r_kept.json"), "{}").unwrap();
    let dispatcher = HookDispatcher::new().on(CONFIGURE_AFTER, |configurator| {
        configurator.rendering.class_prefix = "hooked_".to_owned();
    });
    let factory = board.factory_with(dispatcher, SnapshotCompiler::new());

    let artifacts = factory.regenerate().unwrap();
    let record = factory.renderer_record().unwrap();
    assert_eq!(record.class_prefix, "hooked_");
    assert!(artifacts.renderer.class.starts_with("hooked_"));

    let removed = factory.tidy();

    assert_eq!(removed, vec![dir.join("hooked_old.json")]);
    assert_eq!(
        file_names(&dir),
        vec![format!("{}.json", artifacts.renderer.class), "r_kept.json".to_owned()]
    );
}

#[test]
fn test_tidy_without_cache_entry_deletes_nothing() {
    let board = Board::new(MockDataAccess::new());
    let dir = board.renderer_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("r_3.json"), "{}").unwrap();

    assert!(board.factory().tidy().is_empty());
    assert_eq!(file_names(&dir), vec!["r_3.json"]);
}

#[test]
fn test_tidy_with_empty_directory() {
    let board = Board::new(MockDataAccess::new());
    let factory = board.factory();
    board.cache.put_json(
        &factory.options().renderer_key,
        &RendererRecord {
            class: "r_7".to_owned(),
            class_prefix: String::new(),
            censor: None,
        },
    );

    assert!(factory.tidy().is_empty());
}

#[test]
fn test_file_cache_round_trip() {
    let board = Board::new(MockDataAccess::new().with_censored_word("heck", "h*ck"));
    let cache = Arc::new(FileCache::new(board.dir.path().join("store"), "1"));
    let data = Arc::clone(&board.data);
    let factory = Factory::new(
        data,
        cache,
        Arc::new(NullDispatcher),
        Arc::new(SnapshotCompiler::new()),
        board.options(),
    );

    let artifacts = factory.regenerate().unwrap();

    let record = factory.renderer_record().unwrap();
    assert_eq!(record.class, artifacts.renderer.class);
    assert_eq!(record.censor.unwrap().censor_text("heck"), "h*ck");
    assert!(factory.tidy().is_empty());
}
