//! Compiling a fully loaded configurator.

use std::fs;

use bbforge_configurator::{
    AttributeFilter, Autoemail, Autolink, Compiler, Configurator, RendererSnapshot,
    SnapshotCompiler, Template,
};
use bbforge_templates::{CATALOG, NormalizationPass};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn loaded_configurator(dir: &std::path::Path) -> Configurator {
    let mut configurator = Configurator::new();
    configurator.rendering.cache_dir = Some(dir.to_path_buf());
    configurator.rendering.class_prefix = "bbforge_renderer_".to_owned();
    configurator
        .template_normalizer
        .remove(NormalizationPass::RemoveComments)
        .add(NormalizationPass::TransposeComments);

    configurator
        .attribute_filters
        .add("#fontsize", AttributeFilter::callback("filter_font_size"))
        .add("#imageurl", AttributeFilter::callback("filter_img_url"))
        .add("#flashwidth", AttributeFilter::callback("filter_flash_width"))
        .add("#flashheight", AttributeFilter::callback("filter_flash_height"));

    for def in CATALOG {
        configurator
            .add_bbcode(def.usage, Template::new(def.default_template))
            .unwrap_or_else(|e| panic!("{}: {e}", def.name));
    }

    configurator.emoticons_mut().add(":)", "<img src=\"smile.gif\"/>");
    configurator.load_censor("censor:tag").add("darn", None);
    configurator.autoemail = Some(Autoemail::default());
    configurator.autolink = Some(Autolink {
        match_www: true,
        ..Autolink::default()
    });
    configurator
}

#[test]
fn test_catalog_compiles() {
    let tmp = TempDir::new().unwrap();
    let configurator = loaded_configurator(tmp.path());

    let artifacts = SnapshotCompiler::new().compile(&configurator).unwrap();

    assert_eq!(artifacts.parser.bbcodes.len(), CATALOG.len());
    assert!(artifacts.parser.tags.contains(&"LI".to_owned()));
    assert!(artifacts.parser.tags.contains(&"censor:tag".to_owned()));
    assert_eq!(artifacts.parser.censored_words.len(), 1);
    assert_eq!(artifacts.parser.emoticons, vec![":)"]);

    let written: RendererSnapshot =
        serde_json::from_slice(&fs::read(&artifacts.renderer.file).unwrap()).unwrap();
    assert_eq!(written, artifacts.renderer.snapshot);
}

#[test]
fn test_comments_are_transposed_in_renderer() {
    let tmp = TempDir::new().unwrap();
    let mut configurator = loaded_configurator(tmp.path());
    configurator
        .add_bbcode(
            "[note]{TEXT}[/note]",
            Template::unchecked("<div><!-- note --><xsl:apply-templates/></div>"),
        )
        .unwrap();

    let artifacts = SnapshotCompiler::new().compile(&configurator).unwrap();

    assert_eq!(
        artifacts.renderer.snapshot.templates["NOTE"],
        "<div><xsl:comment> note </xsl:comment><xsl:apply-templates/></div>"
    );
}

#[test]
fn test_detached_censor_changes_renderer() {
    let tmp = TempDir::new().unwrap();
    let mut configurator = loaded_configurator(tmp.path());
    let compiler = SnapshotCompiler::new();

    let with_censor = compiler.compile(&configurator).unwrap();
    let helper = configurator.detach_censor().unwrap();
    let without_censor = compiler.compile(&configurator).unwrap();

    assert_eq!(helper.censor_text("darn"), "****");
    assert!(without_censor.parser.censored_words.is_empty());
    assert!(!without_censor.renderer.snapshot.templates.contains_key("censor:tag"));
    assert_ne!(with_censor.renderer.class, without_censor.renderer.class);

    let mut files: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    files.sort();
    let mut expected = vec![
        format!("{}.json", with_censor.renderer.class),
        format!("{}.json", without_censor.renderer.class),
    ];
    expected.sort();
    assert_eq!(files, expected);
}
