//! End-to-end pipeline tests: parse, reconcile, render, paginate, export.

use scenarist::data::{DataStore, reconcile, resolve_tags};
use scenarist::document::{Block, Document};
use scenarist::export::{export_html, export_json};
use scenarist::layout::{FixedMeasure, TextMeasure, paginate};
use scenarist::project::Project;
use scenarist::render::{render_document, toc};
use scenarist::storage::{FileStore, autosave, restore};

const SAMPLE: &str = include_str!("fixtures/sample.scn");

fn sample_project() -> Project {
    let mut project = Project {
        title: "影の掟".to_string(),
        text: SAMPLE.to_string(),
        ..Project::default()
    };
    project.data.upsert("NPC1", "情報屋: 古傷のある男");
    project
}

#[test]
fn test_full_pipeline_produces_pages() {
    let project = sample_project();
    let doc = Document::parse(&project.text);
    let mut store = project.data.clone();
    reconcile(doc.blocks(), &mut store);

    // The authored HO1 card landed in the store during reconciliation.
    assert!(store.get("HO1").unwrap().contains("巻物を奪還せよ"));

    let nodes = render_document(&doc, &store);
    assert_eq!(nodes.len(), doc.block_count());

    let pages = paginate(nodes, &TextMeasure::new(42), 20);
    // The manual break before クライマックス guarantees at least two pages.
    assert!(pages.len() >= 2);
    let last = pages.last().unwrap();
    let texts: Vec<&str> = last.nodes().map(scenarist::render::Node::text).collect();
    assert!(texts.contains(&"クライマックス"));
}

#[test]
fn test_sample_headings_and_toc() {
    let doc = Document::parse(SAMPLE);
    let entries = toc(&doc);
    assert_eq!(
        entries,
        vec![
            ("heading-0".to_string(), "導入".to_string()),
            ("heading-1".to_string(), "情報収集".to_string()),
            ("heading-2".to_string(), "クライマックス".to_string()),
        ]
    );
}

#[test]
fn test_sample_blocks_do_not_exceed_lines() {
    let doc = Document::parse(SAMPLE);
    assert!(doc.block_count() <= SAMPLE.lines().count());
}

#[test]
fn test_unknown_reference_is_visible_not_silent() {
    let doc = Document::parse("{{ZZ9}}");
    let nodes = render_document(&doc, &DataStore::new());
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0].flat_text().contains("[ZZ9] not found"));
}

#[test]
fn test_resolve_then_parse_yields_authored_card() {
    // Resolution produces markup that parses back into an authored card.
    let mut store = DataStore::new();
    store.upsert("HO1", "mission text");
    let resolved = resolve_tags("{{HO1}}", &store);
    let doc = Document::parse(&resolved);
    assert_eq!(
        doc.blocks(),
        &[Block::DataCard {
            key: "HO1".to_string(),
            body: Some("mission text".to_string()),
        }]
    );
}

#[test]
fn test_manual_break_pages_with_empty_columns() {
    let doc = Document::parse("---\n---\nend");
    let nodes = render_document(&doc, &DataStore::new());
    let pages = paginate(nodes, &FixedMeasure(1), 10);
    assert_eq!(pages.len(), 3);
    assert!(pages[0].is_empty());
    assert!(pages[1].is_empty());
}

#[test]
fn test_export_html_survives_malformed_input() {
    let project = Project {
        text: "[ho id=HO1]\nnever closed".to_string(),
        ..Project::default()
    };
    let html = export_html(&project);
    assert!(html.contains("never closed"));
}

#[test]
fn test_project_save_load_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().to_path_buf());
    let project = sample_project();

    autosave(&project, &mut store).unwrap();
    assert_eq!(restore(&store), project);
}

#[test]
fn test_export_json_import_round_trip() {
    let project = sample_project();
    let json = export_json(&project).unwrap();
    assert_eq!(Project::from_json(&json), project);
}
