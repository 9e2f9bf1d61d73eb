//! File export and the print bridge.
//!
//! Exports reproduce what the preview shows: the full pipeline runs here
//! (parse, reconcile, render, wrap) so an exported document carries resolved
//! data cards and the trailer section.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::data::{reconcile, resolve_tags};
use crate::document::Document;
use crate::project::Project;
use crate::render::{nodes_to_html, render_document, render_trailer, wrap_html_document};

/// Export the raw scenario text.
pub fn export_text(project: &Project) -> String {
    project.text.clone()
}

/// Export the scenario text with every `{{KEY}}` reference expanded.
pub fn export_text_resolved(project: &Project) -> String {
    let doc = Document::parse(&project.text);
    let mut store = project.data.clone();
    reconcile(doc.blocks(), &mut store);
    resolve_tags(&project.text, &store)
}

/// Export a minimal standalone HTML document wrapping the rendered preview.
pub fn export_html(project: &Project) -> String {
    let doc = Document::parse(&project.text);
    let mut store = project.data.clone();
    reconcile(doc.blocks(), &mut store);

    let trailer = render_trailer(
        project.display_title(),
        &project.cover_image,
        &project.summary,
    );
    let mut nodes = vec![trailer];
    nodes.extend(render_document(&doc, &store));
    wrap_html_document(project.display_title(), &nodes_to_html(&nodes))
}

/// Export the project as pretty JSON for save/load round-trips.
pub fn export_json(project: &Project) -> Result<String> {
    project.to_json().context("Failed to serialize project")
}

/// Hand-off point for print/PDF production.
///
/// The core delivers a fully resolved HTML string plus stylesheet text and
/// does not manage the secondary renderer's pagination.
pub trait PrintBridge {
    fn trigger_export(&mut self, html: &str, css: &str) -> Result<()>;
}

/// Bridge that writes the HTML (with the stylesheet inlined) to a file,
/// ready for an external HTML-to-PDF renderer.
#[derive(Debug, Clone)]
pub struct FileBridge {
    path: PathBuf,
}

impl FileBridge {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PrintBridge for FileBridge {
    fn trigger_export(&mut self, html: &str, css: &str) -> Result<()> {
        let with_style = if css.is_empty() {
            html.to_string()
        } else {
            html.replacen("</head>", &format!("<style>{css}</style></head>"), 1)
        };
        fs::write(&self.path, with_style)
            .with_context(|| format!("Failed to write export {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        let mut project = Project::starter();
        project.title = "影の掟".to_string();
        project.summary = "霧の夜の潜入行".to_string();
        project
    }

    #[test]
    fn test_export_text_is_verbatim() {
        let p = project();
        assert_eq!(export_text(&p), p.text);
    }

    #[test]
    fn test_export_text_resolved_expands_references() {
        let p = project();
        let out = export_text_resolved(&p);
        assert!(!out.contains("{{HO1}}"));
        assert!(out.contains("[ho id=HO1]"));
        assert!(out.contains("使命: ここに使命"));
    }

    #[test]
    fn test_export_text_resolved_uses_inline_authored_cards() {
        let p = Project {
            text: "[ho id=HO3]\n奪われた巻物\n[/ho]\n{{HO3}}".to_string(),
            ..Project::default()
        };
        let out = export_text_resolved(&p);
        assert!(out.contains("奪われた巻物"));
        assert!(!out.contains("not found"));
    }

    #[test]
    fn test_export_html_contains_trailer_and_body() {
        let html = export_html(&project());
        assert!(html.contains("<title>影の掟</title>"));
        assert!(html.contains("<section class=\"trailer\">"));
        assert!(html.contains("霧の夜の潜入行"));
        assert!(html.contains("class=\"scene-title\""));
        assert!(html.contains("class=\"data-card\""));
    }

    #[test]
    fn test_export_html_untitled_uses_fallback() {
        let html = export_html(&Project::default());
        assert!(html.contains("<title>無題シナリオ</title>"));
    }

    #[test]
    fn test_export_html_never_empty_on_bad_input() {
        let p = Project {
            text: "[scene-table]\nA,B\n{{ZZ9}}".to_string(),
            ..Project::default()
        };
        let html = export_html(&p);
        assert!(html.contains("scene-table"));
    }

    #[test]
    fn test_export_json_round_trips() {
        let p = project();
        let json = export_json(&p).unwrap();
        assert_eq!(Project::from_json(&json), p);
    }

    #[test]
    fn test_file_bridge_inlines_stylesheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let mut bridge = FileBridge::new(path.clone());
        let html = export_html(&project());
        bridge
            .trigger_export(&html, "body { color: #f0f0f0; }")
            .unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("<style>body { color: #f0f0f0; }</style></head>"));
        assert!(written.contains("scenario-body"));
    }
}
