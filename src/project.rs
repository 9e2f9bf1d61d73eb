//! The project aggregate: everything that persists and exports as a unit.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::DataStore;
use crate::error::ScenarioError;

/// Title shown for projects whose own title is blank.
pub const FALLBACK_TITLE: &str = "無題シナリオ";

/// Starter scenario text for a fresh project.
pub const STARTER_TEXT: &str = "# 導入\n> 霧深い夜、忍びは静かに集う。\n\n{{HO1}}\n\n## 情報収集\n:::secret 本当の黒幕は別にいる :::\n\n{忍}(しの)びの掟を胸に進め。\n\n---\n\n# クライマックス\n> 月下、最後の影が交錯する。";

/// Starter handout body for `HO1`.
pub const STARTER_HANDOUT: &str = "使命: ここに使命\n秘密: ここに秘密";

/// Title, cover image, scenario text, and data store.
///
/// Serialized as JSON for autosave and save/load. Import is loose: missing
/// fields default, and a completely invalid payload degrades to the starter
/// project rather than failing the preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub cover_image: String,
    pub summary: String,
    pub text: String,
    pub data: DataStore,
}

impl Project {
    /// A fresh project seeded with the starter scenario and handout.
    pub fn starter() -> Self {
        let mut data = DataStore::new();
        data.upsert("HO1", STARTER_HANDOUT);
        Self {
            title: FALLBACK_TITLE.to_string(),
            text: STARTER_TEXT.to_string(),
            data,
            ..Self::default()
        }
    }

    /// The title to display: the project's own, or the fallback if blank.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            FALLBACK_TITLE
        } else {
            &self.title
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON, reporting invalid payloads.
    pub fn try_from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Deserialize from JSON, degrading invalid payloads to the starter
    /// project. Never fails.
    pub fn from_json(json: &str) -> Self {
        match Self::try_from_json(json) {
            Ok(project) => project,
            Err(err) => {
                tracing::warn!(%err, "falling back to starter project");
                Self::starter()
            }
        }
    }

    /// Build a project from a file's content.
    ///
    /// `.json` files are treated as project imports (loose, degrading);
    /// anything else becomes the scenario text of a fresh project.
    pub fn from_file_content(path: &Path, content: String) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self {
                text: content,
                ..Self::default()
            }
        }
    }
}
