//! Data-card store and inline reference resolution.
//!
//! The store maps a category name (handout, NPC, enemy, ...) to numbered
//! keys to free text. A reference token like `HO1` belongs to category `HO`:
//! the category is the key with its trailing digit run stripped. Lookups
//! never fail hard; a missing key degrades to a visible placeholder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{Block, parser::TAG_RE};
use crate::error::ScenarioError;

/// Placeholder rendered for a reference with no store entry.
pub fn not_found_placeholder(key: &str) -> String {
    format!("[{key}] not found")
}

/// Category -> key -> text mapping for data cards.
///
/// Backed by ordered maps so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataStore {
    categories: BTreeMap<String, BTreeMap<String, String>>,
}

impl DataStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    /// Derive the category of a key by stripping its trailing digit run.
    ///
    /// `HO1` -> `HO`, `NPC12` -> `NPC`. For a key with embedded digits only
    /// the trailing run is stripped (`AB2C3` -> `AB2C`).
    pub fn category_of(key: &str) -> &str {
        key.trim_end_matches(|c: char| c.is_ascii_digit())
    }

    /// Look up a key, deriving its category from the key itself.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.categories
            .get(Self::category_of(key))
            .and_then(|cards| cards.get(key))
            .map(String::as_str)
    }

    /// Insert or replace the text under a key.
    pub fn upsert(&mut self, key: &str, text: impl Into<String>) {
        self.categories
            .entry(Self::category_of(key).to_string())
            .or_default()
            .insert(key.to_string(), text.into());
    }

    /// Iterate `(key, text)` pairs across all categories, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories
            .values()
            .flat_map(|cards| cards.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Number of cards across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// Returns true if no cards are stored.
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(BTreeMap::is_empty)
    }

    /// Merge another store into this one; `other` wins on key conflicts.
    pub fn merge(&mut self, other: &Self) {
        for (key, text) in other.iter() {
            self.upsert(key, text);
        }
    }
}

/// Fold inline-authored data cards into the store.
///
/// Explicit second pass after parsing: every `[ho id=KEY]` block's body is
/// upserted under its key, so the parse itself stays pure. Reference cards
/// (body `None`) are left alone.
pub fn reconcile(blocks: &[Block], store: &mut DataStore) {
    for block in blocks {
        if let Block::DataCard {
            key,
            body: Some(body),
        } = block
        {
            tracing::debug!(key, "reconciling authored data card");
            store.upsert(key, body.clone());
        }
    }
}

/// Replace every `{{KEY}}` reference in `text` with its store value wrapped
/// as a data-card block, or a visible placeholder when missing.
///
/// Single pass and non-recursive: a resolved value is not re-scanned for
/// tokens, so repeated or nested references cannot loop.
pub fn resolve_tags(text: &str, store: &DataStore) -> String {
    TAG_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            store.get(key).map_or_else(
                || {
                    let err = ScenarioError::UnresolvedReference {
                        key: key.to_string(),
                    };
                    tracing::warn!(%err, "rendering placeholder");
                    not_found_placeholder(key)
                },
                |value| format!("[ho id={key}]\n{value}\n[/ho]"),
            )
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(key: &str, text: &str) -> DataStore {
        let mut store = DataStore::new();
        store.upsert(key, text);
        store
    }

    #[test]
    fn test_category_strips_trailing_digits() {
        assert_eq!(DataStore::category_of("HO1"), "HO");
        assert_eq!(DataStore::category_of("NPC12"), "NPC");
        assert_eq!(DataStore::category_of("HO"), "HO");
    }

    #[test]
    fn test_category_embedded_digits_strip_trailing_run_only() {
        assert_eq!(DataStore::category_of("AB2C3"), "AB2C");
    }

    #[test]
    fn test_get_routes_through_category() {
        let store = store_with("HO1", "mission text");
        assert_eq!(store.get("HO1"), Some("mission text"));
        assert_eq!(store.get("HO2"), None);
        assert_eq!(store.get("NPC1"), None);
    }

    #[test]
    fn test_upsert_replaces() {
        let mut store = store_with("HO1", "old");
        store.upsert("HO1", "new");
        assert_eq!(store.get("HO1"), Some("new"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_merge_other_wins() {
        let mut store = store_with("HO1", "old");
        let other = store_with("HO1", "new");
        store.merge(&other);
        assert_eq!(store.get("HO1"), Some("new"));
    }

    #[test]
    fn test_reconcile_upserts_authored_cards_only() {
        let blocks = vec![
            Block::DataCard {
                key: "HO1".to_string(),
                body: Some("使命".to_string()),
            },
            Block::DataCard {
                key: "HO2".to_string(),
                body: None,
            },
        ];
        let mut store = DataStore::new();
        reconcile(&blocks, &mut store);
        assert_eq!(store.get("HO1"), Some("使命"));
        assert_eq!(store.get("HO2"), None);
    }

    #[test]
    fn test_resolve_wraps_value_as_card_marker() {
        let store = store_with("HO1", "mission text");
        let out = resolve_tags("see {{HO1}} here", &store);
        assert_eq!(out, "see [ho id=HO1]\nmission text\n[/ho] here");
    }

    #[test]
    fn test_resolve_missing_key_renders_placeholder() {
        let out = resolve_tags("see {{HO9}} here", &DataStore::new());
        assert_eq!(out, "see [HO9] not found here");
    }

    #[test]
    fn test_resolve_is_single_pass() {
        // A value that itself contains a token must not be expanded again.
        let store = store_with("HO1", "nested {{HO1}}");
        let out = resolve_tags("{{HO1}}", &store);
        assert_eq!(out, "[ho id=HO1]\nnested {{HO1}}\n[/ho]");
    }

    #[test]
    fn test_resolve_idempotent_on_own_output() {
        let store = store_with("HO1", "mission text");
        let once = resolve_tags("intro {{HO1}} outro", &store);
        let twice = resolve_tags(&once, &store);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_store_serialization_round_trip() {
        let mut store = DataStore::new();
        store.upsert("HO1", "mission");
        store.upsert("NPC2", "the informant");
        let json = serde_json::to_string(&store).unwrap();
        let back: DataStore = serde_json::from_str(&json).unwrap();
        assert_eq!(store, back);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn resolve_never_loops_or_panics(
                text in "\\PC{0,80}",
                value in "\\PC{0,40}",
            ) {
                let store = store_with("HO1", &value);
                let _ = resolve_tags(&text, &store);
            }

            #[test]
            fn category_never_ends_in_digit(key in "[A-Z]{1,5}[0-9]{0,4}") {
                let cat = DataStore::category_of(&key);
                prop_assert!(!cat.ends_with(|c: char| c.is_ascii_digit()));
            }
        }
    }
}
