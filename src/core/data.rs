//! Core data structures for the prompt library
//!
//! Records stored in the vault, the input records used to create and
//! update them, and the aggregate types returned by queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Colour given to a collection when none is provided
pub const DEFAULT_COLLECTION_COLOR: &str = "#14B8A6";

/// Colours offered when creating a collection
pub const COLLECTION_PALETTE: [&str; 12] = [
    "#14B8A6", "#3B82F6", "#8B5CF6", "#F59E0B", "#EF4444", "#10B981", "#6366F1", "#F97316",
    "#EC4899", "#84CC16", "#06B6D4", "#8B5A2B",
];

/// A single prompt owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub collection_id: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_template: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named group of prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    DEFAULT_COLLECTION_COLOR.to_string()
}

/// Fields supplied when creating a prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPrompt {
    pub title: String,
    pub content: String,
    pub collection_id: Option<String>,
    pub output: String,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub is_template: bool,
}

impl NewPrompt {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn in_collection(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_id = Some(collection_id.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update for a prompt. Absent fields are left untouched.
///
/// Identity fields (`id`, `user_id`, `created_at`) have no place here;
/// when an update is deserialized those keys are silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// `Some(None)` moves the prompt out of its collection
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_some"
    )]
    pub collection_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
}

impl PromptUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the populated fields into `prompt`. Timestamps are left alone.
    pub fn apply_to(&self, prompt: &mut Prompt) {
        if let Some(title) = &self.title {
            prompt.title = title.clone();
        }
        if let Some(content) = &self.content {
            prompt.content = content.clone();
        }
        if let Some(collection_id) = &self.collection_id {
            prompt.collection_id = collection_id.clone().filter(|id| !id.is_empty());
        }
        if let Some(output) = &self.output {
            prompt.output = output.clone();
        }
        if let Some(tags) = &self.tags {
            prompt.tags = normalize_tags(tags.iter().cloned());
        }
        if let Some(is_favorite) = self.is_favorite {
            prompt.is_favorite = is_favorite;
        }
        if let Some(is_template) = self.is_template {
            prompt.is_template = is_template;
        }
    }
}

/// Fields supplied when creating a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCollection {
    pub name: String,
    pub description: String,
    pub color: Option<String>,
}

impl NewCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Partial update for a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CollectionUpdate {
    pub fn apply_to(&self, collection: &mut Collection) {
        if let Some(name) = &self.name {
            collection.name = name.clone();
        }
        if let Some(description) = &self.description {
            collection.description = description.clone();
        }
        if let Some(color) = &self.color {
            collection.color = color.clone();
        }
    }
}

/// Distinguishes an explicit `null` from a missing key
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Filters applied on top of the free-text query in a search.
///
/// Every populated filter must match; an empty filter imposes nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    /// Prompt must carry at least one of these tags
    pub tags: Vec<String>,
    pub collection_id: Option<String>,
    pub is_favorite: Option<bool>,
    pub is_template: Option<bool>,
}

impl SearchFilters {
    pub fn favorites() -> Self {
        Self {
            is_favorite: Some(true),
            ..Default::default()
        }
    }

    pub fn in_collection(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: Some(collection_id.into()),
            ..Default::default()
        }
    }
}

/// Full contents of a vault, used as the initial state of a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultState {
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

/// Statistics about the vault contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaultStats {
    pub total_prompts: usize,
    pub total_collections: usize,
    pub favorites: usize,
    pub templates: usize,
    pub uncategorized: usize,
    pub tag_counts: HashMap<String, usize>,
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Trim tags, drop blank ones and remove exact duplicates keeping the first
pub(crate) fn normalize_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut result: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || result.iter().any(|t| t == tag) {
            continue;
        }
        result.push(tag.to_string());
    }
    result
}

impl Prompt {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_favorite {
            write!(f, "★ {}", self.title)
        } else {
            write!(f, "{}", self.title)
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags_dedups_case_sensitively() {
        let tags = normalize_tags(vec![
            "api".to_string(),
            " docs ".to_string(),
            "api".to_string(),
            "API".to_string(),
            "   ".to_string(),
        ]);
        assert_eq!(tags, vec!["api", "docs", "API"]);
    }

    #[test]
    fn test_prompt_update_ignores_identity_keys() {
        let update: PromptUpdate = serde_json::from_str(
            r#"{"id": "other", "user_id": "mallory", "created_at": "2020-01-01T00:00:00Z", "title": "x"}"#,
        )
        .unwrap();
        assert_eq!(update.title.as_deref(), Some("x"));
        assert!(update.content.is_none());
        assert!(update.collection_id.is_none());
    }

    #[test]
    fn test_prompt_update_distinguishes_null_collection() {
        let cleared: PromptUpdate = serde_json::from_str(r#"{"collection_id": null}"#).unwrap();
        assert_eq!(cleared.collection_id, Some(None));

        let untouched: PromptUpdate = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(untouched.collection_id, None);
        assert!(untouched.is_empty());
    }

    #[test]
    fn test_collection_defaults_color_when_missing() {
        let collection: Collection = serde_json::from_str(
            r#"{"id": "c", "user_id": "u", "name": "Work",
                "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(collection.color, DEFAULT_COLLECTION_COLOR);
        assert!(collection.description.is_empty());
    }

    #[test]
    fn test_has_tag_is_exact() {
        let now = Utc::now();
        let prompt = Prompt {
            id: new_id(),
            user_id: "u".to_string(),
            collection_id: None,
            title: "t".to_string(),
            content: "c".to_string(),
            output: String::new(),
            tags: vec!["a".to_string()],
            is_favorite: false,
            is_template: false,
            created_at: now,
            updated_at: now,
        };
        assert!(prompt.has_tag("a"));
        assert!(!prompt.has_tag("A"));
        assert!(!prompt.has_tag(" a"));
    }
}
