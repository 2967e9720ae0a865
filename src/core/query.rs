//! Read-only views over the vault
//!
//! A [`PromptQuery`] borrows the store's records, so nothing derived here
//! can outlive or modify the state it was computed from.

use crate::core::data::{Collection, Prompt, SearchFilters, VaultStats};
use crate::core::store::EntityStore;
use std::collections::HashMap;

/// Number of prompts returned by [`PromptQuery::recent`] by default
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct PromptQuery<'a> {
    prompts: &'a [Prompt],
    collections: &'a [Collection],
}

impl<'a> PromptQuery<'a> {
    pub fn new(prompts: &'a [Prompt], collections: &'a [Collection]) -> Self {
        Self {
            prompts,
            collections,
        }
    }

    pub fn over(store: &'a EntityStore) -> Self {
        Self::new(store.list::<Prompt>(), store.list::<Collection>())
    }

    /// A view with nothing in it
    pub fn empty() -> Self {
        Self::new(&[], &[])
    }

    pub fn prompts(&self) -> &'a [Prompt] {
        self.prompts
    }

    pub fn collections(&self) -> &'a [Collection] {
        self.collections
    }

    pub fn find_prompt(&self, id: &str) -> Option<&'a Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn find_collection(&self, id: &str) -> Option<&'a Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    /// Search prompts by free text and filters, in store order.
    ///
    /// The query matches case-insensitively against title, content and
    /// tags; an empty query matches everything.
    pub fn search(&self, query: &str, filters: &SearchFilters) -> Vec<&'a Prompt> {
        let query = query.to_lowercase();

        self.prompts
            .iter()
            .filter(|p| matches_query(p, &query))
            .filter(|p| {
                filters.tags.is_empty() || filters.tags.iter().any(|tag| p.has_tag(tag))
            })
            .filter(|p| match filters.collection_id.as_deref() {
                None | Some("") => true,
                Some(id) => p.collection_id.as_deref() == Some(id),
            })
            .filter(|p| filters.is_favorite.is_none_or(|fav| p.is_favorite == fav))
            .filter(|p| filters.is_template.is_none_or(|tpl| p.is_template == tpl))
            .collect()
    }

    /// The `limit` most recently updated prompts
    pub fn recent(&self, limit: usize) -> Vec<&'a Prompt> {
        let mut prompts: Vec<&Prompt> = self.prompts.iter().collect();
        // sort_by is stable, ties keep store order
        prompts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        prompts.truncate(limit);
        prompts
    }

    pub fn favorites(&self) -> Vec<&'a Prompt> {
        self.prompts.iter().filter(|p| p.is_favorite).collect()
    }

    pub fn templates(&self) -> Vec<&'a Prompt> {
        self.prompts.iter().filter(|p| p.is_template).collect()
    }

    /// Count prompts pointing at `collection_id`, whether or not the
    /// collection still exists
    pub fn count_by_collection(&self, collection_id: &str) -> usize {
        self.prompts
            .iter()
            .filter(|p| p.collection_id.as_deref() == Some(collection_id))
            .count()
    }

    /// Resolve a prompt's collection. Dangling references read as `None`.
    pub fn collection_of(&self, prompt: &Prompt) -> Option<&'a Collection> {
        prompt
            .collection_id
            .as_deref()
            .and_then(|id| self.find_collection(id))
    }

    /// Prompts with no collection, including those whose collection is gone
    pub fn uncategorized(&self) -> Vec<&'a Prompt> {
        self.prompts
            .iter()
            .filter(|p| self.collection_of(p).is_none())
            .collect()
    }

    /// Get all unique tags in use, sorted
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .prompts
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    pub fn stats(&self) -> VaultStats {
        let mut tag_counts = HashMap::new();
        for tag in self.prompts.iter().flat_map(|p| p.tags.iter()) {
            *tag_counts.entry(tag.clone()).or_insert(0) += 1;
        }

        VaultStats {
            total_prompts: self.prompts.len(),
            total_collections: self.collections.len(),
            favorites: self.favorites().len(),
            templates: self.templates().len(),
            uncategorized: self.uncategorized().len(),
            tag_counts,
        }
    }
}

fn matches_query(prompt: &Prompt, lowered_query: &str) -> bool {
    if lowered_query.is_empty() {
        return true;
    }
    prompt.title.to_lowercase().contains(lowered_query)
        || prompt.content.to_lowercase().contains(lowered_query)
        || prompt
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(lowered_query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn prompt(id: &str, title: &str, updated: i64) -> Prompt {
        Prompt {
            id: id.to_string(),
            user_id: "u".to_string(),
            collection_id: None,
            title: title.to_string(),
            content: format!("content of {}", id),
            output: String::new(),
            tags: Vec::new(),
            is_favorite: false,
            is_template: false,
            created_at: at(0),
            updated_at: at(updated),
        }
    }

    fn collection(id: &str) -> Collection {
        Collection {
            id: id.to_string(),
            user_id: "u".to_string(),
            name: format!("Collection {}", id),
            description: String::new(),
            color: "#3B82F6".to_string(),
            created_at: at(0),
            updated_at: at(0),
        }
    }

    fn fixture() -> (Vec<Prompt>, Vec<Collection>) {
        let mut launch = prompt("p1", "Product Launch Email", 30);
        launch.tags = vec!["marketing".into(), "email".into()];
        launch.collection_id = Some("c1".into());
        launch.is_favorite = true;
        launch.is_template = true;

        let mut story = prompt("p2", "Short Story Ideas", 10);
        story.tags = vec!["creative-writing".into()];
        story.collection_id = Some("c2".into());

        let mut calendar = prompt("p3", "Social Media Calendar", 20);
        calendar.tags = vec!["marketing".into(), "planning".into()];
        calendar.collection_id = Some("c1".into());
        calendar.is_favorite = true;

        let mut meeting = prompt("p4", "Meeting Summary", 20);
        meeting.content = "Summarize the DAILY standup".into();
        meeting.collection_id = Some("gone".into());

        (vec![launch, story, calendar, meeting], vec![collection("c1"), collection("c2")])
    }

    fn ids(prompts: &[&Prompt]) -> Vec<String> {
        prompts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_empty_search_returns_everything_in_store_order() {
        let (prompts, collections) = fixture();
        let query = PromptQuery::new(&prompts, &collections);
        assert_eq!(
            ids(&query.search("", &SearchFilters::default())),
            vec!["p1", "p2", "p3", "p4"]
        );
    }

    #[test]
    fn test_search_matches_title_content_and_tags_case_insensitively() {
        let (prompts, collections) = fixture();
        let query = PromptQuery::new(&prompts, &collections);
        let none = SearchFilters::default();

        assert_eq!(ids(&query.search("launch", &none)), vec!["p1"]);
        assert_eq!(ids(&query.search("daily STANDUP", &none)), vec!["p4"]);
        assert_eq!(ids(&query.search("PLANN", &none)), vec!["p3"]);
        assert!(query.search("nothing like this", &none).is_empty());
    }

    #[test]
    fn test_tag_filter_uses_or_semantics_and_exact_match() {
        let (prompts, collections) = fixture();
        let query = PromptQuery::new(&prompts, &collections);

        let filters = SearchFilters {
            tags: vec!["email".into(), "creative-writing".into()],
            ..Default::default()
        };
        assert_eq!(ids(&query.search("", &filters)), vec!["p1", "p2"]);

        let partial = SearchFilters {
            tags: vec!["mark".into()],
            ..Default::default()
        };
        assert!(query.search("", &partial).is_empty());
    }

    #[test]
    fn test_filters_combine_with_and() {
        let (prompts, collections) = fixture();
        let query = PromptQuery::new(&prompts, &collections);

        let filters = SearchFilters {
            tags: vec!["marketing".into()],
            collection_id: Some("c1".into()),
            is_favorite: Some(true),
            is_template: Some(false),
        };
        assert_eq!(ids(&query.search("calendar", &filters)), vec!["p3"]);
        assert!(query.search("launch", &filters).is_empty());
    }

    #[test]
    fn test_favorite_filter_only_returns_favorites() {
        let (prompts, collections) = fixture();
        let query = PromptQuery::new(&prompts, &collections);

        for q in ["", "e", "marketing", "zzz"] {
            assert!(
                query
                    .search(q, &SearchFilters::favorites())
                    .iter()
                    .all(|p| p.is_favorite)
            );
        }
        let not_favorite = SearchFilters {
            is_favorite: Some(false),
            ..Default::default()
        };
        assert_eq!(ids(&query.search("", &not_favorite)), vec!["p2", "p4"]);
    }

    #[test]
    fn test_empty_collection_filter_is_ignored() {
        let (prompts, collections) = fixture();
        let query = PromptQuery::new(&prompts, &collections);
        assert_eq!(query.search("", &SearchFilters::in_collection("")).len(), 4);
        assert_eq!(ids(&query.search("", &SearchFilters::in_collection("c2"))), vec!["p2"]);
    }

    #[test]
    fn test_recent_orders_by_updated_with_stable_ties() {
        let (prompts, collections) = fixture();
        let query = PromptQuery::new(&prompts, &collections);

        assert_eq!(ids(&query.recent(3)), vec!["p1", "p3", "p4"]);
        assert_eq!(ids(&query.recent(1)), vec!["p1"]);
        assert_eq!(query.recent(DEFAULT_RECENT_LIMIT).len(), 4);
        assert!(query.recent(0).is_empty());
        // store order untouched
        assert_eq!(prompts[1].id, "p2");
    }

    #[test]
    fn test_counts_and_orphans() {
        let (prompts, collections) = fixture();
        let query = PromptQuery::new(&prompts, &collections);

        assert_eq!(query.count_by_collection("c1"), 2);
        assert_eq!(query.count_by_collection("gone"), 1);
        assert_eq!(query.count_by_collection("missing"), 0);

        assert!(query.collection_of(&prompts[3]).is_none());
        assert_eq!(query.collection_of(&prompts[0]).map(|c| c.id.as_str()), Some("c1"));
        assert_eq!(ids(&query.uncategorized()), vec!["p4"]);
    }

    #[test]
    fn test_stats_and_tags() {
        let (prompts, collections) = fixture();
        let query = PromptQuery::new(&prompts, &collections);
        let stats = query.stats();

        assert_eq!(stats.total_prompts, 4);
        assert_eq!(stats.total_collections, 2);
        assert_eq!(stats.favorites, 2);
        assert_eq!(stats.templates, 1);
        assert_eq!(stats.uncategorized, 1);
        assert_eq!(stats.tag_counts.get("marketing"), Some(&2));
        assert_eq!(
            query.all_tags(),
            vec!["creative-writing", "email", "marketing", "planning"]
        );
        assert_eq!(ids(&query.templates()), vec!["p1"]);
    }

    #[test]
    fn test_empty_view() {
        let query = PromptQuery::empty();
        assert!(query.search("", &SearchFilters::default()).is_empty());
        assert_eq!(query.stats(), VaultStats::default());
    }
}
