//! Keyword-based tag suggestions
//!
//! Suggestions come from two fixed tables: category keywords and a list
//! of common tags. Matching is case-insensitive substring containment.

/// Upper bound on the number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 5;

const COMMON_TAGS: &[&str] = &[
    "creative writing", "marketing", "social media", "email", "blog",
    "copywriting", "technical writing", "documentation", "brainstorming",
    "ideas", "productivity", "automation", "analysis", "research",
    "strategy", "planning", "presentation", "meeting", "summary",
    "review", "feedback", "improvement", "optimization", "seo",
    "content creation", "video script", "podcast", "interview",
    "tutorial", "guide", "how-to", "tips", "best practices",
    "case study", "report", "proposal", "pitch", "sales",
];

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("marketing", &["sell", "promote", "campaign", "audience", "brand", "conversion", "lead"]),
    ("creative", &["story", "narrative", "character", "plot", "creative", "imagine", "write"]),
    ("technical", &["code", "development", "api", "database", "system", "software", "tech"]),
    ("business", &["meeting", "proposal", "strategy", "analysis", "report", "presentation"]),
    ("content", &["blog", "article", "post", "content", "publish", "share", "social"]),
    ("education", &["learn", "teach", "explain", "tutorial", "guide", "how-to", "step"]),
];

/// Suggest up to [`MAX_SUGGESTIONS`] tags for a piece of prompt text.
///
/// Category names come first, in table order, followed by common tags
/// that have any word contained in the text.
pub fn suggest_tags(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    let mut suggestions: Vec<String> = Vec::new();
    let mut add = |tag: &str| {
        if !suggestions.iter().any(|s| s == tag) {
            suggestions.push(tag.to_string());
        }
    };

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| lowered.contains(k)) {
            add(category);
        }
    }

    for tag in COMMON_TAGS {
        if tag.split(' ').any(|word| lowered.contains(word)) {
            add(tag);
        }
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Suggestions minus the tags a prompt already carries
pub fn suggest_new_tags(content: &str, existing: &[String]) -> Vec<String> {
    suggest_tags(content)
        .into_iter()
        .filter(|tag| !existing.contains(tag))
        .collect()
}

/// Every tag the suggester knows about
pub fn known_tags() -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let names = COMMON_TAGS
        .iter()
        .copied()
        .chain(CATEGORY_KEYWORDS.iter().map(|(category, _)| *category));
    for name in names {
        if !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
    }
    tags
}
