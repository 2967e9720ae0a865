use chrono::{DateTime, Utc};

const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(FORMAT).to_string()
}

/// Truncate to `max_len` characters, appending `...` when shortened.
/// Newlines are flattened so previews stay on one line.
pub fn truncate_string(text: &str, max_len: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_len {
        return flat;
    }
    let keep = max_len.saturating_sub(3);
    let mut truncated: String = flat.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

pub fn format_tags_comma(tags: &[String]) -> String {
    tags.join(", ")
}

pub fn format_tags_hash(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let hashed: Vec<String> = tags.iter().map(|t| format!("#{}", t)).collect();
    format!(" {}", hashed.join(" "))
}
