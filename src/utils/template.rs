use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Placeholders are upper-case names in square brackets, e.g. `[PRODUCT NAME]`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([A-Z][A-Z0-9 /_-]*)\]").expect("placeholder pattern is valid")
});

/// Unique placeholder names in order of first appearance
pub fn placeholders(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER.captures_iter(content) {
        let name = cap[1].trim().to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Replace placeholders with provided values. Unknown ones are kept.
pub fn render(content: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures| match values.get(caps[1].trim()) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Parse `NAME=value` pairs as given on the command line
pub fn parse_assignments(pairs: &[String]) -> Result<HashMap<String, String>, String> {
    let mut values = HashMap::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=value, got '{}'", pair))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing placeholder name in '{}'", pair));
        }
        values.insert(name.to_uppercase(), value.to_string());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_in_order_without_duplicates() {
        let content = "Email for [PRODUCT NAME] to [AUDIENCE]. Mention [PRODUCT NAME] twice. [Choose: a, b]";
        assert_eq!(placeholders(content), vec!["PRODUCT NAME", "AUDIENCE"]);
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let mut values = HashMap::new();
        values.insert("PRODUCT NAME".to_string(), "Vault".to_string());
        let rendered = render("Launch [PRODUCT NAME] for [AUDIENCE]", &values);
        assert_eq!(rendered, "Launch Vault for [AUDIENCE]");
    }

    #[test]
    fn test_parse_assignments() {
        let values = parse_assignments(&["genre=sci-fi".to_string(), "API NAME=Orders".to_string()])
            .unwrap();
        assert_eq!(values.get("GENRE").map(String::as_str), Some("sci-fi"));
        assert_eq!(values.get("API NAME").map(String::as_str), Some("Orders"));
        assert!(parse_assignments(&["novalue".to_string()]).is_err());
        assert!(parse_assignments(&["=x".to_string()]).is_err());
    }
}
