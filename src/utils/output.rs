use colored::*;
use crate::cli::ListFormat;
use crate::config::Config;
use crate::core::data::{Collection, Prompt, VaultStats};
use crate::core::query::PromptQuery;
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::format::{format_datetime, format_tags_comma, format_tags_hash, truncate_string};

/// Label shown for prompts without a (live) collection
pub const UNCATEGORIZED: &str = "Uncategorized";

pub struct OutputStyle;

impl OutputStyle {
    pub fn description(text: &str) -> ColoredString {
        text.bright_green()
    }

    pub fn command(text: &str) -> ColoredString {
        text.bright_yellow()
    }

    pub fn content(text: &str) -> ColoredString {
        text.clear()
    }

    pub fn tags(text: &str) -> ColoredString {
        text.bright_cyan()
    }

    pub fn tag(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn title(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn info(text: &str) -> ColoredString {
        text.blue()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn separator() -> String {
        "─".repeat(50)
    }

    pub fn header_separator() -> String {
        "═".repeat(50)
    }

    pub fn print_header(title: &str) {
        println!("{}", Self::title(title));
        println!("{}", Self::header_separator());
    }

    pub fn print_field_colored(label: &str, value: &str, color_fn: impl Fn(&str) -> ColoredString) {
        println!("{:>12}: {}", Self::label(label), color_fn(value));
    }

    fn flags(prompt: &Prompt) -> String {
        let mut flags = Vec::new();
        if prompt.is_favorite {
            flags.push("favorite");
        }
        if prompt.is_template {
            flags.push("template");
        }
        flags.join(", ")
    }

    pub fn print_prompt_detailed(prompt: &Prompt, collection: Option<&Collection>) {
        println!("{}", Self::title("📝 Prompt Details"));

        Self::print_field_colored("ID", &prompt.id, Self::muted);
        Self::print_field_colored("Title", &prompt.title, Self::description);
        Self::print_field_colored(
            "Collection",
            collection.map(|c| c.name.as_str()).unwrap_or(UNCATEGORIZED),
            Self::tag,
        );
        Self::print_field_colored("Tags", &format_tags_comma(&prompt.tags), Self::command);
        Self::print_field_colored("Flags", &Self::flags(prompt), Self::info);
        Self::print_field_colored("Created", &format_datetime(&prompt.created_at), Self::muted);
        Self::print_field_colored("Updated", &format_datetime(&prompt.updated_at), Self::muted);

        println!("\n{}:", Self::title("📄 Content"));
        println!("{}", Self::content(&prompt.content));

        if !prompt.output.trim().is_empty() {
            println!("\n{}:", Self::title("📤 Output"));
            println!("{}", Self::content(&prompt.output));
        }
    }

    /// One-line rendering used by list views
    pub fn format_prompt_line(prompt: &Prompt, collection: Option<&Collection>, config: &Config) -> String {
        let star = if prompt.is_favorite { "★ " } else { "" };
        let collection_display = match collection {
            Some(c) => Self::tag(&format!("[{}] ", c.name)),
            None => Self::muted(&format!("[{}] ", UNCATEGORIZED)),
        };
        let preview = if config.general.content_preview {
            format!(" {}", truncate_string(&prompt.content, 80))
        } else {
            String::new()
        };

        format!(
            "{}{} {} {}{}{}",
            star,
            Self::description(&prompt.title),
            Self::muted(&format!("({})", short_id(&prompt.id))),
            collection_display,
            Self::tags(&format_tags_hash(&prompt.tags)),
            Self::content(&preview)
        )
    }

    pub fn print_collection_line(collection: &Collection, prompt_count: usize) {
        println!(
            "{} {} {} {}",
            Self::description(&collection.name),
            Self::muted(&format!("({})", short_id(&collection.id))),
            Self::tag(&collection.color),
            Self::info(&format!("{} prompts", prompt_count))
        );
        if !collection.description.is_empty() {
            println!("    {}", Self::muted(&collection.description));
        }
    }

    pub fn print_rendered_content(content: &str) {
        println!("\n{}:", Self::header("📤 Rendered Prompt"));
        println!("{}", Self::header_separator());
        println!("{}", Self::content(content));
        println!("{}", Self::header_separator());
    }

    pub fn print_stats(stats: &VaultStats) {
        Self::print_header("📊 Vault Statistics");

        Self::print_field_colored("Prompts", &stats.total_prompts.to_string(), Self::info);
        Self::print_field_colored("Collections", &stats.total_collections.to_string(), Self::info);
        Self::print_field_colored("Favorites", &stats.favorites.to_string(), Self::info);
        Self::print_field_colored("Templates", &stats.templates.to_string(), Self::info);
        Self::print_field_colored("Uncategorized", &stats.uncategorized.to_string(), Self::info);

        if !stats.tag_counts.is_empty() {
            println!("\n🏷️  {}:", Self::header("Most used tags"));
            let mut sorted_tags: Vec<_> = stats.tag_counts.iter().collect();
            sorted_tags.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (tag, count) in sorted_tags.iter().take(10) {
                println!("  {}: {}", Self::tags(tag), Self::info(&count.to_string()));
            }
        }
    }
}

/// Shorten generated UUIDs for display; other ids are shown whole
pub fn short_id(id: &str) -> &str {
    if uuid::Uuid::parse_str(id).is_ok() {
        &id[..8]
    } else {
        id
    }
}

pub fn print_prompt_count(count: usize) {
    if count == 0 {
        println!("{}", OutputStyle::muted("No prompts found."));
    } else {
        println!(
            "📝 {} ({} found)",
            OutputStyle::header("Prompts"),
            OutputStyle::info(&count.to_string())
        );
    }
}

pub fn print_warning(message: &str) {
    println!("⚠️  {}", OutputStyle::warning(message));
}

pub fn print_success(message: &str) {
    println!("✅ {}", OutputStyle::success(message));
}

/// Display formatter for prompt lists
pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn format_list(
        prompts: &[&Prompt],
        query: &PromptQuery<'_>,
        format: &ListFormat,
        config: &Config,
    ) -> AppResult<()> {
        if prompts.is_empty() {
            handle_flow(FlowResult::EmptyList {
                item_type: "prompts matching your criteria".to_string(),
            });
            return Ok(());
        }

        match format {
            ListFormat::Simple => Self::print_simple_list(prompts, query, config),
            ListFormat::Detailed => Self::print_detailed_list(prompts, query),
            ListFormat::Json => Self::print_json_list(prompts)?,
        }

        Ok(())
    }

    pub fn print_tags(title: &str, tags: &[String]) {
        if tags.is_empty() {
            handle_flow(FlowResult::EmptyList {
                item_type: "tags".to_string(),
            });
            return;
        }

        println!("🏷️  {} ({})", title, tags.len());
        println!("{}", OutputStyle::separator());
        for tag in tags {
            println!("  {}", OutputStyle::tags(tag));
        }
    }

    fn print_simple_list(prompts: &[&Prompt], query: &PromptQuery<'_>, config: &Config) {
        print_prompt_count(prompts.len());
        println!("{}", OutputStyle::separator());

        for prompt in prompts {
            let line = OutputStyle::format_prompt_line(prompt, query.collection_of(prompt), config);
            println!("{}", line);
        }
    }

    fn print_detailed_list(prompts: &[&Prompt], query: &PromptQuery<'_>) {
        for (i, prompt) in prompts.iter().enumerate() {
            OutputStyle::print_prompt_detailed(prompt, query.collection_of(prompt));
            if i < prompts.len() - 1 {
                println!("{}", OutputStyle::separator());
            }
        }
    }

    fn print_json_list(prompts: &[&Prompt]) -> AppResult<()> {
        let json = serde_json::to_string_pretty(prompts)?;
        println!("{}", json);
        Ok(())
    }
}
