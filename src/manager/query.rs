// Query operations - list, search, recent, stats, tags, suggest, render

use crate::cli::{ListArgs, ListFormat, RecentArgs, RenderArgs, SearchArgs, SuggestArgs, TagsArgs};
use crate::config::Config;
use crate::core::data::{Prompt, SearchFilters};
use crate::core::query::PromptQuery;
use crate::manager::{find_prompt, open_vault, require_collection_id};
use crate::utils::error::{handle_flow, AppError, AppResult, FlowResult};
use crate::utils::output::{print_warning, DisplayFormatter, OutputStyle};
use crate::utils::tags::{known_tags, suggest_new_tags};
use crate::utils::template::{parse_assignments, placeholders, render};

/// Build search filters from the shared list/search flags
fn build_filters(
    query: &PromptQuery<'_>,
    tags: Vec<String>,
    collection: Option<&str>,
    is_favorite: Option<bool>,
    is_template: Option<bool>,
) -> AppResult<SearchFilters> {
    let collection_id = match collection {
        Some(identifier) => Some(require_collection_id(query, identifier)?),
        None => None,
    };

    Ok(SearchFilters {
        tags,
        collection_id,
        is_favorite,
        is_template,
    })
}

fn print_list(
    prompts: &[&Prompt],
    query: &PromptQuery<'_>,
    format: Option<&ListFormat>,
    config: &Config,
) -> AppResult<()> {
    let format = format.unwrap_or(&ListFormat::Simple);
    DisplayFormatter::format_list(prompts, query, format, config)
}

pub async fn handle_list_command(config: &Config, args: &ListArgs) -> AppResult<()> {
    let vault = open_vault(config).await?;
    let query = vault.query();

    let filters = build_filters(
        &query,
        args.tag.iter().cloned().collect(),
        args.collection.as_deref(),
        args.favorite,
        args.template,
    )?;

    let mut prompts = query.search("", &filters);
    if args.uncategorized {
        prompts.retain(|p| query.collection_of(p).is_none());
    }

    print_list(&prompts, &query, args.format.as_ref(), config)
}

pub async fn handle_search_command(config: &Config, args: &SearchArgs) -> AppResult<()> {
    let vault = open_vault(config).await?;
    let query = vault.query();

    let filters = build_filters(
        &query,
        args.tags.clone(),
        args.collection.as_deref(),
        args.favorite,
        args.template,
    )?;

    let prompts = query.search(args.query.as_deref().unwrap_or(""), &filters);
    print_list(&prompts, &query, args.format.as_ref(), config)
}

pub async fn handle_recent_command(config: &Config, args: &RecentArgs) -> AppResult<()> {
    let limit = args.limit.unwrap_or(config.general.recent_limit);
    if limit == 0 {
        return Err(AppError::validation("limit", "must be at least 1"));
    }

    let vault = open_vault(config).await?;
    let query = vault.query();
    let prompts = query.recent(limit);
    print_list(&prompts, &query, args.format.as_ref(), config)
}

pub async fn handle_stats_command(config: &Config) -> AppResult<()> {
    let vault = open_vault(config).await?;
    OutputStyle::print_stats(&vault.query().stats());
    Ok(())
}

pub async fn handle_tags_command(config: &Config, args: &TagsArgs) -> AppResult<()> {
    if args.known {
        DisplayFormatter::print_tags("Known tags", &known_tags());
        return Ok(());
    }

    let vault = open_vault(config).await?;
    DisplayFormatter::print_tags("Tags in use", &vault.query().all_tags());
    Ok(())
}

pub async fn handle_suggest_command(config: &Config, args: &SuggestArgs) -> AppResult<()> {
    let suggestions = match (&args.text, &args.prompt) {
        (Some(text), _) => suggest_new_tags(text, &[]),
        (None, Some(identifier)) => {
            let vault = open_vault(config).await?;
            let query = vault.query();
            let Some(prompt) = find_prompt(&query, identifier) else {
                handle_flow(FlowResult::NotFound {
                    item_type: "Prompt".to_string(),
                    search_term: identifier.clone(),
                });
                return Ok(());
            };
            let text = format!("{} {}", prompt.title, prompt.content);
            suggest_new_tags(&text, &prompt.tags)
        }
        (None, None) => {
            return Err(AppError::validation(
                "text",
                "give some text or --prompt <ID> to analyse",
            ));
        }
    };

    DisplayFormatter::print_tags("Suggested tags", &suggestions);
    Ok(())
}

pub async fn handle_render_command(config: &Config, args: &RenderArgs) -> AppResult<()> {
    let values = parse_assignments(&args.vars).map_err(|reason| AppError::validation("var", reason))?;

    let vault = open_vault(config).await?;
    let query = vault.query();
    let Some(prompt) = find_prompt(&query, &args.identifier) else {
        handle_flow(FlowResult::NotFound {
            item_type: "Prompt".to_string(),
            search_term: args.identifier.clone(),
        });
        return Ok(());
    };

    if !prompt.is_template {
        print_warning(&format!("'{}' is not marked as a template", prompt.title));
    }

    let rendered = render(&prompt.content, &values);
    OutputStyle::print_rendered_content(&rendered);

    let unfilled = placeholders(&rendered);
    if !unfilled.is_empty() {
        print_warning(&format!("Unfilled placeholders: {}", unfilled.join(", ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::demo::demo_state;

    #[test]
    fn test_filters_can_exclude_favorites() {
        let state = demo_state("alice");
        let query = PromptQuery::new(&state.prompts, &state.collections);

        let filters = build_filters(&query, Vec::new(), None, Some(false), None).unwrap();
        let prompts = query.search("", &filters);
        assert!(!prompts.is_empty());
        assert!(prompts.iter().all(|p| !p.is_favorite));
        assert_eq!(
            prompts.len() + query.favorites().len(),
            query.search("", &SearchFilters::default()).len()
        );
    }

    #[test]
    fn test_filters_resolve_collection_names() {
        let state = demo_state("alice");
        let query = PromptQuery::new(&state.prompts, &state.collections);

        let filters = build_filters(&query, vec!["x".to_string()], Some("col-1"), None, Some(true)).unwrap();
        assert_eq!(filters.collection_id.as_deref(), Some("col-1"));
        assert_eq!(filters.is_template, Some(true));
        assert_eq!(filters.is_favorite, None);

        assert!(build_filters(&query, Vec::new(), Some("no such collection"), None, None).is_err());
    }
}
