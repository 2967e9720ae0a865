// Prompt create, show, edit and delete

use crate::cli::{DeleteArgs, EditArgs, NewArgs, ShowArgs};
use crate::config::Config;
use crate::core::data::{NewPrompt, Prompt, PromptUpdate};
use crate::core::query::PromptQuery;
use crate::manager::{find_prompt, open_vault, require_collection_id};
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::output::{print_success, print_warning, OutputStyle};
use crate::utils::tags::suggest_new_tags;

fn prompt_not_found(identifier: &str) {
    handle_flow(FlowResult::NotFound {
        item_type: "Prompt".to_string(),
        search_term: identifier.to_string(),
    });
}

pub async fn handle_new_command(config: &Config, args: &NewArgs) -> AppResult<()> {
    let mut vault = open_vault(config).await?;

    let collection_id = match &args.collection {
        Some(identifier) => Some(require_collection_id(&vault.query(), identifier)?),
        None => None,
    };

    let mut tags = args.tags.clone();
    if args.suggest_tags {
        tags.extend(suggest_new_tags(&args.content, &tags));
    }

    let fields = NewPrompt {
        title: args.title.clone(),
        content: args.content.clone(),
        collection_id,
        output: args.output.clone().unwrap_or_default(),
        tags,
        is_favorite: args.favorite,
        is_template: args.template,
    };

    let prompt = vault.create_prompt(fields).await?;
    print_success(&format!("Prompt '{}' saved ({})", prompt.title, prompt.id));
    Ok(())
}

pub async fn handle_show_command(config: &Config, args: &ShowArgs) -> AppResult<()> {
    let vault = open_vault(config).await?;
    let query = vault.query();

    match find_prompt(&query, &args.identifier) {
        Some(prompt) => OutputStyle::print_prompt_detailed(prompt, query.collection_of(prompt)),
        None => prompt_not_found(&args.identifier),
    }
    Ok(())
}

/// Changes requested by the edit flags, relative to the current `prompt`
fn edit_updates(query: &PromptQuery<'_>, prompt: &Prompt, args: &EditArgs) -> AppResult<PromptUpdate> {
    let collection_id = if args.uncategorize {
        Some(None)
    } else {
        match &args.collection {
            Some(identifier) => Some(Some(require_collection_id(query, identifier)?)),
            None => None,
        }
    };

    let tags = if args.clear_tags {
        Some(Vec::new())
    } else {
        (!args.tags.is_empty()).then(|| args.tags.clone())
    };

    Ok(PromptUpdate {
        title: args.title.clone(),
        content: args.content.clone(),
        collection_id,
        output: args.output.clone(),
        tags,
        is_favorite: args.toggle_favorite.then_some(!prompt.is_favorite),
        is_template: args.toggle_template.then_some(!prompt.is_template),
    })
}

pub async fn handle_edit_command(config: &Config, args: &EditArgs) -> AppResult<()> {
    let mut vault = open_vault(config).await?;

    let (id, updates) = {
        let query = vault.query();
        let Some(prompt) = find_prompt(&query, &args.identifier) else {
            prompt_not_found(&args.identifier);
            return Ok(());
        };
        (prompt.id.clone(), edit_updates(&query, prompt, args)?)
    };

    if updates.is_empty() {
        print_warning("Nothing to change");
        return Ok(());
    }

    let prompt = vault.update_prompt(&id, updates).await?;
    print_success(&format!("Prompt '{}' updated", prompt.title));
    Ok(())
}

pub async fn handle_delete_command(config: &Config, args: &DeleteArgs) -> AppResult<()> {
    let mut vault = open_vault(config).await?;

    let Some(id) = find_prompt(&vault.query(), &args.identifier).map(|p| p.id.clone()) else {
        prompt_not_found(&args.identifier);
        return Ok(());
    };

    if let Some(prompt) = vault.delete_prompt(&id).await? {
        print_success(&format!("Prompt '{}' deleted", prompt.title));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::core::demo::demo_state;
    use clap::Parser;

    fn parse_edit(argv: &[&str]) -> EditArgs {
        let argv = ["promptvault", "edit"].iter().chain(argv).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Edit(args) => args,
            _ => panic!("expected edit command"),
        }
    }

    #[test]
    fn test_clear_tags_empties_the_list() {
        let state = demo_state("alice");
        let query = PromptQuery::new(&state.prompts, &state.collections);
        let prompt = query.find_prompt("prompt-1").unwrap();
        assert!(!prompt.tags.is_empty());

        let updates = edit_updates(&query, prompt, &parse_edit(&["prompt-1", "--clear-tags"])).unwrap();
        assert_eq!(updates.tags, Some(Vec::new()));
        assert!(!updates.is_empty());

        let mut edited = prompt.clone();
        updates.apply_to(&mut edited);
        assert!(edited.tags.is_empty());
    }

    #[test]
    fn test_edit_flags_map_to_updates() {
        let state = demo_state("alice");
        let query = PromptQuery::new(&state.prompts, &state.collections);
        let prompt = query.find_prompt("prompt-1").unwrap();

        let updates = edit_updates(&query, prompt, &parse_edit(&["prompt-1"])).unwrap();
        assert!(updates.is_empty());

        let args = parse_edit(&["prompt-1", "-t", "work", "--toggle-favorite", "--uncategorize"]);
        let updates = edit_updates(&query, prompt, &args).unwrap();
        assert_eq!(updates.tags, Some(vec!["work".to_string()]));
        assert_eq!(updates.is_favorite, Some(!prompt.is_favorite));
        assert_eq!(updates.collection_id, Some(None));
        assert_eq!(updates.is_template, None);
    }
}
