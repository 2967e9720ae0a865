// Collection management

use crate::cli::CollectionCommands;
use crate::config::Config;
use crate::core::data::{CollectionUpdate, NewCollection};
use crate::manager::{find_collection, open_vault};
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::output::{print_success, print_warning, OutputStyle};

fn collection_not_found(identifier: &str) {
    handle_flow(FlowResult::NotFound {
        item_type: "Collection".to_string(),
        search_term: identifier.to_string(),
    });
}

pub async fn handle_collection_command(config: &Config, command: CollectionCommands) -> AppResult<()> {
    match command {
        CollectionCommands::New {
            name,
            description,
            color,
        } => handle_new(config, name, description, color).await,
        CollectionCommands::List => handle_list(config).await,
        CollectionCommands::Edit {
            identifier,
            name,
            description,
            color,
        } => {
            let updates = CollectionUpdate {
                name,
                description,
                color,
            };
            handle_edit(config, &identifier, updates).await
        }
        CollectionCommands::Delete { identifier } => handle_delete(config, &identifier).await,
    }
}

async fn handle_new(
    config: &Config,
    name: String,
    description: String,
    color: Option<String>,
) -> AppResult<()> {
    let mut vault = open_vault(config).await?;
    let collection = vault
        .create_collection(NewCollection {
            name,
            description,
            color,
        })
        .await?;
    print_success(&format!(
        "Collection '{}' created ({})",
        collection.name, collection.id
    ));
    Ok(())
}

async fn handle_list(config: &Config) -> AppResult<()> {
    let vault = open_vault(config).await?;
    let query = vault.query();

    if query.collections().is_empty() {
        handle_flow(FlowResult::EmptyList {
            item_type: "collections".to_string(),
        });
        return Ok(());
    }

    OutputStyle::print_header("📁 Collections");
    for collection in query.collections() {
        OutputStyle::print_collection_line(collection, query.count_by_collection(&collection.id));
    }

    let uncategorized = query.uncategorized().len();
    if uncategorized > 0 {
        println!(
            "{}",
            OutputStyle::muted(&format!("{} uncategorized prompts", uncategorized))
        );
    }
    Ok(())
}

async fn handle_edit(config: &Config, identifier: &str, updates: CollectionUpdate) -> AppResult<()> {
    if updates == CollectionUpdate::default() {
        print_warning("Nothing to change");
        return Ok(());
    }

    let mut vault = open_vault(config).await?;
    let Some(id) = find_collection(&vault.query(), identifier).map(|c| c.id.clone()) else {
        collection_not_found(identifier);
        return Ok(());
    };

    let collection = vault.update_collection(&id, updates).await?;
    print_success(&format!("Collection '{}' updated", collection.name));
    Ok(())
}

async fn handle_delete(config: &Config, identifier: &str) -> AppResult<()> {
    let mut vault = open_vault(config).await?;
    let Some((id, orphaned)) = find_collection(&vault.query(), identifier)
        .map(|c| (c.id.clone(), vault.query().count_by_collection(&c.id)))
    else {
        collection_not_found(identifier);
        return Ok(());
    };

    if let Some(collection) = vault.delete_collection(&id).await? {
        print_success(&format!("Collection '{}' deleted", collection.name));
        if orphaned > 0 {
            print_warning(&format!("{} prompts are now uncategorized", orphaned));
        }
    }
    Ok(())
}
