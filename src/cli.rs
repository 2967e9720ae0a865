use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use crate::config::Config;
use crate::manager::{self, collection, crud, query};
use crate::utils::error::AppResult;

#[derive(Parser)]
#[command(name = "promptvault")]
#[command(about = "Organize, search and reuse AI prompts from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Commands {
    pub async fn execute(self, config: Config) -> AppResult<()> {
        match self {
            Commands::New(args) => crud::handle_new_command(&config, &args).await,
            Commands::Edit(args) => crud::handle_edit_command(&config, &args).await,
            Commands::Delete(args) => crud::handle_delete_command(&config, &args).await,
            Commands::Show(args) => crud::handle_show_command(&config, &args).await,
            Commands::List(args) => query::handle_list_command(&config, &args).await,
            Commands::Search(args) => query::handle_search_command(&config, &args).await,
            Commands::Recent(args) => query::handle_recent_command(&config, &args).await,
            Commands::Stats => query::handle_stats_command(&config).await,
            Commands::Tags(args) => query::handle_tags_command(&config, &args).await,
            Commands::Suggest(args) => query::handle_suggest_command(&config, &args).await,
            Commands::Render(args) => query::handle_render_command(&config, &args).await,
            Commands::Collection(args) => {
                collection::handle_collection_command(&config, args.command).await
            }
            Commands::Config(args) => manager::config::handle_config_command(config, args.command),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new prompt
    New(NewArgs),

    /// Edit an existing prompt
    Edit(EditArgs),

    /// Delete a prompt
    Delete(DeleteArgs),

    /// Show prompt details
    Show(ShowArgs),

    /// List prompts
    List(ListArgs),

    /// Search prompts by title, content and tags
    Search(SearchArgs),

    /// Show the most recently updated prompts
    Recent(RecentArgs),

    /// Show vault statistics
    Stats,

    /// List tags in use
    Tags(TagsArgs),

    /// Suggest tags for a piece of text or an existing prompt
    Suggest(SuggestArgs),

    /// Fill in a template's [PLACEHOLDERS]
    Render(RenderArgs),

    /// Collection management
    Collection(CollectionArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct NewArgs {
    #[arg(short = 'T', long)]
    pub title: String,

    #[arg(long)]
    pub content: String,

    #[arg(short, long, help = "Example output produced by the prompt")]
    pub output: Option<String>,

    #[arg(short, long, help = "Collection ID or name")]
    pub collection: Option<String>,

    #[arg(short, long = "tag", help = "Tag to attach (repeatable)")]
    pub tags: Vec<String>,

    #[arg(long)]
    pub favorite: bool,

    #[arg(long)]
    pub template: bool,

    #[arg(long, help = "Also attach suggested tags")]
    pub suggest_tags: bool,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(help = "Prompt ID or title")]
    pub identifier: String,

    #[arg(short = 'T', long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Move to this collection (ID or name)")]
    pub collection: Option<String>,

    #[arg(long, conflicts_with = "collection", help = "Remove from its collection")]
    pub uncategorize: bool,

    #[arg(short, long = "tag", help = "Replace tags (repeatable)")]
    pub tags: Vec<String>,

    #[arg(long, conflicts_with = "tags", help = "Remove every tag")]
    pub clear_tags: bool,

    #[arg(long)]
    pub toggle_favorite: bool,

    #[arg(long)]
    pub toggle_template: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(help = "Prompt ID or title")]
    pub identifier: String,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(help = "Prompt ID or title")]
    pub identifier: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long)]
    pub tag: Option<String>,

    #[arg(short, long, help = "Collection ID or name")]
    pub collection: Option<String>,

    #[arg(long, value_name = "BOOL", help = "Only favorites (true) or non-favorites (false)")]
    pub favorite: Option<bool>,

    #[arg(long, value_name = "BOOL", help = "Only templates (true) or non-templates (false)")]
    pub template: Option<bool>,

    #[arg(long, conflicts_with = "collection")]
    pub uncategorized: bool,

    #[arg(short, long)]
    pub format: Option<ListFormat>,
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(help = "Text to look for in titles, content and tags")]
    pub query: Option<String>,

    #[arg(short, long = "tag", help = "Require one of these tags (repeatable)")]
    pub tags: Vec<String>,

    #[arg(short, long, help = "Collection ID or name")]
    pub collection: Option<String>,

    #[arg(long, value_name = "BOOL", help = "Only favorites (true) or non-favorites (false)")]
    pub favorite: Option<bool>,

    #[arg(long, value_name = "BOOL", help = "Only templates (true) or non-templates (false)")]
    pub template: Option<bool>,

    #[arg(short, long)]
    pub format: Option<ListFormat>,
}

#[derive(Args)]
pub struct RecentArgs {
    #[arg(short = 'n', long, help = "Number of prompts (defaults to config)")]
    pub limit: Option<usize>,

    #[arg(short, long)]
    pub format: Option<ListFormat>,
}

#[derive(Args)]
pub struct TagsArgs {
    #[arg(long, help = "Show the built-in tag vocabulary instead")]
    pub known: bool,
}

#[derive(Args)]
pub struct SuggestArgs {
    #[arg(help = "Text to analyse")]
    pub text: Option<String>,

    #[arg(short, long, conflicts_with = "text", help = "Prompt ID or title to analyse")]
    pub prompt: Option<String>,
}

#[derive(Args)]
pub struct RenderArgs {
    #[arg(help = "Prompt ID or title")]
    pub identifier: String,

    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq)]
pub enum ListFormat {
    Simple,
    Detailed,
    Json,
}

#[derive(Args)]
pub struct CollectionArgs {
    #[command(subcommand)]
    pub command: CollectionCommands,
}

#[derive(Subcommand, Clone)]
pub enum CollectionCommands {
    /// Create a collection
    New {
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(long, help = "#RRGGBB colour (defaults to config)")]
        color: Option<String>,
    },

    /// List collections with their prompt counts
    List,

    /// Edit a collection
    Edit {
        #[arg(help = "Collection ID or name")]
        identifier: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a collection. Its prompts become uncategorized.
    Delete {
        #[arg(help = "Collection ID or name")]
        identifier: String,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_args_collect_repeated_tags() {
        let cli = Cli::try_parse_from([
            "promptvault",
            "new",
            "-T",
            "Standup",
            "--content",
            "daily standup",
            "-t",
            "work",
            "-t",
            "daily",
            "--favorite",
        ])
        .unwrap();

        match cli.command {
            Commands::New(args) => {
                assert_eq!(args.title, "Standup");
                assert_eq!(args.tags, vec!["work", "daily"]);
                assert!(args.favorite);
                assert!(!args.template);
                assert!(args.collection.is_none());
            }
            _ => panic!("expected new command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["promptvault", "--debug", "-c", "/tmp/c.toml", "stats"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn test_edit_rejects_conflicting_collection_flags() {
        let result = Cli::try_parse_from([
            "promptvault",
            "edit",
            "prompt-1",
            "--collection",
            "col-1",
            "--uncategorize",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_clear_tags() {
        let cli = Cli::try_parse_from(["promptvault", "edit", "prompt-1", "--clear-tags"]).unwrap();
        match cli.command {
            Commands::Edit(args) => {
                assert!(args.clear_tags);
                assert!(args.tags.is_empty());
            }
            _ => panic!("expected edit command"),
        }

        let result =
            Cli::try_parse_from(["promptvault", "edit", "prompt-1", "--clear-tags", "-t", "work"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_favorite_filter_takes_either_value() {
        let cli = Cli::try_parse_from(["promptvault", "list", "--favorite", "false"]).unwrap();
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.favorite, Some(false));
                assert_eq!(args.template, None);
            }
            _ => panic!("expected list command"),
        }

        let cli = Cli::try_parse_from([
            "promptvault",
            "search",
            "--favorite",
            "true",
            "--template",
            "false",
        ])
        .unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.favorite, Some(true));
                assert_eq!(args.template, Some(false));
            }
            _ => panic!("expected search command"),
        }

        assert!(Cli::try_parse_from(["promptvault", "list", "--favorite", "maybe"]).is_err());
    }

    #[test]
    fn test_search_and_list_formats() {
        let cli = Cli::try_parse_from(["promptvault", "search", "api", "-t", "docs", "-f", "json"]).unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query.as_deref(), Some("api"));
                assert_eq!(args.tags, vec!["docs"]);
                assert_eq!(args.format, Some(ListFormat::Json));
            }
            _ => panic!("expected search command"),
        }

        let cli = Cli::try_parse_from(["promptvault", "recent", "-n", "3"]).unwrap();
        match cli.command {
            Commands::Recent(args) => assert_eq!(args.limit, Some(3)),
            _ => panic!("expected recent command"),
        }
    }

    #[test]
    fn test_collection_subcommands() {
        let cli = Cli::try_parse_from([
            "promptvault",
            "collection",
            "new",
            "Ideas",
            "--color",
            "#3B82F6",
        ])
        .unwrap();
        match cli.command {
            Commands::Collection(args) => match args.command {
                CollectionCommands::New { name, description, color } => {
                    assert_eq!(name, "Ideas");
                    assert!(description.is_empty());
                    assert_eq!(color.as_deref(), Some("#3B82F6"));
                }
                _ => panic!("expected collection new"),
            },
            _ => panic!("expected collection command"),
        }
    }

    #[test]
    fn test_render_collects_vars() {
        let cli = Cli::try_parse_from([
            "promptvault",
            "render",
            "prompt-2",
            "--var",
            "LANGUAGE=Rust",
            "--var",
            "CODE=fn main() {}",
        ])
        .unwrap();
        match cli.command {
            Commands::Render(args) => assert_eq!(args.vars.len(), 2),
            _ => panic!("expected render command"),
        }
    }
}
