// Configuration operations

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::utils::error::AppResult;
use crate::utils::output::print_success;

pub fn handle_config_command(mut config: Config, command: Option<ConfigCommands>) -> AppResult<()> {
    match command {
        Some(ConfigCommands::Show) => handle_show_command(&config),
        Some(ConfigCommands::Reset) => handle_reset_command(&mut config),
        None => handle_config_help(),
    }
}

fn handle_show_command(config: &Config) -> AppResult<()> {
    println!("⚙️  PromptVault Configuration");
    println!("==========================");

    println!("General:");
    println!("  Data dir: {}", config.general.data_dir.display());
    println!("  User: {}", config.general.user_id);
    println!("  Color: {}", config.general.color);
    println!("  Content preview: {}", config.general.content_preview);
    println!("  Recent limit: {}", config.general.recent_limit);
    println!(
        "  Default collection color: {}",
        config.general.default_collection_color
    );
    println!("  Seed demo data: {}", config.general.seed_demo_data);

    println!("Sync:");
    println!("  Reconcile: {}", config.sync.reconcile);

    Ok(())
}

fn handle_config_help() -> AppResult<()> {
    println!("⚙️  Configuration Management");
    println!("==========================");
    println!("Available configuration commands:");
    println!("  promptvault config show    - Show current configuration");
    println!("  promptvault config reset   - Reset configuration to defaults");
    println!();
    println!(
        "Configuration file location: {}",
        Config::config_file_path().display()
    );
    Ok(())
}

fn handle_reset_command(config: &mut Config) -> AppResult<()> {
    *config = Config::default();
    config.save()?;
    print_success(&format!(
        "Configuration reset to defaults ({})",
        Config::config_file_path().display()
    ));
    Ok(())
}
