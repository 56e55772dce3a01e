use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use group_review_config::{Config, PathManager};
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, path_manager: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(path_manager, output),
        ConfigCommands::Set {
            base_url,
            timeout_seconds,
        } => set_config(path_manager, base_url, timeout_seconds, output),
    }
}

fn load_config(path_manager: &PathManager) -> Result<Config> {
    let config_file = path_manager.config_file();
    Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

fn show_config(path_manager: &PathManager, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    let config = load_config(path_manager)?;
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|f| f.display().to_string());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if !config_file.exists() {
                output.warn(format!(
                    "No configuration file at {}; showing defaults",
                    config_file.display()
                ));
            }

            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            table.set_header(vec![
                Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
                Cell::new("Value").fg(Color::Cyan).add_attribute(Attribute::Bold),
            ]);
            table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display().to_string())]);
            table.add_row(vec![Cell::new("API base URL"), Cell::new(&config.api.base_url)]);
            table.add_row(vec![
                Cell::new("Request timeout"),
                Cell::new(format!("{}s", config.api.timeout_seconds)),
            ]);
            table.add_row(vec![Cell::new("Log level"), Cell::new(&config.logging.level)]);
            table.add_row(vec![
                Cell::new("JSON logs"),
                Cell::new(match config.logging.json {
                    Some(true) => "yes",
                    Some(false) => "no",
                    None => "auto",
                }),
            ]);
            table.add_row(vec![
                Cell::new("Log file"),
                Cell::new(log_file.as_deref().unwrap_or("<stderr>")),
            ]);
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "api": {
                    "base_url": config.api.base_url,
                    "timeout_seconds": config.api.timeout_seconds,
                },
                "logging": {
                    "level": config.logging.level,
                    "json": config.logging.json,
                    "file": log_file,
                },
            }));
        }
    }

    Ok(())
}

fn set_config(
    path_manager: &PathManager,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
    output: &Output,
) -> Result<()> {
    if base_url.is_none() && timeout_seconds.is_none() {
        output.warn("Nothing to change. Use --base-url or --timeout-seconds");
        return Ok(());
    }

    let mut config = load_config(path_manager)?;
    if let Some(base_url) = base_url {
        config.api.base_url = base_url.trim().trim_end_matches('/').to_string();
    }
    if let Some(timeout_seconds) = timeout_seconds {
        config.api.timeout_seconds = timeout_seconds;
    }
    config.validate().map_err(|e| eyre!("{}", e))?;

    let config_file = path_manager.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}
