//! `lumen` command-line client: generate images and manage local history.

mod commands;
mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, info};
use lumen_rs_config::LumenConfig;
use lumen_rs_protocol::GenerationStatus;
use lumen_rs_store::SortOrder;
use std::path::{Path, PathBuf};

/// Command-line options for the Lumen client.
#[derive(Parser)]
#[command(name = "lumen", version)]
struct Cli {
    /// Optional path to a lumen.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an image from a prompt
    Generate {
        prompt: String,
        /// Style preset id
        #[arg(long)]
        style: Option<String>,
        /// Instruction text sent ahead of the prompt
        #[arg(long)]
        system_prompt: Option<String>,
    },
    /// Retry a failed generation
    Retry { id: String },
    /// List stored generations
    History {
        /// Case-insensitive prompt filter
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        style: Option<String>,
        /// generating, completed, or error
        #[arg(long)]
        status: Option<GenerationStatus>,
        /// newest, oldest, or prompt
        #[arg(long, default_value = "newest")]
        sort: SortOrder,
        #[arg(long)]
        limit: Option<usize>,
        /// Print counts instead of records
        #[arg(long)]
        stats: bool,
    },
    /// Show one stored generation as JSON
    Show { id: String },
    /// Save a completed generation's image to disk
    Download {
        id: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete a stored generation
    Delete { id: String },
    /// Delete all stored generations
    Clear,
    /// Write history and settings to a JSON file
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace history and merge settings from an exported file
    Import { file: PathBuf },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// List style presets
    Styles,
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Check that the generation endpoint answers
    Ping,
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        system_prompt: Option<String>,
        #[arg(long)]
        default_style: Option<String>,
        #[arg(long)]
        max_images: Option<usize>,
    },
}

/// Entry point for the Lumen CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lumen_rs::init_logging();

    let cli = Cli::parse();
    info!("starting lumen (config_set={})", cli.config.is_some());
    let config = load_config(cli.config.as_deref())?;
    commands::run(cli.command, config).await
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LumenConfig> {
    if let Some(path) = path {
        return LumenConfig::load_from_path(path).context("failed to load config");
    }
    let cwd = std::env::current_dir().context("cwd")?;
    let layered = LumenConfig::load_layered(&cwd).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, SettingsCommand};
    use clap::Parser;
    use lumen_rs_protocol::GenerationStatus;
    use lumen_rs_store::SortOrder;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn parses_history_filters() {
        let cli = Cli::try_parse_from([
            "lumen", "history", "--status", "error", "--sort", "oldest", "--limit", "5",
        ])
        .expect("parse");
        match cli.command {
            Command::History {
                status, sort, limit, ..
            } => {
                assert_eq!(status, Some(GenerationStatus::Error));
                assert_eq!(sort, SortOrder::Oldest);
                assert_eq!(limit, Some(5));
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn parses_settings_set() {
        let cli = Cli::try_parse_from([
            "lumen",
            "--config",
            "x.json5",
            "settings",
            "set",
            "--default-style",
            "vintage",
        ])
        .expect("parse");
        assert!(cli.config.is_some());
        match cli.command {
            Command::Settings {
                action: SettingsCommand::Set { default_style, .. },
            } => assert_eq!(default_style.as_deref(), Some("vintage")),
            _ => panic!("expected settings set"),
        }
    }

    #[test]
    fn parses_download_output() {
        let cli = Cli::try_parse_from(["lumen", "download", "img_1", "--output", "fox.jpg"])
            .expect("parse");
        match cli.command {
            Command::Download { id, output } => {
                assert_eq!(id, "img_1");
                assert_eq!(output, Some(PathBuf::from("fox.jpg")));
            }
            _ => panic!("expected download"),
        }
    }

    #[test]
    fn rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["lumen", "history", "--sort", "random"]).is_err());
    }
}
