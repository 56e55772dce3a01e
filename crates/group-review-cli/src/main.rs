use clap::{ArgAction, Parser, Subcommand};
use commands::{config, review, session};
use group_review_config::{Config, PathManager};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "groupreview")]
#[command(about = "Write and edit group reviews from the terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add or edit a review
    Review {
        #[command(subcommand)]
        cmd: ReviewCommands,
    },
    /// Manage the signed-in session (bearer token and user id)
    #[command(long_about = "Store, show or clear the bearer token and user id used to authorize review requests. Tokens are issued by the group service; this tool only stores them.")]
    Session {
        #[command(subcommand)]
        cmd: SessionCommands,
    },
    /// View or change settings
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// Write a new review for a media item in a group
    #[command(long_about = "Write a new review. Missing --text or --rating values are prompted for when running in a terminal.")]
    Add {
        /// Group id
        #[arg(long)]
        group: u64,

        /// Media id
        #[arg(long)]
        media: u64,

        #[command(flatten)]
        fields: ReviewFields,
    },
    /// Edit one of your existing reviews
    #[command(long_about = "Edit an existing review. The review is read from a JSON file shaped like {\"id\": 1, \"text\": \"...\", \"rating\": 7, \"user_id\": 42}. Reviews written by someone else are not shown.")]
    Edit {
        /// Group id
        #[arg(long)]
        group: u64,

        /// Media id
        #[arg(long)]
        media: u64,

        /// JSON file holding the review to edit
        #[arg(long, value_name = "PATH")]
        review_file: PathBuf,

        #[command(flatten)]
        fields: ReviewFields,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ReviewFields {
    /// Review text
    #[arg(long)]
    pub text: Option<String>,

    /// Rating from 0 to 10 (decimals are rounded)
    #[arg(long, allow_hyphen_values = true)]
    pub rating: Option<String>,

    /// Submit without asking for confirmation
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Store a token and user id (prompts for missing values)
    Set {
        /// Bearer token
        #[arg(long)]
        token: Option<String>,

        /// Your user id
        #[arg(long)]
        user_id: Option<u64>,
    },
    /// Show the stored session (token masked)
    Show {
        /// Show the full token
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Forget the stored session
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Change API settings
    Set {
        /// Base URL of the review API
        #[arg(long)]
        base_url: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout_seconds: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let (app_config, config_error) = match Config::load_or_default(&config_file) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    logging::init_logging(cli.verbose, cli.quiet, &app_config.logging)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    if let Some(e) = config_error {
        tracing::warn!("Ignoring unreadable config at {}: {}", config_file.display(), e);
    }

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Review { cmd } => review::run_review(cmd, &app_config, &path_manager, &output).await,
        Commands::Session { cmd } => session::run_session(cmd, &path_manager, &output),
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show);
            config::run_config(cmd, &path_manager, &output)
        }
    }
}
