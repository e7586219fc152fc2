//! linkshare CLI
//!
//! Command-line interface for linkshare - save, search and share links.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use linkshare_core::{Config, GatewayError, LinkCollection};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "linkshare")]
#[command(about = "linkshare - Save, tag and share links")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as the given email
    Login {
        /// Email address
        email: String,
    },
    /// Sign out
    Logout,
    /// Show status (signed-in user, counts)
    Status,
    /// Manage your links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// List links shared with you
    Shared {
        /// Only show links matching this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List all tags on your links
    Tags,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Save a new link
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Title for the link
        #[arg(short = 'T', long)]
        title: String,
        /// Tag to add (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,
        /// Comma-separated tags, e.g. "rust, web"
        #[arg(long)]
        tags: Option<String>,
    },
    /// List your links
    #[command(alias = "ls")]
    List {
        /// Only show links matching this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show link details
    Show {
        /// Link ID (full UUID or prefix)
        id: String,
    },
    /// Share a link by email
    Share {
        /// Link ID (full UUID or prefix)
        id: String,
        /// Recipient email
        email: String,
    },
    /// Open a link in the browser
    Open {
        /// Link ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = dispatch(cli, &output).await;
    if let Err(e) = &result {
        if let Some(hint) = error_hint(e) {
            eprintln!("Hint: {}", hint);
        }
    }
    result
}

async fn dispatch(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    // Config commands work even with a broken data directory
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, output);
    }

    let config = Config::load_with_cli_override(config_path)?;
    init_logging(&config);

    match cli.command {
        Commands::Login { email } => commands::auth::login(config, email, config_path, output),
        Commands::Logout => commands::auth::logout(config, config_path, output),
        Commands::Config { .. } => Ok(()),
        command => run(command, &config, output).await,
    }
}

/// Commands that act on the signed-in user's data
async fn run(command: Commands, config: &Config, output: &Output) -> Result<()> {
    let (gateway, session) = commands::auth::open(config)?;
    let session = Arc::new(session);
    let collection = LinkCollection::new(gateway, session.clone());

    match command {
        Commands::Status => commands::status::show(config, &session, &collection, output).await,
        Commands::Link { command } => handle_link_command(command, &collection, output).await,
        Commands::Shared { search } => commands::shared::list(&collection, search, output).await,
        Commands::Tags => commands::tag::list(&collection, output).await,
        Commands::Login { .. } | Commands::Logout | Commands::Config { .. } => Ok(()),
    }
}

async fn handle_link_command(
    command: LinkCommands,
    collection: &LinkCollection,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::Add {
            url,
            title,
            tag,
            tags,
        } => commands::link::create(collection, url, title, tag, tags, output).await,
        LinkCommands::List { search } => commands::link::list(collection, search, output).await,
        LinkCommands::Show { id } => commands::link::show(collection, id, output).await,
        LinkCommands::Share { id, email } => {
            commands::link::share(collection, id, email, output).await
        }
        LinkCommands::Open { id } => commands::link::open_link(collection, id, output).await,
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Follow-up advice for errors raised by the core library
fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<linkshare_core::Error>() {
            if err.is_auth() {
                return Some("Check who is signed in with `linkshare status`, or sign in with `linkshare login <email>`.");
            }
            if let linkshare_core::Error::Backend(gateway) = err {
                return gateway.recovery_suggestion();
            }
            return None;
        }
        if let Some(gateway) = cause.downcast_ref::<GatewayError>() {
            return gateway.recovery_suggestion();
        }
    }
    None
}

/// Initialize logging
///
/// Only initializes if LINKSHARE_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("LINKSHARE_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "linkshare_core={},linkshare_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
