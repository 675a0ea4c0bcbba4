//! Babel CLI - translate, transcribe and manage a Babel session from the
//! terminal.
//!
//! # Commands
//!
//! - `babel login` - Log in and store the session
//! - `babel register` - Create an account
//! - `babel logout` - End the session and wipe stored credentials
//! - `babel delete-account` - Delete the account
//! - `babel translate <text>` - Translate text
//! - `babel transcribe <file>` - Transcribe an audio file
//! - `babel history` - Show past requests
//! - `babel languages` - List supported languages
//! - `babel session` - Show stored credentials
//! - `babel watch` - Keep the session alive in the foreground

use babel_api::HistoryQuery;
use babel_log::{Level, LogConfig};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod context;
mod error;
mod output;

use commands::{account, history, session, translate};
use context::Context;
use error::CliResult;

/// Babel - translation and transcription client
#[derive(Parser)]
#[command(name = "babel")]
#[command(version)]
#[command(about = "Command-line client for the Babel translation service")]
#[command(propagate_version = true)]
#[command(after_help = format!(
    "{}\n  {} babel login -u ada\n  {} babel translate --to fr hello world\n  {} babel transcribe memo.mp3\n  {} babel watch",
    "Examples:".bright_cyan().bold(),
    "$".dimmed(),
    "$".dimmed(),
    "$".dimmed(),
    "$".dimmed(),
))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true, env = "BABEL_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with a username or email
    Login {
        /// Username or email
        #[arg(short = 'u', long)]
        identity: Option<String>,

        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create a new account
    Register {
        #[arg(short = 'u', long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted twice when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and wipe the stored credentials
    Logout,

    /// Delete your account
    DeleteAccount {
        #[arg(short, long)]
        password: Option<String>,

        /// Password again
        #[arg(long)]
        confirm: Option<String>,

        /// Skip the final confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Translate text (reads stdin when no text is given)
    #[command(alias = "t")]
    Translate {
        /// Text to translate, or `-` for stdin
        text: Vec<String>,

        /// Source language code
        #[arg(short, long, default_value = "auto")]
        from: String,

        /// Destination language code
        #[arg(short, long)]
        to: String,
    },

    /// Transcribe an audio file (mp3, aac, wav or ogg)
    Transcribe {
        file: PathBuf,
    },

    /// Show past translations and transcriptions
    History {
        #[arg(long, default_value_t = 0)]
        sort: u32,

        #[arg(long, default_value_t = 0)]
        filter: u32,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Keep loading pages until the last one
        #[arg(short, long)]
        all: bool,
    },

    /// List supported languages
    #[command(alias = "langs")]
    Languages {
        /// Only languages usable as a destination
        #[arg(short, long)]
        destination: bool,
    },

    /// Show the stored session
    Session,

    /// Keep the session alive until Ctrl+C
    Watch,
}

fn init_logging(cli: &Cli) {
    let mut config = LogConfig::from_env();
    if std::env::var("BABEL_LOG_LEVEL").is_err() && !config.debug {
        config.level = Level::Warn;
    }
    if cli.verbose {
        config.debug = true;
        config.level = Level::Debug;
    }
    if cli.quiet {
        config.level = Level::Error;
    }
    if cli.no_color {
        config.color = false;
    }
    babel_log::init_with(&config);

    if cli.verbose {
        babel_log::tracing_compat::init_subscriber();
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let ctx = Context::load(cli.config.as_deref(), cli.verbose)?;

    // Commands that talk to the server need a CSRF token first
    if !matches!(cli.command, Commands::Session) {
        ctx.client.ensure_csrf().await?;
    }

    match cli.command {
        Commands::Login { identity, password } => account::login(&ctx, identity, password).await,
        Commands::Register {
            username,
            email,
            password,
        } => account::register(&ctx, username, email, password).await,
        Commands::Logout => account::logout(&ctx).await,
        Commands::DeleteAccount {
            password,
            confirm,
            yes,
        } => account::delete_account(&ctx, password, confirm, yes).await,
        Commands::Translate { text, from, to } => translate::translate(&ctx, text, from, to).await,
        Commands::Transcribe { file } => translate::transcribe(&ctx, &file).await,
        Commands::History {
            sort,
            filter,
            page,
            all,
        } => {
            let query = HistoryQuery::new(sort, filter).with_page(page);
            history::run(&ctx, query, all).await
        }
        Commands::Languages { destination } => translate::languages(&ctx, destination).await,
        Commands::Session => session::show(&ctx).await,
        Commands::Watch => session::watch(&ctx).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    output::set_quiet(cli.quiet);
    init_logging(&cli);

    if let Err(e) = run(cli).await {
        eprintln!("\n  {} {}\n", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
