use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use commands::{config, menu, movies, serve, users};

mod commands;
mod context;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelcase")]
#[command(about = "Reelcase - Keep track of the movies you have seen")]
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

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    Users {
        #[command(subcommand)]
        cmd: UserCommands,
    },
    /// Work with one user's movie collection
    #[command(long_about = "Add, remove, annotate and analyse the movies in a user's collection. New movies are looked up by title on OMDb and their ratings normalized to a 0-100 scale.")]
    Movies {
        /// Name of the collection owner
        #[arg(short, long)]
        user: String,

        #[command(subcommand)]
        action: MovieCommands,
    },
    /// Interactive menu
    Menu,
    /// Serve a small web UI
    #[command(long_about = "Serve a web UI for managing users and their collections. Logs are written to the log directory rather than the terminal.")]
    Serve {
        /// Address to listen on (defaults to server.bind from config)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Configure settings and credentials
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List all users
    List,
    /// Create a user
    Add { name: String },
    /// Rename a user
    Rename { name: String, new_name: String },
    /// Delete a user and their whole collection
    Delete {
        name: String,

        /// Do not ask for confirmation
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum MovieCommands {
    /// List the collection
    List,
    /// Look a movie up on OMDb and add it
    Add {
        title: String,

        /// Personal note stored with the movie
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove a movie by title
    Delete { title: String },
    /// Set the note on a movie
    Note { title: String, note: String },
    /// Average, median, best and worst movies
    Stats,
    /// Pick a random movie
    Random,
    /// Fuzzy search by title
    Search { query: String },
    /// Highest rated first
    SortRating,
    /// Oldest first, or newest first with --descending
    SortYear {
        #[arg(long, action = ArgAction::SetTrue)]
        descending: bool,
    },
    /// Filter by minimum rating and year range
    Filter {
        /// Minimum rating on the 0-100 scale
        #[arg(long)]
        min_rating: Option<f64>,

        #[arg(long)]
        min_year: Option<i32>,

        #[arg(long)]
        max_year: Option<i32>,
    },
    /// Rating distribution
    Histogram {
        #[arg(long, default_value_t = movie_catalog_core::DEFAULT_HISTOGRAM_BINS)]
        bins: usize,
    },
    /// Generate a static HTML page of the collection
    Website,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the OMDb API key
    #[command(long_about = "Store the OMDb API key in the credentials file. Get a free key at https://www.omdbapi.com/apikey.aspx. The OMDB_API_KEY environment variable takes precedence over the stored key.")]
    Omdb {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let ctx = context::AppContext::load(cli.config.clone())?;

    // serve always logs to a file
    let log_file = match cli.command {
        Commands::Serve { .. } => Some(
            ctx.config
                .logging
                .file
                .clone()
                .unwrap_or_else(|| ctx.paths.server_log_file()),
        ),
        _ => ctx.config.logging.file.clone(),
    };
    let _log_guard = logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Users { cmd } => users::run_users(cmd, &ctx, &output),
        Commands::Movies { user, action } => movies::run_movies(&user, action, &ctx, &output).await,
        Commands::Menu => menu::run_menu(&ctx, &output).await,
        Commands::Serve { bind } => serve::run_serve(bind, &ctx, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &ctx, &output),
    }
}
