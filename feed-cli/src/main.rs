//! # feed-cli
//!
//! CLI front end for a postfeed server.
//!
//! ## Commands
//!
//! - `list`: Show the feed
//! - `like`: Toggle the like on a post
//! - `remove`: Delete a post
//! - `post`: Publish a new post
//! - `edit`: Change the content of a post
//!
//! ## Example
//!
//! ```bash
//! # Show the feed from the configured server
//! feed-cli list
//!
//! # Try things out against an in-memory feed
//! feed-cli --mock like 2
//! feed-cli --mock post "Hello, feed!"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{edit, like, list, post, remove};
use config::Config;
use feed_client::{HttpPostSource, MockPostSource, PostSource};
use feed_types::PostId;

/// CLI front end for a postfeed server.
#[derive(Parser, Debug)]
#[command(name = "feed-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./feed.toml if present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Use an in-memory feed instead of the HTTP server (for testing/demo)
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the feed
    List,

    /// Toggle the like on a post
    Like {
        /// Post id
        id: i64,
    },

    /// Delete a post
    Remove {
        /// Post id
        id: i64,
    },

    /// Publish a new post
    Post {
        /// Post content
        text: String,
    },

    /// Change the content of a post
    Edit {
        /// Post id
        id: i64,

        /// New content
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.mock {
        tracing::info!("Using in-memory feed");
        dispatch(
            MockPostSource::with_posts(commands::demo_posts()),
            cli.command,
        )
        .await
    } else {
        let http = config.source.to_http();
        tracing::info!("Using feed at {}{}", http.base_url, http.api_prefix);
        let source = HttpPostSource::new(http).context("Failed to build HTTP client")?;
        dispatch(source, cli.command).await
    }
}

async fn dispatch<S: PostSource + 'static>(source: S, command: Commands) -> Result<()> {
    match command {
        Commands::List => list::run(source).await,
        Commands::Like { id } => like::run(source, PostId::new(id)).await,
        Commands::Remove { id } => remove::run(source, PostId::new(id)).await,
        Commands::Post { text } => post::run(source, &text).await,
        Commands::Edit { id, text } => edit::run(source, PostId::new(id), &text).await,
    }
}
