//! # Onpage CLI (`onpage`)
//!
//! ## Usage
//!
//! ```bash
//! onpage --config ./config/onpage.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `onpage score <file> --keyword <kw>` | Score a content file against a focus keyword |
//! | `onpage keywords <file>` | Rank keyword candidates for a content file |
//! | `onpage rewrite <file> --keyword <kw>` | Suggest a rewritten title, meta description, and content notes |
//!
//! Content files are JSON objects with `id`, `title`, `body_markup`,
//! `excerpt`, `url`, `site_base_url`, and the ordered override lists
//! `meta_title_sources` / `meta_description_sources`.
//!
//! Logs go to stderr; set `RUST_LOG=onpage=debug` for request details.

use clap::{Parser, Subcommand};
use onpage::{config, score_cmd, suggest_cmd};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Onpage: on-page SEO scoring and keyword/rewrite suggestions.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist, built-in defaults are used
/// (template keyword suggestions, no rewrite provider).
#[derive(Parser)]
#[command(
    name = "onpage",
    about = "Onpage: on-page SEO scoring and keyword/rewrite suggestions",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/onpage.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score content against a focus keyword.
    ///
    /// Prints the 0–100 score, the status (optimized, partially_optimized,
    /// needs_optimization), and the points awarded per signal.
    Score {
        /// Path to the JSON content file.
        file: PathBuf,

        /// Focus keyword (case-insensitive, matched as a literal phrase).
        #[arg(long, short)]
        keyword: String,

        /// Print the analysis result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Suggest ranked keyword candidates.
    ///
    /// Uses the configured provider and falls back to title templates when
    /// it is unavailable.
    Keywords {
        /// Path to the JSON content file.
        file: PathBuf,

        /// Print candidates as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Suggest a rewritten title, meta description, and content notes.
    ///
    /// Requires a text-generation provider (`openai` or `ollama`).
    Rewrite {
        /// Path to the JSON content file.
        file: PathBuf,

        /// Focus keyword the rewrite should target.
        #[arg(long, short)]
        keyword: String,

        /// Print the suggestion bundle as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("onpage=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config_or_minimal(&cli.config)?;

    match cli.command {
        Commands::Score {
            file,
            keyword,
            json,
        } => {
            score_cmd::run_score(&cfg, &file, &keyword, json)?;
        }
        Commands::Keywords { file, json } => {
            suggest_cmd::run_keywords(&cfg, &file, json).await?;
        }
        Commands::Rewrite {
            file,
            keyword,
            json,
        } => {
            suggest_cmd::run_rewrite(&cfg, &file, &keyword, json).await?;
        }
    }

    Ok(())
}
