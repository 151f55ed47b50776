//! Polydex CLI
//!
//! Command-line tools for building and querying Polydex search indices over
//! JSON record files.
//!
//! # Commands
//!
//! - `search` - Build an index and run one query against it
//! - `stats` - Build an index and display its statistics
//! - `apply` - Build an index, apply a change batch, then query it
//! - `soundex` - Print Soundex codes for words

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Polydex command-line search tools.
#[derive(Parser)]
#[command(name = "polydex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Index configuration file (JSON)
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index over a record file and search it
    Search {
        /// JSON file holding an array of records
        records: PathBuf,

        /// Field path to index (repeatable)
        #[arg(short = 'F', long = "field", required = true)]
        fields: Vec<String>,

        /// Query string
        #[arg(short, long)]
        query: String,

        /// Match mode (exact, prefix, partial, fuzzy)
        #[arg(short, long, default_value = "exact")]
        mode: String,

        /// Compare raw values case-sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// Drop results scoring below this value
        #[arg(long)]
        min_score: Option<f64>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Build an index over a record file and display its statistics
    Stats {
        /// JSON file holding an array of records
        records: PathBuf,

        /// Field path to index (repeatable)
        #[arg(short = 'F', long = "field", required = true)]
        fields: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Build an index, apply a change batch, then search it
    Apply {
        /// JSON file holding an array of records
        records: PathBuf,

        /// Field path to index (repeatable)
        #[arg(short = 'F', long = "field", required = true)]
        fields: Vec<String>,

        /// JSON file holding an array of changes
        #[arg(short, long)]
        changes: PathBuf,

        /// Override the rebuild threshold
        #[arg(short, long)]
        threshold: Option<u64>,

        /// Retract stale keys immediately instead of waiting for a rebuild
        #[arg(short, long)]
        precise: bool,

        /// Query string
        #[arg(short, long)]
        query: String,

        /// Match mode (exact, prefix, partial, fuzzy)
        #[arg(short, long, default_value = "exact")]
        mode: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the Soundex code of each word
    Soundex {
        /// Words to encode
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Search {
            records,
            fields,
            query,
            mode,
            case_sensitive,
            min_score,
            limit,
            format,
        } => {
            let request = commands::search::SearchRequest {
                query,
                mode: mode.parse()?,
                case_sensitive,
                min_score,
                limit,
            };
            commands::search::run(&records, &fields, config, &request, format.parse()?)?;
        }
        Commands::Stats {
            records,
            fields,
            format,
        } => {
            commands::stats::run(&records, &fields, config, format.parse()?)?;
        }
        Commands::Apply {
            records,
            fields,
            changes,
            threshold,
            precise,
            query,
            mode,
            format,
        } => {
            let mut config = config;
            if let Some(threshold) = threshold {
                config = config.rebuild_threshold(threshold);
            }
            if precise {
                config = config.precise();
            }
            commands::apply::run(
                &records,
                &fields,
                &changes,
                config,
                &query,
                mode.parse()?,
                format.parse()?,
            )?;
        }
        Commands::Soundex { words } => {
            commands::soundex::run(&words);
        }
        Commands::Version => {
            println!("Polydex CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Polydex Core v{}", polydex_core::VERSION);
        }
    }

    Ok(())
}
