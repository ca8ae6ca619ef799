//! # Event Indexer CLI (`evix`)
//!
//! The `evix` binary drives indexing passes from a TOML configuration file:
//! it bootstraps the two databases, executes every configured pass, and
//! offers keyword search and statistics over the committed index.
//!
//! ## Usage
//!
//! ```bash
//! evix --config ./config/evix.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `evix init` | Create the store and index databases and run schema migrations |
//! | `evix indexers` | List configured indexer entries and their scope health |
//! | `evix run` | Execute every configured indexing pass |
//! | `evix search "<query>"` | Keyword search over committed index entries |
//! | `evix stats` | Index totals and per-partition breakdown |
//! | `evix completions <shell>` | Generate shell completions |

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use event_indexer::config::{self, Config};
use event_indexer::hooks::HookRegistry;
use event_indexer::index::{SearchIndex, SqliteSearchIndex};
use event_indexer::indexer::EventIndexer;
use event_indexer::store::SqliteRecordStore;
use event_indexer::{db, migrate, scope, search, stats};

/// Event Indexer — harvests event records from a relational store into a
/// faceted full-text search index.
#[derive(Parser)]
#[command(
    name = "evix",
    about = "Event Indexer — harvest event records into a faceted full-text search index",
    version,
    long_about = "Each configured pass resolves a container scope, fetches candidate events, \
    applies category-based inclusion filtering, shapes raw fields into indexable content, and \
    commits one document per surviving event with facet tags and validity metadata."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/evix.toml`. Store/index paths and all indexer
    /// entries are read from this file.
    #[arg(long, global = true, default_value = "./config/evix.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize both database schemas.
    ///
    /// Creates the store and index database files and all required tables.
    /// Idempotent — running it multiple times is safe. The store-side schema
    /// exists for development setups; in production the event store is owned
    /// by the host system.
    Init,

    /// List configured indexer entries and their scope health.
    ///
    /// Resolves each entry's container scope and flags entries whose scope
    /// comes up empty (those passes will fail) or whose type this indexer
    /// does not serve (those passes are declined).
    Indexers,

    /// Execute configured indexing passes.
    ///
    /// Runs one pass per `[[indexers]]` entry and prints each non-empty
    /// summary line. Re-running with an unchanged store rewrites the same
    /// entries; freshness comes from re-running, not from deltas.
    Run {
        /// Only run the entry with this title.
        #[arg(long)]
        indexer: Option<String>,
    },

    /// Keyword search over committed index entries.
    Search {
        /// The search query string (FTS5 syntax).
        query: String,

        /// Maximum number of results.
        #[arg(long, default_value_t = 12)]
        limit: i64,
    },

    /// Index totals and a per-kind/per-partition breakdown.
    Stats,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        generate(*shell, &mut Cli::command(), "evix", &mut std::io::stdout());
        return Ok(());
    }

    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => run_init(&config).await,
        Commands::Indexers => list_indexers(&config).await,
        Commands::Run { indexer } => run_passes(&config, indexer.as_deref()).await,
        Commands::Search { query, limit } => {
            let pool = db::connect(&config.index.path).await?;
            let result = search::run_search(&pool, &query, limit).await;
            pool.close().await;
            result
        }
        Commands::Stats => {
            let pool = db::connect(&config.index.path).await?;
            let result = stats::run_stats(&config, &pool).await;
            pool.close().await;
            result
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

async fn run_init(config: &Config) -> Result<()> {
    let store_pool = db::connect(&config.store.path).await?;
    migrate::init_store_schema(&store_pool).await?;
    store_pool.close().await;
    println!("store initialized: {}", config.store.path.display());

    let index_pool = db::connect(&config.index.path).await?;
    migrate::init_index_schema(&index_pool).await?;
    index_pool.close().await;
    println!("index initialized: {}", config.index.path.display());

    Ok(())
}

async fn list_indexers(config: &Config) -> Result<()> {
    if config.indexers.is_empty() {
        println!("No indexers configured.");
        return Ok(());
    }

    let store_pool = db::connect(&config.store.path).await?;
    let record_store = SqliteRecordStore::new(store_pool.clone());

    println!(
        "{:<28} {:<12} {:>10}  STATUS",
        "TITLE", "TYPE", "CONTAINERS"
    );
    for entry in &config.indexers {
        let resolved = scope::resolve_scope(
            &record_store,
            &entry.startingpoints_recursive,
            entry.sysfolder,
        )
        .await?;
        let status = if entry.kind != EventIndexer::KIND {
            "UNSERVED TYPE"
        } else if resolved.is_empty() {
            "EMPTY SCOPE"
        } else {
            "OK"
        };
        println!(
            "{:<28} {:<12} {:>10}  {}",
            entry.title,
            entry.kind,
            resolved.len(),
            status
        );
    }

    store_pool.close().await;
    Ok(())
}

async fn run_passes(config: &Config, only: Option<&str>) -> Result<()> {
    let store_pool = db::connect(&config.store.path).await?;
    let index_pool = db::connect(&config.index.path).await?;

    let record_store = SqliteRecordStore::new(store_pool.clone());
    let search_index = SqliteSearchIndex::new(index_pool.clone());
    let hooks = HookRegistry::new();
    let event_indexer = EventIndexer::new(&record_store, &search_index, &hooks);

    let mut matched = 0usize;
    for entry in &config.indexers {
        if let Some(title) = only {
            if entry.title != title {
                continue;
            }
        }
        matched += 1;

        let summary = event_indexer.run(entry).await?;
        if !summary.is_empty() {
            println!("{summary}");
        }
    }

    if matched == 0 {
        match only {
            Some(title) => println!("No indexer titled \"{title}\" configured."),
            None => println!("No indexers configured."),
        }
    } else {
        println!("total entries written: {}", search_index.written_count());
    }

    index_pool.close().await;
    store_pool.close().await;
    Ok(())
}
