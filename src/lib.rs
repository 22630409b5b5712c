pub mod ai;
pub mod bot;
pub mod config;
pub mod disk;
pub mod indexer;
pub mod model;
pub mod search;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "hdla",
    version,
    about = "HDL Assistant: documentation search bot for smart-home equipment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Telegram bot (long polling)
    Run {
        /// Override the file index location
        #[arg(long)]
        index: Option<PathBuf>,
    },
    /// Crawl the disk folder tree and rebuild the file index
    Index {
        /// Folder to crawl (defaults to YANDEX_DISK_FOLDER_PATH)
        #[arg(long)]
        base: Option<String>,

        /// Output file (defaults to the configured index path)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run a hybrid search against a local index and print the results
    Search {
        /// The query text
        query: String,

        /// Maximum results
        #[arg(long, default_value_t = search::DEFAULT_LIMIT)]
        limit: usize,

        /// Index file to search (defaults to the configured index path)
        #[arg(long)]
        index: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { index } => run_bot(index).await,
        Commands::Index { base, out } => run_index(base, out).await,
        Commands::Search {
            query,
            limit,
            index,
            json,
        } => run_search(&query, limit, index, json),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "hdla", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
    }
}

async fn run_bot(index_override: Option<PathBuf>) -> Result<()> {
    let mut config = config::AppConfig::from_env()?;
    if let Some(index) = index_override {
        config.index_path = index;
    }
    let engine = search::SearchEngine::load(&config.index_path, search::EngineConfig::default());
    bot::BotApp::new(config, engine).run().await
}

async fn run_index(base: Option<String>, out: Option<PathBuf>) -> Result<()> {
    let disk_config = config::DiskConfig::from_env()?;
    let base = base.unwrap_or_else(|| disk_config.folder_path.clone());
    let out = out.unwrap_or_else(config::index_path_from_env);
    let client = disk::DiskClient::new(&disk_config.token)?;
    let normalizer = search::normalize::Normalizer::default();
    let count = indexer::build_index(&client, &base, &out, &normalizer).await?;
    println!("Indexed {count} PDF documents into {}", out.display());
    Ok(())
}

fn run_search(query: &str, limit: usize, index: Option<PathBuf>, json: bool) -> Result<()> {
    let index_path = index.unwrap_or_else(config::index_path_from_env);
    let engine = search::SearchEngine::load(&index_path, search::EngineConfig::default());
    let results = engine.hybrid_search(query, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No documents found for {query:?}");
        return Ok(());
    }
    for (i, result) in results.iter().enumerate() {
        match result {
            model::types::SearchResult::Document { record, relevance } => {
                println!("{}. {} ({relevance:.2})", i + 1, record.name);
                println!("   {}", record.path);
            }
            model::types::SearchResult::FolderLink { link, .. } => {
                println!("{}. [folder] {}", i + 1, link.name);
                println!("   {}", link.folder_link);
            }
        }
    }
    Ok(())
}
