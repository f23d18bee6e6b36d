use anyhow::Result;
use clap::{Parser, Subcommand};
use kbsearch::config::{DEFAULT_INDEX_PATH, DEFAULT_SHELL, DEFAULT_UPDATE_COMMAND};
use kbsearch::{open_store, run_search, run_shell, run_stats, run_update, to_json, Config};
use kbsearch_core::ranking::DEFAULT_TOP_K;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{stdin, stdout, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "kbsearch")]
#[command(about = "Search a local knowledge base with a prebuilt BM25 index", long_about = None)]
struct Cli {
    /// Path to the BM25 index artifact
    #[arg(long, env = "KB_INDEX", default_value = DEFAULT_INDEX_PATH, global = true)]
    index: PathBuf,
    /// Command that rebuilds the index
    #[arg(long, env = "KB_UPDATE_COMMAND", default_value = DEFAULT_UPDATE_COMMAND, global = true)]
    update_command: String,
    /// Shell used to run the update command as `<shell> -lc <command>`
    #[arg(long, env = "KB_SHELL", default_value = DEFAULT_SHELL, global = true)]
    shell: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank indexed chunks against a free-text query
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        /// Number of results, clamped to 1..=20
        #[arg(long, default_value_t = DEFAULT_TOP_K, allow_negative_numbers = true)]
        top_k: i64,
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Run the external update command that rebuilds the index
    Update {
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print index statistics
    Stats {
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Answer queries from stdin, one JSON line per input line
    Shell {
        #[arg(long, default_value_t = DEFAULT_TOP_K, allow_negative_numbers = true)]
        top_k: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let config = Config { index_path: cli.index, update_command: cli.update_command, shell: cli.shell };

    match cli.command {
        Commands::Search { query, top_k, pretty } => {
            let outcome = run_search(&config, &query.join(" "), top_k)?;
            println!("{}", to_json(&outcome, pretty)?);
        }
        Commands::Update { timeout_secs, pretty } => {
            let report = run_update(&config, timeout_secs.map(Duration::from_secs)).await?;
            println!("{}", to_json(&report, pretty)?);
        }
        Commands::Stats { pretty } => {
            println!("{}", to_json(&run_stats(&config)?, pretty)?);
        }
        Commands::Shell { top_k } => {
            let store = Arc::new(open_store(&config)?);
            tracing::info!(path = %store.path().display(), "shell ready");
            run_shell(&config, store, top_k, BufReader::new(stdin()), stdout()).await?;
        }
    }
    Ok(())
}
