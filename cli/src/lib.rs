pub mod config;
pub mod reindex;
pub mod shell;

use anyhow::{Context, Result};
use kbsearch_core::{IndexStats, IndexStore, SearchOutcome};
use serde::Serialize;

pub use config::Config;
pub use reindex::{run_update, UpdateReport};
pub use shell::run_shell;

pub fn open_store(config: &Config) -> Result<IndexStore> {
    IndexStore::open(&config.index_path)
        .with_context(|| format!("failed to load index from {}", config.index_path.display()))
}

pub fn run_search(config: &Config, query: &str, top_k: i64) -> Result<SearchOutcome> {
    let store = open_store(config)?;
    Ok(store.search(query, top_k))
}

pub fn run_stats(config: &Config) -> Result<IndexStats> {
    let store = open_store(config)?;
    Ok(store.snapshot().stats())
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let s = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    Ok(s)
}
