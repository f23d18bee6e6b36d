//! Line-oriented interactive loop over one [`IndexStore`].
//!
//! Every input line is answered with exactly one JSON line. Lines starting
//! with `:` are commands, anything else is a query. Reloads read and parse
//! the artifact on the blocking pool.

use crate::config::Config;
use crate::reindex::run_update;
use anyhow::Result;
use kbsearch_core::{Index, IndexResult, IndexStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

enum Step {
    Reply(Value),
    Quit,
}

pub async fn run_shell<R, W>(config: &Config, store: Arc<IndexStore>, top_k: i64, input: R, mut out: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let reply = match handle_line(config, &store, top_k, &line).await? {
            Step::Reply(v) => v,
            Step::Quit => break,
        };
        let mut buf = serde_json::to_vec(&reply)?;
        buf.push(b'\n');
        out.write_all(&buf).await?;
        out.flush().await?;
    }
    Ok(())
}

async fn handle_line(config: &Config, store: &Arc<IndexStore>, top_k: i64, line: &str) -> Result<Step> {
    let step = match line.trim() {
        ":quit" | ":q" => Step::Quit,
        ":reload" => Step::Reply(match reload(store).await? {
            Ok(idx) => json!({ "reloaded": true, "docs": idx.len() }),
            Err(e) => json!({ "error": e.to_string() }),
        }),
        ":stats" => Step::Reply(serde_json::to_value(store.snapshot().stats())?),
        ":update" => {
            let reply = match run_update(config, None).await {
                Ok(report) => {
                    let reloaded = report.ok && reload(store).await?.is_ok();
                    let mut v = serde_json::to_value(&report)?;
                    v["reloaded"] = Value::Bool(reloaded);
                    v
                }
                Err(e) => json!({ "error": format!("{e:#}") }),
            };
            Step::Reply(reply)
        }
        query => Step::Reply(serde_json::to_value(store.search(query, top_k))?),
    };
    Ok(step)
}

async fn reload(store: &Arc<IndexStore>) -> Result<IndexResult<Arc<Index>>> {
    let store = Arc::clone(store);
    Ok(tokio::task::spawn_blocking(move || store.reload()).await?)
}
