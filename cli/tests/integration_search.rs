use kbsearch::{open_store, run_search, run_shell, run_stats, run_update, Config};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn write_index(path: &Path, term: &str) {
    let artifact = json!({
        "idf": {term: 1.0, "shared": 0.25},
        "docs": [
            {"id": "a#0", "path": "kb/a.md", "chunk_id": 0, "tf": {term: 2, "shared": 1}, "text": format!("{term} {term}\nshared")},
            {"id": "b#0", "path": "kb/b.md", "chunk_id": 0, "tf": {"shared": 1}, "text": "shared"}
        ],
        "lengths": [3, 1],
        "avgdl": 2.0,
        "N": 2
    });
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec(&artifact).unwrap()).unwrap();
}

fn config_for(index_path: &Path, update_command: &str) -> Config {
    Config { index_path: index_path.to_path_buf(), update_command: update_command.to_string(), shell: "/bin/sh".into() }
}

#[test]
fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("_index/bm25_index.json");
    write_index(&path, "rust");
    let config = config_for(&path, "true");

    let outcome = run_search(&config, "rust shared", 5).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["path"], json!("kb/a.md"));
    assert_eq!(arr[1]["path"], json!("kb/b.md"));
    assert_eq!(arr[0]["snippet"], json!("rust rust shared"));
    assert_eq!(json["index_chunks"], json!(2));
}

#[test]
fn search_without_index_fails_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = run_search(&config_for(&path, "true"), "rust", 5).unwrap_err();
    assert!(format!("{err:#}").contains("missing.json"));
}

#[test]
fn stats_report_index_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bm25_index.json");
    write_index(&path, "rust");
    let stats = run_stats(&config_for(&path, "true")).unwrap();
    assert_eq!(stats.loaded_docs, 2);
    assert_eq!(stats.vocabulary, 2);
    assert_eq!(stats.index_chunks, Some(2u64.into()));
}

#[tokio::test]
async fn update_reports_exit_status_and_output() {
    let dir = tempdir().unwrap();
    let config = config_for(&dir.path().join("i.json"), "echo rebuilding; echo oops >&2; exit 3");
    let report = run_update(&config, Some(Duration::from_secs(30))).await.unwrap();
    assert!(!report.ok);
    assert_eq!(report.returncode, Some(3));
    assert!(report.stdout.ends_with("rebuilding\n"));
    assert!(report.stderr.contains("oops"));
}

#[tokio::test]
async fn update_output_is_truncated_to_tail() {
    let dir = tempdir().unwrap();
    let config = config_for(&dir.path().join("i.json"), "i=0; while [ $i -lt 1000 ]; do echo 123456789; i=$((i+1)); done; echo END");
    let report = run_update(&config, None).await.unwrap();
    assert!(report.ok);
    assert_eq!(report.stdout.chars().count(), 4000);
    assert!(report.stdout.ends_with("END\n"));
}

#[tokio::test]
async fn update_times_out() {
    let dir = tempdir().unwrap();
    let config = config_for(&dir.path().join("i.json"), "sleep 5");
    let err = run_update(&config, Some(Duration::from_millis(100))).await.unwrap_err();
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn shell_answers_queries_and_reloads_after_update() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("_index/bm25_index.json");
    let next = dir.path().join("next.json");
    write_index(&path, "alpha");
    write_index(&next, "beta");
    let update = format!("cp '{}' '{}'", next.display(), path.display());
    let config = config_for(&path, &update);
    let store = Arc::new(open_store(&config).unwrap());

    let input: &[u8] = b"alpha\n   \n:update\nalpha\nbeta\n:stats\n:quit\nbeta\n";
    let mut out: Vec<u8> = Vec::new();
    run_shell(&config, Arc::clone(&store), 5, input, &mut out).await.unwrap();

    let replies: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(replies.len(), 6);
    assert_eq!(replies[0]["results"][0]["id"], json!("a#0"));
    assert_eq!(replies[1], json!({"error": "query is empty"}));
    assert_eq!(replies[2]["ok"], json!(true));
    assert_eq!(replies[2]["reloaded"], json!(true));
    assert!(replies[3]["results"].as_array().unwrap().is_empty());
    assert_eq!(replies[4]["results"][0]["path"], json!("kb/a.md"));
    assert_eq!(replies[5]["loaded_docs"], json!(2));
    assert!(store.snapshot().inverse_document_frequency.contains_key("beta"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shell_reload_sees_rewritten_index() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bm25_index.json");
    write_index(&path, "alpha");
    let config = config_for(&path, "true");
    let store = Arc::new(open_store(&config).unwrap());
    write_index(&path, "gamma");

    let input: &[u8] = b"gamma\n:reload\ngamma\n";
    let mut out: Vec<u8> = Vec::new();
    run_shell(&config, Arc::clone(&store), 5, input, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let replies: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert!(replies[0]["results"].as_array().unwrap().is_empty());
    assert_eq!(replies[1], json!({"reloaded": true, "docs": 2}));
    assert_eq!(replies[2]["results"][0]["id"], json!("a#0"));
    assert!(store.snapshot().inverse_document_frequency.contains_key("gamma"));
}

#[tokio::test]
async fn shell_keeps_index_when_reload_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bm25_index.json");
    write_index(&path, "alpha");
    let config = config_for(&path, "true");
    let store = Arc::new(open_store(&config).unwrap());
    fs::remove_file(&path).unwrap();

    let input: &[u8] = b":reload\nalpha\n";
    let mut out: Vec<u8> = Vec::new();
    run_shell(&config, Arc::clone(&store), 5, input, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let replies: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert!(replies[0]["error"].as_str().unwrap().contains("bm25_index.json"));
    assert_eq!(replies[1]["results"][0]["id"], json!("a#0"));
}
