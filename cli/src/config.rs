use std::path::PathBuf;

pub const DEFAULT_INDEX_PATH: &str = "./_index/bm25_index.json";
pub const DEFAULT_UPDATE_COMMAND: &str = "kb_update";
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Where the index lives and how to rebuild it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub index_path: PathBuf,
    /// Command line handed to `<shell> -lc`.
    pub update_command: String,
    pub shell: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            update_command: DEFAULT_UPDATE_COMMAND.to_string(),
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}
