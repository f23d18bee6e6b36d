use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or writing an index artifact.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index not found at {}. Run the update command first.", .path.display())]
    NotFound { path: PathBuf },
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed index at {}: {source}", .path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Index has {docs} docs but {lengths} lengths")]
    LengthMismatch { docs: usize, lengths: usize },
}

pub type IndexResult<T> = Result<T, IndexError>;

impl IndexError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound { .. })
    }
}
