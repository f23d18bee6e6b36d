use crate::error::{IndexError, IndexResult};
use crate::index::Index;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

/// Load a BM25 index artifact into memory in one piece.
///
/// A missing file is reported as [`IndexError::NotFound`] so callers can run
/// the reindex job and retry. Anything that does not deserialize, or whose
/// `docs` and `lengths` disagree in size, fails the whole load.
pub fn load_index<P: AsRef<Path>>(path: P) -> IndexResult<Index> {
    let path = path.as_ref();
    let f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(IndexError::NotFound { path: path.to_path_buf() })
        }
        Err(source) => return Err(IndexError::Io { path: path.to_path_buf(), source }),
    };
    let reader = BufReader::new(f);
    let index: Index = serde_json::from_reader(reader)
        .map_err(|source| IndexError::Deserialize { path: path.to_path_buf(), source })?;
    if index.documents.len() != index.lengths.len() {
        return Err(IndexError::LengthMismatch { docs: index.documents.len(), lengths: index.lengths.len() });
    }
    if index.is_empty() {
        tracing::warn!(path = %path.display(), "index has no documents");
    }
    tracing::info!(
        path = %path.display(),
        docs = index.documents.len(),
        terms = index.inverse_document_frequency.len(),
        "loaded index"
    );
    Ok(index)
}

/// Write an index artifact in the same JSON layout `load_index` reads.
pub fn save_index<P: AsRef<Path>>(path: P, index: &Index) -> IndexResult<()> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| IndexError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(io_err)?;
    }
    let f = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(f);
    serde_json::to_writer(&mut writer, index).map_err(|e| io_err(e.into()))?;
    writer.flush().map_err(io_err)?;
    Ok(())
}
