use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to produce the completion data source. The loader never hides
/// these; callers decide whether to surface them or degrade to an empty
/// candidate set.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read input snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("input snapshot {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("input snapshot {path} is not a JSON object")]
    NotAnObject { path: PathBuf },
}

/// Reads and parses the sample input document backing `input.` completion.
///
/// Every call reads the file again; completion always sees the file as it
/// currently is on disk. There is no cache to invalidate.
pub fn load(path: &Path) -> Result<Map<String, Value>, SnapshotError> {
    let bytes = std::fs::read(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SnapshotError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}
