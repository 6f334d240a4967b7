//! Persists the result of a route search as a self-describing JSON record

pub mod record;

use std::fs;
use std::path::Path;
use tracing::info;

use crate::common::error::OutputError;
use crate::output::record::RouteRecord;

/// Write the route record to disk as pretty-printed JSON, creating the
/// parent directory if it does not already exist. Any existing file at the
/// path is replaced.
pub fn write_record(path: &Path, record: &RouteRecord) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut contents =
        serde_json::to_string_pretty(record).map_err(|source| OutputError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    contents.push('\n');

    fs::write(path, contents).map_err(io_err)?;

    info!(path = %path.display(), "Route record written");
    Ok(())
}

/// Read a route record back from disk
pub fn read_record(path: &Path) -> Result<RouteRecord, OutputError> {
    let contents = fs::read_to_string(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| OutputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
