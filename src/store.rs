//! Persist and reload the structured triangle set.
//!
//! The file is a pretty-printed JSON list of [`FormattedTriangle`] objects.
//! Quote snapshots are never written here.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::StoreError;
use crate::triangle::FormattedTriangle;

/// Write `triangles` to `path`, creating missing parent directories.
///
/// The content goes to a sibling temp file first and is renamed into place,
/// so readers never observe a half-written set.
#[instrument(skip_all, fields(path = %path.display(), count = triangles.len()))]
pub fn save(path: &Path, triangles: &[FormattedTriangle]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            debug!(dir = %dir.display(), "Creating triangle set directory");
            fs::create_dir_all(dir).map_err(io_err)?;
        }
    }

    let body = to_pretty_json(triangles).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = temp_path(path);
    let mut file = fs::File::create(&tmp).map_err(io_err)?;
    file.write_all(&body).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);
    fs::rename(&tmp, path).map_err(io_err)?;

    info!("Saved triangle set");
    Ok(())
}

/// Read a triangle set written by [`save`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Vec<FormattedTriangle>, StoreError> {
    let body = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let triangles: Vec<FormattedTriangle> =
        serde_json::from_slice(&body).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    info!(count = triangles.len(), "Loaded triangle set");
    Ok(triangles)
}

/// JSON with four-space indentation.
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
