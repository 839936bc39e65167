//! File-backed json stores.
//!
//! Both stores rewrite their whole file on every save:
//! - samples: `[[id, timestamp], ...]` trimmed to the rolling window
//! - archive: every story ever published, oldest first, pretty-printed
//!
//! A missing file reads as an empty store.

pub mod archive;
pub mod samples;

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Read a json document, or `None` when the file does not exist yet.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| Error::json(path, e))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let encoded = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    };
    let bytes = encoded.map_err(|e| Error::json(path, e))?;

    fs::write(path, bytes).map_err(|e| Error::io(path, e))
}
