// File: src/persistence.rs
//! Project file format: gzip-compressed canonical JSON of [`ProjectState`].

use crate::core::types::ProjectState;
use crate::error::{DecodeError, EncodeError, PersistenceError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Extension reserved for project files.
pub const FILE_EXTENSION: &str = "tile";
/// Payload is compressed, so it is served as opaque bytes rather than JSON.
pub const MIME_TYPE: &str = "application/octet-stream";

pub fn encode(state: &ProjectState) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    serde_json::to_writer(&mut encoder, state)?;
    let bytes = encoder.finish()?;
    debug!(bytes = bytes.len(), pairs = state.pairs.len(), "Encoded project");
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<ProjectState, DecodeError> {
    let mut json = String::new();
    GzDecoder::new(bytes)
        .read_to_string(&mut json)
        .map_err(DecodeError::Decompress)?;
    let state: ProjectState = serde_json::from_str(&json)?;
    state.validate()?;
    debug!(pairs = state.pairs.len(), "Decoded project");
    Ok(state)
}

/// Writes the project next to `path` first and renames it into place, so a
/// crash never leaves a truncated file behind.
pub fn save_to_disk(state: &ProjectState, path: &Path) -> Result<(), PersistenceError> {
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let bytes = encode(state)?;
    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        writer.write_all(&bytes)?;
        writer.flush()?;
    }
    temp_file.persist(path)?;
    info!(path = %path.display(), bytes = bytes.len(), "Saved project");
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<ProjectState, PersistenceError> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes)?;
    let state = decode(&bytes)?;
    info!(path = %path.display(), "Loaded project");
    Ok(state)
}
