//! Text file load/save for the engine
//!
//! Reads decode through `encoding_rs` by label (`utf-8`, `latin1`,
//! `windows-1252`, `utf-16le`, ...). Writes go to a temporary file in the
//! destination directory which is then renamed over the target, so a failed
//! write leaves the previous file intact.

use std::fs;
use std::io::Write;
use std::path::Path;

use encoding_rs::Encoding;
use tempfile::NamedTempFile;

use crate::error::EngineError;

pub const DEFAULT_ENCODING: &str = "utf-8";

/// Resolve an encoding label, case-insensitively
pub fn lookup_encoding(label: &str) -> Result<&'static Encoding, EngineError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| EngineError::UnsupportedEncoding(label.to_string()))
}

/// Read a whole file and decode it.
///
/// A leading BOM is stripped. Malformed input is an error rather than being
/// replaced with U+FFFD.
pub fn read_text_file(path: &Path, encoding: &str) -> Result<String, EngineError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EngineError::FileNotFound(path.to_path_buf()),
        _ => EngineError::io(path, e),
    })?;
    if metadata.is_dir() {
        return Err(EngineError::io(
            path,
            std::io::Error::other("is a directory"),
        ));
    }

    let encoding = lookup_encoding(encoding)?;
    let bytes = fs::read(path).map_err(|e| EngineError::io(path, e))?;

    let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(EngineError::Decode {
            path: path.to_path_buf(),
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

/// Encode `content` and atomically replace `path` with it.
///
/// Text the encoding cannot represent is an error and nothing is written. An
/// existing target keeps its permissions.
pub fn write_text_file(path: &Path, content: &str, encoding: &str) -> Result<(), EngineError> {
    let encoding = lookup_encoding(encoding)?;
    let (bytes, used, unmappable) = encoding.encode(content);
    if unmappable {
        return Err(EngineError::Encode {
            path: path.to_path_buf(),
            encoding: used.name().to_string(),
        });
    }
    if used != encoding {
        tracing::debug!(
            "{} cannot be used for output, writing {}",
            encoding.name(),
            used.name()
        );
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| EngineError::io(path, e))?;
    if let Ok(existing) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| EngineError::io(path, e))?;
    }
    temp.write_all(&bytes)
        .and_then(|()| temp.flush())
        .map_err(|e| EngineError::io(path, e))?;
    temp.persist(path)
        .map_err(|e| EngineError::io(path, e.error))?;

    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
