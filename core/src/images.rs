use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use uuid::Uuid;

use crate::error::DataError;

/// What an image field actually points at. Only `Local` references need
/// work during backup/restore; the other two pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// http(s) URL — portable as-is.
    Remote(&'a str),
    /// `data:<mime>;base64,<payload>` — the self-contained backup encoding.
    Data(&'a str),
    /// A path on this device. Not portable; dangles after data clearing.
    Local(&'a str),
}

impl<'a> ImageRef<'a> {
    #[must_use]
    pub fn classify(value: &'a str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            ImageRef::Remote(value)
        } else if value.starts_with("data:") {
            ImageRef::Data(value)
        } else {
            ImageRef::Local(value)
        }
    }

    #[must_use]
    pub fn is_local(value: &'a str) -> bool {
        matches!(Self::classify(value), ImageRef::Local(_))
    }
}

/// Resolve a local reference to a filesystem path. The original mobile app
/// stored `file://` URIs; strip that scheme when present.
#[must_use]
pub fn local_path(value: &str) -> &Path {
    Path::new(value.strip_prefix("file://").unwrap_or(value))
}

#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[must_use]
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

/// Read a local image file and re-encode it as a self-contained data URI.
pub fn inline(reference: &str) -> Result<String, DataError> {
    let path = local_path(reference);
    let bytes = std::fs::read(path).map_err(|e| DataError::ImageConversion {
        path: reference.to_string(),
        reason: e.to_string(),
    })?;
    let mime = mime_for_path(path);
    Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}

/// Decode a data URI back to a binary file under `dir`, with a freshly
/// generated unique filename. Returns the new path.
pub fn materialize(data_uri: &str, dir: &Path) -> Result<PathBuf, DataError> {
    let rest = data_uri
        .strip_prefix("data:")
        .ok_or_else(|| DataError::ImageRestore("not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DataError::ImageRestore("malformed data URI".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| DataError::ImageRestore("unsupported data URI encoding".to_string()))?;

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| DataError::ImageRestore(format!("invalid base64 payload: {e}")))?;

    let filename = format!("{}.{}", Uuid::new_v4(), extension_for_mime(mime));
    let path = dir.join(filename);
    std::fs::write(&path, bytes)
        .map_err(|e| DataError::ImageRestore(format!("couldn't write image file: {e}")))?;
    Ok(path)
}

/// Best-effort deletion of a locally-referenced image file. Failures are
/// logged and swallowed so storage cleanup never aborts mid-way.
pub fn remove_local(reference: &str) {
    let path = local_path(reference);
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "failed to delete image file");
        }
    }
}
