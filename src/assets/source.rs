use serde::{Deserialize, Serialize};

use crate::foundation::{
    error::{WeaveError, WeaveResult},
    math::Fnv1a64,
};

/// Where a layer's pixels come from. The engine only supplies sources;
/// resolving them to bytes is the fetcher collaborator's job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageSource {
    /// Remote URL — uploaded and AI-generated images are both plain URLs
    /// here and are treated identically.
    Remote(String),
    /// Inline `data:` URI with a base64 payload.
    Inline(String),
    /// Application-bundled asset, relative to the asset root (overlays,
    /// edge masks, panel templates).
    Asset(String),
}

impl ImageSource {
    /// Stable per-export memoization key. Inline payloads are hashed so keys
    /// stay short regardless of embedded image size.
    pub fn cache_key(&self) -> String {
        match self {
            ImageSource::Remote(url) => format!("remote:{url}"),
            ImageSource::Inline(data) => {
                let mut h = Fnv1a64::new_default();
                h.write_u8(b'i');
                h.write_bytes(data.as_bytes());
                format!("inline:{:016x}", h.finish())
            }
            ImageSource::Asset(path) => format!("asset:{path}"),
        }
    }

    /// Short human-readable form for warnings; inline payloads are elided.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Remote(url) => url.clone(),
            ImageSource::Inline(_) => "data: URI".to_string(),
            ImageSource::Asset(path) => path.clone(),
        }
    }
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects absolute paths or parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> WeaveResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(WeaveError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(WeaveError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(WeaveError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(WeaveError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}
