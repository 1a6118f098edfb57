use std::path::PathBuf;

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    assets::source::{ImageSource, normalize_rel_path},
    foundation::error::{WeaveError, WeaveResult},
};

/// IO collaborator seam: resolves an [`ImageSource`] to raw encoded bytes.
///
/// The engine never owns network or filesystem access; the embedding
/// application decides how (and whether) each source kind is reachable, and
/// may parallelize or cancel fetches behind this trait as it sees fit.
pub trait ImageFetcher {
    fn fetch(&mut self, source: &ImageSource) -> WeaveResult<Vec<u8>>;
}

/// Filesystem-backed fetcher for offline rendering and tests.
///
/// Resolves bundled `Asset` paths under a root directory and decodes inline
/// `data:` URIs. Remote URLs are rejected: network IO belongs to the
/// embedding application's fetcher.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageFetcher for DirFetcher {
    fn fetch(&mut self, source: &ImageSource) -> WeaveResult<Vec<u8>> {
        match source {
            ImageSource::Asset(path) => {
                let rel = normalize_rel_path(path)?;
                let path = self.root.join(rel);
                std::fs::read(&path)
                    .with_context(|| format!("read asset bytes from '{}'", path.display()))
                    .map_err(WeaveError::from)
            }
            ImageSource::Inline(uri) => decode_data_uri(uri),
            ImageSource::Remote(url) => Err(WeaveError::layer_load(format!(
                "remote source '{url}' requires the application's fetcher"
            ))),
        }
    }
}

/// Decode a base64 `data:` URI payload.
pub fn decode_data_uri(uri: &str) -> WeaveResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| WeaveError::layer_load("inline source is not a data: URI"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| WeaveError::layer_load("data: URI has no payload separator"))?;
    if !meta.ends_with(";base64") {
        return Err(WeaveError::layer_load(
            "only base64-encoded data: URIs are supported",
        ));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| WeaveError::layer_load(format!("invalid base64 payload: {e}")))
}
