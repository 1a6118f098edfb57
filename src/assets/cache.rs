use std::collections::HashMap;

use crate::{
    assets::{decode, decode::PreparedImage, fetch::ImageFetcher, source::ImageSource},
};

/// Per-export memoization of fetched-and-decoded layer images.
///
/// One export composites the full texture and then the thumbnail; both passes
/// share a cache so no source is fetched or decoded twice. Failures are
/// cached as well — a broken layer produces exactly one recorded warning and
/// is skipped wherever it appears, without aborting the composite.
#[derive(Default)]
pub struct LayerCache {
    entries: HashMap<String, Option<PreparedImage>>,
    warnings: Vec<String>,
}

impl LayerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and decode `source` once, returning the prepared image or
    /// `None` if it previously failed (or fails now).
    pub fn get_or_load(
        &mut self,
        fetcher: &mut dyn ImageFetcher,
        source: &ImageSource,
    ) -> Option<PreparedImage> {
        let key = source.cache_key();
        if let Some(hit) = self.entries.get(&key) {
            tracing::debug!(key = %key, hit = hit.is_some(), "layer cache hit");
            return hit.clone();
        }

        let loaded = fetcher
            .fetch(source)
            .and_then(|bytes| decode::decode_image(&bytes));
        let prepared = match loaded {
            Ok(img) => Some(img),
            Err(err) => {
                tracing::warn!(
                    source = %source.describe(),
                    error = %err,
                    "layer image failed to load; skipping layer"
                );
                self.warnings
                    .push(format!("layer source '{}' skipped: {err}", source.describe()));
                None
            }
        };

        self.entries.insert(key, prepared.clone());
        prepared
    }

    /// Diagnostics for layers that were skipped during this export.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
