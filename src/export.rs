use chrono::{DateTime, Utc};

use crate::{
    assets::{cache::LayerCache, fetch::ImageFetcher},
    compose::{
        compositor::{composite, validate_complete},
        encode::encode_png,
        thumbnail::{render_thumbnail, select_thumbnail_panel},
    },
    foundation::error::WeaveResult,
    panel::{
        model::Panel,
        snapshot::{DesignMeta, EditorSnapshot},
        store::EditorState,
        template::PanelName,
    },
};

/// Everything one export produces, handed to the persistence collaborator as
/// a unit: the caller persists image bytes and snapshot atomically, so the
/// bytes are never returned without the snapshot.
#[derive(Clone, Debug)]
pub struct ExportArtifacts {
    /// Combined UV texture, lossless PNG.
    pub combined_png: Vec<u8>,
    /// Square preview, lossless PNG.
    pub thumbnail_png: Vec<u8>,
    /// Snapshot of the exported state, ready to serialize.
    pub snapshot: EditorSnapshot,
    /// Diagnostics for layers that were skipped during compositing.
    pub warnings: Vec<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct ExportOptions {
    /// Edge length of the square thumbnail.
    pub thumbnail_size: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            thumbnail_size: 512,
        }
    }
}

/// Run the full export: side-link enforcement, completeness validation, the
/// combined composite, the thumbnail, and snapshot assembly.
///
/// `now` is supplied by the caller so the drawing path stays free of
/// time-dependent behavior; it only stamps the snapshot metadata.
#[tracing::instrument(skip_all, fields(design = %state.meta.name))]
pub fn export_design(
    state: &EditorState,
    opts: ExportOptions,
    now: DateTime<Utc>,
    fetcher: &mut dyn ImageFetcher,
) -> WeaveResult<ExportArtifacts> {
    let panels = linked_panels(state);
    validate_complete(&panels)?;

    let mut cache = LayerCache::new();
    let combined = composite(&panels, &mut cache, fetcher)?;
    let combined_png = encode_png(&combined)?;

    let thumbnail_png = match select_thumbnail_panel(&panels) {
        Some(panel) => {
            let thumb = render_thumbnail(panel, opts.thumbnail_size, &mut cache, fetcher)?;
            encode_png(&thumb)?
        }
        // No side panel qualifies: the combined texture stands in.
        None => combined_png.clone(),
    };

    let snapshot = EditorSnapshot {
        panels,
        settings: state.settings.clone(),
        prompt_history: state.prompt_history.clone(),
        library: state.library.clone(),
        meta: DesignMeta {
            updated_at: now,
            ..state.meta.clone()
        },
    };

    Ok(ExportArtifacts {
        combined_png,
        thumbnail_png,
        snapshot,
        warnings: cache.warnings().to_vec(),
    })
}

/// The panel set an export actually composites: a copy of the live panels
/// with the side-link invariant applied. When linked sides is set, LEFT
/// mirrors RIGHT's full layer set before validation, so LEFT is never
/// independently checked for completeness.
pub fn linked_panels(state: &EditorState) -> Vec<Panel> {
    let mut panels = state.panels.clone();
    if state.settings.linked_sides {
        apply_side_link(&mut panels);
    }
    panels
}

fn apply_side_link(panels: &mut [Panel]) {
    let Some(right) = panels
        .iter()
        .find(|p| p.name == PanelName::Right)
        .cloned()
    else {
        return;
    };
    if let Some(left) = panels.iter_mut().find(|p| p.name == PanelName::Left) {
        left.copy_layers_from(&right);
    }
}
