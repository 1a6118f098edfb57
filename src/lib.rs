//! Wrapweave is a deterministic compositing engine for six-panel
//! vehicle-wrap UV textures.
//!
//! A design is six fixed panels (RIGHT, LEFT, BACK, TOP FRONT, FRONT, LID),
//! each carrying up to five layers: background color, background image,
//! logo, decorative overlay and edge mask. Wrapweave turns that edit state
//! into a combined UV-mapped texture plus a square thumbnail, both as
//! lossless PNG bytes, together with a versioned snapshot of the exported
//! state.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `Panel -> Vec<ResolvedLayer>` (which layers exist, in
//!    what paint order, with which fit rule)
//! 2. **Prepare**: sources fetched through the caller's [`ImageFetcher`] and
//!    decoded once per export into premultiplied RGBA8 ([`LayerCache`])
//! 3. **Composite**: panels normalized to a common width, stacked
//!    vertically, each drawn under its own clip ([`composite`],
//!    [`render_thumbnail`] — one engine for both outputs)
//! 4. **Export**: validation, encoding and snapshot assembly
//!    ([`export_design`])
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: identical panel state and identical
//!   resolved image bytes produce byte-identical output; only snapshot
//!   metadata carries timestamps.
//! - **No IO in the engine**: fetching is the embedding application's job,
//!   behind the [`ImageFetcher`] seam.
//! - **Partial-failure tolerance**: a layer that fails to load is skipped
//!   with a recorded warning; only an incomplete panel set or an encoding
//!   failure aborts an export.

#![forbid(unsafe_code)]

mod assets;
mod compose;
mod export;
mod foundation;
mod panel;

pub use assets::cache::LayerCache;
pub use assets::decode::{PreparedImage, decode_image};
pub use assets::fetch::{DirFetcher, ImageFetcher, decode_data_uri};
pub use assets::source::{ImageSource, normalize_rel_path};
pub use compose::compositor::{PanelSlot, composite, normalized_layout, validate_complete};
pub use compose::encode::encode_png;
pub use compose::layer::{ResolvedLayer, resolve_layers};
pub use compose::raster::{Fit, Placement, Surface, over, place};
pub use compose::thumbnail::{render_thumbnail, select_thumbnail_panel};
pub use export::{ExportArtifacts, ExportOptions, export_design, linked_panels};
pub use foundation::error::{WeaveError, WeaveResult};
pub use foundation::geom::{Color, LayerBox, Point, Rect, Vec2};
pub use panel::model::{ImageLayer, OverlayConfig, Panel};
pub use panel::snapshot::{
    DesignMeta, EditorSnapshot, GlobalSettings, LibraryImage, PromptRecord, Provenance,
    SnapshotFile, SnapshotV1,
};
pub use panel::store::{Action, EditorState, EditorStore};
pub use panel::template::{
    OverlayVariant, PANEL_TEMPLATES, PanelName, PanelTemplate, mask_path, overlay_path,
    template_by_id, template_by_name,
};
