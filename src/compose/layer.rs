use crate::{
    assets::source::ImageSource,
    compose::raster::Fit,
    foundation::geom::{Color, LayerBox},
    panel::{
        model::Panel,
        template::{mask_path, overlay_path},
    },
};

/// One drawable layer of a panel, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedLayer {
    /// Background color fill across the whole panel rectangle.
    Fill(Color),
    /// Positioned image layer (background image or logo).
    Image {
        source: ImageSource,
        rect: LayerBox,
        fit: Fit,
    },
    /// Decorative overlay, full-bleed across the panel.
    Overlay { source: ImageSource },
    /// Edge-cleanup mask, full-bleed, always last. Excluded from
    /// thumbnails, which show design content unobstructed.
    EdgeMask { source: ImageSource },
}

/// Resolve a panel's edit state into its drawable layers in the fixed paint
/// order: background fill, background image (cover), logo (contain, only
/// over a background), decorative overlay, edge mask.
pub fn resolve_layers(panel: &Panel) -> Vec<ResolvedLayer> {
    let mut layers = Vec::with_capacity(5);

    if let Some(color) = panel.background_color {
        layers.push(ResolvedLayer::Fill(color));
    }

    if let Some(bg) = &panel.background_image {
        layers.push(ResolvedLayer::Image {
            source: bg.source.clone(),
            rect: sanitized_box(panel, bg.rect),
            fit: Fit::Cover,
        });
    }

    // A logo without any background underneath is not drawn.
    if panel.is_complete()
        && let Some(logo) = &panel.logo
    {
        layers.push(ResolvedLayer::Image {
            source: logo.source.clone(),
            rect: sanitized_box(panel, logo.rect),
            fit: Fit::Contain,
        });
    }

    // Panels without overlay artwork silently skip this layer.
    if panel.overlay.enabled
        && let Some(path) = overlay_path(panel.name, panel.overlay.variant)
    {
        layers.push(ResolvedLayer::Overlay {
            source: ImageSource::Asset(path.to_string()),
        });
    }

    if let Some(path) = mask_path(panel.name) {
        layers.push(ResolvedLayer::EdgeMask {
            source: ImageSource::Asset(path.to_string()),
        });
    }

    layers
}

/// Malformed boxes are repaired to the panel-proportional default instead of
/// letting non-finite coordinates reach the drawing path.
fn sanitized_box(panel: &Panel, rect: LayerBox) -> LayerBox {
    if rect.is_well_formed() {
        return rect;
    }
    let t = panel.template();
    let repaired = LayerBox::repaired_for(t.width, t.height);
    tracing::warn!(
        panel = %panel.name,
        ?rect,
        ?repaired,
        "malformed layer box repaired to panel default"
    );
    repaired
}
