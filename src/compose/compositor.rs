use crate::{
    assets::{cache::LayerCache, fetch::ImageFetcher},
    compose::{
        layer::{ResolvedLayer, resolve_layers},
        raster::{Fit, Surface},
    },
    foundation::{
        error::{WeaveError, WeaveResult},
        geom::Rect,
    },
    panel::model::Panel,
};

/// Placement of one panel in the combined texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelSlot {
    pub y_offset: u32,
    pub height: u32,
    pub width_scale: f64,
    pub height_scale: f64,
}

/// Template-space to surface-space mapping for one panel: independent axis
/// scales plus a translation. Both the combined texture (non-uniform axis
/// scales, vertical offset) and the thumbnail (one uniform scale, centering
/// offsets) draw through this, so there is exactly one drawing engine.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PanelTransform {
    pub sx: f64,
    pub sy: f64,
    pub dx: f64,
    pub dy: f64,
}

/// Reject panel sets with members missing a background, naming every
/// offender. No partial composition is attempted.
pub fn validate_complete(panels: &[Panel]) -> WeaveResult<()> {
    let missing: Vec<String> = panels
        .iter()
        .filter(|p| !p.is_complete())
        .map(|p| p.name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(WeaveError::IncompletePanels(missing));
    }
    Ok(())
}

/// Compute the common normalized width (the widest template) and each
/// panel's slot in the vertical stack. Every panel keeps its own aspect
/// ratio: height scales by the same factor its width does.
pub fn normalized_layout(panels: &[Panel]) -> WeaveResult<(u32, Vec<PanelSlot>)> {
    let width = panels
        .iter()
        .map(|p| p.template().width)
        .max()
        .ok_or_else(|| WeaveError::validation("cannot composite an empty panel set"))?;

    let mut slots = Vec::with_capacity(panels.len());
    let mut y = 0u32;
    for panel in panels {
        let t = panel.template();
        let width_scale = f64::from(width) / f64::from(t.width);
        let height = (f64::from(t.height) * width_scale).round().max(1.0) as u32;
        slots.push(PanelSlot {
            y_offset: y,
            height,
            width_scale,
            height_scale: f64::from(height) / f64::from(t.height),
        });
        y = y
            .checked_add(height)
            .ok_or_else(|| WeaveError::validation("combined texture height overflow"))?;
    }
    Ok((width, slots))
}

/// Composite the full panel stack into one UV texture surface.
///
/// Panels are drawn in the order given (declaration order for the canonical
/// set), each under a clip covering exactly its slot so no layer bleeds into
/// a neighbor. Layer images that fail to load are skipped via the cache's
/// warning path; only an incomplete panel set aborts.
#[tracing::instrument(skip_all, fields(panels = panels.len()))]
pub fn composite(
    panels: &[Panel],
    cache: &mut LayerCache,
    fetcher: &mut dyn ImageFetcher,
) -> WeaveResult<Surface> {
    validate_complete(panels)?;
    let (width, slots) = normalized_layout(panels)?;
    let total_height: u32 = slots.iter().map(|s| s.height).sum();
    let mut surface = Surface::new(width, total_height)?;

    for (panel, slot) in panels.iter().zip(&slots) {
        let clip = Rect::new(
            0.0,
            f64::from(slot.y_offset),
            f64::from(width),
            f64::from(slot.y_offset) + f64::from(slot.height),
        );
        let xform = PanelTransform {
            sx: slot.width_scale,
            sy: slot.height_scale,
            dx: 0.0,
            dy: f64::from(slot.y_offset),
        };
        draw_panel(&mut surface, panel, xform, clip, true, cache, fetcher);
    }

    Ok(surface)
}

/// Draw one panel's resolved layers through a panel transform, strictly in
/// paint order. Layer boxes scale by the transform's independent axis
/// factors; the image inside each box keeps its uniform cover/contain fit.
pub(crate) fn draw_panel(
    surface: &mut Surface,
    panel: &Panel,
    xform: PanelTransform,
    clip: Rect,
    include_mask: bool,
    cache: &mut LayerCache,
    fetcher: &mut dyn ImageFetcher,
) {
    let t = panel.template();
    let panel_rect = Rect::new(
        xform.dx,
        xform.dy,
        xform.dx + f64::from(t.width) * xform.sx,
        xform.dy + f64::from(t.height) * xform.sy,
    );

    for layer in resolve_layers(panel) {
        match layer {
            ResolvedLayer::Fill(color) => {
                surface.fill_rect(panel_rect, clip, color.to_premul_rgba8());
            }
            ResolvedLayer::Image { source, rect, fit } => {
                let Some(img) = cache.get_or_load(fetcher, &source) else {
                    continue;
                };
                let b = rect.scaled(xform.sx, xform.sy);
                let dest = Rect::new(
                    xform.dx + b.x,
                    xform.dy + b.y,
                    xform.dx + b.x + b.width,
                    xform.dy + b.y + b.height,
                );
                surface.draw_image(&img, dest, clip, fit);
            }
            ResolvedLayer::Overlay { source } => {
                let Some(img) = cache.get_or_load(fetcher, &source) else {
                    continue;
                };
                surface.draw_image(&img, panel_rect, clip, Fit::Cover);
            }
            ResolvedLayer::EdgeMask { source } => {
                if !include_mask {
                    continue;
                }
                let Some(img) = cache.get_or_load(fetcher, &source) else {
                    continue;
                };
                surface.draw_image(&img, panel_rect, clip, Fit::Cover);
            }
        }
    }
}
