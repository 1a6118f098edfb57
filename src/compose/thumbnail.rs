use crate::{
    assets::{cache::LayerCache, fetch::ImageFetcher},
    compose::{
        compositor::{PanelTransform, draw_panel},
        raster::Surface,
    },
    foundation::error::WeaveResult,
    panel::{model::Panel, template::PanelName},
};

/// Pick the representative panel for a design's thumbnail: RIGHT when it has
/// content, then LEFT. `None` means no side panel qualifies and the caller
/// should fall back to the full combined texture.
pub fn select_thumbnail_panel(panels: &[Panel]) -> Option<&Panel> {
    [PanelName::Right, PanelName::Left].iter().find_map(|name| {
        panels
            .iter()
            .find(|p| p.name == *name && p.is_complete())
    })
}

/// Render one panel into a `size × size` square.
///
/// The whole panel is cover-fit into the square: one uniform scale
/// (`max(size/tw, size/th)`), centered, overflow on the longer axis cropped.
/// Layers then draw through the same engine as the combined texture; the
/// edge mask is deliberately omitted so the thumbnail shows design content
/// rather than edge cleanup.
pub fn render_thumbnail(
    panel: &Panel,
    size: u32,
    cache: &mut LayerCache,
    fetcher: &mut dyn ImageFetcher,
) -> WeaveResult<Surface> {
    let t = panel.template();
    let mut surface = Surface::new(size, size)?;

    let scale = (f64::from(size) / f64::from(t.width)).max(f64::from(size) / f64::from(t.height));
    let xform = PanelTransform {
        sx: scale,
        sy: scale,
        dx: (f64::from(size) - f64::from(t.width) * scale) / 2.0,
        dy: (f64::from(size) - f64::from(t.height) * scale) / 2.0,
    };

    let clip = surface.bounds();
    draw_panel(&mut surface, panel, xform, clip, false, cache, fetcher);
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::geom::Color;

    #[test]
    fn selection_prefers_right_then_left_then_none() {
        let mut panels = Panel::default_set();
        assert!(select_thumbnail_panel(&panels).is_none());

        panels[1].background_color = Some(Color::WHITE);
        assert_eq!(
            select_thumbnail_panel(&panels).unwrap().name,
            PanelName::Left
        );

        panels[0].background_color = Some(Color::BLACK);
        assert_eq!(
            select_thumbnail_panel(&panels).unwrap().name,
            PanelName::Right
        );
    }

    #[test]
    fn incomplete_right_does_not_shadow_complete_left() {
        use crate::{assets::source::ImageSource, foundation::geom::LayerBox, panel::model::ImageLayer};

        let mut panels = Panel::default_set();
        // RIGHT has only a logo, which does not make it complete.
        panels[0].logo = Some(ImageLayer {
            source: ImageSource::Remote("https://example.test/logo.png".to_string()),
            rect: LayerBox::new(0.0, 0.0, 10.0, 10.0).unwrap(),
        });
        panels[1].background_color = Some(Color::WHITE);

        let chosen = select_thumbnail_panel(&panels).unwrap();
        assert_eq!(chosen.name, PanelName::Left);
    }
}
