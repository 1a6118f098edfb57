use serde::{Deserialize, Serialize};

use crate::{
    assets::source::ImageSource,
    foundation::geom::{Color, LayerBox},
    panel::template::{self, OverlayVariant, PanelName, PanelTemplate, PANEL_TEMPLATES},
};

/// One positioned image layer: a source plus its target bounding box in the
/// owning panel's template pixel space.
///
/// Used for both the background image and the logo; the two differ only in
/// fit rule (cover vs. contain) at resolve time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    pub source: ImageSource,
    pub rect: LayerBox,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub enabled: bool,
    #[serde(default)]
    pub variant: OverlayVariant,
}

/// Edit state of one panel. The full set of six always exists; a panel with
/// no content layers is merely "incomplete", not absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: u32,
    pub name: PanelName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<ImageLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageLayer>,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl Panel {
    pub fn from_template(t: &PanelTemplate) -> Self {
        Self {
            id: t.id,
            name: t.name,
            background_color: None,
            background_image: None,
            logo: None,
            overlay: OverlayConfig::default(),
        }
    }

    /// The fresh six-panel set in declaration order.
    pub fn default_set() -> Vec<Panel> {
        PANEL_TEMPLATES.iter().map(Panel::from_template).collect()
    }

    pub fn template(&self) -> &'static PanelTemplate {
        template::template_by_name(self.name)
    }

    /// A panel is complete once it has a background color or a background
    /// image. Logos and overlays alone do not count.
    pub fn is_complete(&self) -> bool {
        self.background_color.is_some() || self.background_image.is_some()
    }

    /// Copy another panel's full layer set onto this one, values verbatim.
    /// Identity (id, name) is kept; layer boxes stay in this panel's own
    /// template pixel space.
    pub fn copy_layers_from(&mut self, other: &Panel) {
        self.background_color = other.background_color;
        self.background_image = other.background_image.clone();
        self.logo = other.logo.clone();
        self.overlay = other.overlay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_six_incomplete_panels() {
        let panels = Panel::default_set();
        assert_eq!(panels.len(), 6);
        assert!(panels.iter().all(|p| !p.is_complete()));
        assert_eq!(panels[0].name, PanelName::Right);
        assert_eq!(panels[5].name, PanelName::Lid);
    }

    #[test]
    fn completeness_requires_a_background() {
        let mut p = Panel::from_template(&PANEL_TEMPLATES[0]);
        assert!(!p.is_complete());

        p.logo = Some(ImageLayer {
            source: ImageSource::Remote("https://example.test/logo.png".to_string()),
            rect: LayerBox::new(0.0, 0.0, 10.0, 10.0).unwrap(),
        });
        assert!(!p.is_complete());

        p.background_color = Some(Color::WHITE);
        assert!(p.is_complete());
    }

    #[test]
    fn copy_layers_keeps_identity() {
        let panels = Panel::default_set();
        let mut left = panels[1].clone();
        let mut right = panels[0].clone();
        right.background_color = Some(Color::BLACK);
        right.overlay = OverlayConfig {
            enabled: true,
            variant: OverlayVariant::White,
        };

        left.copy_layers_from(&right);
        assert_eq!(left.id, 2);
        assert_eq!(left.name, PanelName::Left);
        assert_eq!(left.background_color, Some(Color::BLACK));
        assert!(left.overlay.enabled);
    }

    #[test]
    fn panel_json_roundtrip() {
        let mut p = Panel::from_template(&PANEL_TEMPLATES[2]);
        p.background_color = Some(Color::rgb(1, 2, 3));
        p.background_image = Some(ImageLayer {
            source: ImageSource::Remote("https://example.test/bg.png".to_string()),
            rect: LayerBox::new(10.0, 20.0, 100.0, 50.0).unwrap(),
        });

        let s = serde_json::to_string(&p).unwrap();
        let de: Panel = serde_json::from_str(&s).unwrap();
        assert_eq!(de, p);
    }
}
