use serde::{Deserialize, Serialize};

/// The six fixed panel names of the unwrapped wrap surface, in declaration
/// (stacking) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PanelName {
    #[serde(rename = "RIGHT")]
    Right,
    #[serde(rename = "LEFT")]
    Left,
    #[serde(rename = "BACK")]
    Back,
    #[serde(rename = "TOP FRONT")]
    TopFront,
    #[serde(rename = "FRONT")]
    Front,
    #[serde(rename = "LID")]
    Lid,
}

impl PanelName {
    pub const ALL: [PanelName; 6] = [
        PanelName::Right,
        PanelName::Left,
        PanelName::Back,
        PanelName::TopFront,
        PanelName::Front,
        PanelName::Lid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PanelName::Right => "RIGHT",
            PanelName::Left => "LEFT",
            PanelName::Back => "BACK",
            PanelName::TopFront => "TOP FRONT",
            PanelName::Front => "FRONT",
            PanelName::Lid => "LID",
        }
    }
}

impl std::fmt::Display for PanelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overlay artwork variant selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayVariant {
    #[default]
    #[serde(rename = "black")]
    Black,
    #[serde(rename = "white")]
    White,
}

/// Intrinsic geometry of one panel.
///
/// The template dimensions are the sizing oracle for all normalization:
/// uploaded or generated images are fit into them, never the other way
/// around.
#[derive(Clone, Copy, Debug)]
pub struct PanelTemplate {
    pub id: u32,
    pub name: PanelName,
    pub width: u32,
    pub height: u32,
    /// Reference outline image shipped with the application assets.
    pub template_path: &'static str,
}

/// The immutable panel set, in declaration order.
pub const PANEL_TEMPLATES: [PanelTemplate; 6] = [
    PanelTemplate {
        id: 1,
        name: PanelName::Right,
        width: 2190,
        height: 1278,
        template_path: "templates/right.png",
    },
    PanelTemplate {
        id: 2,
        name: PanelName::Left,
        width: 2190,
        height: 1278,
        template_path: "templates/left.png",
    },
    PanelTemplate {
        id: 3,
        name: PanelName::Back,
        width: 1532,
        height: 1278,
        template_path: "templates/back.png",
    },
    PanelTemplate {
        id: 4,
        name: PanelName::TopFront,
        width: 2190,
        height: 546,
        template_path: "templates/top_front.png",
    },
    PanelTemplate {
        id: 5,
        name: PanelName::Front,
        width: 1532,
        height: 820,
        template_path: "templates/front.png",
    },
    PanelTemplate {
        id: 6,
        name: PanelName::Lid,
        width: 2088,
        height: 1160,
        template_path: "templates/lid.png",
    },
];

pub fn template_by_id(id: u32) -> Option<&'static PanelTemplate> {
    PANEL_TEMPLATES.iter().find(|t| t.id == id)
}

pub fn template_by_name(name: PanelName) -> &'static PanelTemplate {
    PANEL_TEMPLATES
        .iter()
        .find(|t| t.name == name)
        .expect("every PanelName has a template entry")
}

/// Decorative overlay artwork for a panel, if any is defined.
///
/// FRONT and TOP FRONT carry no overlay; requesting one there is not an
/// error, the layer is simply absent.
pub fn overlay_path(name: PanelName, variant: OverlayVariant) -> Option<&'static str> {
    let path = match (name, variant) {
        (PanelName::Right, OverlayVariant::Black) => "overlays/right_black.png",
        (PanelName::Right, OverlayVariant::White) => "overlays/right_white.png",
        (PanelName::Left, OverlayVariant::Black) => "overlays/left_black.png",
        (PanelName::Left, OverlayVariant::White) => "overlays/left_white.png",
        (PanelName::Back, OverlayVariant::Black) => "overlays/back_black.png",
        (PanelName::Back, OverlayVariant::White) => "overlays/back_white.png",
        (PanelName::Lid, OverlayVariant::Black) => "overlays/lid_black.png",
        (PanelName::Lid, OverlayVariant::White) => "overlays/lid_white.png",
        (PanelName::Front | PanelName::TopFront, _) => return None,
    };
    Some(path)
}

/// Edge-cleanup mask painted last over a panel, if one is defined.
pub fn mask_path(name: PanelName) -> Option<&'static str> {
    let path = match name {
        PanelName::Right => "masks/right.png",
        PanelName::Left => "masks/left.png",
        PanelName::Back => "masks/back.png",
        PanelName::Front => "masks/front.png",
        PanelName::Lid => "masks/lid.png",
        PanelName::TopFront => return None,
    };
    Some(path)
}
