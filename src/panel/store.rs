use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    assets::source::ImageSource,
    foundation::geom::Color,
    panel::{
        model::{ImageLayer, OverlayConfig, Panel},
        snapshot::{DesignMeta, GlobalSettings, LibraryImage, PromptRecord, Provenance},
    },
};

/// Live editor state: the six panels plus design-wide settings and history.
///
/// This is the explicit replacement for an ambient mutable editor blob: the
/// only way to change it is [`EditorState::apply`] with an [`Action`], and
/// every update addresses panels by id against the state being reduced,
/// never a captured copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub panels: Vec<Panel>,
    pub settings: GlobalSettings,
    pub prompt_history: Vec<PromptRecord>,
    pub library: Vec<LibraryImage>,
    pub meta: DesignMeta,
}

impl EditorState {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            panels: Panel::default_set(),
            settings: GlobalSettings::default(),
            prompt_history: Vec::new(),
            library: Vec::new(),
            meta: DesignMeta {
                name: name.into(),
                client: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    /// Resume editing from a persisted (already migrated) snapshot.
    pub fn from_snapshot(snapshot: crate::panel::snapshot::EditorSnapshot) -> Self {
        Self {
            panels: snapshot.panels,
            settings: snapshot.settings,
            prompt_history: snapshot.prompt_history,
            library: snapshot.library,
            meta: snapshot.meta,
        }
    }

    pub fn panel(&self, id: u32) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Pure reducer: returns the next state, leaving `self` untouched.
    /// Actions addressing an unknown panel id reduce to the unchanged state.
    pub fn apply(&self, action: &Action) -> EditorState {
        let mut next = self.clone();
        match action {
            Action::SetBackgroundColor { panel_id, color } => {
                update_panel(&mut next.panels, *panel_id, |p| {
                    p.background_color = *color;
                });
            }
            Action::SetBackgroundImage { panel_id, layer } => {
                update_panel(&mut next.panels, *panel_id, |p| {
                    p.background_image = layer.clone();
                });
            }
            Action::SetLogo { panel_id, layer } => {
                update_panel(&mut next.panels, *panel_id, |p| {
                    p.logo = layer.clone();
                });
            }
            Action::SetOverlay { panel_id, overlay } => {
                update_panel(&mut next.panels, *panel_id, |p| {
                    p.overlay = *overlay;
                });
            }
            Action::ClearPanel { panel_id } => {
                update_panel(&mut next.panels, *panel_id, |p| {
                    p.background_color = None;
                    p.background_image = None;
                    p.logo = None;
                    p.overlay = OverlayConfig::default();
                });
            }
            Action::SetLinkedSides { linked } => {
                next.settings.linked_sides = *linked;
            }
            Action::SetDefaultLogo { source } => {
                next.settings.default_logo = source.clone();
            }
            Action::SetDefaultBackgroundColor { color } => {
                next.settings.default_background_color = *color;
            }
            Action::RecordPrompt { prompt, at } => {
                next.prompt_history.push(PromptRecord {
                    prompt: prompt.clone(),
                    created_at: *at,
                });
            }
            Action::AddLibraryImage {
                source,
                provenance,
                at,
            } => {
                let key = source.cache_key();
                let known = next.library.iter().any(|e| e.source.cache_key() == key);
                if !known {
                    next.library.push(LibraryImage {
                        source: source.clone(),
                        provenance: *provenance,
                        added_at: *at,
                    });
                }
            }
            Action::SetDesignMeta { name, client, at } => {
                next.meta.name = name.clone();
                next.meta.client = client.clone();
                next.meta.updated_at = *at;
            }
        }
        next
    }
}

/// Closed set of editor actions. Time-carrying actions take their timestamp
/// as data so reduction stays a pure function of (state, action).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetBackgroundColor {
        panel_id: u32,
        color: Option<Color>,
    },
    SetBackgroundImage {
        panel_id: u32,
        layer: Option<ImageLayer>,
    },
    SetLogo {
        panel_id: u32,
        layer: Option<ImageLayer>,
    },
    SetOverlay {
        panel_id: u32,
        overlay: OverlayConfig,
    },
    ClearPanel {
        panel_id: u32,
    },
    SetLinkedSides {
        linked: bool,
    },
    SetDefaultLogo {
        source: Option<ImageSource>,
    },
    SetDefaultBackgroundColor {
        color: Option<Color>,
    },
    RecordPrompt {
        prompt: String,
        at: DateTime<Utc>,
    },
    AddLibraryImage {
        source: ImageSource,
        provenance: Provenance,
        at: DateTime<Utc>,
    },
    SetDesignMeta {
        name: String,
        client: Option<String>,
        at: DateTime<Utc>,
    },
}

fn update_panel(panels: &mut [Panel], id: u32, f: impl FnOnce(&mut Panel)) {
    match panels.iter_mut().find(|p| p.id == id) {
        Some(p) => f(p),
        None => tracing::debug!(panel_id = id, "action addressed unknown panel; ignored"),
    }
}

/// Owning handle around the reduced state. Passed explicitly to whatever
/// needs to dispatch; there is no global instance.
#[derive(Clone, Debug)]
pub struct EditorStore {
    state: EditorState,
}

impl EditorStore {
    pub fn new(state: EditorState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn dispatch(&mut self, action: &Action) {
        self.state = self.state.apply(action);
    }

    pub fn into_state(self) -> EditorState {
        self.state
    }
}
