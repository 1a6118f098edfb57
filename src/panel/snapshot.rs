use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    assets::source::ImageSource,
    foundation::{
        error::{WeaveError, WeaveResult},
        geom::Color,
    },
    panel::model::Panel,
};

/// How an image entered the design's library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    AiGenerated,
    Uploaded,
}

/// One entry in the design's image library. The library is deduplicated by
/// source, so re-adding a known URL is a no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LibraryImage {
    pub source: ImageSource,
    pub provenance: Provenance,
    pub added_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_logo: Option<ImageSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_background_color: Option<Color>,
    /// When set, LEFT mirrors RIGHT's full layer set at export time.
    #[serde(default)]
    pub linked_sides: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full serializable state of one design: the six panels, global settings,
/// prompt history, image library and metadata. Assembled at export time and
/// immutable once produced; the sole unit handed to persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub panels: Vec<Panel>,
    #[serde(default)]
    pub settings: GlobalSettings,
    #[serde(default)]
    pub prompt_history: Vec<PromptRecord>,
    #[serde(default)]
    pub library: Vec<LibraryImage>,
    pub meta: DesignMeta,
}

/// Version-tagged persisted form of a snapshot.
///
/// Loading always goes through [`SnapshotFile::migrate`], so older designs
/// keep opening as the schema evolves.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum SnapshotFile {
    #[serde(rename = "1")]
    V1(SnapshotV1),
    #[serde(rename = "2")]
    V2(EditorSnapshot),
}

/// First persisted schema: flat settings, bare prompt strings, bare image
/// URLs with no provenance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotV1 {
    pub panels: Vec<Panel>,
    #[serde(default)]
    pub linked_sides: bool,
    #[serde(default)]
    pub prompts: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl SnapshotFile {
    pub fn current(snapshot: EditorSnapshot) -> Self {
        Self::V2(snapshot)
    }

    /// Upgrade any persisted version to the current snapshot shape.
    pub fn migrate(self) -> EditorSnapshot {
        match self {
            SnapshotFile::V2(s) => s,
            SnapshotFile::V1(v1) => {
                // v1 recorded neither prompt timestamps nor image provenance;
                // the design's creation time stands in, and bare URLs are
                // treated as uploads.
                let at = v1.created_at;
                EditorSnapshot {
                    panels: v1.panels,
                    settings: GlobalSettings {
                        default_logo: None,
                        default_background_color: None,
                        linked_sides: v1.linked_sides,
                    },
                    prompt_history: v1
                        .prompts
                        .into_iter()
                        .map(|prompt| PromptRecord {
                            prompt,
                            created_at: at,
                        })
                        .collect(),
                    library: v1
                        .images
                        .into_iter()
                        .map(|url| LibraryImage {
                            source: ImageSource::Remote(url),
                            provenance: Provenance::Uploaded,
                            added_at: at,
                        })
                        .collect(),
                    meta: DesignMeta {
                        name: v1.name,
                        client: None,
                        created_at: at,
                        updated_at: at,
                    },
                }
            }
        }
    }

    pub fn from_json(json: &str) -> WeaveResult<Self> {
        serde_json::from_str(json).map_err(|e| WeaveError::serde(e.to_string()))
    }

    pub fn to_json(&self) -> WeaveResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WeaveError::serde(e.to_string()))
    }
}
