use std::collections::HashMap;
use std::io::Cursor;

use chrono::{TimeZone, Utc};
use wrapweave::{
    Action, Color, EditorState, EditorStore, ExportOptions, ImageFetcher, ImageLayer, ImageSource,
    LayerBox, Panel, PanelName, Provenance, SnapshotFile, WeaveError, WeaveResult, export_design,
};

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn png_solid(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[derive(Default)]
struct MemFetcher {
    images: HashMap<ImageSource, Vec<u8>>,
}

impl MemFetcher {
    fn with(mut self, source: ImageSource, png: Vec<u8>) -> Self {
        self.images.insert(source, png);
        self
    }
}

impl ImageFetcher for MemFetcher {
    fn fetch(&mut self, source: &ImageSource) -> WeaveResult<Vec<u8>> {
        self.images
            .get(source)
            .cloned()
            .ok_or_else(|| WeaveError::layer_load(format!("not found: {}", source.describe())))
    }
}

fn white_state() -> EditorState {
    let mut store = EditorStore::new(EditorState::new("demo", t0()));
    for id in 1..=6 {
        store.dispatch(&Action::SetBackgroundColor {
            panel_id: id,
            color: Some(Color::WHITE),
        });
    }
    store.into_state()
}

#[test]
fn completeness_gate_names_exactly_the_missing_panel() {
    let state = white_state().apply(&Action::SetBackgroundColor {
        panel_id: 3,
        color: None,
    });

    let mut fetcher = MemFetcher::default();
    let err = export_design(&state, ExportOptions::default(), t0(), &mut fetcher).unwrap_err();
    let WeaveError::IncompletePanels(names) = err else {
        panic!("expected IncompletePanels, got {err}");
    };
    assert_eq!(names, [PanelName::Back.to_string()]);
}

#[test]
fn linked_sides_export_succeeds_with_an_empty_left() {
    let mut store = EditorStore::new(EditorState::new("demo", t0()));
    let logo_src = ImageSource::Remote("https://example.test/logo.png".to_string());
    let logo_rect = LayerBox::new(200.0, 300.0, 500.0, 250.0).unwrap();

    // RIGHT fully populated, LEFT untouched.
    store.dispatch(&Action::SetBackgroundColor {
        panel_id: 1,
        color: Some("#112233".parse().unwrap()),
    });
    store.dispatch(&Action::SetLogo {
        panel_id: 1,
        layer: Some(ImageLayer {
            source: logo_src.clone(),
            rect: logo_rect,
        }),
    });
    for id in 3..=6 {
        store.dispatch(&Action::SetBackgroundColor {
            panel_id: id,
            color: Some(Color::WHITE),
        });
    }
    store.dispatch(&Action::SetLinkedSides { linked: true });

    let mut fetcher =
        MemFetcher::default().with(logo_src.clone(), png_solid(8, 8, [0, 255, 0, 255]));
    let artifacts =
        export_design(store.state(), ExportOptions::default(), t0(), &mut fetcher).unwrap();

    // The exported LEFT carries RIGHT's layer values verbatim, under LEFT's
    // own identity.
    let left: &Panel = artifacts
        .snapshot
        .panels
        .iter()
        .find(|p| p.name == PanelName::Left)
        .unwrap();
    assert_eq!(left.id, 2);
    assert_eq!(left.background_color, Some("#112233".parse().unwrap()));
    assert_eq!(left.logo.as_ref().unwrap().source, logo_src);
    assert_eq!(left.logo.as_ref().unwrap().rect, logo_rect);
}

#[test]
fn export_is_deterministic_given_a_fixed_timestamp() {
    let state = white_state();
    let mut fetcher = MemFetcher::default();

    let a = export_design(&state, ExportOptions::default(), t0(), &mut fetcher).unwrap();
    let b = export_design(&state, ExportOptions::default(), t0(), &mut fetcher).unwrap();

    assert_eq!(a.combined_png, b.combined_png);
    assert_eq!(a.thumbnail_png, b.thumbnail_png);
    assert_eq!(a.snapshot, b.snapshot);
}

#[test]
fn broken_logo_does_not_fail_the_export() {
    let state = white_state().apply(&Action::SetLogo {
        panel_id: 4,
        layer: Some(ImageLayer {
            source: ImageSource::Remote("https://example.test/404.png".to_string()),
            rect: LayerBox::new(10.0, 10.0, 100.0, 100.0).unwrap(),
        }),
    });

    let mut fetcher = MemFetcher::default();
    let artifacts = export_design(&state, ExportOptions::default(), t0(), &mut fetcher).unwrap();
    assert!(!artifacts.combined_png.is_empty());
    assert!(artifacts.warnings.iter().any(|w| w.contains("404.png")));
}

#[test]
fn thumbnail_falls_back_to_the_combined_image_without_side_panels() {
    // A state whose panel list has no RIGHT or LEFT at all.
    let mut state = white_state();
    state.panels.retain(|p| {
        p.name != PanelName::Right && p.name != PanelName::Left
    });

    let mut fetcher = MemFetcher::default();
    let artifacts = export_design(&state, ExportOptions::default(), t0(), &mut fetcher).unwrap();
    assert_eq!(artifacts.thumbnail_png, artifacts.combined_png);
}

#[test]
fn thumbnail_is_square_and_distinct_when_right_exists() {
    let state = white_state();
    let mut fetcher = MemFetcher::default();
    let artifacts = export_design(
        &state,
        ExportOptions {
            thumbnail_size: 128,
        },
        t0(),
        &mut fetcher,
    )
    .unwrap();

    let thumb = image::load_from_memory(&artifacts.thumbnail_png).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (128, 128));
    assert_ne!(artifacts.thumbnail_png, artifacts.combined_png);
}

#[test]
fn snapshot_carries_history_library_and_fresh_update_stamp() {
    let mut store = EditorStore::new(white_state());
    store.dispatch(&Action::RecordPrompt {
        prompt: "chrome flames".to_string(),
        at: t0(),
    });
    store.dispatch(&Action::AddLibraryImage {
        source: ImageSource::Remote("https://example.test/gen.png".to_string()),
        provenance: Provenance::AiGenerated,
        at: t0(),
    });

    let export_time = Utc.with_ymd_and_hms(2024, 6, 2, 8, 30, 0).unwrap();
    let mut fetcher = MemFetcher::default();
    let artifacts =
        export_design(store.state(), ExportOptions::default(), export_time, &mut fetcher).unwrap();

    assert_eq!(artifacts.snapshot.prompt_history.len(), 1);
    assert_eq!(artifacts.snapshot.library.len(), 1);
    assert_eq!(artifacts.snapshot.meta.created_at, t0());
    assert_eq!(artifacts.snapshot.meta.updated_at, export_time);

    // The snapshot is what persistence receives; it must survive the
    // versioned file format unchanged.
    let json = SnapshotFile::current(artifacts.snapshot.clone())
        .to_json()
        .unwrap();
    let back = SnapshotFile::from_json(&json).unwrap().migrate();
    assert_eq!(back, artifacts.snapshot);
}
