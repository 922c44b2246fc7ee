use std::path::{Path, PathBuf};
use std::process::Command;

use colorsmith::contrast::{ensure_contrast, ContrastReport};
use colorsmith::extract::{dominant_colors, extract_colors, load_and_prepare};
use colorsmith::format::{self, ColorFormat};
use colorsmith::gradient::{Gradient, GradientKind, GradientStop};
use colorsmith::settings::Settings;
use colorsmith::store::{
    PaletteEvent, PaletteStore, Storage, MAX_RECENT_COLORS, RECENTLY_PICKED_PALETTE_ID,
    STANDARD_COLORS_PALETTE_ID,
};
use colorsmith::Color;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Horizontal bands covering 10/40/22.5/27.5 percent, top to bottom.
fn create_banded(path: &Path) {
    let img = image::RgbImage::from_fn(100, 40, |_, y| match y {
        0..=3 => image::Rgb([240, 240, 240]),
        4..=19 => image::Rgb([220, 40, 40]),
        20..=28 => image::Rgb([40, 40, 220]),
        _ => image::Rgb([40, 200, 40]),
    });
    img.save(path).unwrap();
}

fn create_solid(path: &Path) {
    let img = image::RgbImage::from_fn(32, 32, |_, _| image::Rgb([12, 34, 56]));
    img.save(path).unwrap();
}

/// A 640x480 checkerboard, large enough to be downsampled.
fn create_large_checker(path: &Path) {
    let img = image::RgbImage::from_fn(640, 480, |x, y| {
        if (x / 80 + y / 80) % 2 == 0 {
            image::Rgb([0, 0, 0])
        } else {
            image::Rgb([255, 255, 255])
        }
    });
    img.save(path).unwrap();
}

fn ensure_fixtures() {
    let dir = fixture_dir();
    std::fs::create_dir_all(&dir).unwrap();

    let banded = dir.join("banded.png");
    if !banded.exists() {
        create_banded(&banded);
    }
    let solid = dir.join("solid.png");
    if !solid.exists() {
        create_solid(&solid);
    }
    let checker = dir.join("large-checker.png");
    if !checker.exists() {
        create_large_checker(&checker);
    }
}

fn loaded_store(dir: &Path) -> PaletteStore {
    let mut store = PaletteStore::new(Storage::new(dir));
    store.load();
    store
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[test]
fn banded_image_ranks_bands_by_coverage() {
    ensure_fixtures();
    let pixels = load_and_prepare(&fixture_dir().join("banded.png")).unwrap();
    assert_eq!(pixels.len(), 100 * 40);

    let colors = extract_colors(&pixels, 4);
    let ranked: Vec<Color> = colors.iter().map(|c| c.color).collect();
    assert_eq!(
        ranked,
        vec![
            Color::new(220, 40, 40),
            Color::new(40, 200, 40),
            Color::new(40, 40, 220),
            Color::new(240, 240, 240),
        ]
    );
    let weights: Vec<f32> = colors.iter().map(|c| c.weight).collect();
    for (got, want) in weights.iter().zip([0.40f32, 0.275, 0.225, 0.10]) {
        assert!((got - want).abs() < 1e-6, "weight {got} != {want}");
    }
}

#[test]
fn solid_image_yields_single_color() {
    ensure_fixtures();
    let pixels = load_and_prepare(&fixture_dir().join("solid.png")).unwrap();
    assert_eq!(dominant_colors(&pixels, 3), vec![Color::new(12, 34, 56)]);
}

#[test]
fn large_image_is_downsampled_before_clustering() {
    ensure_fixtures();
    let pixels = load_and_prepare(&fixture_dir().join("large-checker.png")).unwrap();
    assert_eq!(pixels.len(), 200 * 150);

    let colors = dominant_colors(&pixels, 2);
    assert_eq!(colors.len(), 2);
    assert!(colors.contains(&Color::BLACK));
    assert!(colors.contains(&Color::WHITE));
}

#[test]
fn extraction_is_repeatable_across_loads() {
    ensure_fixtures();
    let path = fixture_dir().join("banded.png");
    let first = extract_colors(&load_and_prepare(&path).unwrap(), 3);
    let second = extract_colors(&load_and_prepare(&path).unwrap(), 3);
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

#[test]
fn every_notation_detects_back_to_itself() {
    let color = Color::new(51, 102, 153);
    for target in ColorFormat::ALL {
        let text = target.format(color);
        let (_, detected) = format::detect(&text).unwrap();
        assert_eq!(detected, target, "'{text}' detected as {detected}");
    }
}

#[test]
fn hex_and_rgb_round_trip_exactly() {
    let color = Color::new(1, 128, 254);
    assert_eq!(ColorFormat::Hex.parse(&color.to_hex()).unwrap(), color);
    assert_eq!(ColorFormat::Rgb.parse(&format::to_rgb(color)).unwrap(), color);
}

#[test]
fn garbage_is_rejected_by_every_parser() {
    for target in ColorFormat::ALL {
        assert!(target.parse("chartreuse-ish").is_err());
    }
    assert!(format::detect("").is_err());
}

// ---------------------------------------------------------------------------
// Contrast
// ---------------------------------------------------------------------------

#[test]
fn black_on_white_is_maximal() {
    let report = ContrastReport::new(Color::BLACK, Color::WHITE);
    assert_eq!(report.format_ratio(), "21.00:1");
    assert!(report.aaa_normal && report.aa_large);
}

#[test]
fn ensure_contrast_fixes_low_contrast_pair() {
    let bg = Color::new(40, 40, 40);
    let fixed = ensure_contrast(Color::new(70, 70, 70), bg, 4.5);
    assert!(Color::contrast_ratio(&fixed, &bg) >= 4.5);
}

// ---------------------------------------------------------------------------
// Palette store
// ---------------------------------------------------------------------------

#[test]
fn store_session_survives_restart() {
    let dir = TempDir::new().unwrap();

    let palette_id = {
        let mut store = loaded_store(dir.path());
        let id = store.create_palette("Ocean").id().to_string();
        assert!(store.add_color(&id, Color::new(0, 105, 148), "deep"));
        assert!(store.add_color(&id, Color::new(72, 209, 204), ""));
        store.set_current_palette(&id);
        store.save().unwrap();
        store.add_to_recent_colors(Color::new(255, 0, 0));
        store.add_to_recent_colors(Color::new(0, 255, 0));
        id
    };

    let store = loaded_store(dir.path());
    assert_eq!(store.current_palette_id(), Some(palette_id.as_str()));
    let palette = store.palette(&palette_id).unwrap();
    assert_eq!(palette.name(), "Ocean");
    assert_eq!(
        palette.colors(),
        &[Color::new(0, 105, 148), Color::new(72, 209, 204)]
    );
    assert_eq!(
        store.recent_colors(),
        &[Color::new(0, 255, 0), Color::new(255, 0, 0)]
    );
}

#[test]
fn system_palettes_stay_first_and_read_only() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(dir.path());
    store.create_palette("Mine");

    let ids: Vec<&str> = store.palettes().iter().map(|p| p.id()).collect();
    assert_eq!(ids[0], RECENTLY_PICKED_PALETTE_ID);
    assert_eq!(ids[1], STANDARD_COLORS_PALETTE_ID);
    assert!(!store.delete_palette(STANDARD_COLORS_PALETTE_ID));
    assert!(!store.add_color(RECENTLY_PICKED_PALETTE_ID, Color::WHITE, ""));
}

#[test]
fn subscribers_observe_store_changes_in_order() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(dir.path());
    let rx = store.subscribe();

    let id = store.create_palette("Events").id().to_string();
    store.add_color(&id, Color::WHITE, "");
    store.rename_palette(&id, "Renamed");
    store.set_current_palette(&id);
    store.delete_palette(&id);

    let events: Vec<PaletteEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            PaletteEvent::Added { id: id.clone() },
            PaletteEvent::ColorsChanged { id: id.clone() },
            PaletteEvent::Renamed { id: id.clone() },
            PaletteEvent::CurrentChanged { id: id.clone() },
            PaletteEvent::Removed { id },
            PaletteEvent::CurrentChanged {
                id: RECENTLY_PICKED_PALETTE_ID.into()
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Gradient
// ---------------------------------------------------------------------------

#[test]
fn gradient_from_parsed_stops_renders_css_and_svg() {
    let stops: Vec<GradientStop> = ["#ff0000@0", "hsl(240, 100%, 50%)@1"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let gradient = Gradient::new(GradientKind::Linear { rotation: 0 }, stops).unwrap();

    let css = gradient.to_css();
    assert_eq!(css.lines().count(), 6);
    assert!(css
        .lines()
        .last()
        .unwrap()
        .starts_with("background: linear-gradient(90deg, #ff0000 0%"));

    let svg = gradient.to_svg_document(400, 300);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<linearGradient"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_color() -> impl Strategy<Value = Color> {
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Color::new(r, g, b))
    }

    fn arb_pixel_buffer() -> impl Strategy<Value = Vec<Color>> {
        proptest::collection::vec(arb_color(), 1..256)
    }

    proptest! {
        #[test]
        fn extraction_never_exceeds_k(pixels in arb_pixel_buffer(), k in 1usize..8) {
            let colors = extract_colors(&pixels, k);
            prop_assert!(!colors.is_empty());
            prop_assert!(colors.len() <= k);
            let total: usize = colors.iter().map(|c| c.count).sum();
            prop_assert_eq!(total, pixels.len());
            for window in colors.windows(2) {
                prop_assert!(window[0].count >= window[1].count);
            }
        }

        #[test]
        fn recent_list_is_bounded_and_unique(picks in proptest::collection::vec(arb_color(), 0..60)) {
            let dir = TempDir::new().unwrap();
            let mut store = loaded_store(dir.path());
            for color in &picks {
                store.add_to_recent_colors(*color);
            }
            let recent = store.recent_colors();
            prop_assert!(recent.len() <= MAX_RECENT_COLORS);
            for (i, color) in recent.iter().enumerate() {
                prop_assert!(!recent[i + 1..].contains(color));
            }
            if let Some(last) = picks.last() {
                prop_assert_eq!(recent[0], *last);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CLI integration tests (run the actual binary)
// ---------------------------------------------------------------------------

fn run_cli(data_dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_colorsmith"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run binary")
}

fn stdout_of(output: &std::process::Output) -> String {
    assert!(
        output.status.success(),
        "binary failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn cli_convert_prints_requested_notation() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(&run_cli(dir.path(), &["convert", "#ff0000", "--to", "rgb"]));
    assert_eq!(out.trim(), "rgb(255, 0, 0)");

    let settings = Settings::load(dir.path());
    assert_eq!(settings.last_color(), Some(Color::new(255, 0, 0)));
}

#[test]
fn cli_convert_all_lists_every_notation() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(&run_cli(dir.path(), &["convert", "rgb(0, 0, 255)", "--all"]));
    assert_eq!(out.lines().count(), ColorFormat::ALL.len());
    assert!(out.contains("#0000ff"));
}

#[test]
fn cli_rejects_unreadable_color() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(dir.path(), &["convert", "not-a-color"]);
    assert!(!output.status.success());
}

#[test]
fn cli_extract_without_preview_prints_plain_lines() {
    ensure_fixtures();
    let dir = TempDir::new().unwrap();
    let image = fixture_dir().join("banded.png");
    let out = stdout_of(&run_cli(
        dir.path(),
        &["extract", image.to_str().unwrap(), "-k", "4"],
    ));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("#dc2828"), "got '{}'", lines[0]);
    assert!(!out.contains('\u{1b}'));
}

#[test]
fn cli_palette_lifecycle() {
    let dir = TempDir::new().unwrap();
    let id = stdout_of(&run_cli(dir.path(), &["palette", "create", "Brand"]))
        .trim()
        .to_string();
    stdout_of(&run_cli(dir.path(), &["palette", "add", "brand", "#123456"]));
    stdout_of(&run_cli(dir.path(), &["palette", "use", &id]));

    let store = loaded_store(dir.path());
    assert_eq!(store.current_palette_id(), Some(id.as_str()));
    assert_eq!(
        store.palette(&id).unwrap().colors(),
        &[Color::new(0x12, 0x34, 0x56)]
    );

    let output = run_cli(dir.path(), &["palette", "delete", "Standard HTML Colors"]);
    assert!(!output.status.success());
}

#[test]
fn cli_recent_add_records_color() {
    let dir = TempDir::new().unwrap();
    stdout_of(&run_cli(dir.path(), &["recent", "add", "#00ff00"]));
    stdout_of(&run_cli(dir.path(), &["recent", "add", "#0000ff"]));
    let store = loaded_store(dir.path());
    assert_eq!(
        store.recent_colors(),
        &[Color::new(0, 0, 255), Color::new(0, 255, 0)]
    );
}
