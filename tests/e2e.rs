mod common;

use common::synthetic_image::{multi_plant_scene, plant_scene};
use common::{scripted, RecordingSink};
use plant_morphometry::analyzer::{AnalyzeError, Analyzer, NullSink};
use plant_morphometry::image::io::load_rgb_image;
use plant_morphometry::measure::plant_crop;
use plant_morphometry::overlay::{OverlaySink, ENDPOINT_COLOR, SKELETON_COLOR};
use plant_morphometry::types::Rect;

const SESSION: &str = r#"{"steps": [
    [{"drag": [0, 0, 30, 10]}, {"key": "enter"}],
    [{"drag": [10, 10, 60, 60]}, {"key": "enter"}],
    [{"drag": [30, 20, 31, 40]}, {"key": "enter"}],
    [{"drag": [10, 10, 60, 60]}, {"key": "enter"}],
    [{"click": [30, 20]}, {"click": [30, 35]}, {"key": "enter"}],
    [{"key": "escape"}]
]}"#;

#[test]
fn single_plant_protocol_produces_expected_row() {
    let _ = env_logger::builder().is_test(true).try_init();
    let plant = Rect::new(10, 10, 50, 50);
    let image = plant_scene(100, 100, plant, [40, 120, 80]);
    let (mut operator, cancel) = scripted(SESSION);
    let mut sink = RecordingSink::default();

    let outcome = Analyzer::default()
        .run(&image, &mut operator, &mut sink, &cancel)
        .expect("analysis succeeds");

    assert_eq!(outcome.report.mm_per_px, 10.0);
    assert!(outcome.report.calibrated);
    let rows = outcome.table.rows();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.index, 1);
    assert_eq!(row.mean_shoot_green, 120.0);
    assert_eq!(row.mean_root_gray, 92.0);
    assert_eq!(row.branch_count, 2);
    assert!((row.manual_length_mm - 150.0).abs() < 1e-9);
    assert_eq!(row.manual_diameter_mm, 0.0);

    let diag = &outcome.report.plants[0].diagnostics;
    assert!(
        (diag.skeleton_diameter_mm - 10.0).abs() < 1e-6,
        "diameter along the skeleton was {}",
        diag.skeleton_diameter_mm
    );
    assert_eq!(diag.root_area_px, 20);
    assert_eq!(diag.shoot_area_px, 2500);
    assert_eq!(diag.junction_count, 0);

    assert_eq!(sink.presented.len(), 1);
    let shown = &sink.presented[0];
    assert_eq!(shown.crop, plant_crop(&image, plant), "crop passed unmodified");
    assert_eq!(shown.skeleton.pixel_count(), 20);
    assert_eq!(shown.endpoints.count(), 2);
    assert_eq!(&shown.metrics, row);
    assert_eq!(operator.open_scopes(), 0);
    assert_eq!(operator.remaining_steps(), 0);
}

#[test]
fn csv_output_matches_the_table() {
    let image = plant_scene(100, 100, Rect::new(10, 10, 50, 50), [40, 120, 80]);
    let (mut operator, cancel) = scripted(SESSION);
    let outcome = Analyzer::default()
        .run(&image, &mut operator, &mut NullSink, &cancel)
        .unwrap();
    let mut buf = Vec::new();
    outcome.table.write_csv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("PlantIndex,MeanShootGreen,MeanRootGray,BranchCount,ManualLength_mm,ManualDiameter_mm")
    );
    assert_eq!(lines.next(), Some("1,120.0,92.0,2,150.0,0.0"));
    assert_eq!(lines.next(), None);
}

#[test]
fn plants_are_numbered_in_selection_order() {
    let a = Rect::new(5, 5, 20, 20);
    let b = Rect::new(40, 5, 20, 20);
    let image = multi_plant_scene(80, 40, &[(a, [0, 50, 0]), (b, [0, 200, 0])]);
    // Plant b is drawn first, so it becomes plant 1.
    let (mut operator, cancel) = scripted(
        r#"{"steps": [
            [{"drag": [0, 0, 20, 2]}],
            [{"drag": [40, 5, 60, 25]}, {"drag": [5, 5, 25, 25]}],
            [], [{"drag": [40, 5, 60, 25]}], [], [],
            [], [{"drag": [5, 5, 25, 25]}], [], []
        ]}"#,
    );
    let outcome = Analyzer::default()
        .run(&image, &mut operator, &mut NullSink, &cancel)
        .unwrap();
    let rows = outcome.table.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].index, rows[0].mean_shoot_green), (1, 200.0));
    assert_eq!((rows[1].index, rows[1].mean_shoot_green), (2, 50.0));
    assert_eq!(rows[0].branch_count, 0, "no root box drawn");
    assert_eq!(operator.prompts()[2], "Draw ROOT area for Plant 1");
    assert_eq!(operator.prompts()[6], "Draw ROOT area for Plant 2");
}

#[test]
fn degenerate_ruler_zeroes_millimetre_values() {
    let image = plant_scene(100, 100, Rect::new(10, 10, 50, 50), [40, 120, 80]);
    let (mut operator, cancel) = scripted(
        r#"{"steps": [
            [{"key": "escape"}],
            [{"drag": [10, 10, 60, 60]}],
            [{"drag": [30, 20, 31, 40]}],
            [{"drag": [10, 10, 60, 60]}],
            [{"click": [30, 20]}, {"click": [30, 35]}],
            [{"click": [30, 20]}, {"click": [31, 20]}]
        ]}"#,
    );
    let outcome = Analyzer::default()
        .run(&image, &mut operator, &mut NullSink, &cancel)
        .unwrap();
    assert!(!outcome.report.calibrated);
    let row = &outcome.table.rows()[0];
    assert_eq!(row.manual_length_mm, 0.0);
    assert_eq!(row.manual_diameter_mm, 0.0);
    assert_eq!(row.branch_count, 2, "pixel metrics are unaffected");
    assert_eq!(outcome.report.plants[0].diagnostics.skeleton_diameter_mm, 0.0);
}

#[test]
fn no_plants_is_an_input_error() {
    let image = plant_scene(50, 50, Rect::new(0, 0, 10, 10), [0, 0, 0]);
    let (mut operator, cancel) =
        scripted(r#"{"steps": [[{"drag": [0, 0, 30, 10]}], [{"key": "enter"}]]}"#);
    let err = Analyzer::default()
        .run(&image, &mut operator, &mut NullSink, &cancel)
        .unwrap_err();
    assert!(matches!(err, AnalyzeError::NoPlants));
}

#[test]
fn quit_mid_run_keeps_only_completed_plants() {
    let image = multi_plant_scene(
        80,
        40,
        &[(Rect::new(5, 5, 20, 20), [0, 50, 0]), (Rect::new(40, 5, 20, 20), [0, 200, 0])],
    );
    let (mut operator, cancel) = scripted(
        r#"{"steps": [
            [{"drag": [0, 0, 20, 2]}],
            [{"drag": [5, 5, 25, 25]}, {"drag": [40, 5, 60, 25]}],
            [], [], [], [],
            [{"drag": [40, 5, 50, 10]}], [{"key": "quit"}]
        ]}"#,
    );
    let mut sink = RecordingSink::default();
    let err = Analyzer::default()
        .run(&image, &mut operator, &mut sink, &cancel)
        .unwrap_err();
    match err {
        AnalyzeError::Aborted { completed, reports } => {
            assert_eq!(completed.len(), 1);
            assert_eq!(completed.rows()[0].index, 1);
            assert_eq!(reports.len(), 1);
        }
        other => panic!("expected abort, got {other}"),
    }
    assert!(cancel.is_cancelled());
    assert_eq!(sink.presented.len(), 1, "aborted plant is never presented");
    assert_eq!(operator.open_scopes(), 0);
}

#[test]
fn pre_cancelled_session_aborts_before_any_prompt() {
    let image = plant_scene(50, 50, Rect::new(0, 0, 10, 10), [0, 0, 0]);
    let (mut operator, cancel) = scripted(SESSION);
    cancel.cancel();
    let err = Analyzer::default()
        .run(&image, &mut operator, &mut NullSink, &cancel)
        .unwrap_err();
    assert!(matches!(err, AnalyzeError::Aborted { ref completed, .. } if completed.is_empty()));
    assert!(operator.prompts().is_empty());
}

#[test]
fn overlay_sink_writes_one_png_per_plant() {
    let dir = std::env::temp_dir().join("plant_morphometry_overlay_e2e");
    let _ = std::fs::remove_dir_all(&dir);
    let image = plant_scene(100, 100, Rect::new(10, 10, 50, 50), [40, 120, 80]);
    let (mut operator, cancel) = scripted(SESSION);
    let mut sink = OverlaySink::new(&dir, "sample");
    Analyzer::default()
        .run(&image, &mut operator, &mut sink, &cancel)
        .unwrap();
    assert_eq!(sink.written(), &[dir.join("sample_plant1_branches.png")]);
    let overlay = load_rgb_image(&sink.written()[0]).unwrap();
    assert_eq!(overlay.pixel(30, 20), ENDPOINT_COLOR);
    assert_eq!(overlay.pixel(30, 30), SKELETON_COLOR);
    assert_eq!(overlay.pixel(12, 12), [40, 120, 80]);
    assert_eq!(overlay.pixel(80, 80), [0, 0, 0]);
    let _ = std::fs::remove_dir_all(&dir);
}
