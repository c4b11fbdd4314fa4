mod common;

use common::fixtures;
use image::DynamicImage;
use scorescan::{RectifyConfig, Rectifier, RectifyError};

#[test]
fn end_to_end_rotated_page() {
    // 400x300 white canvas with a dark-bordered rotated rectangle covering
    // roughly 60% of the area.
    let (rect_width, rect_height) = (320.0, 220.0);
    let corners = fixtures::rotated_rect_corners(400, 300, rect_width, rect_height, 4.0);
    let img = fixtures::page_on_canvas(400, 300, corners);

    let rectifier = Rectifier::default();
    let output = rectifier.rectify(&img).expect("pipeline should succeed");

    // The output size must come from the measured rectangle edges, not the
    // canvas size.
    assert!(
        (output.width() as f32 - rect_width).abs() <= 25.0,
        "unexpected rectified width {}",
        output.width()
    );
    assert!(
        (output.height() as f32 - rect_height).abs() <= 25.0,
        "unexpected rectified height {}",
        output.height()
    );

    // Single-channel, non-empty output containing the dark page content.
    assert!(output.width() > 0 && output.height() > 0);
    assert!(output.pixels().any(|p| p.0[0] < 128));
}

#[test]
fn blank_canvas_passes_through_at_original_size() {
    let img = fixtures::blank_canvas(240, 180);
    let rectifier = Rectifier::default();
    let output = rectifier.rectify(&img).expect("pipeline should succeed");
    assert_eq!((output.width(), output.height()), (240, 180));
}

#[test]
fn small_marking_does_not_trigger_rectification() {
    let img = fixtures::page_on_canvas(400, 300, [(170, 130), (230, 130), (230, 170), (170, 170)]);
    let rectifier = Rectifier::default();
    let output = rectifier.rectify(&img).expect("pipeline should succeed");
    // The marking is below the area floor, so the page flows through at its
    // original dimensions.
    assert_eq!((output.width(), output.height()), (400, 300));
}

#[test]
fn zero_area_input_is_malformed() {
    let img = DynamicImage::new_luma8(0, 0);
    let rectifier = Rectifier::default();
    match rectifier.rectify(&img) {
        Err(RectifyError::ZeroArea { width: 0, height: 0 }) => {}
        other => panic!("expected ZeroArea error, got {:?}", other.map(|_| "image")),
    }
}

#[test]
fn batch_results_preserve_input_order() {
    let pages = vec![
        fixtures::blank_canvas(100, 80),
        fixtures::blank_canvas(120, 90),
        DynamicImage::new_luma8(0, 0),
    ];
    let rectifier = Rectifier::new(RectifyConfig::default());
    let results = rectifier.rectify_all(&pages);

    assert_eq!(results.len(), 3);
    let first = results[0].as_ref().expect("first page should succeed");
    assert_eq!((first.width(), first.height()), (100, 80));
    let second = results[1].as_ref().expect("second page should succeed");
    assert_eq!((second.width(), second.height()), (120, 90));
    assert!(results[2].is_err());
}
