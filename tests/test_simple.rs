mod common;

use common::fixtures;
use image::{DynamicImage, Rgb, RgbImage};
use scorescan::{Rectifier, decode_image};

#[test]
fn default_pipeline_handles_an_unremarkable_photo() {
    // A gradient has no page boundary; the pipeline should still deliver a
    // single-channel image at the input size.
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(64, 48, |x, y| {
        Rgb([(x * 4) as u8, (y * 5) as u8, 128])
    }));

    let output = Rectifier::default().rectify(&img).expect("pipeline should succeed");
    assert_eq!((output.width(), output.height()), (64, 48));
}

#[test]
fn decode_image_round_trips_png_bytes() {
    let img = fixtures::blank_canvas(32, 32);
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode should succeed");

    let decoded = decode_image(&bytes).expect("decode should succeed");
    assert_eq!((decoded.width(), decoded.height()), (32, 32));
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(&[0u8, 1, 2, 3]).is_err());
}
