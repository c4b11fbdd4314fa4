use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::filter::filter3x3;

/// Sharpen strokes, lift brightness, and reduce to a single channel.
///
/// The sharpening kernel accentuates staff lines and note heads; the
/// brightness step works on the HSV value channel with a saturating add so
/// near-white paper clamps at 255 instead of wrapping around.
pub fn enhance(img: &DynamicImage, sharpen_kernel: &[f32; 9], brightness_delta: u8) -> GrayImage {
    let rgb = img.to_rgb8();
    let sharpened: RgbImage = filter3x3::<Rgb<u8>, f32, u8>(&rgb, sharpen_kernel);
    let brightened = brighten_value(&sharpened, brightness_delta);
    DynamicImage::ImageRgb8(brightened).to_luma8()
}

/// Add `delta` to the HSV value channel of every pixel, clamping at 255.
pub fn brighten_value(img: &RgbImage, delta: u8) -> RgbImage {
    let mut output = RgbImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let (h, s, v) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
        let v = (v + f32::from(delta)).min(255.0);
        let (r, g, b) = hsv_to_rgb(h, s, v);
        output.put_pixel(x, y, Rgb([r, g, b]));
    }
    output
}

/// Hue in degrees [0, 360), saturation [0, 1], value [0, 255].
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;

    let hue = if chroma == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / chroma).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / chroma + 2.0)
    } else {
        60.0 * ((r - g) / chroma + 4.0)
    };
    let saturation = if max == 0.0 { 0.0 } else { chroma / max };

    (hue, saturation, max)
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (u8, u8, u8) {
    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let floor = value - chroma;
    (
        (r1 + floor).round().clamp(0.0, 255.0) as u8,
        (g1 + floor).round().clamp(0.0, 255.0) as u8,
        (b1 + floor).round().clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_saturates_instead_of_wrapping() {
        let img = RgbImage::from_pixel(4, 4, Rgb([250u8, 250, 250]));
        let out = brighten_value(&img, 30);
        assert!(out.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn brightness_lifts_midtones_by_delta() {
        let img = RgbImage::from_pixel(4, 4, Rgb([100u8, 100, 100]));
        let out = brighten_value(&img, 30);
        assert!(out.pixels().all(|p| p.0 == [130, 130, 130]));
    }

    #[test]
    fn hsv_round_trip_preserves_color() {
        for &(r, g, b) in &[(12u8, 200u8, 90u8), (255, 0, 0), (0, 0, 0), (37, 37, 37)] {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (r2, g2, b2) = hsv_to_rgb(h, s, v);
            assert!(
                (i16::from(r) - i16::from(r2)).abs() <= 1
                    && (i16::from(g) - i16::from(g2)).abs() <= 1
                    && (i16::from(b) - i16::from(b2)).abs() <= 1,
                "({r},{g},{b}) round-tripped to ({r2},{g2},{b2})"
            );
        }
    }

    #[test]
    fn enhance_output_is_single_channel_with_input_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 24, Rgb([180u8, 180, 180])));
        let kernel = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];
        let out = enhance(&img, &kernel, 30);
        assert_eq!((out.width(), out.height()), (32, 24));
    }
}
