use image::{DynamicImage, GrayImage};

/// Decide whether an image is effectively monochrome.
///
/// Single-channel buffers (including 16-bit intensity formats) always are.
/// Color buffers count as grayscale only if every pixel has equal channel
/// values; this is a full-image scan, not a sample, so a single tinted pixel
/// anywhere makes the image color.
pub fn is_effectively_grayscale(img: &DynamicImage) -> bool {
    match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => true,
        DynamicImage::ImageRgb8(buf) => buf.pixels().all(|p| p[0] == p[1] && p[1] == p[2]),
        DynamicImage::ImageRgba8(buf) => buf.pixels().all(|p| p[0] == p[1] && p[1] == p[2]),
        DynamicImage::ImageRgb16(buf) => buf.pixels().all(|p| p[0] == p[1] && p[1] == p[2]),
        DynamicImage::ImageRgba16(buf) => buf.pixels().all(|p| p[0] == p[1] && p[1] == p[2]),
        other => {
            let rgb = other.to_rgb8();
            rgb.pixels().all(|p| p[0] == p[1] && p[1] == p[2])
        }
    }
}

/// Reduce an image to a single channel.
///
/// An image already classified as grayscale keeps its luminance channel
/// as-is; anything else goes through the luma transform. Both paths converge
/// on an 8-bit single-channel buffer.
pub fn to_grayscale(img: &DynamicImage, effectively_grayscale: bool) -> GrayImage {
    if effectively_grayscale {
        if let DynamicImage::ImageLuma8(gray) = img {
            return gray.clone();
        }
    }
    img.to_luma8()
}
