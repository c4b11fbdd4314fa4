use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, warn};

use crate::models::PageBoundary;

/// Map the detected page quadrilateral onto an axis-aligned rectangle.
///
/// Without a boundary (or with one whose corners are collinear) the input is
/// returned unchanged; that is the documented passthrough fallback. Otherwise
/// the destination size is taken from the quadrilateral's measured edge
/// lengths, never from the source image dimensions.
pub fn rectify_perspective(original: &DynamicImage, boundary: &PageBoundary) -> DynamicImage {
    let quad = match boundary {
        PageBoundary::Found(quad) => quad,
        PageBoundary::NotFound => {
            debug!("no page boundary; passing image through unrectified");
            return original.clone();
        }
    };

    let (width, height) = (quad.target_width(), quad.target_height());
    if width == 0 || height == 0 {
        warn!("degenerate page boundary; passing image through unrectified");
        return original.clone();
    }

    let destination = [
        (0.0, 0.0),
        ((width - 1) as f32, 0.0),
        ((width - 1) as f32, (height - 1) as f32),
        (0.0, (height - 1) as f32),
    ];
    let Some(projection) = Projection::from_control_points(quad.corners(), destination) else {
        warn!("projective transform is singular; passing image through unrectified");
        return original.clone();
    };

    let source = original.to_rgb8();
    let mut output = RgbImage::new(width, height);
    warp_into(
        &source,
        &projection,
        Interpolation::Bilinear,
        Rgb([255u8, 255, 255]),
        &mut output,
    );

    debug!(width, height, "perspective rectification applied");
    DynamicImage::ImageRgb8(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quadrilateral;
    use image::{GrayImage, Luma};

    #[test]
    fn missing_boundary_is_pixel_identical_passthrough() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(30, 20, |x, y| {
            Luma([((x * 7 + y * 11) % 256) as u8])
        }));
        let out = rectify_perspective(&img, &PageBoundary::NotFound);
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn collinear_boundary_falls_back_to_passthrough() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(30, 20, Luma([90u8])));
        let quad = Quadrilateral::from_unordered([
            (0.0, 5.0),
            (10.0, 5.0),
            (20.0, 5.0),
            (29.0, 5.0),
        ]);
        let out = rectify_perspective(&img, &PageBoundary::Found(quad));
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn output_size_comes_from_edge_lengths() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(400, 400, Luma([200u8])));
        let quad = Quadrilateral::from_unordered([
            (10.0, 10.0),
            (110.0, 10.0),
            (110.0, 60.0),
            (10.0, 60.0),
        ]);
        let out = rectify_perspective(&img, &PageBoundary::Found(quad));
        assert_eq!((out.width(), out.height()), (100, 50));
    }
}
