use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

/// Uniform white canvas with nothing on it, so there is no boundary to find.
pub fn blank_canvas(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([255u8])))
}

/// White canvas containing a filled dark quadrilateral with the given
/// corners. This is the synthetic stand-in for a photographed page.
pub fn page_on_canvas(width: u32, height: u32, corners: [(i32, i32); 4]) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([255u8, 255, 255]));
    let polygon: Vec<Point<i32>> = corners.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(&mut img, &polygon, Rgb([20u8, 20, 20]));
    DynamicImage::ImageRgb8(img)
}

/// Corners of a rectangle centred on the canvas, rotated by `angle_degrees`,
/// in `[top-left, top-right, bottom-right, bottom-left]` order.
pub fn rotated_rect_corners(
    canvas_width: u32,
    canvas_height: u32,
    rect_width: f32,
    rect_height: f32,
    angle_degrees: f32,
) -> [(i32, i32); 4] {
    let (cx, cy) = (canvas_width as f32 / 2.0, canvas_height as f32 / 2.0);
    let (hw, hh) = (rect_width / 2.0, rect_height / 2.0);
    let (sin, cos) = angle_degrees.to_radians().sin_cos();

    let rotate = |dx: f32, dy: f32| {
        (
            (cx + dx * cos - dy * sin).round() as i32,
            (cy + dx * sin + dy * cos).round() as i32,
        )
    };

    [
        rotate(-hw, -hh),
        rotate(hw, -hh),
        rotate(hw, hh),
        rotate(-hw, hh),
    ]
}
