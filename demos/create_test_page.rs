use image::{Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

fn main() {
    let (width, height) = (800u32, 600u32);
    let mut img = RgbImage::from_pixel(width, height, Rgb([235u8, 230, 220]));

    // A slightly rotated "page" occupying most of the canvas.
    let corners = [(90, 80), (690, 110), (670, 540), (110, 500)];
    let polygon: Vec<Point<i32>> = corners.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(&mut img, &polygon, Rgb([250u8, 250, 248]));

    // A few horizontal strokes standing in for staff lines.
    for line in 0..10 {
        let y = 160 + line * 36;
        for x in 160..620 {
            img.put_pixel(x, y as u32, Rgb([30u8, 30, 30]));
        }
    }

    img.save("test_page.jpg").unwrap();
    println!("Created test_page.jpg (800x600 synthetic page photo)");
}
