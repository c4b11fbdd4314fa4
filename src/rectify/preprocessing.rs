use image::{GrayImage, Luma};
use imageproc::edges::canny;
use imageproc::filter::{gaussian_blur_f32, median_filter};

/// Apply Gaussian blur to suppress sensor noise ahead of thresholding.
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Binarize with a locally adaptive threshold.
///
/// For each pixel the threshold is the mean intensity of the surrounding
/// `(2 * block_radius + 1)^2` window minus `constant`; pixels darker than the
/// threshold become 0, the rest 255. The local mean compensates for the
/// uneven illumination typical of photographed pages, where a single global
/// threshold loses either the shadowed or the brightly lit half.
pub fn adaptive_threshold(img: &GrayImage, block_radius: u32, constant: i32) -> GrayImage {
    let (width, height) = img.dimensions();
    let summed = summed_area_table(img);
    let mut output = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mean = window_mean(&summed, width, height, x, y, block_radius);
            let threshold = (mean as i32 - constant).clamp(0, 255);
            let value = if i32::from(img.get_pixel(x, y).0[0]) < threshold {
                0u8
            } else {
                255u8
            };
            output.put_pixel(x, y, Luma([value]));
        }
    }

    output
}

/// Remove residual salt-and-pepper speckle left behind by thresholding.
pub fn denoise(img: &GrayImage, radius: u32) -> GrayImage {
    median_filter(img, radius, radius)
}

/// Detect edges with the Canny operator.
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Summed-area table with a zero-padded border: entry `(x, y)` holds the sum
/// of all pixels in the rectangle exclusive of row `y` and column `x`. The
/// table is `(width + 1) x (height + 1)`.
fn summed_area_table(img: &GrayImage) -> Vec<u64> {
    let (width, height) = img.dimensions();
    let stride = (width + 1) as usize;
    let mut table = vec![0u64; stride * (height + 1) as usize];

    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += u64::from(img.get_pixel(x, y).0[0]);
            let idx = (y + 1) as usize * stride + (x + 1) as usize;
            table[idx] = row_sum + table[y as usize * stride + (x + 1) as usize];
        }
    }

    table
}

/// Mean pixel value of the window centred on `(cx, cy)`, clamped to the image
/// bounds, via four summed-area lookups.
fn window_mean(table: &[u64], width: u32, height: u32, cx: u32, cy: u32, radius: u32) -> f64 {
    let stride = (width + 1) as usize;
    let x1 = cx.saturating_sub(radius) as usize;
    let y1 = cy.saturating_sub(radius) as usize;
    let x2 = ((cx + radius + 1) as usize).min(width as usize);
    let y2 = ((cy + radius + 1) as usize).min(height as usize);

    let area = ((x2 - x1) * (y2 - y1)) as f64;
    let sum = table[y2 * stride + x2] as f64 - table[y1 * stride + x2] as f64
        - table[y2 * stride + x1] as f64
        + table[y1 * stride + x1] as f64;

    sum / area
}
