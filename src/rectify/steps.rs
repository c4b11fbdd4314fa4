use anyhow::Result;
use image::DynamicImage;

use crate::models::PageBoundary;
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};
use crate::rectify::{boundary, colormode, enhance, preprocessing, warp};

/// Classify the color mode and reduce to a single channel.
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let effectively_grayscale = colormode::is_effectively_grayscale(&data.image);
        let gray = colormode::to_grayscale(&data.image, effectively_grayscale);
        Ok(data
            .with_image(DynamicImage::ImageLuma8(gray))
            .with_metadata("grayscale_input", MetadataValue::Bool(effectively_grayscale)))
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Apply Gaussian blur.
pub struct BlurStep {
    pub sigma: f32,
}

impl PipelineStep for BlurStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let blurred = preprocessing::apply_blur(&data.image.to_luma8(), self.sigma);
        Ok(data.with_image(DynamicImage::ImageLuma8(blurred)))
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Binarize with a locally adaptive threshold.
pub struct AdaptiveThresholdStep {
    pub block_radius: u32,
    pub constant: i32,
}

impl PipelineStep for AdaptiveThresholdStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let binary = preprocessing::adaptive_threshold(
            &data.image.to_luma8(),
            self.block_radius,
            self.constant,
        );
        Ok(data.with_image(DynamicImage::ImageLuma8(binary)))
    }

    fn name(&self) -> &str {
        "Adaptive Threshold"
    }
}

/// Remove residual speckle with a median filter.
pub struct DenoiseStep {
    pub radius: u32,
}

impl PipelineStep for DenoiseStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let cleaned = preprocessing::denoise(&data.image.to_luma8(), self.radius);
        Ok(data.with_image(DynamicImage::ImageLuma8(cleaned)))
    }

    fn name(&self) -> &str {
        "Denoise"
    }
}

/// Detect edges using Canny.
pub struct EdgeDetectionStep {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl PipelineStep for EdgeDetectionStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let edges = preprocessing::detect_edges(
            &data.image.to_luma8(),
            self.low_threshold,
            self.high_threshold,
        );
        Ok(data.with_image(DynamicImage::ImageLuma8(edges)))
    }

    fn name(&self) -> &str {
        "Edge Detection"
    }
}

/// Find the page quadrilateral in the edge map.
///
/// The working image passes through unchanged; the boundary (or its absence)
/// is recorded for the warp step.
pub struct BoundaryStep {
    pub min_area_fraction: f64,
    pub simplify_tolerance: f64,
}

impl PipelineStep for BoundaryStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let (width, height) = (data.original.width(), data.original.height());
        let min_area = f64::from(width) * f64::from(height) * self.min_area_fraction;
        let boundary =
            boundary::find_page_boundary(&data.image.to_luma8(), min_area, self.simplify_tolerance);

        let found = boundary.is_found();
        let mut data = data.with_metadata("boundary_found", MetadataValue::Bool(found));
        data.boundary = Some(boundary);
        Ok(data)
    }

    fn name(&self) -> &str {
        "Boundary Extraction"
    }
}

/// Warp the original image through the detected quadrilateral.
pub struct WarpStep;

impl PipelineStep for WarpStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let boundary = data.boundary.unwrap_or(PageBoundary::NotFound);
        let rectified = warp::rectify_perspective(&data.original, &boundary);
        let mut data = data.with_image(rectified);
        data.boundary = Some(boundary);
        Ok(data)
    }

    fn name(&self) -> &str {
        "Perspective Rectification"
    }
}

/// Sharpen, brighten, and reduce to single-channel output.
pub struct EnhanceStep {
    pub sharpen_kernel: [f32; 9],
    pub brightness_delta: u8,
}

impl PipelineStep for EnhanceStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let enhanced = enhance::enhance(&data.image, &self.sharpen_kernel, self.brightness_delta);
        Ok(data.with_image(DynamicImage::ImageLuma8(enhanced)))
    }

    fn name(&self) -> &str {
        "Enhancement"
    }
}
