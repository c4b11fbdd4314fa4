pub mod boundary;
pub mod colormode;
pub mod enhance;
pub mod preprocessing;
pub mod steps;
pub mod warp;

use image::{DynamicImage, GrayImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::RectifyError;
use crate::models::PageBoundary;

/// Unit-sum high-pass kernel: center 5, four neighbors -1, corners 0.
pub const DEFAULT_SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// The full tunable surface of the rectification pipeline.
///
/// One immutable value of this struct parameterizes a [`Rectifier`]; nothing
/// in the pipeline reads configuration from anywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectifyConfig {
    /// Gaussian blur sigma applied before thresholding.
    pub blur_sigma: f32,
    /// Radius of the adaptive-threshold neighborhood.
    pub threshold_block_radius: u32,
    /// Constant subtracted from the local mean threshold.
    pub threshold_constant: i32,
    /// Median-filter radius for post-threshold denoising.
    pub denoise_radius: u32,
    /// Canny low gradient threshold.
    pub edge_low: f32,
    /// Canny high gradient threshold.
    pub edge_high: f32,
    /// Polygon simplification tolerance as a fraction of hull perimeter.
    pub simplify_tolerance: f64,
    /// Minimum page area as a fraction of total image area.
    pub min_area_fraction: f64,
    /// Brightness added to the HSV value channel (saturating).
    pub brightness_delta: u8,
    /// 3x3 sharpening convolution kernel.
    pub sharpen_kernel: [f32; 9],
}

impl Default for RectifyConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            threshold_block_radius: 15,
            threshold_constant: 10,
            denoise_radius: 1,
            edge_low: 50.0,
            edge_high: 150.0,
            simplify_tolerance: 0.02,
            min_area_fraction: 0.1,
            brightness_delta: 30,
            sharpen_kernel: DEFAULT_SHARPEN_KERNEL,
        }
    }
}

/// Five-stage page rectification pipeline.
///
/// Holds only immutable configuration, so one rectifier can process any
/// number of pages concurrently; every invocation allocates fresh buffers.
#[derive(Debug, Clone, Default)]
pub struct Rectifier {
    config: RectifyConfig,
}

impl Rectifier {
    pub fn new(config: RectifyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RectifyConfig {
        &self.config
    }

    /// Rectify one page image into a clean single-channel buffer.
    ///
    /// Stage order: color-mode classification and grayscale conversion,
    /// then blur/threshold/denoise, boundary extraction, perspective warp
    /// (or passthrough), and enhancement. A page without a detectable
    /// quadrilateral is not an error; it flows through unrectified.
    ///
    /// # Errors
    ///
    /// [`RectifyError::ZeroArea`] if the image has zero width or height.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn rectify(&self, image: &DynamicImage) -> Result<GrayImage, RectifyError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(RectifyError::ZeroArea { width, height });
        }
        let cfg = &self.config;

        let effectively_grayscale = colormode::is_effectively_grayscale(image);
        debug!(effectively_grayscale, "color mode classified");
        let gray = colormode::to_grayscale(image, effectively_grayscale);

        let blurred = preprocessing::apply_blur(&gray, cfg.blur_sigma);
        let binary = preprocessing::adaptive_threshold(
            &blurred,
            cfg.threshold_block_radius,
            cfg.threshold_constant,
        );
        let denoised = preprocessing::denoise(&binary, cfg.denoise_radius);

        let edges = preprocessing::detect_edges(&denoised, cfg.edge_low, cfg.edge_high);
        let min_area = f64::from(width) * f64::from(height) * cfg.min_area_fraction;
        let boundary = boundary::find_page_boundary(&edges, min_area, cfg.simplify_tolerance);
        if boundary == PageBoundary::NotFound {
            info!("no page boundary found; continuing with the unrectified image");
        }

        let rectified = warp::rectify_perspective(image, &boundary);
        Ok(enhance::enhance(
            &rectified,
            &cfg.sharpen_kernel,
            cfg.brightness_delta,
        ))
    }

    /// Rectify a batch of pages in parallel.
    ///
    /// Pages are independent, so they are processed concurrently; results
    /// come back in input order, one per page, with per-page failures left
    /// in place rather than aborting the batch.
    pub fn rectify_all(&self, pages: &[DynamicImage]) -> Vec<Result<GrayImage, RectifyError>> {
        pages.par_iter().map(|page| self.rectify(page)).collect()
    }
}

/// Decode uploaded image bytes into a pipeline-ready buffer.
///
/// # Errors
///
/// [`RectifyError::Decode`] for undecodable bytes and
/// [`RectifyError::ZeroArea`] for images with no pixels.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, RectifyError> {
    let image =
        image::load_from_memory(bytes).map_err(|err| RectifyError::Decode(err.to_string()))?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(RectifyError::ZeroArea { width, height });
    }
    Ok(image)
}

/// Build the standard five-stage pipeline as composable steps.
///
/// This is the same computation as [`Rectifier::rectify`], exposed step by
/// step so the CLI debug mode can dump every intermediate image.
pub fn build_standard_pipeline(config: &RectifyConfig) -> crate::pipeline::Pipeline {
    use crate::pipeline::Pipeline;
    use std::sync::Arc;

    Pipeline::new()
        .add_step(Arc::new(steps::GrayscaleStep))
        .add_step(Arc::new(steps::BlurStep {
            sigma: config.blur_sigma,
        }))
        .add_step(Arc::new(steps::AdaptiveThresholdStep {
            block_radius: config.threshold_block_radius,
            constant: config.threshold_constant,
        }))
        .add_step(Arc::new(steps::DenoiseStep {
            radius: config.denoise_radius,
        }))
        .add_step(Arc::new(steps::EdgeDetectionStep {
            low_threshold: config.edge_low,
            high_threshold: config.edge_high,
        }))
        .add_step(Arc::new(steps::BoundaryStep {
            min_area_fraction: config.min_area_fraction,
            simplify_tolerance: config.simplify_tolerance,
        }))
        .add_step(Arc::new(steps::WarpStep))
        .add_step(Arc::new(steps::EnhanceStep {
            sharpen_kernel: config.sharpen_kernel,
            brightness_delta: config.brightness_delta,
        }))
}
