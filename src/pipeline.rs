use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use image::DynamicImage;
use tracing::debug;

use crate::models::PageBoundary;

/// Data that flows through the pipeline: one page image plus everything the
/// later stages need from the earlier ones.
#[derive(Clone)]
pub struct PipelineData {
    /// The working image for the current stage.
    pub image: DynamicImage,

    /// The untouched input image (shared via Arc). The warp stage resamples
    /// this, not the binarized working buffer.
    pub original: Arc<DynamicImage>,

    /// Page boundary, once the boundary stage has run.
    pub boundary: Option<PageBoundary>,

    /// Diagnostic values attached by stages (e.g. classifier verdict,
    /// boundary area).
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types.
#[derive(Debug, Clone)]
pub enum MetadataValue {
    Bool(bool),
    Float(f32),
    String(String),
    Int(i32),
}

impl PipelineData {
    /// Create PipelineData for a full page image.
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            boundary: None,
            metadata: HashMap::new(),
        }
    }

    /// Replace the working image, keeping everything else.
    pub fn with_image(mut self, image: DynamicImage) -> Self {
        self.image = image;
        self
    }

    /// Add metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get metadata as bool.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.metadata.get(key) {
            Some(MetadataValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get metadata as float.
    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get metadata as string.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution.
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for per-stage debug images.
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled.
    pub enabled: bool,
}

/// Context available to all pipeline steps.
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement.
///
/// Rectification stages are strictly one-in one-out; a step transforms the
/// data (or passes it through annotated) and hands it to the next stage.
pub trait PipelineStep: Send + Sync {
    /// Process one page's data and return the transformed data.
    fn process(&self, data: PipelineData, context: &PipelineContext) -> Result<PipelineData>;

    /// Human-readable name for this step (used in logs and debug paths).
    fn name(&self) -> &str;
}

/// Composable pipeline builder.
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable debug mode with an output directory.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });

        Ok(self)
    }

    /// Add a processing step to the pipeline.
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Helper method to add a step from a Box (for convenience).
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    /// Run all steps in sequence on one input image.
    pub fn run(&self, input: DynamicImage) -> Result<PipelineData> {
        self.save_debug_input(&input)?;

        let mut data = PipelineData::from_image(input);
        for (step_index, step) in self.steps.iter().enumerate() {
            debug!(step = step.name(), "running pipeline step");
            data = step.process(data, &self.context)?;
            self.save_debug_output(&data, step_index, step.name())?;
        }

        Ok(data)
    }

    /// Run the pipeline but stop after `num_steps` (useful for debugging).
    pub fn run_partial(&self, input: DynamicImage, num_steps: usize) -> Result<PipelineData> {
        let mut data = PipelineData::from_image(input);
        for step in self.steps.iter().take(num_steps) {
            debug!(step = step.name(), "running pipeline step");
            data = step.process(data, &self.context)?;
        }
        Ok(data)
    }

    fn save_debug_input(&self, input: &DynamicImage) -> Result<()> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };
        if !debug_config.enabled {
            return Ok(());
        }

        let input_dir = debug_config.output_dir.join("00_input");
        std::fs::create_dir_all(&input_dir)?;
        let input_path = input_dir.join("page.png");
        input
            .save(&input_path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug input: {}", e))?;
        debug!(path = %input_path.display(), "saved debug input");
        Ok(())
    }

    fn save_debug_output(&self, data: &PipelineData, step_index: usize, step_name: &str) -> Result<()> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };
        if !debug_config.enabled {
            return Ok(());
        }

        let step_dir_name = format!(
            "{:02}_{}",
            step_index + 1,
            step_name.to_lowercase().replace(' ', "_")
        );
        let step_dir = debug_config.output_dir.join(&step_dir_name);
        std::fs::create_dir_all(&step_dir)?;

        let output_path = step_dir.join("page.png");
        data.image
            .save(&output_path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
        debug!(path = %output_path.display(), "saved debug stage output");
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_debug_rejects_non_empty_directory() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("leftover.txt"), "x").expect("write file");

        let result = Pipeline::new().with_debug(dir.path().to_path_buf());
        assert!(result.is_err());
    }

    #[test]
    fn with_debug_creates_missing_directory() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let target = dir.path().join("fresh");

        let pipeline = Pipeline::new().with_debug(target.clone());
        assert!(pipeline.is_ok());
        assert!(target.is_dir());
    }
}
