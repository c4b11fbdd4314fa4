pub mod error;
pub mod models;
pub mod pipeline;
pub mod rectify;

pub use error::RectifyError;
pub use models::{PageBoundary, Quadrilateral};
pub use pipeline::{
    DebugConfig, MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep,
};
pub use rectify::{Rectifier, RectifyConfig, build_standard_pipeline, decode_image};
