use thiserror::Error;

/// Errors surfaced by the rectification pipeline.
///
/// Only malformed-input conditions are errors. A page where no boundary can
/// be found is a normal outcome handled by passthrough, not an error.
#[derive(Debug, Error)]
pub enum RectifyError {
    /// The input bytes were not a decodable image.
    #[error("failed to decode input image: {0}")]
    Decode(String),

    /// The decoded image has zero width or height.
    #[error("input image has zero area ({width}x{height})")]
    ZeroArea { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, RectifyError>;
