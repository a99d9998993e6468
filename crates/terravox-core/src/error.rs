use thiserror::Error;

/// Errors that can occur at the edges of the renderer: loading settings and
/// texture data, or writing frames. The tracing and shading core never fails.
#[derive(Debug, Error)]
pub enum TerravoxError {
    #[error("Failed to parse settings RON: {0}")]
    SettingsParse(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to load texture '{path}': {reason}")]
    TextureLoad { path: String, reason: String },

    #[error("Texture data has the wrong size: expected {expected} values, got {actual}")]
    TextureFormat { expected: usize, actual: usize },

    #[error("Failed to write image '{path}': {reason}")]
    ImageWrite { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
