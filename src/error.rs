use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with [`StudioError`].
pub type StudioResult<T> = std::result::Result<T, StudioError>;

/// Error types that can occur while loading, tracing, previewing or exporting.
///
/// None of these are fatal to a session: the controller records them and keeps
/// its previous state.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Image decoding or encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The SVG markup could not be parsed or rewritten.
    #[error("SVG markup error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Vectorization or tracing operation failed.
    #[error("Tracing failed: {0}")]
    Trace(String),
    /// The uploaded file could not be read.
    #[error("Could not read upload {}: {source}", path.display())]
    UnreadableUpload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A preset name that is not one of the fixed presets.
    #[error("Unknown preset `{0}` (expected logo, posterized1 or curvy)")]
    UnknownPreset(String),
    /// A slider name that is not one of the four tuning sliders.
    #[error("Unknown slider `{0}` (expected colors, path-omit, line-threshold or corner-threshold)")]
    UnknownSlider(String),
    /// A malformed line in a session script.
    #[error("Session line {line}: {message}")]
    Session { line: usize, message: String },
}
