//! Error taxonomy for the analysis pipeline.
//!
//! Only the decode stage can fail: every stage downstream of a valid
//! decoded buffer is a total function, and degenerate outputs (empty
//! palette, zero regions, no digits) are empty collections, not errors.

use thiserror::Error;

/// Boxed transport error produced by a [`crate::decode::Fetcher`].
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The input matched none of the accepted forms (bytes, file,
    /// `data:` URI, http(s) URL).
    #[error("unsupported input kind: {0}")]
    UnsupportedInputKind(String),

    /// The bytes could not be parsed as a raster image.
    #[error("image decode failed: {0}")]
    DecodeFailure(#[source] image::ImageError),

    /// Thumbnail re-encoding failed.
    #[error("thumbnail encode failed: {0}")]
    EncodeFailure(#[source] image::ImageError),

    /// Reading a file input failed.
    #[error("could not read input file: {0}")]
    Io(#[from] std::io::Error),

    /// The injected fetch collaborator failed to retrieve a remote URL.
    #[error("remote fetch failed: {0}")]
    Fetch(#[source] FetchError),
}
