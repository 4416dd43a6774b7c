//! Input classification and raster decoding.
//!
//! Accepts raw bytes, a file path, an inline base64 `data:` URI, or a
//! remote URL, and produces an RGBA pixel buffer plus the image's native
//! dimensions and original byte size. Remote fetching goes through the
//! injected [`Fetcher`] so the decoder itself is transport-agnostic.

pub mod fetch;

pub use fetch::{Fetcher, HttpFetcher};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::AnalyzeError;

/// One accepted input form for `analyze`.
#[derive(Clone, Debug)]
pub enum AnalyzeInput {
    /// An in-memory encoded image (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// A path to an encoded image on disk.
    File(PathBuf),
    /// An inline `data:<mime>;base64,<payload>` URI.
    DataUri(String),
    /// An http(s) URL, retrieved through the [`Fetcher`].
    Url(String),
}

impl AnalyzeInput {
    /// Classifies a text input as a data URI or a remote URL.
    ///
    /// File paths are not guessed from text; callers holding a path should
    /// construct [`AnalyzeInput::File`] directly.
    pub fn from_text(text: &str) -> Result<Self, AnalyzeError> {
        let trimmed = text.trim();
        if trimmed.starts_with("data:") {
            Ok(Self::DataUri(trimmed.to_string()))
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(Self::Url(trimmed.to_string()))
        } else {
            Err(AnalyzeError::UnsupportedInputKind(format!(
                "not a data URI or http(s) URL: {}",
                truncate_for_message(trimmed)
            )))
        }
    }
}

/// A decoded image: full-resolution pixels plus native metadata.
///
/// Owned by the pipeline invocation that created it; never mutated after
/// decoding.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
    pub native_width: u32,
    pub native_height: u32,
    /// Size of the encoded input in bytes.
    pub byte_size: usize,
}

/// Decodes any accepted input form into a [`DecodedImage`].
///
/// Fails with `UnsupportedInputKind` for malformed data URIs, `Io` for
/// unreadable files, `Fetch` for transport failures, and `DecodeFailure`
/// when the bytes are not a parseable raster image.
pub fn decode_input(
    input: &AnalyzeInput,
    fetcher: &dyn Fetcher,
) -> Result<DecodedImage, AnalyzeError> {
    match input {
        AnalyzeInput::Bytes(bytes) => decode_bytes(bytes),
        AnalyzeInput::File(path) => decode_file(path),
        AnalyzeInput::DataUri(uri) => decode_bytes(&decode_data_uri(uri)?),
        AnalyzeInput::Url(url) => {
            debug!(url = %url, "fetching remote image");
            let bytes = fetcher.fetch(url).map_err(AnalyzeError::Fetch)?;
            decode_bytes(&bytes)
        }
    }
}

/// Decodes an encoded image byte buffer.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, AnalyzeError> {
    let dynamic = image::load_from_memory(bytes).map_err(AnalyzeError::DecodeFailure)?;
    let pixels = dynamic.to_rgba8();
    let (native_width, native_height) = pixels.dimensions();
    debug!(native_width, native_height, byte_size = bytes.len(), "decoded image");
    Ok(DecodedImage {
        pixels,
        native_width,
        native_height,
        byte_size: bytes.len(),
    })
}

fn decode_file(path: &Path) -> Result<DecodedImage, AnalyzeError> {
    let bytes = std::fs::read(path)?;
    decode_bytes(&bytes)
}

/// Extracts the base64 payload from a `data:` URI.
///
/// Only base64-encoded payloads are accepted; the mime type is not
/// validated here since the image decoder sniffs the real format.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>, AnalyzeError> {
    let rest = uri.strip_prefix("data:").ok_or_else(|| {
        AnalyzeError::UnsupportedInputKind("data URI missing data: prefix".to_string())
    })?;
    let (header, payload) = rest.split_once(',').ok_or_else(|| {
        AnalyzeError::UnsupportedInputKind("data URI missing comma separator".to_string())
    })?;
    if !header.ends_with(";base64") {
        return Err(AnalyzeError::UnsupportedInputKind(
            "data URI payload is not base64-encoded".to_string(),
        ));
    }
    STANDARD.decode(payload.trim()).map_err(|e| {
        AnalyzeError::UnsupportedInputKind(format!("invalid base64 in data URI: {}", e))
    })
}

fn truncate_for_message(text: &str) -> String {
    const MAX: usize = 48;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_bytes_reports_native_metadata() {
        let bytes = png_bytes(17, 9, [10, 20, 30, 255]);
        let decoded = decode_bytes(&bytes).unwrap();
        assert_eq!(decoded.native_width, 17);
        assert_eq!(decoded.native_height, 9);
        assert_eq!(decoded.byte_size, bytes.len());
        assert_eq!(decoded.pixels.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_is_decode_failure() {
        let err = decode_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AnalyzeError::DecodeFailure(_)));
    }

    #[test]
    fn test_data_uri_round_trip() {
        let bytes = png_bytes(4, 4, [255, 0, 0, 255]);
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));
        let input = AnalyzeInput::from_text(&uri).unwrap();
        let decoded = decode_input(&input, &fetch::NoFetch).unwrap();
        assert_eq!(decoded.native_width, 4);
        assert_eq!(decoded.byte_size, bytes.len());
    }

    #[test]
    fn test_data_uri_without_base64_marker_rejected() {
        let err = decode_data_uri("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, AnalyzeError::UnsupportedInputKind(_)));
    }

    #[test]
    fn test_from_text_classification() {
        assert!(matches!(
            AnalyzeInput::from_text("https://example.com/chart.png"),
            Ok(AnalyzeInput::Url(_))
        ));
        assert!(matches!(
            AnalyzeInput::from_text("data:image/png;base64,AAAA"),
            Ok(AnalyzeInput::DataUri(_))
        ));
        assert!(matches!(
            AnalyzeInput::from_text("just some words"),
            Err(AnalyzeError::UnsupportedInputKind(_))
        ));
    }
}
