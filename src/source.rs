use std::fs;
use std::path::Path;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use image::ImageFormat;

use crate::{StudioError, StudioResult};

/// MIME types offered by the upload filter. Advisory only: other files are passed on unchecked.
pub const ACCEPTED_MIME_TYPES: [&str; 4] =
    ["image/png", "image/jpeg", "image/webp", "image/svg+xml"];

const SVG_MIME: &str = "image/svg+xml";
const FALLBACK_MIME: &str = "application/octet-stream";

/// An uploaded image held in memory, together with its data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    name: String,
    mime: String,
    bytes: Vec<u8>,
    data_url: String,
}

impl SourceImage {
    /// Read a file from disk.
    pub fn load(path: impl AsRef<Path>) -> StudioResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| StudioError::UnreadableUpload {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = sniff_mime(Some(path), &bytes);
        Ok(Self::with_mime(name, mime, bytes))
    }

    /// Wrap bytes that are already in memory. The MIME type is sniffed from the content.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = sniff_mime(Some(Path::new(&name)), &bytes);
        Self::with_mime(name, mime, bytes)
    }

    fn with_mime(name: String, mime: &str, bytes: Vec<u8>) -> Self {
        let data_url = format!("data:{mime};base64,{}", BASE64_STANDARD.encode(&bytes));
        Self {
            name,
            mime: mime.to_string(),
            bytes,
            data_url,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:<mime>;base64,<payload>` form of the upload.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Whether the upload matches the file picker's filter.
    pub fn is_accepted_type(&self) -> bool {
        ACCEPTED_MIME_TYPES.contains(&self.mime.as_str())
    }
}

/// Pick a MIME type from the content, falling back to the file extension.
fn sniff_mime(path: Option<&Path>, bytes: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    if looks_like_svg(bytes) {
        return SVG_MIME;
    }
    let Some(path) = path else {
        return FALLBACK_MIME;
    };
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        return SVG_MIME;
    }
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    (head.starts_with("<?xml") || head.starts_with("<svg")) && head.contains("<svg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{Rgba, RgbaImage};

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    mod unit {
        use super::*;

        #[test]
        fn png_content_is_sniffed() {
            let source = SourceImage::from_bytes("logo.bin", png_bytes());
            assert_eq!(source.mime(), "image/png");
            assert!(source.is_accepted_type());
        }

        #[test]
        fn data_url_has_mime_and_base64_payload() {
            let bytes = png_bytes();
            let source = SourceImage::from_bytes("logo.png", bytes.clone());
            let prefix = "data:image/png;base64,";
            assert!(source.data_url().starts_with(prefix));
            let payload = &source.data_url()[prefix.len()..];
            assert_eq!(BASE64_STANDARD.decode(payload).unwrap(), bytes);
        }

        #[test]
        fn svg_is_recognised_without_extension() {
            let source = SourceImage::from_bytes("mark", b"<svg xmlns=\"x\"></svg>".to_vec());
            assert_eq!(source.mime(), "image/svg+xml");
        }

        #[test]
        fn unknown_content_passes_through() {
            let source = SourceImage::from_bytes("notes.txt", b"hello".to_vec());
            assert_eq!(source.mime(), "application/octet-stream");
            assert!(!source.is_accepted_type());
            assert_eq!(source.bytes(), b"hello");
        }

        #[test]
        fn missing_file_is_unreadable_upload() {
            let dir = tempfile::tempdir().unwrap();
            let err = SourceImage::load(dir.path().join("missing.png")).unwrap_err();
            assert!(matches!(err, StudioError::UnreadableUpload { .. }));
        }

        #[test]
        fn load_reads_name_and_bytes() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("brand.png");
            fs::write(&path, png_bytes()).unwrap();
            let source = SourceImage::load(&path).unwrap();
            assert_eq!(source.name(), "brand.png");
            assert_eq!(source.mime(), "image/png");
        }
    }
}
