//! Documents flowing through the normalizer: the uploaded [`SourceDocument`]
//! and the single [`NormalizedImage`] it becomes.

use crate::error::InsightError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// MIME type of every [`NormalizedImage`].
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// The declared type of an uploaded resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Classify a file name by its extension (`.pdf` / `.docx`, any case).
    ///
    /// Anything else is rejected before a single byte is read.
    pub fn from_file_name(name: &str) -> Result<Self, InsightError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("docx") => Ok(DocumentKind::Docx),
            _ => Err(InsightError::UnsupportedFormat {
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => f.write_str("PDF"),
            DocumentKind::Docx => f.write_str("DOCX"),
        }
    }
}

/// Raw bytes of an uploaded resume plus its declared kind.
///
/// Immutable once built; the normalizer reads it exactly once.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    name: String,
    kind: DocumentKind,
    bytes: Vec<u8>,
}

impl SourceDocument {
    /// Build a document whose kind is already known.
    pub fn new(name: impl Into<String>, kind: DocumentKind, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind,
            bytes,
        }
    }

    /// Build a document, deriving its kind from `name`'s extension.
    pub fn from_named_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, InsightError> {
        let name = name.into();
        let kind = DocumentKind::from_file_name(&name)?;
        Ok(Self { name, kind, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One JPEG bitmap produced from a [`SourceDocument`].
#[derive(Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    width: u32,
    height: u32,
    jpeg: Vec<u8>,
}

impl NormalizedImage {
    pub(crate) fn new(width: u32, height: u32, jpeg: Vec<u8>) -> Self {
        Self {
            width,
            height,
            jpeg,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Always [`JPEG_MIME_TYPE`].
    pub fn mime_type(&self) -> &'static str {
        JPEG_MIME_TYPE
    }

    /// The encoded JPEG file.
    pub fn jpeg_bytes(&self) -> &[u8] {
        &self.jpeg
    }

    /// Standard base64 of the JPEG bytes, as sent to the model.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.jpeg)
    }

    /// Decode the JPEG back into pixels.
    pub fn decode(&self) -> Result<image::RgbImage, image::ImageError> {
        image::load_from_memory_with_format(&self.jpeg, image::ImageFormat::Jpeg)
            .map(|img| img.to_rgb8())
    }
}

impl fmt::Debug for NormalizedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mime_type", &JPEG_MIME_TYPE)
            .field("jpeg_len", &self.jpeg.len())
            .finish()
    }
}
