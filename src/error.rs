//! Error types for the resume-lens library.
//!
//! Every failure is fatal for the document or request it concerns: the
//! normalizer never hands back a partial image and the gateway never retries.
//! Callers get one [`InsightError`] and decide how to present it.
//!
//! A response without a percentage is *not* an error; the metric extractor
//! returns `0` for that case.

use crate::document::DocumentKind;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the resume-lens library.
#[derive(Debug, Error)]
pub enum InsightError {
    // ── Normalization errors ──────────────────────────────────────────────
    /// The bytes are not a readable document of the declared kind
    /// (bad PDF header, zero pages, broken DOCX container, bad XML).
    #[error("Could not decode {kind} document: {detail}")]
    Decode { kind: DocumentKind, detail: String },

    /// The text canvas could not be built or encoded.
    #[error("Text page rendering failed: {detail}")]
    Render { detail: String },

    /// The file name does not carry a supported extension.
    #[error("Unsupported file format: '{name}'\nPlease supply a PDF (.pdf) or Word (.docx) file.")]
    UnsupportedFormat { name: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Resume file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is neither a usable file path nor an HTTP/HTTPS URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium (file or directory) or install\n\
libpdfium where the system loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API returned an error.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    /// The LLM call did not answer within the configured timeout.
    #[error("LLM call timed out after {secs}s")]
    ApiTimeout { secs: u64 },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InsightError {
    /// Shorthand for a [`InsightError::Decode`] on a PDF.
    pub(crate) fn pdf(detail: impl Into<String>) -> Self {
        InsightError::Decode {
            kind: DocumentKind::Pdf,
            detail: detail.into(),
        }
    }

    /// Shorthand for a [`InsightError::Decode`] on a DOCX.
    pub(crate) fn docx(detail: impl Into<String>) -> Self {
        InsightError::Decode {
            kind: DocumentKind::Docx,
            detail: detail.into(),
        }
    }

    /// `true` for failures caused by the document itself; asking the user for
    /// a different file is the only fix.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            InsightError::Decode { .. }
                | InsightError::UnsupportedFormat { .. }
                | InsightError::FileNotFound { .. }
                | InsightError::PermissionDenied { .. }
                | InsightError::InvalidInput { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_display_names_kind() {
        let e = InsightError::pdf("missing %PDF header");
        let msg = e.to_string();
        assert!(msg.contains("PDF"), "got: {msg}");
        assert!(msg.contains("missing %PDF header"), "got: {msg}");
    }

    #[test]
    fn unsupported_format_display() {
        let e = InsightError::UnsupportedFormat {
            name: "resume.txt".into(),
        };
        assert!(e.to_string().contains("resume.txt"));
        assert!(e.is_input_error());
    }

    #[test]
    fn api_timeout_display() {
        let e = InsightError::ApiTimeout { secs: 60 };
        assert!(e.to_string().contains("60s"));
        assert!(!e.is_input_error());
    }

    #[test]
    fn render_error_is_not_input_error() {
        let e = InsightError::Render {
            detail: "canvas too tall".into(),
        };
        assert!(!e.is_input_error());
        assert!(e.to_string().contains("canvas too tall"));
    }
}
