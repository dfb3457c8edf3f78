//! Document normalization: any supported resume → exactly one JPEG page.
//!
//! PDFs are rasterised (first page only); DOCX files are reduced to their
//! paragraph text and re-typeset on a white canvas. Either way the caller
//! gets one [`NormalizedImage`] or an error, never a partial result.

use crate::config::RenderOptions;
use crate::document::{DocumentKind, NormalizedImage, SourceDocument};
use crate::error::InsightError;
use crate::pipeline::encode::{encode_dynamic, encode_error, encode_rgb};
use crate::pipeline::{docx, rasterize, text_page};
use std::time::Instant;
use tracing::{debug, info};

/// Normalize `doc` into a single JPEG page.
///
/// Blocking: pdfium and the text renderer are CPU-bound. Use
/// [`normalize_async`] from async code.
///
/// # Errors
/// - [`InsightError::InvalidConfig`] for options the renderers reject
/// - [`InsightError::Decode`] for unreadable PDF or DOCX bytes
/// - [`InsightError::Render`] when the text canvas would exceed JPEG limits
/// - [`InsightError::PdfiumBindingFailed`] when libpdfium is unavailable
pub fn normalize(doc: &SourceDocument, opts: &RenderOptions) -> Result<NormalizedImage, InsightError> {
    opts.validate()?;
    let start = Instant::now();

    let image = match doc.kind() {
        DocumentKind::Pdf => {
            let page = rasterize::rasterize_first_page(doc.bytes(), opts)?;
            encode_dynamic(&page, opts.jpeg_quality).map_err(encode_error)?
        }
        DocumentKind::Docx => {
            let text = docx::extract_docx_text(doc.bytes())?;
            debug!("'{}': {} chars of paragraph text", doc.name(), text.chars().count());
            let canvas = text_page::render_text_page(&text, opts)?;
            encode_rgb(&canvas, opts.jpeg_quality).map_err(encode_error)?
        }
    };

    info!(
        "Normalized {} '{}' → {}x{} JPEG ({} bytes) in {}ms",
        doc.kind(),
        doc.name(),
        image.width(),
        image.height(),
        image.jpeg_bytes().len(),
        start.elapsed().as_millis()
    );
    Ok(image)
}

/// [`normalize`] on the blocking thread pool.
pub async fn normalize_async(
    doc: SourceDocument,
    opts: RenderOptions,
) -> Result<NormalizedImage, InsightError> {
    tokio::task::spawn_blocking(move || normalize(&doc, &opts))
        .await
        .map_err(|e| InsightError::Internal(format!("Normalization task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::docx::tests::docx_with_body;

    fn offline_opts() -> RenderOptions {
        RenderOptions {
            search_system_fonts: false,
            ..RenderOptions::default()
        }
    }

    fn paragraph(text: &str) -> String {
        format!("<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>")
    }

    #[test]
    fn docx_becomes_one_jpeg() {
        let body = [paragraph("Jane Doe"), paragraph("Senior Rust Engineer")].concat();
        let doc = SourceDocument::new("cv.docx", DocumentKind::Docx, docx_with_body(&body));

        let img = normalize(&doc, &offline_opts()).unwrap();
        assert_eq!(img.mime_type(), "image/jpeg");
        assert_eq!(img.width(), 1000);
        assert_eq!(img.height(), 1000);
        assert_eq!(&img.jpeg_bytes()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn empty_docx_is_min_height() {
        let doc = SourceDocument::new("empty.docx", DocumentKind::Docx, docx_with_body(""));
        let img = normalize(&doc, &offline_opts()).unwrap();
        assert_eq!((img.width(), img.height()), (1000, 1000));
    }

    #[test]
    fn long_docx_grows_canvas() {
        let body: String = (0..80).map(|i| paragraph(&format!("Line {i}"))).collect();
        let doc = SourceDocument::new("long.docx", DocumentKind::Docx, docx_with_body(&body));
        let img = normalize(&doc, &offline_opts()).unwrap();
        // 80 paragraphs + 79 separators, 20 px each, plus 2 × 10 px margin
        assert_eq!(img.height(), 159 * 20 + 20);
    }

    #[test]
    fn normalization_is_deterministic() {
        let body = [paragraph("Skills: Rust, Tokio, gRPC"), paragraph("Berlin")].concat();
        let doc = SourceDocument::new("cv.docx", DocumentKind::Docx, docx_with_body(&body));
        let a = normalize(&doc, &offline_opts()).unwrap();
        let b = normalize(&doc, &offline_opts()).unwrap();
        assert_eq!(a.decode().unwrap(), b.decode().unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn non_pdf_bytes_as_pdf_is_decode_error() {
        let doc = SourceDocument::new("cv.pdf", DocumentKind::Pdf, b"hello world".to_vec());
        let err = normalize(&doc, &offline_opts()).unwrap_err();
        assert!(
            matches!(err, InsightError::Decode { kind: DocumentKind::Pdf, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn garbage_docx_is_decode_error() {
        let doc = SourceDocument::new("cv.docx", DocumentKind::Docx, b"not a zip".to_vec());
        let err = normalize(&doc, &offline_opts()).unwrap_err();
        assert!(
            matches!(err, InsightError::Decode { kind: DocumentKind::Docx, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn txt_is_rejected_before_normalizing() {
        let err = SourceDocument::from_named_bytes("cv.txt", b"plain".to_vec()).unwrap_err();
        assert!(matches!(err, InsightError::UnsupportedFormat { .. }));
    }

    #[test]
    fn invalid_options_rejected() {
        let doc = SourceDocument::new("e.docx", DocumentKind::Docx, docx_with_body(""));
        let opts = RenderOptions {
            dpi: 10,
            ..offline_opts()
        };
        assert!(matches!(
            normalize(&doc, &opts),
            Err(InsightError::InvalidConfig(_))
        ));
    }

    #[test]
    fn huge_margin_is_an_error_not_a_panic() {
        let doc = SourceDocument::new("e.docx", DocumentKind::Docx, docx_with_body(&paragraph("Hi")));
        let opts = RenderOptions {
            margin: u32::MAX / 2 + 1,
            ..offline_opts()
        };
        assert!(matches!(
            normalize(&doc, &opts),
            Err(InsightError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn async_matches_sync() {
        let doc = SourceDocument::new("cv.docx", DocumentKind::Docx, docx_with_body(&paragraph("Hi")));
        let sync = normalize(&doc, &offline_opts()).unwrap();
        let asynced = normalize_async(doc, offline_opts()).await.unwrap();
        assert_eq!(sync, asynced);
    }
}
