//! PDF rasterisation: render the first page to a `DynamicImage` via pdfium.
//!
//! Only page 1 is ever rendered, whatever the document length. The page is
//! scaled by `dpi / 72` and capped at `max_rendered_pixels` per edge so a
//! poster-sized first page cannot exhaust memory.
//!
//! pdfium is blocking and not async-safe; async callers go through
//! [`crate::normalize::normalize_async`], which uses `spawn_blocking`.

use crate::config::RenderOptions;
use crate::error::InsightError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Magic bytes every PDF file starts with.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Render the first page of `pdf_bytes`.
///
/// # Errors
/// - [`InsightError::Decode`] if the bytes lack the `%PDF` header, pdfium
///   cannot parse them, or the document has no pages.
/// - [`InsightError::PdfiumBindingFailed`] if no pdfium library can be loaded.
pub fn rasterize_first_page(
    pdf_bytes: &[u8],
    opts: &RenderOptions,
) -> Result<DynamicImage, InsightError> {
    check_magic(pdf_bytes)?;

    let pdfium = bind_pdfium(opts.pdfium_library_path.as_deref())?;

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| InsightError::pdf(format!("{:?}", e)))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    if total_pages == 0 {
        return Err(InsightError::pdf("document has zero pages"));
    }
    info!("PDF loaded: {} pages, rendering page 1", total_pages);

    let max_px = i32::try_from(opts.max_rendered_pixels).unwrap_or(i32::MAX);
    let render_config = PdfRenderConfig::new()
        .scale_page_by_factor(opts.dpi as f32 / 72.0)
        .set_maximum_width(max_px)
        .set_maximum_height(max_px);

    let page = pages
        .get(0)
        .map_err(|e| InsightError::pdf(format!("page 1 unavailable: {:?}", e)))?;

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| InsightError::pdf(format!("page 1 rasterisation failed: {:?}", e)))?;

    let image = bitmap.as_image();
    debug!("Rendered page 1 → {}x{} px", image.width(), image.height());
    Ok(image)
}

/// Reject inputs that do not even start like a PDF before touching pdfium.
pub fn check_magic(bytes: &[u8]) -> Result<(), InsightError> {
    if bytes.len() < PDF_MAGIC.len() {
        return Err(InsightError::pdf(format!(
            "input is {} bytes, too short to be a PDF",
            bytes.len()
        )));
    }
    if &bytes[..4] != PDF_MAGIC {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(InsightError::pdf(format!(
            "missing %PDF header, first bytes: {:?}",
            magic
        )));
    }
    Ok(())
}

/// Bind pdfium from, in order: `explicit`, `PDFIUM_LIB_PATH`, the system
/// library search path.
///
/// A path may name the library file itself or the directory holding it.
pub fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, InsightError> {
    let configured: Option<PathBuf> = explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os("PDFIUM_LIB_PATH")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });

    let bindings = match configured {
        Some(path) => {
            let lib = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path
            };
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib).map_err(|e| {
                InsightError::PdfiumBindingFailed(format!("{}: {:?}", lib.display(), e))
            })?
        }
        None => Pdfium::bind_to_system_library()
            .map_err(|e| InsightError::PdfiumBindingFailed(format!("{:?}", e)))?,
    };

    Ok(Pdfium::new(bindings))
}
