//! Draw a block of plain text onto one white canvas.
//!
//! There is no pagination: the canvas grows with the text until it hits
//! `RenderOptions::max_canvas_height`, at which point rendering fails rather
//! than truncating.

use crate::config::RenderOptions;
use crate::error::InsightError;
use crate::pipeline::font::resolve_font;
use crate::pipeline::layout::layout_text;
use image::RgbImage;
use tracing::debug;

/// Lay out and draw `text`, returning the finished canvas.
///
/// # Errors
/// [`InsightError::Render`] when the canvas would exceed
/// `max_canvas_height` or cannot be allocated. Text content never fails.
pub fn render_text_page(text: &str, opts: &RenderOptions) -> Result<RgbImage, InsightError> {
    let layout = layout_text(text, opts);

    if layout.height > opts.max_canvas_height as u64 {
        return Err(InsightError::Render {
            detail: format!(
                "{} lines need a {} px tall canvas (limit {} px)",
                layout.lines.len(),
                layout.height,
                opts.max_canvas_height
            ),
        });
    }
    if layout.width == 0 || layout.width <= opts.margin.saturating_mul(2) {
        return Err(InsightError::Render {
            detail: format!(
                "canvas width {} px leaves no room inside a {} px margin",
                layout.width, opts.margin
            ),
        });
    }

    let height = layout.height as u32;
    let mut canvas = allocate_canvas(layout.width, height)?;

    let face = resolve_font(opts);
    let mut drawn = 0usize;
    for line in layout.lines.iter().filter(|l| !l.text.is_empty()) {
        face.draw_line(&mut canvas, opts.margin, line.y, &line.text, opts);
        drawn += 1;
    }

    debug!(
        "Text page: {} lines drawn on {}x{} px canvas",
        drawn,
        canvas.width(),
        canvas.height()
    );
    Ok(canvas)
}

fn allocate_canvas(width: u32, height: u32) -> Result<RgbImage, InsightError> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(3))
        .ok_or_else(|| InsightError::Render {
            detail: format!("{}x{} px canvas overflows addressable memory", width, height),
        })?;

    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| InsightError::Render {
        detail: format!("cannot allocate {}x{} px canvas: {}", width, height, e),
    })?;
    buf.resize(len, 255u8);

    RgbImage::from_raw(width, height, buf).ok_or_else(|| InsightError::Render {
        detail: format!("{}x{} px canvas buffer has the wrong size", width, height),
    })
}

/// `true` when every pixel of `img` is pure white.
#[cfg(test)]
pub(crate) fn is_blank(img: &RgbImage) -> bool {
    img.pixels().all(|p| p.0 == [255, 255, 255])
}
