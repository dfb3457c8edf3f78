//! Font selection and glyph drawing for the text page.
//!
//! Lookup has exactly two tiers:
//!
//! 1. a TrueType face: `RenderOptions::font_path`, then a short list of
//!    well-known monospace system fonts (when `search_system_fonts` is on);
//! 2. the built-in `font8x8` bitmap face, which cannot fail.
//!
//! The tier that was picked is always logged.

use crate::config::RenderOptions;
use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS};
use image::RgbImage;
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Monospace faces commonly installed on Linux, macOS and Windows.
const SYSTEM_MONOSPACE_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/System/Library/Fonts/Supplemental/Courier New.ttf",
    "/Library/Fonts/Courier New.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Side of a built-in glyph cell, in font units.
const BUILTIN_CELL: u32 = 8;

/// The face used to draw a text page.
pub enum FontFace {
    /// A TrueType face loaded from disk.
    TrueType { font: Font<'static>, path: PathBuf },
    /// The built-in 8×8 bitmap face.
    Builtin,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontFace::TrueType { path, .. } => f.debug_tuple("TrueType").field(path).finish(),
            FontFace::Builtin => f.write_str("Builtin"),
        }
    }
}

/// Pick the face for `opts`, logging the choice.
pub fn resolve_font(opts: &RenderOptions) -> FontFace {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(ref p) = opts.font_path {
        candidates.push(p.clone());
    }
    if opts.search_system_fonts {
        candidates.extend(SYSTEM_MONOSPACE_FONTS.iter().map(PathBuf::from));
    }

    for path in candidates {
        match load_truetype(&path) {
            Some(font) => {
                info!("Text page font: {}", path.display());
                return FontFace::TrueType { font, path };
            }
            None => debug!("Font candidate unusable: {}", path.display()),
        }
    }

    if let Some(ref p) = opts.font_path {
        warn!(
            "Preferred font {} could not be loaded; using built-in bitmap font",
            p.display()
        );
    } else {
        warn!("No TrueType font found; using built-in bitmap font");
    }
    FontFace::Builtin
}

fn load_truetype(path: &Path) -> Option<Font<'static>> {
    let bytes = std::fs::read(path).ok()?;
    Font::try_from_vec(bytes)
}

impl FontFace {
    /// Draw one line of black text with its top-left corner at `(x, y)`.
    ///
    /// Pixels falling outside the canvas are clipped.
    pub fn draw_line(&self, canvas: &mut RgbImage, x: u32, y: u32, text: &str, opts: &RenderOptions) {
        match self {
            FontFace::TrueType { font, .. } => draw_truetype(font, canvas, x, y, text, opts),
            FontFace::Builtin => draw_builtin(canvas, x, y, text, opts),
        }
    }
}

fn draw_truetype(font: &Font<'static>, canvas: &mut RgbImage, x: u32, y: u32, text: &str, opts: &RenderOptions) {
    let scale = Scale::uniform(opts.font_size);
    let v_metrics = font.v_metrics(scale);
    let start = point(x as f32, y as f32 + v_metrics.ascent);

    for glyph in font.layout(text, scale, start) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            darken(canvas, px, py, coverage);
        });
    }
}

/// Integer magnification of the built-in face that keeps `column_budget`
/// cells inside the canvas and one cell inside a line.
fn builtin_scale(opts: &RenderOptions) -> u32 {
    let usable = opts.canvas_width.saturating_sub(opts.margin.saturating_mul(2)) as u64;
    let by_width = usable / (opts.column_budget.max(1) as u64 * BUILTIN_CELL as u64);
    let by_height = (opts.line_height / BUILTIN_CELL) as u64;
    by_width.min(by_height).max(1) as u32
}

fn draw_builtin(canvas: &mut RgbImage, x: u32, y: u32, text: &str, opts: &RenderOptions) {
    let s = builtin_scale(opts);
    let cell = BUILTIN_CELL * s;
    let y0 = y + opts.line_height.saturating_sub(cell) / 2;

    for (i, ch) in text.chars().enumerate() {
        let x0 = x as u64 + i as u64 * cell as u64;
        if x0 >= canvas.width() as u64 {
            break;
        }
        let x0 = x0 as u32;
        match builtin_glyph(ch) {
            Some(rows) => {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..BUILTIN_CELL {
                        if bits & (1 << col) != 0 {
                            fill_block(canvas, x0 + col * s, y0 + row as u32 * s, s);
                        }
                    }
                }
            }
            None => draw_missing_box(canvas, x0, y0, s),
        }
    }
}

fn builtin_glyph(ch: char) -> Option<[u8; 8]> {
    if ch == '\t' {
        return Some([0; 8]);
    }
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
}

/// Hollow box for characters the built-in face does not cover.
fn draw_missing_box(canvas: &mut RgbImage, x0: u32, y0: u32, s: u32) {
    for i in 1..BUILTIN_CELL - 1 {
        fill_block(canvas, x0 + i * s, y0 + s, s);
        fill_block(canvas, x0 + i * s, y0 + (BUILTIN_CELL - 2) * s, s);
        fill_block(canvas, x0 + s, y0 + i * s, s);
        fill_block(canvas, x0 + (BUILTIN_CELL - 2) * s, y0 + i * s, s);
    }
}

fn fill_block(canvas: &mut RgbImage, x: u32, y: u32, s: u32) {
    for dy in 0..s {
        for dx in 0..s {
            darken(canvas, x as i32 + dx as i32, y as i32 + dy as i32, 1.0);
        }
    }
}

/// Blend black ink with `coverage` into the pixel at `(x, y)`.
fn darken(canvas: &mut RgbImage, x: i32, y: i32, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let ink = (255.0 * (1.0 - coverage.clamp(0.0, 1.0))).round() as u8;
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for c in pixel.0.iter_mut() {
        *c = (*c).min(ink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn builtin_opts() -> RenderOptions {
        RenderOptions {
            search_system_fonts: false,
            ..RenderOptions::default()
        }
    }

    fn white(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([255, 255, 255]))
    }

    fn ink_pixels(img: &RgbImage) -> usize {
        img.pixels().filter(|p| p.0 != [255, 255, 255]).count()
    }

    #[test]
    fn no_candidates_falls_back_to_builtin() {
        assert!(matches!(resolve_font(&builtin_opts()), FontFace::Builtin));
    }

    #[test]
    fn unreadable_preferred_font_falls_back() {
        let opts = RenderOptions {
            font_path: Some(PathBuf::from("/definitely/not/a/font.ttf")),
            search_system_fonts: false,
            ..RenderOptions::default()
        };
        assert!(matches!(resolve_font(&opts), FontFace::Builtin));
    }

    #[test]
    fn garbage_font_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        let opts = RenderOptions {
            font_path: Some(path),
            search_system_fonts: false,
            ..RenderOptions::default()
        };
        assert!(matches!(resolve_font(&opts), FontFace::Builtin));
    }

    #[test]
    fn builtin_scale_fits_budget() {
        let opts = builtin_opts();
        // 980 usable px / (100 cols × 8 px) = 1
        assert_eq!(builtin_scale(&opts), 1);

        let wide = RenderOptions {
            canvas_width: 2000,
            column_budget: 50,
            line_height: 40,
            ..builtin_opts()
        };
        assert_eq!(builtin_scale(&wide), 4);
    }

    #[test]
    fn builtin_draws_ink_for_text_and_none_for_spaces() {
        let opts = builtin_opts();
        let mut canvas = white(200, 40);
        FontFace::Builtin.draw_line(&mut canvas, 10, 10, "Rust", &opts);
        assert!(ink_pixels(&canvas) > 0);

        let mut blank = white(200, 40);
        FontFace::Builtin.draw_line(&mut blank, 10, 10, "   \t ", &opts);
        assert_eq!(ink_pixels(&blank), 0);
    }

    #[test]
    fn uncovered_glyph_draws_a_box() {
        let opts = builtin_opts();
        let mut canvas = white(40, 40);
        FontFace::Builtin.draw_line(&mut canvas, 0, 0, "\u{4E2D}", &opts);
        assert!(ink_pixels(&canvas) > 0);
    }

    #[test]
    fn drawing_past_the_edge_is_clipped() {
        let opts = builtin_opts();
        let mut canvas = white(16, 16);
        FontFace::Builtin.draw_line(&mut canvas, 10, 10, "WWWWWWWW", &opts);
        assert_eq!(canvas.dimensions(), (16, 16));
    }
}
