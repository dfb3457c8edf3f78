//! Greedy fixed-column word wrapping for the DOCX text page.
//!
//! Line length is measured in characters, not glyph widths. Monospace faces
//! make the approximation exact; anything else may run short or overflow the
//! right margin, which is accepted.

use crate::config::RenderOptions;

/// Line break inside a paragraph (U+2028 LINE SEPARATOR). Starts a new line
/// without the blank line that separates paragraphs.
pub const LINE_BREAK: char = '\u{2028}';

/// One laid-out line and the y offset of its top edge on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub text: String,
    pub y: u32,
}

/// Result of laying a text block out on a canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    /// Wrapped lines in drawing order; paragraph separators are empty lines.
    pub lines: Vec<RenderedLine>,
    pub width: u32,
    /// Canvas height in pixels. Computed in 64 bits so absurd inputs can be
    /// rejected instead of overflowing.
    pub height: u64,
}

/// Lay `text` out according to `opts`.
///
/// Paragraphs are the `\n`-separated pieces of `text`; blank ones are
/// dropped. One blank line separates consecutive paragraphs. Within a
/// paragraph, [`LINE_BREAK`] starts a new line directly, and each piece is
/// wrapped with [`wrap_paragraph`].
pub fn layout_text(text: &str, opts: &RenderOptions) -> TextLayout {
    let mut wrapped: Vec<String> = Vec::new();

    for paragraph in text.split('\n').filter(|p| !p.trim().is_empty()) {
        if !wrapped.is_empty() {
            wrapped.push(String::new());
        }
        for piece in paragraph.split(LINE_BREAK) {
            wrapped.extend(wrap_paragraph(piece, opts.column_budget));
        }
    }

    let line_height = opts.line_height as u64;
    let margin = opts.margin as u64;
    let content_height = wrapped.len() as u64 * line_height + 2 * margin;
    let height = content_height.max(opts.min_canvas_height as u64);

    let lines = wrapped
        .into_iter()
        .enumerate()
        .map(|(i, text)| RenderedLine {
            text,
            y: (margin + i as u64 * line_height).min(u32::MAX as u64) as u32,
        })
        .collect();

    TextLayout {
        lines,
        width: opts.canvas_width,
        height,
    }
}

/// Greedily pack the words of one paragraph into lines of at most
/// `columns` characters.
///
/// Words are separated by any whitespace, which collapses to one space. A
/// word longer than `columns` is split into `columns`-sized chunks; the last
/// chunk keeps accepting words like any other line.
pub fn wrap_paragraph(paragraph: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > columns {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(columns).peekable();
            current_len = 0;
            while let Some(chunk) = chunks.next() {
                let piece: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    lines.push(piece);
                } else {
                    current_len = chunk.len();
                    current = piece;
                }
            }
            continue;
        }

        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= columns {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}
