//! Plain-text extraction from a DOCX (WordprocessingML) package.
//!
//! Only the paragraph sequence of `word/document.xml` is read. Styles,
//! numbering, headers, footers and images are ignored; table cells contribute
//! their paragraphs in document order like any other text.

use crate::error::InsightError;
use crate::pipeline::layout::LINE_BREAK;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::debug;

const MAIN_PART: &str = "word/document.xml";

/// Extract the text of every non-empty paragraph, joined with `\n`.
///
/// Inside a paragraph, `w:tab` becomes `\t` and `w:br` / `w:cr` become
/// [`LINE_BREAK`], so a soft break stays inside its paragraph.
///
/// # Errors
/// [`InsightError::Decode`] when the bytes are not a zip archive, the main
/// document part is missing, or its XML is malformed.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, InsightError> {
    let xml = read_main_part(bytes)?;
    let paragraphs = paragraphs_from_xml(&xml)?;
    debug!("DOCX: {} non-empty paragraphs", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

fn read_main_part(bytes: &[u8]) -> Result<String, InsightError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| InsightError::docx(format!("not a zip container: {e}")))?;

    let mut part = archive
        .by_name(MAIN_PART)
        .map_err(|e| InsightError::docx(format!("missing {MAIN_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| InsightError::docx(format!("cannot read {MAIN_PART}: {e}")))?;
    Ok(xml)
}

/// Walk the main document part and collect paragraph texts in order.
pub(crate) fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, InsightError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut para_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;
    // Content of mc:Fallback repeats what mc:Choice already holds.
    let mut fallback_depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            InsightError::docx(format!(
                "malformed XML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"mc:Fallback" => fallback_depth += 1,
                _ if fallback_depth > 0 => {}
                b"w:p" => {
                    if para_depth == 0 {
                        current.clear();
                    }
                    para_depth += 1;
                }
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = run_depth > 0,
                _ => {}
            },
            Event::Empty(e) => {
                if fallback_depth > 0 || para_depth == 0 || run_depth == 0 {
                    continue;
                }
                match e.name().as_ref() {
                    b"w:tab" => current.push('\t'),
                    b"w:br" | b"w:cr" => current.push(LINE_BREAK),
                    _ => {}
                }
            }
            Event::Text(t) if in_text && fallback_depth == 0 => {
                let text = t
                    .unescape()
                    .map_err(|e| InsightError::docx(format!("bad text escape: {e}")))?;
                current.push_str(&text);
            }
            Event::CData(t) if in_text && fallback_depth == 0 => {
                current.push_str(&String::from_utf8_lossy(&t));
            }
            Event::End(e) => match e.name().as_ref() {
                b"mc:Fallback" => fallback_depth = fallback_depth.saturating_sub(1),
                _ if fallback_depth > 0 => {}
                b"w:t" => in_text = false,
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:p" => {
                    para_depth = para_depth.saturating_sub(1);
                    if para_depth == 0 && !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
