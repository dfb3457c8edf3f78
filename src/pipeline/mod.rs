//! Pipeline stages for resume normalization and analysis.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//!                  ┌─ PDF ──▶ rasterize ───────────────────────┐
//! input ──▶ kind ──┤                                           ├──▶ encode ──▶ gateway ──▶ metric
//! (path/URL)       └─ DOCX ─▶ docx ──▶ layout ──▶ text_page ──┘   (JPEG)     (VLM)       (score)
//! ```
//!
//! 1. [`input`]: read a local file or download a URL into a `SourceDocument`
//! 2. [`rasterize`]: first PDF page via pdfium; blocking, so async callers
//!    go through `spawn_blocking`
//! 3. [`docx`]: paragraph text from `word/document.xml`
//! 4. [`layout`]: greedy word wrap and line positions
//! 5. [`font`]: TrueType face or the built-in bitmap face
//! 6. [`text_page`]: draw the laid-out lines on a white canvas
//! 7. [`encode`]: JPEG bytes and the base64 image part of the request
//! 8. [`gateway`]: the single multimodal model call; the only network stage
//!    besides URL download
//! 9. [`metric`]: first `<digits>%` in the reply

pub mod docx;
pub mod encode;
pub mod font;
pub mod gateway;
pub mod input;
pub mod layout;
pub mod metric;
pub mod rasterize;
pub mod text_page;
