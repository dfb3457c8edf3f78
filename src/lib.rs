//! # resume-lens
//!
//! Normalize resumes (PDF or DOCX) into a single JPEG page and analyse them
//! against a job description with a Vision Language Model.
//!
//! ## Why one image?
//!
//! Multimodal models read a rendered page the way a recruiter does: layout,
//! headings and emphasis survive, and a PDF and a DOCX of the same resume
//! arrive in the same shape. Every input is therefore reduced to exactly one
//! JPEG before the model sees it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! resume (.pdf / .docx)
//!  │
//!  ├─ 1. Input      resolve local file or download from URL
//!  ├─ 2. Normalize  PDF: rasterise page 1 via pdfium
//!  │                DOCX: extract paragraphs, wrap, draw on a white canvas
//!  ├─ 3. Encode     JPEG → base64 ImageData
//!  ├─ 4. VLM        one call: instruction + job description + image
//!  └─ 5. Metric     first "<digits>%" of the reply (percentage-match task)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume_lens::{analyze, AnalysisConfig, AnalysisTask};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / ANTHROPIC_API_KEY
//!     let config = AnalysisConfig::default();
//!     let job = std::fs::read_to_string("job.txt")?;
//!     let output = analyze("resume.docx", &job, AnalysisTask::PercentageMatch, &config).await?;
//!     println!("{}", output.response);
//!     eprintln!("score: {:?}", output.score);
//!     Ok(())
//! }
//! ```
//!
//! Normalization alone needs no API key:
//!
//! ```rust,no_run
//! use resume_lens::{render_to_file, RenderOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let page = render_to_file("resume.pdf", "resume.jpg", &RenderOptions::default()).await?;
//! println!("{}x{}", page.width(), page.height());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resume-lens` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! resume-lens = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{
    analyze, analyze_document, analyze_sync, normalize_file, render_to_file, PreparedResume,
};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, RenderOptions};
pub use document::{DocumentKind, NormalizedImage, SourceDocument};
pub use error::InsightError;
pub use history::{AnalysisHistory, HistoryEntry};
pub use normalize::{normalize, normalize_async};
pub use output::{AnalysisOutput, AnalysisStats, ImageSummary};
pub use pipeline::gateway::{ModelReply, DEFAULT_MODEL};
pub use pipeline::metric::{clamp_percentage, extract_percentage};
pub use prompts::AnalysisTask;
