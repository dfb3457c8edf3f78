//! Configuration types for normalization and analysis.
//!
//! [`RenderOptions`] holds every knob of the document-to-image step and is all
//! the normalizer needs. [`AnalysisConfig`] wraps it together with the model
//! settings and is built through [`AnalysisConfigBuilder`], which validates the
//! combination before anything runs.

use crate::error::InsightError;
use crate::prompts::AnalysisTask;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Largest edge a baseline JPEG can store.
pub const JPEG_MAX_DIMENSION: u32 = 65_535;

/// Options for turning a resume into one JPEG page.
///
/// # Example
/// ```rust
/// use resume_lens::RenderOptions;
///
/// let opts = RenderOptions {
///     dpi: 200,
///     search_system_fonts: false,
///     ..RenderOptions::default()
/// };
/// assert_eq!(opts.jpeg_quality, 90);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// PDF rasterisation density. Range: 72–400. Default: 150.
    ///
    /// 150 DPI keeps resume body text legible for a vision model while the
    /// first page of a Letter/A4 document stays around 1275 × 1650 px.
    pub dpi: u32,

    /// Cap on either edge of the rasterised PDF page, in pixels. Default: 2000.
    pub max_rendered_pixels: u32,

    /// JPEG quality, 1–100. Default: 90.
    pub jpeg_quality: u8,

    /// Width of the DOCX text canvas in pixels. Default: 1000.
    pub canvas_width: u32,

    /// Maximum characters per wrapped line. Default: 100.
    ///
    /// Character count stands in for glyph measurement, so monospace faces
    /// track it closely and proportional ones drift.
    pub column_budget: usize,

    /// Vertical distance between baselines, in pixels. Default: 20.
    pub line_height: u32,

    /// Left and top margin, also reserved at the bottom. Default: 10.
    pub margin: u32,

    /// Shortest canvas ever produced. Default: 1000.
    pub min_canvas_height: u32,

    /// Tallest canvas allowed before rendering fails. Default: 65 535.
    pub max_canvas_height: u32,

    /// Pixel height of TrueType glyphs. Default: 16.0.
    pub font_size: f32,

    /// Preferred TrueType font file. Tried before any system font.
    pub font_path: Option<PathBuf>,

    /// Look for well-known monospace fonts on the host. Default: true.
    ///
    /// Turn off for byte-identical output across machines: the built-in
    /// bitmap face is then always used unless `font_path` is set.
    pub search_system_fonts: bool,

    /// Path to libpdfium (file or directory). Falls back to `PDFIUM_LIB_PATH`,
    /// then to the system loader.
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 150,
            max_rendered_pixels: 2000,
            jpeg_quality: 90,
            canvas_width: 1000,
            column_budget: 100,
            line_height: 20,
            margin: 10,
            min_canvas_height: 1000,
            max_canvas_height: JPEG_MAX_DIMENSION,
            font_size: 16.0,
            font_path: None,
            search_system_fonts: true,
            pdfium_library_path: None,
        }
    }
}

impl RenderOptions {
    /// Check the options for values the renderers cannot work with.
    pub fn validate(&self) -> Result<(), InsightError> {
        if !(72..=400).contains(&self.dpi) {
            return Err(InsightError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                self.dpi
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(InsightError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                self.jpeg_quality
            )));
        }
        if self.column_budget == 0 {
            return Err(InsightError::InvalidConfig(
                "Column budget must be ≥ 1".into(),
            ));
        }
        if self.line_height == 0 {
            return Err(InsightError::InvalidConfig("Line height must be ≥ 1".into()));
        }
        if self.canvas_width <= self.margin.saturating_mul(2) || self.canvas_width > JPEG_MAX_DIMENSION {
            return Err(InsightError::InvalidConfig(format!(
                "Canvas width must exceed twice the margin ({}) and be ≤ {}, got {}",
                self.margin, JPEG_MAX_DIMENSION, self.canvas_width
            )));
        }
        if self.max_rendered_pixels == 0 || self.max_rendered_pixels > i32::MAX as u32 {
            return Err(InsightError::InvalidConfig(format!(
                "Max rendered pixels must be 1–{}, got {}",
                i32::MAX,
                self.max_rendered_pixels
            )));
        }
        if self.max_canvas_height > JPEG_MAX_DIMENSION {
            return Err(InsightError::InvalidConfig(format!(
                "Max canvas height must be ≤ {}, got {}",
                JPEG_MAX_DIMENSION, self.max_canvas_height
            )));
        }
        if self.min_canvas_height == 0 || self.min_canvas_height > self.max_canvas_height {
            return Err(InsightError::InvalidConfig(format!(
                "Min canvas height must be 1–{}, got {}",
                self.max_canvas_height, self.min_canvas_height
            )));
        }
        if self.font_size.is_nan() || self.font_size <= 0.0 {
            return Err(InsightError::InvalidConfig(format!(
                "Font size must be positive, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}

/// Configuration for a full resume analysis.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use resume_lens::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .dpi(200)
///     .jpeg_quality(92)
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// assert_eq!(config.render.dpi, 200);
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Document-to-image settings.
    pub render: RenderOptions,

    /// LLM model identifier, e.g. "gemini-2.0-flash", "gpt-4.1-mini".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai", "anthropic", "ollama").
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Default: 0.2.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 2048.
    pub max_tokens: usize,

    /// Replaces the built-in instruction of the selected [`AnalysisTask`].
    pub instruction: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 60.
    pub download_timeout_secs: u64,

    /// Timeout of the single model call in seconds. Default: 120.
    pub api_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.2,
            max_tokens: 2048,
            instruction: None,
            download_timeout_secs: 60,
            api_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("render", &self.render)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("instruction", &self.instruction.as_ref().map(|s| s.len()))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }

    /// The instruction sent for `task`, honouring the override.
    pub fn instruction_for(&self, task: AnalysisTask) -> &str {
        self.instruction
            .as_deref()
            .unwrap_or_else(|| task.instruction())
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn render(mut self, render: RenderOptions) -> Self {
        self.config.render = render;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.render.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.render.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.render.font_path = Some(path.into());
        self
    }

    pub fn search_system_fonts(mut self, v: bool) -> Self {
        self.config.render.search_system_fonts = v;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn instruction(mut self, text: impl Into<String>) -> Self {
        self.config.instruction = Some(text.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, InsightError> {
        let c = &self.config;
        c.render.validate()?;
        if c.max_tokens == 0 {
            return Err(InsightError::InvalidConfig("Max tokens must be ≥ 1".into()));
        }
        if c.api_timeout_secs == 0 {
            return Err(InsightError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.instruction.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(InsightError::InvalidConfig(
                "Custom instruction must not be blank".into(),
            ));
        }
        Ok(self.config)
    }
}
