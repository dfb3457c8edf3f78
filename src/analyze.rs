//! Analysis entry points.
//!
//! [`analyze`] runs the whole flow: resolve the input, normalize it to one
//! JPEG page, ask the model, and read the score where the task has one.
//! [`PreparedResume`] splits that flow so one normalized page can serve
//! several tasks. [`normalize_file`] and [`render_to_file`] stop after
//! normalization and need no API key.

use crate::config::{AnalysisConfig, RenderOptions};
use crate::document::{DocumentKind, NormalizedImage, SourceDocument};
use crate::error::InsightError;
use crate::normalize::normalize_async;
use crate::output::AnalysisOutput;
use crate::pipeline::{gateway, input};
use crate::prompts::AnalysisTask;
use edgequake_llm::LLMProvider;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Download timeout for the normalization-only entry points.
const NORMALIZE_DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Analyse a resume (local path or HTTP/HTTPS URL) against a job description.
///
/// # Errors
/// Input, decode and render errors from normalization;
/// [`InsightError::ProviderNotConfigured`] when no model provider can be
/// found; [`InsightError::LlmApiError`] / [`InsightError::ApiTimeout`] from
/// the model call. A reply without a percentage is not an error.
///
/// # Example
/// ```rust,no_run
/// use resume_lens::{analyze, AnalysisConfig, AnalysisTask};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AnalysisConfig::default();
/// let out = analyze("resume.pdf", "Senior Rust engineer", AnalysisTask::PercentageMatch, &config).await?;
/// println!("{}% match", out.score.unwrap_or(0));
/// # Ok(())
/// # }
/// ```
pub async fn analyze(
    input_str: impl AsRef<str>,
    job_description: &str,
    task: AnalysisTask,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, InsightError> {
    let input_str = input_str.as_ref();
    info!("Analysing '{}' ({})", input_str, task);
    let doc = input::resolve_input(input_str, config.download_timeout_secs).await?;
    analyze_document(doc, job_description, task, config).await
}

/// Analyse an in-memory resume.
pub async fn analyze_document(
    doc: SourceDocument,
    job_description: &str,
    task: AnalysisTask,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, InsightError> {
    PreparedResume::prepare(doc, config)
        .await?
        .ask(job_description, task, config)
        .await
}

/// A resume normalized once, with the provider that will read it.
///
/// Each [`ask`](Self::ask) reuses the same JPEG page, so running every
/// task costs one normalization.
pub struct PreparedResume {
    provider: Arc<dyn LLMProvider>,
    kind: DocumentKind,
    image: NormalizedImage,
    normalize_duration_ms: u64,
}

impl PreparedResume {
    /// Resolve the provider, then normalize `doc`.
    ///
    /// # Errors
    /// [`InsightError::ProviderNotConfigured`] before any rendering work,
    /// otherwise the errors of [`normalize_async`].
    pub async fn prepare(doc: SourceDocument, config: &AnalysisConfig) -> Result<Self, InsightError> {
        // Provider problems should surface before the rendering work.
        let provider = gateway::resolve_provider(config)?;
        let kind = doc.kind();

        let start = Instant::now();
        let image = normalize_async(doc, config.render.clone()).await?;
        Ok(Self::with_provider(
            provider,
            kind,
            image,
            start.elapsed().as_millis() as u64,
        ))
    }

    /// Pair an already normalized page with a provider.
    pub fn with_provider(
        provider: Arc<dyn LLMProvider>,
        kind: DocumentKind,
        image: NormalizedImage,
        normalize_duration_ms: u64,
    ) -> Self {
        Self {
            provider,
            kind,
            image,
            normalize_duration_ms,
        }
    }

    pub fn image(&self) -> &NormalizedImage {
        &self.image
    }

    /// Run one task against the prepared page.
    ///
    /// `total_duration_ms` of the result counts the shared normalization
    /// plus this task's model call.
    pub async fn ask(
        &self,
        job_description: &str,
        task: AnalysisTask,
        config: &AnalysisConfig,
    ) -> Result<AnalysisOutput, InsightError> {
        let start = Instant::now();
        let reply = gateway::ask(
            &self.provider,
            job_description,
            &self.image,
            config.instruction_for(task),
            config,
        )
        .await?;

        let output = AnalysisOutput::new(
            task,
            self.kind,
            &self.image,
            reply,
            self.normalize_duration_ms,
            self.normalize_duration_ms + start.elapsed().as_millis() as u64,
        );
        info!(
            "Analysis complete: {} in {}ms ({} in / {} out tokens)",
            task,
            output.stats.total_duration_ms,
            output.stats.input_tokens,
            output.stats.output_tokens
        );
        Ok(output)
    }
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    input_str: impl AsRef<str>,
    job_description: &str,
    task: AnalysisTask,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, InsightError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| InsightError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze(input_str, job_description, task, config))
}

/// Resolve and normalize a resume without calling any model.
pub async fn normalize_file(
    input_str: impl AsRef<str>,
    opts: &RenderOptions,
) -> Result<NormalizedImage, InsightError> {
    let doc = input::resolve_input(input_str.as_ref(), NORMALIZE_DOWNLOAD_TIMEOUT_SECS).await?;
    normalize_async(doc, opts.clone()).await
}

/// Normalize a resume and write the JPEG to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn render_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    opts: &RenderOptions,
) -> Result<NormalizedImage, InsightError> {
    let image = normalize_file(input_str, opts).await?;
    let path = output_path.as_ref();
    let write_err = |e| InsightError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("jpg.tmp");
    tokio::fs::write(&tmp_path, image.jpeg_bytes())
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    info!("Wrote {}x{} JPEG to {}", image.width(), image.height(), path.display());
    Ok(image)
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

    fn write_docx(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("jane.docx");
        let body = "<w:p><w:r><w:t>Jane Doe, Rust Engineer</w:t></w:r></w:p>";
        std::fs::write(&path, docx_with_body(body)).unwrap();
        path
    }

    #[tokio::test]
    async fn render_to_file_writes_jpeg_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_docx(dir.path());
        let out = dir.path().join("nested/out/page.jpg");

        let img = render_to_file(src.to_str().unwrap(), &out, &offline_opts())
            .await
            .unwrap();

        let written = std::fs::read(&out).unwrap();
        assert_eq!(written, img.jpeg_bytes());
        assert!(!out.with_extension("jpg.tmp").exists());
    }

    #[tokio::test]
    async fn normalize_file_rejects_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "plain text").unwrap();
        let err = normalize_file(path.to_str().unwrap(), &offline_opts())
            .await
            .unwrap_err();
        assert!(matches!(err, InsightError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn prepared_resume_serves_every_task_from_one_page() {
        let mock = edgequake_llm::MockProvider::new();
        mock.add_response("MATCH SCORE: 85%").await;
        mock.add_response("Add Kubernetes experience.").await;
        let provider: Arc<dyn LLMProvider> = Arc::new(mock);

        let body = "<w:p><w:r><w:t>Jane Doe, Rust Engineer</w:t></w:r></w:p>";
        let doc = SourceDocument::new("cv.docx", DocumentKind::Docx, docx_with_body(body));
        let image = crate::normalize::normalize(&doc, &offline_opts()).unwrap();
        let prepared = PreparedResume::with_provider(provider, DocumentKind::Docx, image.clone(), 7);

        let config = AnalysisConfig::default();
        let scored = prepared
            .ask("Rust engineer", AnalysisTask::PercentageMatch, &config)
            .await
            .unwrap();
        let advice = prepared
            .ask("Rust engineer", AnalysisTask::SkillImprovement, &config)
            .await
            .unwrap();

        assert_eq!(scored.score, Some(85));
        assert_eq!(advice.score, None);
        assert_eq!(advice.response, "Add Kubernetes experience.");
        for out in [&scored, &advice] {
            assert_eq!(out.image.jpeg_bytes, image.jpeg_bytes().len());
            assert_eq!(out.stats.normalize_duration_ms, 7);
            assert!(out.stats.total_duration_ms >= 7);
        }
        assert_eq!(prepared.image(), &image);
    }

    #[tokio::test]
    async fn unknown_provider_fails_before_rendering() {
        let config = AnalysisConfig::builder()
            .provider_name("no-such-provider")
            .build()
            .unwrap();
        // bytes are not a PDF: a provider error proves rendering never ran
        let doc = SourceDocument::new("cv.pdf", crate::DocumentKind::Pdf, b"junk".to_vec());
        let err = analyze_document(doc, "job", AnalysisTask::Review, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, InsightError::ProviderNotConfigured { .. }), "got {err:?}");
    }
}
