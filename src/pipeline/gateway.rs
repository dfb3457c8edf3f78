//! Model gateway: one multimodal request per analysis.
//!
//! The request carries the task instruction, the job description and the
//! resume image. Prompt texts live in [`crate::prompts`]; this module only
//! assembles messages, applies the timeout and maps errors.
//!
//! There is no retry. A failed call surfaces as an error and the caller
//! decides whether to ask again.

use crate::config::AnalysisConfig;
use crate::document::NormalizedImage;
use crate::error::InsightError;
use crate::pipeline::encode::image_part;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

/// Model used when the caller names no model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// The model's answer plus the usage the provider reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReply {
    pub text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
}

/// Send (instruction, job description, resume image) and return the reply.
///
/// ## Message Layout
///
/// 1. **System message**: the task instruction
/// 2. **User message**: the job description as text with the resume JPEG
///    attached as its single image
///
/// # Errors
/// [`InsightError::LlmApiError`] when the provider fails,
/// [`InsightError::ApiTimeout`] when it does not answer within
/// `config.api_timeout_secs`.
pub async fn ask(
    provider: &Arc<dyn LLMProvider>,
    job_description: &str,
    image: &NormalizedImage,
    instruction: &str,
    config: &AnalysisConfig,
) -> Result<ModelReply, InsightError> {
    let start = Instant::now();
    let messages = build_messages(job_description, image, instruction);
    let options = build_options(config);

    let secs = config.api_timeout_secs;
    let response = timeout(
        Duration::from_secs(secs),
        provider.chat(&messages, Some(&options)),
    )
    .await
    .map_err(|_| {
        warn!("Model call exceeded {}s", secs);
        InsightError::ApiTimeout { secs }
    })?
    .map_err(|e| InsightError::LlmApiError {
        message: format!("{}", e),
    })?;

    let duration = start.elapsed();
    debug!(
        "Model reply: {} input tokens, {} output tokens, {:?}",
        response.prompt_tokens, response.completion_tokens, duration
    );

    Ok(ModelReply {
        text: response.content,
        input_tokens: response.prompt_tokens,
        output_tokens: response.completion_tokens,
        duration_ms: duration.as_millis() as u64,
    })
}

/// Assemble the chat messages for one analysis.
pub fn build_messages(
    job_description: &str,
    image: &NormalizedImage,
    instruction: &str,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(instruction),
        ChatMessage::user_with_images(job_description, vec![image_part(image)]),
    ]
}

/// Build `CompletionOptions` from the analysis config.
fn build_options(config: &AnalysisConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`): used as-is.
/// 2. **Named provider** (`config.provider_name`) with `config.model` or
///    [`DEFAULT_MODEL`].
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 4. **Gemini key** (`GEMINI_API_KEY` or `GOOGLE_API_KEY`): Gemini with
///    `config.model` or [`DEFAULT_MODEL`].
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_provider(config: &AnalysisConfig) -> Result<Arc<dyn LLMProvider>, InsightError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_vision_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_vision_provider(&prov, &model);
        }
    }

    let has_gemini_key = ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
        .iter()
        .any(|k| std::env::var(k).is_ok_and(|v| !v.is_empty()));
    if has_gemini_key {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_vision_provider("gemini", model);
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| InsightError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, InsightError> {
    info!("Using provider '{}' with model '{}'", provider_name, model);
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        InsightError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_image() -> NormalizedImage {
        let rgb = image::RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
        crate::pipeline::encode::encode_rgb(&rgb, 90).unwrap()
    }

    #[test]
    fn build_options_defaults() {
        let config = AnalysisConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(2048));
    }

    #[test]
    fn messages_carry_instruction_job_and_image() {
        let img = tiny_image();
        let messages = build_messages("Rust engineer, Berlin", &img, "Rate the match.");
        assert_eq!(messages.len(), 2);

        let system = format!("{:?}", messages[0]);
        let user = format!("{:?}", messages[1]);
        assert!(system.contains("Rate the match."), "got {system}");
        assert!(user.contains("Rust engineer, Berlin"), "got {user}");
        assert!(user.contains("image/jpeg"), "got {user}");
    }

    #[test]
    fn unknown_named_provider_is_not_configured() {
        let config = AnalysisConfig::builder()
            .provider_name("no-such-provider")
            .build()
            .unwrap();
        let err = resolve_provider(&config).err().expect("unknown provider must fail");
        assert!(matches!(
            err,
            InsightError::ProviderNotConfigured { ref provider, .. } if provider == "no-such-provider"
        ));
    }
}
