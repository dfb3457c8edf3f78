//! Result types returned by the analysis entry points.

use crate::document::{DocumentKind, NormalizedImage};
use crate::pipeline::gateway::ModelReply;
use crate::pipeline::metric::extract_percentage;
use crate::prompts::AnalysisTask;
use serde::{Deserialize, Serialize};

/// Outcome of one resume analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Task whose instruction was sent.
    pub task: AnalysisTask,

    /// Model reply, verbatim.
    pub response: String,

    /// First `<digits>%` of the reply; only set for tasks that report a score.
    pub score: Option<u32>,

    /// The page the model was shown.
    pub image: ImageSummary,

    /// Token usage and timings.
    pub stats: AnalysisStats,
}

impl AnalysisOutput {
    pub(crate) fn new(
        task: AnalysisTask,
        kind: DocumentKind,
        image: &NormalizedImage,
        reply: ModelReply,
        normalize_duration_ms: u64,
        total_duration_ms: u64,
    ) -> Self {
        let score = task.reports_score().then(|| extract_percentage(&reply.text));
        Self {
            task,
            score,
            image: ImageSummary {
                kind,
                width: image.width(),
                height: image.height(),
                jpeg_bytes: image.jpeg_bytes().len(),
            },
            stats: AnalysisStats {
                input_tokens: reply.input_tokens,
                output_tokens: reply.output_tokens,
                normalize_duration_ms,
                llm_duration_ms: reply.duration_ms,
                total_duration_ms,
            },
            response: reply.text,
        }
    }
}

/// Shape of the normalized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub kind: DocumentKind,
    pub width: u32,
    pub height: u32,
    pub jpeg_bytes: usize,
}

/// Token usage and wall-clock timings of an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub normalize_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}
