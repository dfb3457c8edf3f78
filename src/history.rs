//! Session history of past analyses.
//!
//! The history is a plain value owned by whoever drives the session (the CLI
//! keeps one per invocation). Nothing in the library holds one globally.

use crate::output::AnalysisOutput;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One recorded analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// File name of the analysed resume.
    pub source: String,
    /// Seconds since the Unix epoch when the entry was recorded.
    pub recorded_at: u64,
    pub output: AnalysisOutput,
}

/// Ordered list of analyses, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisHistory {
    entries: Vec<HistoryEntry>,
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `output` for the resume named `source`.
    pub fn append(&mut self, source: impl Into<String>, output: AnalysisOutput) -> &HistoryEntry {
        let recorded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.entries.push(HistoryEntry {
            source: source.into(),
            recorded_at,
            output,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
