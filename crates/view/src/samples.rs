//! Profiler sample counts, loaded from a companion file next to the dump.
//!
//! The file is `{ "selfLineHits": [[lineKey, count], ...], "totalLineHits":
//! [[lineKey, count], ...] }`: association lists keyed by an opaque line
//! identifier, entirely independent of the IR document and not validated
//! here.

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// An opaque line identifier from the profiler.
pub type LineKey = i64;

/// Per-line sample counts for one profile.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "SampleCountsFile")]
pub struct SampleCounts {
    self_line_hits: FxHashMap<LineKey, u64>,
    total_line_hits: FxHashMap<LineKey, u64>,
}

impl SampleCounts {
    /// Samples attributed directly to the given line.
    pub fn self_hits(&self, line: LineKey) -> u64 {
        self.self_line_hits.get(&line).copied().unwrap_or(0)
    }

    /// Samples attributed to the given line or anything it called.
    pub fn total_hits(&self, line: LineKey) -> u64 {
        self.total_line_hits.get(&line).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.self_line_hits.is_empty() && self.total_line_hits.is_empty()
    }
}

/// The on-disk association-list shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SampleCountsFile {
    #[serde(default)]
    self_line_hits: Vec<(LineKey, u64)>,
    #[serde(default)]
    total_line_hits: Vec<(LineKey, u64)>,
}

impl From<SampleCountsFile> for SampleCounts {
    fn from(file: SampleCountsFile) -> Self {
        Self {
            self_line_hits: file.self_line_hits.into_iter().collect(),
            total_line_hits: file.total_line_hits.into_iter().collect(),
        }
    }
}
