//! Register-allocation output attached to a pass.

use serde::{Deserialize, Serialize};

/// All live ranges recorded for one pass. Independent of block and
/// instruction identity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveRanges {
    #[serde(default)]
    pub vregs: Vec<LiveRange>,
}

/// The intervals during which a virtual register holds a live value, plus
/// its assigned physical register if allocated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveRange {
    #[serde(default)]
    pub vreg: String,
    #[serde(default)]
    pub intervals: Vec<LiveInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg: Option<String>,
}

/// A single `[start, end]` interval of a live range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveInterval {
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub end: u32,
}
