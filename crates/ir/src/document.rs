//! Top-level document, function, and pass shapes.

use crate::{BlockPtr, LirBlock, LiveRanges, MirBlock, CURRENT_VERSION};
use serde::{Deserialize, Serialize};

/// A fully migrated IR document.
///
/// `version` is the original wire version (`2` for compact sources, else the
/// canonical version); `normalized_version` is always the canonical version
/// once migration has run, so downstream code can tell "original wire
/// version" apart from "shape I can rely on".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_version: Option<u32>,
    #[serde(default)]
    pub functions: Vec<Function>,
}

impl Document {
    /// Extracts a single function as a standalone expanded document, e.g.
    /// for a self-contained export.
    pub fn single_function(&self, index: usize) -> Option<Self> {
        let func = self.functions.get(index)?;
        Some(Self {
            version: CURRENT_VERSION,
            normalized_version: Some(CURRENT_VERSION),
            functions: vec![func.clone()],
        })
    }
}

/// One compiled function and the ordered sequence of optimization passes
/// recorded for it. Owns all its passes; immutable once migration completes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub passes: Vec<Pass>,
}

/// One named snapshot of MIR/LIR state after a specific optimization stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mir: MirBlocks,
    #[serde(default)]
    pub lir: LirBlocks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_ranges: Option<LiveRanges>,
}

impl Pass {
    pub fn has_mir_blocks(&self) -> bool {
        !self.mir.blocks.is_empty()
    }

    pub fn has_lir_blocks(&self) -> bool {
        !self.lir.blocks.is_empty()
    }

    /// Whether a block with the given stable identity exists in this pass.
    ///
    /// Identity lives on MIR blocks; LIR blocks are identified through their
    /// MIR counterpart.
    pub fn has_block_ptr(&self, ptr: BlockPtr) -> bool {
        self.mir.blocks.iter().any(|b| b.ptr == ptr)
    }
}

/// The MIR side of a pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MirBlocks {
    #[serde(default)]
    pub blocks: Vec<MirBlock>,
}

/// The LIR side of a pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LirBlocks {
    #[serde(default)]
    pub blocks: Vec<LirBlock>,
}
