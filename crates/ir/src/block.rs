//! MIR and LIR blocks and instructions.

use crate::{BlockId, BlockPtr, InsId, InsPtr};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arbitrary per-entity metadata carried through from the dump. Never
/// interpreted, only preserved.
pub type Metadata = serde_json::Map<String, Value>;

/// A mid-level IR basic block.
///
/// Predecessor and successor edges reference [`BlockId`]s, not ptrs: the
/// control-flow graph is always interpreted within a single pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirBlock {
    #[serde(default)]
    pub ptr: BlockPtr,
    #[serde(default)]
    pub id: BlockId,
    #[serde(default)]
    pub loop_depth: u32,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub predecessors: Vec<BlockId>,
    #[serde(default)]
    pub successors: Vec<BlockId>,
    #[serde(default)]
    pub instructions: Vec<MirInstruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// A mid-level IR instruction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirInstruction {
    #[serde(default)]
    pub ptr: InsPtr,
    #[serde(default)]
    pub id: InsId,
    #[serde(default)]
    pub opcode: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<u32>,
    #[serde(default)]
    pub uses: Vec<u32>,
    #[serde(default)]
    pub mem_inputs: Vec<Value>,
    #[serde(rename = "type", default)]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// A low-level IR basic block.
///
/// Corresponds to exactly one MIR block by shared `id` within the same pass.
/// LIR blocks carry no independent stable identity; they inherit it from
/// their MIR counterpart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LirBlock {
    #[serde(default)]
    pub ptr: BlockPtr,
    #[serde(default)]
    pub id: BlockId,
    #[serde(default)]
    pub instructions: Vec<LirInstruction>,
}

/// A low-level IR instruction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LirInstruction {
    #[serde(default)]
    pub ptr: InsPtr,
    #[serde(default)]
    pub id: InsId,
    /// The originating MIR instruction, if any. `None` for legacy data and
    /// synthetic instructions.
    #[serde(default)]
    pub mir_ptr: Option<InsPtr>,
    #[serde(default)]
    pub opcode: String,
    #[serde(default)]
    pub defs: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// An optional source location attached to blocks and instructions.
///
/// Purely descriptive; never used for identity or comparison beyond equality.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode_offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_stack: Option<Vec<SourceLoc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mir_block_wire_shape() {
        let block: MirBlock = serde_json::from_value(json!({
            "ptr": 6,
            "id": 5,
            "loopDepth": 1,
            "attributes": ["loopheader"],
            "predecessors": [3],
            "successors": [7, 8],
            "instructions": [],
        }))
        .unwrap();
        assert_eq!(block.ptr, BlockPtr(6));
        assert_eq!(block.id, BlockId(5));
        assert_eq!(block.loop_depth, 1);
        assert_eq!(block.successors, vec![BlockId(7), BlockId(8)]);
        assert_eq!(block.source, None);

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["loopDepth"], 1);
        assert!(value.get("source").is_none());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let ins: MirInstruction =
            serde_json::from_value(json!({ "ptr": 1, "id": 1, "opcode": "constant" })).unwrap();
        assert!(ins.inputs.is_empty());
        assert!(ins.uses.is_empty());
        assert!(ins.mem_inputs.is_empty());
        assert_eq!(ins.ty, "");
    }

    #[test]
    fn lir_mir_ptr_roundtrips_null() {
        let ins: LirInstruction =
            serde_json::from_value(json!({ "ptr": 2, "id": 2, "mirPtr": null, "opcode": "Label" }))
                .unwrap();
        assert_eq!(ins.mir_ptr, None);
        let value = serde_json::to_value(&ins).unwrap();
        assert_eq!(value["mirPtr"], Value::Null);
    }
}
