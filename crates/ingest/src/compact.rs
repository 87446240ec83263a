//! The compact (v2) wire encoding.
//!
//! A v2 document is `{ version: 2, strings: [...], functions: [...] }` where
//! every entity is a fixed-width tuple and every string is an index into the
//! shared table. Encoding is an offline concern ([`encode`], used by the
//! packer); decoding runs at load time inside [`migrate`](crate::migrate).
//!
//! `source` and `metadata` are not representable in this format and are
//! always absent after a decode. This is an intentional loss: callers that
//! need those fields must keep the original expanded document.

use iongraph_ir::{
    BlockId, BlockPtr, Document, Function, InsId, InsPtr, LirBlock, LirBlocks, LirInstruction,
    LiveRanges, MirBlock, MirBlocks, MirInstruction, Pass, COMPACT_VERSION, CURRENT_VERSION,
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

/// Index into a compact document's string table.
pub type StrIdx = u32;

/// First-seen-wins string interner used while packing.
///
/// Each distinct string receives one slot; first occurrence order is
/// preserved and repeats resolve to the existing slot.
#[derive(Default)]
pub struct StringTable {
    strings: Vec<String>,
    indices: FxHashMap<String, StrIdx>,
}

impl StringTable {
    pub fn intern(&mut self, s: &str) -> StrIdx {
        if let Some(&idx) = self.indices.get(s) {
            return idx;
        }
        let idx = self.strings.len() as StrIdx;
        self.strings.push(s.to_owned());
        self.indices.insert(s.to_owned(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    fn into_strings(self) -> Vec<String> {
        self.strings
    }
}

/// A whole document in the compact encoding. Serializes to the v2 wire form.
#[derive(Debug, Serialize)]
pub struct CompactDocument {
    pub version: u32,
    pub strings: Vec<String>,
    pub functions: Vec<FuncV2>,
}

#[derive(Debug, Serialize)]
pub struct FuncV2(pub StrIdx, pub Vec<PassV2>);

#[derive(Debug, Serialize)]
pub struct PassV2(pub StrIdx, pub Vec<MirBlockV2>, pub Vec<LirBlockV2>, pub Option<LiveRanges>);

#[derive(Debug, Serialize)]
pub struct MirBlockV2(
    pub BlockPtr,
    pub BlockId,
    pub u32,
    pub Vec<StrIdx>,
    pub Vec<BlockId>,
    pub Vec<BlockId>,
    pub Vec<MirInstructionV2>,
);

#[derive(Debug, Serialize)]
pub struct MirInstructionV2(
    pub InsPtr,
    pub InsId,
    pub StrIdx,
    pub Vec<StrIdx>,
    pub Vec<u32>,
    pub Vec<u32>,
    pub Vec<Value>,
    pub StrIdx,
);

#[derive(Debug, Serialize)]
pub struct LirBlockV2(pub BlockPtr, pub BlockId, pub Vec<LirInstructionV2>);

#[derive(Debug, Serialize)]
pub struct LirInstructionV2(
    pub InsPtr,
    pub InsId,
    pub Option<InsPtr>,
    pub StrIdx,
    pub Vec<u32>,
);

/// Encodes an expanded document into the compact form.
///
/// `source` and `metadata` are dropped; everything else round-trips through
/// [`decode`] exactly.
pub fn encode(doc: &Document) -> CompactDocument {
    let mut strings = StringTable::default();
    let functions = doc.functions.iter().map(|f| encode_func(f, &mut strings)).collect();
    trace!(strings = strings.len(), "packed string table");
    CompactDocument { version: COMPACT_VERSION, strings: strings.into_strings(), functions }
}

fn encode_func(func: &Function, strings: &mut StringTable) -> FuncV2 {
    FuncV2(
        strings.intern(&func.name),
        func.passes.iter().map(|p| encode_pass(p, strings)).collect(),
    )
}

fn encode_pass(pass: &Pass, strings: &mut StringTable) -> PassV2 {
    PassV2(
        strings.intern(&pass.name),
        pass.mir.blocks.iter().map(|b| encode_mir_block(b, strings)).collect(),
        pass.lir.blocks.iter().map(|b| encode_lir_block(b, strings)).collect(),
        pass.live_ranges.clone(),
    )
}

fn encode_mir_block(block: &MirBlock, strings: &mut StringTable) -> MirBlockV2 {
    MirBlockV2(
        block.ptr,
        block.id,
        block.loop_depth,
        block.attributes.iter().map(|a| strings.intern(a)).collect(),
        block.predecessors.clone(),
        block.successors.clone(),
        block.instructions.iter().map(|i| encode_mir_instruction(i, strings)).collect(),
    )
}

fn encode_mir_instruction(ins: &MirInstruction, strings: &mut StringTable) -> MirInstructionV2 {
    MirInstructionV2(
        ins.ptr,
        ins.id,
        strings.intern(&ins.opcode),
        ins.attributes.iter().map(|a| strings.intern(a)).collect(),
        ins.inputs.clone(),
        ins.uses.clone(),
        ins.mem_inputs.clone(),
        strings.intern(&ins.ty),
    )
}

fn encode_lir_block(block: &LirBlock, strings: &mut StringTable) -> LirBlockV2 {
    LirBlockV2(
        block.ptr,
        block.id,
        block.instructions.iter().map(|i| encode_lir_instruction(i, strings)).collect(),
    )
}

fn encode_lir_instruction(ins: &LirInstruction, strings: &mut StringTable) -> LirInstructionV2 {
    LirInstructionV2(ins.ptr, ins.id, ins.mir_ptr, strings.intern(&ins.opcode), ins.defs.clone())
}

/// Decodes a compact document into the expanded, v1-shaped form.
///
/// Decoding never fails: unresolvable string-table indices become empty
/// strings and missing or truncated tuples decode to empty collections, per
/// the best-effort ingestion policy.
pub fn decode(document: &Value) -> Document {
    let strings = Strings(elems(document.get("strings")));
    let functions = elems(document.get("functions"))
        .iter()
        .map(|f| decode_func(f, &strings))
        .collect();
    Document {
        version: CURRENT_VERSION,
        normalized_version: Some(CURRENT_VERSION),
        functions,
    }
}

/// Read-side view of the string table.
struct Strings<'a>(&'a [Value]);

impl Strings<'_> {
    /// Resolves a table index. Out of range, negative, or non-integer
    /// indices resolve to the empty string, never an error.
    fn resolve(&self, index: Option<&Value>) -> String {
        index
            .and_then(Value::as_u64)
            .and_then(|i| self.0.get(i as usize))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

fn elems(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map_or(&[], Vec::as_slice)
}

fn num_at(tuple: &[Value], index: usize) -> u32 {
    tuple.get(index).and_then(Value::as_u64).unwrap_or(0) as u32
}

fn nums_at(tuple: &[Value], index: usize) -> Vec<u32> {
    elems(tuple.get(index)).iter().filter_map(Value::as_u64).map(|n| n as u32).collect()
}

fn decode_func(value: &Value, strings: &Strings<'_>) -> Function {
    let tuple = elems(Some(value));
    Function {
        name: strings.resolve(tuple.first()),
        passes: elems(tuple.get(1)).iter().map(|p| decode_pass(p, strings)).collect(),
    }
}

fn decode_pass(value: &Value, strings: &Strings<'_>) -> Pass {
    let tuple = elems(Some(value));
    let live_ranges = tuple
        .get(3)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value::<LiveRanges>(v.clone()).ok());
    Pass {
        name: strings.resolve(tuple.first()),
        mir: MirBlocks {
            blocks: elems(tuple.get(1)).iter().map(|b| decode_mir_block(b, strings)).collect(),
        },
        lir: LirBlocks {
            blocks: elems(tuple.get(2)).iter().map(|b| decode_lir_block(b, strings)).collect(),
        },
        live_ranges,
    }
}

fn decode_mir_block(value: &Value, strings: &Strings<'_>) -> MirBlock {
    let tuple = elems(Some(value));
    MirBlock {
        ptr: BlockPtr(num_at(tuple, 0)),
        id: BlockId(num_at(tuple, 1)),
        loop_depth: num_at(tuple, 2),
        attributes: elems(tuple.get(3)).iter().map(|a| strings.resolve(Some(a))).collect(),
        predecessors: nums_at(tuple, 4).into_iter().map(BlockId).collect(),
        successors: nums_at(tuple, 5).into_iter().map(BlockId).collect(),
        instructions: elems(tuple.get(6))
            .iter()
            .map(|i| decode_mir_instruction(i, strings))
            .collect(),
        source: None,
        metadata: None,
    }
}

fn decode_mir_instruction(value: &Value, strings: &Strings<'_>) -> MirInstruction {
    let tuple = elems(Some(value));
    // The type slot may be absent or negative; both mean "no type".
    let ty = match tuple.get(7).and_then(Value::as_i64) {
        Some(index) if index >= 0 => strings.resolve(tuple.get(7)),
        _ => String::new(),
    };
    MirInstruction {
        ptr: InsPtr(num_at(tuple, 0)),
        id: InsId(num_at(tuple, 1)),
        opcode: strings.resolve(tuple.get(2)),
        attributes: elems(tuple.get(3)).iter().map(|a| strings.resolve(Some(a))).collect(),
        inputs: nums_at(tuple, 4),
        uses: nums_at(tuple, 5),
        mem_inputs: elems(tuple.get(6)).to_vec(),
        ty,
        source: None,
        metadata: None,
    }
}

fn decode_lir_block(value: &Value, strings: &Strings<'_>) -> LirBlock {
    let tuple = elems(Some(value));
    LirBlock {
        ptr: BlockPtr(num_at(tuple, 0)),
        id: BlockId(num_at(tuple, 1)),
        instructions: elems(tuple.get(2))
            .iter()
            .map(|i| decode_lir_instruction(i, strings))
            .collect(),
    }
}

fn decode_lir_instruction(value: &Value, strings: &Strings<'_>) -> LirInstruction {
    let tuple = elems(Some(value));
    let mir_ptr = tuple.get(2).and_then(Value::as_u64).map(|n| InsPtr(n as u32));
    LirInstruction {
        ptr: InsPtr(num_at(tuple, 0)),
        id: InsId(num_at(tuple, 1)),
        mir_ptr,
        opcode: strings.resolve(tuple.get(3)),
        defs: nums_at(tuple, 4),
        source: None,
        metadata: None,
    }
}
