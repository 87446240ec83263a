//! Migration of ion.json data to the latest version of the schema.
//!
//! See the crate docs for the schema history.

use crate::{compact, IngestError};
use iongraph_ir::{
    BlockId, BlockPtr, Document, Function, InsId, InsPtr, LirBlock, LirBlocks, LirInstruction,
    LiveRanges, Metadata, MirBlock, MirBlocks, MirInstruction, Pass, SourceLoc, COMPACT_VERSION,
    CURRENT_VERSION,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// An incoming document classified by wire version.
enum WireDocument {
    /// v0; the version field was never declared.
    Legacy(LegacyDocument),
    /// v1; ptr/id already well-formed.
    Standard(Document),
    /// v2; kept raw, the compact codec decodes it defensively.
    Compact(Value),
}

/// Migrates a parsed ion.json document to the canonical shape.
///
/// Pure transform: the input is left untouched. The result keeps
/// `version: 2` for compact sources (so re-exports stay compact) and is
/// otherwise tagged with the canonical version; `normalized_version` is
/// always set to the canonical version.
///
/// # Errors
///
/// Fails if the document is not a JSON object, or if it declares a version
/// other than 1 or 2 (an undeclared version means v0). Partial per-entity
/// data is repaired with empty collections instead of failing.
pub fn migrate(document: &Value) -> Result<Document, IngestError> {
    let wire = classify(document)?;

    let source_version = match &wire {
        WireDocument::Legacy(_) => 0,
        WireDocument::Standard(_) => CURRENT_VERSION as u64,
        WireDocument::Compact(_) => COMPACT_VERSION as u64,
    };
    debug!(version = source_version, "migrating ion.json document");

    let mut doc = match wire {
        WireDocument::Legacy(legacy) => repair_legacy(legacy),
        WireDocument::Standard(doc) => doc,
        WireDocument::Compact(raw) => compact::decode(&raw),
    };

    doc.version =
        if source_version == COMPACT_VERSION as u64 { COMPACT_VERSION } else { CURRENT_VERSION };
    doc.normalized_version = Some(CURRENT_VERSION);
    Ok(doc)
}

fn classify(document: &Value) -> Result<WireDocument, IngestError> {
    let Some(object) = document.as_object() else {
        return Err(IngestError::NotAnObject);
    };

    let version = match object.get("version") {
        None => 0,
        Some(value) => value
            .as_u64()
            .ok_or_else(|| IngestError::MalformedVersion(value.clone()))?,
    };

    match version {
        0 => Ok(WireDocument::Legacy(serde_json::from_value(document.clone())?)),
        1 => Ok(WireDocument::Standard(serde_json::from_value(document.clone())?)),
        2 => Ok(WireDocument::Compact(document.clone())),
        unknown => Err(IngestError::UnsupportedVersion(unknown)),
    }
}

// In v0, blocks carry `number` where v1 has `id`, and nothing has a ptr.
// The repair derives stable ptrs the same way the C++ dumper started
// assigning them: block ptrs are offset by one from the legacy number so
// that ptr 0 stays free, instruction ptrs reuse the instruction id, and LIR
// instructions have no MIR provenance to recover.

#[derive(Deserialize)]
struct LegacyDocument {
    #[serde(default)]
    functions: Vec<LegacyFunction>,
}

#[derive(Deserialize)]
struct LegacyFunction {
    #[serde(default)]
    name: String,
    #[serde(default)]
    passes: Vec<LegacyPass>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPass {
    #[serde(default)]
    name: String,
    #[serde(default)]
    mir: LegacyMirBlocks,
    #[serde(default)]
    lir: LegacyLirBlocks,
    #[serde(default)]
    live_ranges: Option<LiveRanges>,
}

#[derive(Default, Deserialize)]
struct LegacyMirBlocks {
    #[serde(default)]
    blocks: Vec<LegacyMirBlock>,
}

#[derive(Default, Deserialize)]
struct LegacyLirBlocks {
    #[serde(default)]
    blocks: Vec<LegacyLirBlock>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMirBlock {
    #[serde(default)]
    number: u32,
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    loop_depth: u32,
    #[serde(default)]
    attributes: Vec<String>,
    #[serde(default)]
    predecessors: Vec<BlockId>,
    #[serde(default)]
    successors: Vec<BlockId>,
    #[serde(default)]
    instructions: Vec<LegacyMirInstruction>,
    #[serde(default)]
    source: Option<SourceLoc>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMirInstruction {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    opcode: String,
    #[serde(default)]
    attributes: Vec<String>,
    #[serde(default)]
    inputs: Vec<u32>,
    #[serde(default)]
    uses: Vec<u32>,
    #[serde(default)]
    mem_inputs: Vec<Value>,
    #[serde(rename = "type", default)]
    ty: String,
    #[serde(default)]
    source: Option<SourceLoc>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Deserialize)]
struct LegacyLirBlock {
    #[serde(default)]
    number: u32,
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    instructions: Vec<LegacyLirInstruction>,
}

#[derive(Deserialize)]
struct LegacyLirInstruction {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    opcode: String,
    #[serde(default)]
    defs: Vec<u32>,
    #[serde(default)]
    source: Option<SourceLoc>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

fn repair_legacy(legacy: LegacyDocument) -> Document {
    Document {
        version: CURRENT_VERSION,
        normalized_version: Some(CURRENT_VERSION),
        functions: legacy.functions.into_iter().map(repair_function).collect(),
    }
}

fn repair_function(func: LegacyFunction) -> Function {
    Function { name: func.name, passes: func.passes.into_iter().map(repair_pass).collect() }
}

fn repair_pass(pass: LegacyPass) -> Pass {
    Pass {
        name: pass.name,
        mir: MirBlocks { blocks: pass.mir.blocks.into_iter().map(repair_mir_block).collect() },
        lir: LirBlocks { blocks: pass.lir.blocks.into_iter().map(repair_lir_block).collect() },
        live_ranges: pass.live_ranges,
    }
}

fn repair_mir_block(block: LegacyMirBlock) -> MirBlock {
    MirBlock {
        ptr: BlockPtr(block.id.unwrap_or(block.number) + 1),
        id: BlockId(block.number),
        loop_depth: block.loop_depth,
        attributes: block.attributes,
        predecessors: block.predecessors,
        successors: block.successors,
        instructions: block.instructions.into_iter().map(repair_mir_instruction).collect(),
        source: block.source,
        metadata: block.metadata,
    }
}

fn repair_mir_instruction(ins: LegacyMirInstruction) -> MirInstruction {
    MirInstruction {
        ptr: InsPtr(ins.id),
        id: InsId(ins.id),
        opcode: ins.opcode,
        attributes: ins.attributes,
        inputs: ins.inputs,
        uses: ins.uses,
        mem_inputs: ins.mem_inputs,
        ty: ins.ty,
        source: ins.source,
        metadata: ins.metadata,
    }
}

fn repair_lir_block(block: LegacyLirBlock) -> LirBlock {
    LirBlock {
        ptr: BlockPtr(block.id.unwrap_or(block.number)),
        id: BlockId(block.number),
        instructions: block.instructions.into_iter().map(repair_lir_instruction).collect(),
    }
}

fn repair_lir_instruction(ins: LegacyLirInstruction) -> LirInstruction {
    LirInstruction {
        ptr: InsPtr(ins.id),
        id: InsId(ins.id),
        mir_ptr: None,
        opcode: ins.opcode,
        defs: ins.defs,
        source: ins.source,
        metadata: ins.metadata,
    }
}
