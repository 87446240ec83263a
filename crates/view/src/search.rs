//! Searchable index of one pass's blocks and instructions.
//!
//! Backs the viewer's command palette: free-text search over labels plus
//! direct go-to-block and go-to-instruction lookups by id.

use iongraph_ir::{BlockPtr, Pass};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchEntryKind {
    Block,
    Instruction,
}

/// One searchable item.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchEntry {
    pub kind: SearchEntryKind,
    /// Pass-local display id of the block or instruction.
    pub id: u32,
    /// Stable identity, for block entries only.
    pub ptr: Option<BlockPtr>,
    pub label: String,
    search_text: String,
}

/// The search index for one pass. Rebuilt whenever the displayed pass
/// changes.
#[derive(Clone, Debug, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    /// Builds the index for a pass.
    ///
    /// When the pass has LIR, instruction entries come from each block's LIR
    /// instructions (matched to the MIR block by shared id); otherwise from
    /// its MIR instructions.
    pub fn build(pass: &Pass) -> Self {
        let mut entries = Vec::new();
        for block in &pass.mir.blocks {
            let desc = if block.attributes.iter().any(|a| a == "loopheader") {
                " (loop header)"
            } else if block.attributes.iter().any(|a| a == "backedge") {
                " (backedge)"
            } else if block.attributes.iter().any(|a| a == "splitedge") {
                " (split edge)"
            } else {
                ""
            };
            let label = format!("Block {}{desc}", block.id);
            entries.push(SearchEntry {
                kind: SearchEntryKind::Block,
                id: block.id.to_u32(),
                ptr: Some(block.ptr),
                search_text: label.to_lowercase(),
                label,
            });

            let lir = pass.lir.blocks.iter().find(|l| l.id == block.id);
            if let Some(lir) = lir {
                for ins in &lir.instructions {
                    entries.push(instruction_entry("LIR", ins.id.to_u32(), &ins.opcode));
                }
            } else {
                for ins in &block.instructions {
                    entries.push(instruction_entry("MIR", ins.id.to_u32(), &ins.opcode));
                }
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Case-insensitive substring search over labels, capped at `limit`.
    pub fn search<'a>(&'a self, query: &str, limit: usize) -> Vec<&'a SearchEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries.iter().filter(|e| e.search_text.contains(&query)).take(limit).collect()
    }

    /// All block entries with the given display id.
    pub fn blocks_by_id(&self, id: u32) -> Vec<&SearchEntry> {
        self.entries
            .iter()
            .filter(|e| e.kind == SearchEntryKind::Block && e.id == id)
            .collect()
    }

    /// All instruction entries with the given display id.
    pub fn instructions_by_id(&self, id: u32) -> Vec<&SearchEntry> {
        self.entries
            .iter()
            .filter(|e| e.kind == SearchEntryKind::Instruction && e.id == id)
            .collect()
    }
}

fn instruction_entry(prefix: &str, id: u32, opcode: &str) -> SearchEntry {
    let label = format!("{prefix} #{id} {opcode}");
    SearchEntry {
        kind: SearchEntryKind::Instruction,
        id,
        ptr: None,
        search_text: label.to_lowercase(),
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iongraph_ir::{BlockId, InsId, LirBlock, LirInstruction, MirBlock, MirInstruction};

    fn sample_pass() -> Pass {
        let mut pass = Pass::default();
        pass.mir.blocks.push(MirBlock {
            ptr: BlockPtr(1),
            id: BlockId(0),
            attributes: vec!["loopheader".into()],
            instructions: vec![MirInstruction {
                id: InsId(5),
                opcode: "Constant".into(),
                ..Default::default()
            }],
            ..Default::default()
        });
        pass.mir.blocks.push(MirBlock {
            ptr: BlockPtr(2),
            id: BlockId(1),
            instructions: vec![MirInstruction {
                id: InsId(6),
                opcode: "Add".into(),
                ..Default::default()
            }],
            ..Default::default()
        });
        pass
    }

    #[test]
    fn block_labels_include_attribute_descriptions() {
        let index = SearchIndex::build(&sample_pass());
        assert_eq!(index.entries()[0].label, "Block 0 (loop header)");
        assert_eq!(index.entries()[0].ptr, Some(BlockPtr(1)));
    }

    #[test]
    fn search_is_case_insensitive_and_capped() {
        let index = SearchIndex::build(&sample_pass());
        let hits = index.search("block", 1);
        assert_eq!(hits.len(), 1);
        let hits = index.search("ADD", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label, "MIR #6 Add");
        assert!(index.search("  ", 10).is_empty());
    }

    #[test]
    fn lir_instructions_take_precedence_when_present() {
        let mut pass = sample_pass();
        pass.lir.blocks.push(LirBlock {
            ptr: BlockPtr(1),
            id: BlockId(0),
            instructions: vec![LirInstruction {
                id: InsId(9),
                opcode: "LConstant".into(),
                ..Default::default()
            }],
        });
        let index = SearchIndex::build(&pass);
        // Block 0 lists its LIR instruction, block 1 falls back to MIR.
        assert!(index.entries().iter().any(|e| e.label == "LIR #9 LConstant"));
        assert!(index.entries().iter().any(|e| e.label == "MIR #6 Add"));
        assert!(!index.entries().iter().any(|e| e.label == "MIR #5 Constant"));
    }

    #[test]
    fn id_lookups() {
        let index = SearchIndex::build(&sample_pass());
        assert_eq!(index.blocks_by_id(1).len(), 1);
        assert_eq!(index.instructions_by_id(5).len(), 1);
        assert!(index.blocks_by_id(7).is_empty());
    }
}
