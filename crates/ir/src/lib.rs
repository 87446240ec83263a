#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod ids;
pub use ids::{BlockId, BlockPtr, InsId, InsPtr};

mod block;
pub use block::{LirBlock, LirInstruction, Metadata, MirBlock, MirInstruction, SourceLoc};

mod document;
pub use document::{Document, Function, LirBlocks, MirBlocks, Pass};

mod live;
pub use live::{LiveInterval, LiveRange, LiveRanges};

/// The canonical schema version documents are normalized to.
pub const CURRENT_VERSION: u32 = 1;

/// The compact (string table + tuple) schema version.
pub const COMPACT_VERSION: u32 = 2;
