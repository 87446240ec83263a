//! Pass-sequence analysis: key-pass anchors and redundant passes.

use iongraph_ir::{Function, Pass};
use rustc_hash::FxHashSet;

/// The four anchor passes marking MIR/LIR phase boundaries, each bound to a
/// quick-navigation shortcut in the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyPasses {
    /// First pass with at least one MIR block.
    pub mir_start: Option<usize>,
    /// Last pass with MIR blocks and no LIR blocks.
    pub mir_only_end: Option<usize>,
    /// Pass where LIR blocks appear after a pass without any. If LIR blocks
    /// vanish and reappear, the last such transition wins.
    pub lir_start: Option<usize>,
    /// Last pass with at least one LIR block.
    pub lir_end: Option<usize>,
}

impl KeyPasses {
    /// The anchors in shortcut order (keys 1 through 4 in the viewer).
    pub fn as_array(&self) -> [Option<usize>; 4] {
        [self.mir_start, self.mir_only_end, self.lir_start, self.lir_end]
    }
}

/// Derived navigation structure for one function's pass sequence.
///
/// Computed once per function with a strictly sequential scan; the result is
/// deterministic for the same input, which the viewer relies on when it
/// recomputes on display-option changes.
#[derive(Clone, Debug, Default)]
pub struct PassAnalysis {
    pub key_passes: KeyPasses,
    redundant: FxHashSet<usize>,
}

impl PassAnalysis {
    pub fn new(func: &Function) -> Self {
        Self { key_passes: key_passes(func), redundant: redundant_passes(func) }
    }

    /// Whether the pass at `index` is structurally identical to its
    /// predecessor.
    pub fn is_redundant(&self, index: usize) -> bool {
        self.redundant.contains(&index)
    }

    /// Indices of all redundant passes.
    pub fn redundant_passes(&self) -> impl Iterator<Item = usize> + '_ {
        self.redundant.iter().copied()
    }

    /// The next non-redundant pass strictly after `from`, if any.
    pub fn next_non_redundant(&self, func: &Function, from: usize) -> Option<usize> {
        (from + 1..func.passes.len()).find(|i| !self.is_redundant(*i))
    }

    /// The previous non-redundant pass strictly before `from`, if any.
    pub fn prev_non_redundant(&self, from: usize) -> Option<usize> {
        (0..from).rev().find(|i| !self.is_redundant(*i))
    }
}

fn key_passes(func: &Function) -> KeyPasses {
    let mut keys = KeyPasses::default();
    let mut last_pass = None;
    for (i, pass) in func.passes.iter().enumerate() {
        if pass.has_mir_blocks() {
            if keys.mir_start.is_none() {
                keys.mir_start = Some(i);
            }
            if !pass.has_lir_blocks() {
                keys.mir_only_end = Some(i);
            }
        }
        if pass.has_lir_blocks() {
            if last_pass.is_some_and(|p: &Pass| !p.has_lir_blocks()) {
                keys.lir_start = Some(i);
            }
            keys.lir_end = Some(i);
        }
        last_pass = Some(pass);
    }
    keys
}

// A pass is redundant iff its MIR and LIR subtrees are both deeply equal to
// the previous pass's. Live ranges are deliberately not compared.
fn redundant_passes(func: &Function) -> FxHashSet<usize> {
    let mut redundant = FxHashSet::default();
    for (i, window) in func.passes.windows(2).enumerate() {
        let [prev, pass] = window else { unreachable!() };
        if prev.mir == pass.mir && prev.lir == pass.lir {
            redundant.insert(i + 1);
        }
    }
    redundant
}
