//! Per-pass view-state cache.
//!
//! The viewer saves its state (selection, scroll, zoom) keyed by the pass
//! index it is leaving and restores state keyed by the pass it is entering.
//! The state itself is opaque here; the cache only needs to know which block
//! the state considers selected, via [`ViewState`], to decide whether the
//! selection survives the switch.

use iongraph_ir::{BlockPtr, Pass};
use rustc_hash::FxHashMap;

/// Opaque viewer state that can name a selected block.
pub trait ViewState {
    /// The stable identity of the selected block, if any.
    fn selected_block(&self) -> Option<BlockPtr>;
}

/// The result of a cache lookup on a pass switch.
#[derive(Debug, PartialEq, Eq)]
pub struct Restored<'a, S> {
    /// The state to restore: the destination's own cached state if present,
    /// otherwise the state just saved from the pass being left.
    pub state: &'a S,
    /// Whether the restored state's selected block still exists in the
    /// destination pass. Selection identity is checked via [`BlockPtr`],
    /// never via the pass-local id; a selection pointing at a ptr absent
    /// from the destination is treated as if no selection existed.
    pub preserve_selection: bool,
}

/// Stores the latest viewer state per pass index.
///
/// Scoped to one viewer instance; discarded wholesale when a newer document
/// load supersedes the function being viewed.
#[derive(Debug, Default)]
pub struct ViewStateCache<S> {
    states: FxHashMap<usize, S>,
}

impl<S: ViewState> ViewStateCache<S> {
    pub fn new() -> Self {
        Self { states: FxHashMap::default() }
    }

    /// Stores the latest state for a pass, overwriting any prior entry.
    pub fn save(&mut self, pass_index: usize, state: S) {
        self.states.insert(pass_index, state);
    }

    /// The cached state for a pass, if any.
    pub fn get(&self, pass_index: usize) -> Option<&S> {
        self.states.get(&pass_index)
    }

    /// Looks up the state to apply when switching into `dest_pass` at
    /// `pass_index`, falling back to `fallback` (the state just saved from
    /// the pass being left) when the destination was never visited.
    ///
    /// Returns `None` when there is nothing to restore at all.
    pub fn restore<'a>(
        &'a self,
        pass_index: usize,
        dest_pass: &Pass,
        fallback: Option<&'a S>,
    ) -> Option<Restored<'a, S>> {
        let state = self.get(pass_index).or(fallback)?;
        let preserve_selection =
            state.selected_block().is_some_and(|ptr| dest_pass.has_block_ptr(ptr));
        Some(Restored { state, preserve_selection })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iongraph_ir::{BlockId, MirBlock};

    #[derive(Debug, PartialEq)]
    struct TestState {
        selected: Option<BlockPtr>,
        scroll: (f64, f64),
    }

    impl ViewState for TestState {
        fn selected_block(&self) -> Option<BlockPtr> {
            self.selected
        }
    }

    fn pass_with_ptrs(ptrs: &[u32]) -> Pass {
        let mut pass = Pass::default();
        for (n, &ptr) in ptrs.iter().enumerate() {
            pass.mir.blocks.push(MirBlock {
                ptr: BlockPtr(ptr),
                id: BlockId(n as u32),
                ..Default::default()
            });
        }
        pass
    }

    #[test]
    fn selection_survives_an_intervening_pass_without_the_block() {
        let pass_a = pass_with_ptrs(&[41, 42]);
        let pass_b = pass_with_ptrs(&[41]);

        let mut cache = ViewStateCache::new();

        // Select ptr 42 on pass A (index 0), then switch to pass B (index 1).
        let state_a = TestState { selected: Some(BlockPtr(42)), scroll: (0.0, 10.0) };
        cache.save(0, state_a);

        // B has no cached entry; it falls back to A's state, but ptr 42 does
        // not exist in B, so no continuity is claimed.
        let restored = cache.restore(1, &pass_b, cache.get(0)).unwrap();
        assert!(!restored.preserve_selection);

        // Leaving B, then returning to A: A's cached state still reports the
        // original selection, and ptr 42 exists there.
        cache.save(1, TestState { selected: None, scroll: (0.0, 0.0) });
        let restored = cache.restore(0, &pass_a, cache.get(1)).unwrap();
        assert_eq!(restored.state.selected, Some(BlockPtr(42)));
        assert!(restored.preserve_selection);
    }

    #[test]
    fn unvisited_pass_without_fallback_restores_nothing() {
        let pass_c = pass_with_ptrs(&[1]);
        let cache: ViewStateCache<TestState> = ViewStateCache::new();
        assert_eq!(cache.restore(2, &pass_c, None), None);
    }

    #[test]
    fn fallback_with_surviving_selection_preserves_it() {
        let dest = pass_with_ptrs(&[42]);
        let mut cache = ViewStateCache::new();
        cache.save(0, TestState { selected: Some(BlockPtr(42)), scroll: (0.0, 0.0) });

        let restored = cache.restore(3, &dest, cache.get(0)).unwrap();
        assert!(restored.preserve_selection);
    }

    #[test]
    fn save_overwrites_prior_entry() {
        let mut cache = ViewStateCache::new();
        cache.save(0, TestState { selected: Some(BlockPtr(1)), scroll: (0.0, 0.0) });
        cache.save(0, TestState { selected: Some(BlockPtr(2)), scroll: (5.0, 5.0) });
        assert_eq!(cache.get(0).unwrap().selected, Some(BlockPtr(2)));
    }

    #[test]
    fn no_selection_means_no_continuity_claim() {
        let dest = pass_with_ptrs(&[1, 2]);
        let mut cache = ViewStateCache::new();
        cache.save(0, TestState { selected: None, scroll: (1.0, 1.0) });
        let restored = cache.restore(0, &dest, None).unwrap();
        assert!(!restored.preserve_selection);
    }
}
