#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod analysis;
pub use analysis::{KeyPasses, PassAnalysis};

mod state;
pub use state::{Restored, ViewState, ViewStateCache};

mod search;
pub use search::{SearchEntry, SearchEntryKind, SearchIndex};

mod samples;
pub use samples::{LineKey, SampleCounts};
