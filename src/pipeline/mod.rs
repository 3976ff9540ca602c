//! The extraction pipeline: normalize → two strategies → merge.

pub mod context;
pub mod lexicon_match;
pub mod merge;
pub mod normalize;
pub mod orchestrator;
pub mod pattern;

pub use lexicon_match::extract_by_lexicon;
pub use merge::{merge, merge_with, MergeMode};
pub use orchestrator::extract_medications;
pub use pattern::extract_by_pattern;
