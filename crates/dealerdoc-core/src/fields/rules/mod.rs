//! Declarative rule tables used by the field extractors.

pub mod keywords;
pub mod patterns;
pub mod pipeline;

pub use keywords::{KeywordSet, SuffixList};
pub use pipeline::{LineRule, RulePipeline};
