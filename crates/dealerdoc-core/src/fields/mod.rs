//! Rule-based field extraction over a document's recognized lines.
//!
//! Every extractor is a pure function of the [`LineCorpus`]: it filters
//! lines through a declarative rule pipeline, picks one candidate and
//! normalizes it. No extractor errors; a missing field is `None`.

mod asset_cost;
mod dealer;
mod horse_power;
mod model_name;
pub mod rules;

pub use asset_cost::{AssetCostExtractor, AssetCostRules};
pub use dealer::{DealerNameExtractor, DealerNameRules};
pub use horse_power::{HorsePowerExtractor, HorsePowerRules};
pub use model_name::{ModelNameCleaner, ModelNameExtractor, ModelNameRules};

use crate::ocr::LineCorpus;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from a document's line corpus.
    fn extract(&self, corpus: &LineCorpus) -> Option<Self::Output>;
}

/// Extract the raw (upper-cased, uncleaned) model line using the default tables.
pub fn extract_model_name(corpus: &LineCorpus) -> Option<String> {
    ModelNameExtractor::default().extract(corpus)
}

/// Normalize a raw model line using the default noise list.
pub fn clean_model_name(raw: Option<&str>) -> Option<String> {
    ModelNameCleaner::default().clean(raw)
}

/// Extract the power rating in HP using the default ranges.
pub fn extract_horse_power(corpus: &LineCorpus) -> Option<u32> {
    HorsePowerExtractor::default().extract(corpus)
}

/// Extract the largest plausible cost figure using the default ranges.
pub fn extract_asset_cost(corpus: &LineCorpus) -> Option<u64> {
    AssetCostExtractor::default().extract(corpus)
}

/// Extract the dealer's legal name using the default tables.
pub fn extract_dealer_name(corpus: &LineCorpus) -> Option<String> {
    DealerNameExtractor::default().extract(corpus)
}
