//! Asset cost extraction.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::rules::patterns::DIGIT_RUN;
use super::FieldExtractor;
use crate::ocr::LineCorpus;

/// Accepted digit-run lengths and value range for cost figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetCostRules {
    /// Shortest digit run considered a cost figure.
    pub min_digits: usize,

    /// Longest digit run considered a cost figure.
    pub max_digits: usize,

    /// Smallest accepted value.
    pub min_value: u64,

    /// Largest accepted value.
    pub max_value: u64,
}

impl Default for AssetCostRules {
    fn default() -> Self {
        Self {
            min_digits: 5,
            max_digits: 7,
            min_value: 50_000,
            max_value: 2_000_000,
        }
    }
}

/// Picks the largest plausible currency figure across the whole document.
///
/// Per-unit and partial prices on a quotation are smaller than the total.
#[derive(Debug, Clone, Default)]
pub struct AssetCostExtractor {
    rules: AssetCostRules,
}

impl AssetCostExtractor {
    pub fn new(rules: AssetCostRules) -> Self {
        Self { rules }
    }

    /// All accepted figures in a single line, in text order.
    ///
    /// Thousands separators (commas, spaces) are removed first, so both
    /// "3,50,000" and "350 000" read as 350000.
    pub fn figures_in_line(&self, text: &str) -> Vec<u64> {
        let compact = text.replace([',', ' '], "");
        let digit_range = self.rules.min_digits..=self.rules.max_digits;
        let value_range = self.rules.min_value..=self.rules.max_value;

        DIGIT_RUN
            .find_iter(&compact)
            .map(|m| m.as_str())
            .filter(|run| digit_range.contains(&run.len()))
            .filter_map(|run| run.parse::<u64>().ok())
            .filter(|value| {
                let accepted = value_range.contains(value);
                if !accepted {
                    trace!("Cost figure {} out of range", value);
                }
                accepted
            })
            .collect()
    }
}

impl FieldExtractor for AssetCostExtractor {
    type Output = u64;

    fn extract(&self, corpus: &LineCorpus) -> Option<u64> {
        let figures: Vec<u64> = corpus
            .iter()
            .flat_map(|line| self.figures_in_line(&line.text))
            .collect();

        debug!("Cost figures found: {:?}", figures);
        figures.into_iter().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::extract_asset_cost;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_asset_cost_filters_out_of_range() {
        let corpus = LineCorpus::from_texts([
            "Registration charges 45,000",
            "Ex-showroom price 350,000",
            "Loan limit 1,20,00,000",
        ]);
        assert_eq!(extract_asset_cost(&corpus), Some(350000));
    }

    #[test]
    fn test_extract_asset_cost_takes_maximum() {
        let corpus = LineCorpus::from_texts([
            "Tractor 6,25,000",
            "Implements 75,000",
            "Total 7,00,000",
        ]);
        assert_eq!(extract_asset_cost(&corpus), Some(700000));
    }

    #[test]
    fn test_extract_asset_cost_spaces_join_digits() {
        let corpus = LineCorpus::from_texts(["Amount Rs. 5 40 000 /-"]);
        assert_eq!(extract_asset_cost(&corpus), Some(540000));
    }

    #[test]
    fn test_extract_asset_cost_none() {
        let corpus = LineCorpus::from_texts(["Phone 9876", "PIN 41100"]);
        assert_eq!(extract_asset_cost(&corpus), None);
    }

    #[test]
    fn test_figures_in_line_keeps_text_order() {
        let extractor = AssetCostExtractor::default();
        assert_eq!(
            extractor.figures_in_line("60000 and 2000000 and 2000001"),
            vec![60000, 2000000]
        );
    }

    #[test]
    fn test_only_ascii_digits_form_figures() {
        let corpus = LineCorpus::from_texts(["Total ३,५०,०००"]);
        assert_eq!(extract_asset_cost(&corpus), None);

        let corpus = LineCorpus::from_texts(["Total ३,५०,०००", "Ex-showroom 3,20,000"]);
        assert_eq!(extract_asset_cost(&corpus), Some(320000));
    }

    #[test]
    fn test_boundaries_inclusive() {
        let corpus = LineCorpus::from_texts(["50,000"]);
        assert_eq!(extract_asset_cost(&corpus), Some(50000));
        let corpus = LineCorpus::from_texts(["49,999"]);
        assert_eq!(extract_asset_cost(&corpus), None);
    }
}
