//! Power rating (HP) extraction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::patterns::{HORSE_POWER, HORSE_POWER_FALLBACK};
use super::FieldExtractor;
use crate::ocr::LineCorpus;

/// Accepted range and fallback parameters for the HP extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorsePowerRules {
    /// Smallest accepted explicit rating.
    pub min: u32,

    /// Largest accepted explicit rating.
    pub max: u32,

    /// Added to the digit of a truncated "H<d>" match.
    pub fallback_base: u32,
}

impl Default for HorsePowerRules {
    fn default() -> Self {
        Self {
            min: 20,
            max: 120,
            fallback_base: 40,
        }
    }
}

/// Horse power extractor with an explicit pass and a truncated-token fallback.
#[derive(Debug, Clone, Default)]
pub struct HorsePowerExtractor {
    rules: HorsePowerRules,
}

impl HorsePowerExtractor {
    pub fn new(rules: HorsePowerRules) -> Self {
        Self { rules }
    }

    /// First "<nn>HP" rating within range, scanning lines in order.
    ///
    /// The letter O is read as a zero. Only the first match of each line is
    /// considered.
    fn explicit_rating(&self, corpus: &LineCorpus) -> Option<u32> {
        corpus.iter().find_map(|line| {
            let text = line.text.to_uppercase().replace('O', "0").replace(' ', "");
            let caps = HORSE_POWER.captures(&text)?;
            let hp: u32 = caps[1].parse().ok()?;
            if (self.rules.min..=self.rules.max).contains(&hp) {
                Some(hp)
            } else {
                debug!("HP {} out of range in {:?}", hp, line.text);
                None
            }
        })
    }

    /// First "H<d>" token, read as a rating that lost its leading digit.
    fn truncated_rating(&self, corpus: &LineCorpus) -> Option<u32> {
        corpus.iter().find_map(|line| {
            let text = line.text.to_uppercase().replace(' ', "");
            let caps = HORSE_POWER_FALLBACK.captures(&text)?;
            let digit: u32 = caps[1].parse().ok()?;
            Some(self.rules.fallback_base + digit)
        })
    }
}

impl FieldExtractor for HorsePowerExtractor {
    type Output = u32;

    fn extract(&self, corpus: &LineCorpus) -> Option<u32> {
        if let Some(hp) = self.explicit_rating(corpus) {
            debug!("HP from explicit rating: {}", hp);
            return Some(hp);
        }

        let hp = self.truncated_rating(corpus);
        debug!("HP from truncated token: {:?}", hp);
        hp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::extract_horse_power;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_rating() {
        let corpus = LineCorpus::from_texts(["45HP TRACTOR"]);
        assert_eq!(extract_horse_power(&corpus), Some(45));
    }

    #[test]
    fn test_explicit_rating_with_spaces_and_letter_o() {
        let corpus = LineCorpus::from_texts(["Swaraj 744 FE 4O H P"]);
        assert_eq!(extract_horse_power(&corpus), Some(40));
    }

    #[test]
    fn test_truncated_fallback() {
        let corpus = LineCorpus::from_texts(["H8 MODEL"]);
        assert_eq!(extract_horse_power(&corpus), Some(48));
    }

    #[test]
    fn test_out_of_range_is_absent() {
        let corpus = LineCorpus::from_texts(["200HP"]);
        assert_eq!(extract_horse_power(&corpus), None);
    }

    #[test]
    fn test_explicit_pass_wins_over_earlier_fallback_line() {
        let corpus = LineCorpus::from_texts(["H8 MODEL", "Engine 50 HP"]);
        assert_eq!(extract_horse_power(&corpus), Some(50));
    }

    #[test]
    fn test_out_of_range_line_skipped_for_later_line() {
        let corpus = LineCorpus::from_texts(["200HP", "55HP"]);
        assert_eq!(extract_horse_power(&corpus), Some(55));
    }

    #[test]
    fn test_custom_range() {
        let extractor = HorsePowerExtractor::new(HorsePowerRules {
            min: 10,
            max: 300,
            fallback_base: 40,
        });
        let corpus = LineCorpus::from_texts(["200HP"]);
        assert_eq!(extractor.extract(&corpus), Some(200));
    }

    #[test]
    fn test_only_first_rating_per_line_is_considered() {
        let corpus = LineCorpus::from_texts(["10HP 45HP"]);
        assert_eq!(extract_horse_power(&corpus), None);

        let corpus = LineCorpus::from_texts(["10HP 45HP", "55HP"]);
        assert_eq!(extract_horse_power(&corpus), Some(55));
    }

    #[test]
    fn test_fallback_does_not_read_letter_o_as_zero() {
        let corpus = LineCorpus::from_texts(["HO"]);
        assert_eq!(extract_horse_power(&corpus), None);

        let corpus = LineCorpus::from_texts(["H0"]);
        assert_eq!(extract_horse_power(&corpus), Some(40));
    }

    #[test]
    fn test_only_ascii_digits_form_ratings() {
        let corpus = LineCorpus::from_texts(["४५HP"]);
        assert_eq!(extract_horse_power(&corpus), None);

        let corpus = LineCorpus::from_texts(["४५HP", "Engine 45 HP"]);
        assert_eq!(extract_horse_power(&corpus), Some(45));
    }

    #[test]
    fn test_no_rating() {
        let corpus = LineCorpus::from_texts(["SWARAJ TRACTORS", "Total 650000"]);
        assert_eq!(extract_horse_power(&corpus), None);
    }
}
