//! Equipment model name extraction and cleanup.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::rules::{KeywordSet, LineRule, RulePipeline};
use super::FieldExtractor;
use crate::ocr::LineCorpus;

/// Rule tables for the model name extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelNameRules {
    /// Legal, warranty and payment terms that disqualify a line.
    pub negative_keywords: KeywordSet,

    /// Brand names and drivetrain/engine tokens; at least one is required.
    pub positive_keywords: KeywordSet,

    /// A candidate must be strictly longer than this many characters.
    pub min_length_exclusive: usize,

    /// Substrings removed by the cleaner, in order.
    pub noise: Vec<String>,
}

impl Default for ModelNameRules {
    fn default() -> Self {
        Self {
            negative_keywords: KeywordSet::new([
                "WARRANTY",
                "PRICE",
                "DELIVERY",
                "BANK",
                "ISSUE",
                "LETTER",
                "TERMS",
                "SUBJECT",
                "TRANSACTION",
                "PAYMENT",
            ]),
            positive_keywords: KeywordSet::new([
                "TRACTOR", "SWARAJ", "MAHINDRA", "SONALIKA", "EICHER", "JOHN", "DEERE",
                "POWERTRAC", "FARMTRAC", "KUBOTA", "DI", "FE", "4WD",
            ]),
            min_length_exclusive: 8,
            noise: ["COST OF", "TRACTOR", "MODEL", ":-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Selects the shortest line that looks like a model designation.
///
/// The shortest qualifying line tends to carry the least adjacent text.
#[derive(Debug, Clone)]
pub struct ModelNameExtractor {
    pipeline: RulePipeline,
}

impl ModelNameExtractor {
    pub fn new(rules: &ModelNameRules) -> Self {
        let pipeline = RulePipeline::new()
            .then(LineRule::ExcludesAny(rules.negative_keywords.clone()))
            .then(LineRule::HasDigit)
            .then(LineRule::RequiresAny(rules.positive_keywords.clone()))
            .then(LineRule::MoreCharsThan(rules.min_length_exclusive));
        Self { pipeline }
    }
}

impl Default for ModelNameExtractor {
    fn default() -> Self {
        Self::new(&ModelNameRules::default())
    }
}

impl FieldExtractor for ModelNameExtractor {
    type Output = String;

    fn extract(&self, corpus: &LineCorpus) -> Option<String> {
        let selected = corpus
            .iter()
            .map(|line| line.text.to_uppercase())
            .filter(|text| match self.pipeline.rejected_by(text) {
                Some(rule) => {
                    trace!("Model line {:?} rejected by {}", text, rule);
                    false
                }
                None => true,
            })
            // min_by_key keeps the first of equally short candidates
            .min_by_key(|text| text.chars().count());

        debug!("Model line: {:?}", selected);
        selected
    }
}

/// Removes noise words from a raw model line.
#[derive(Debug, Clone)]
pub struct ModelNameCleaner {
    noise: Vec<String>,
}

impl ModelNameCleaner {
    pub fn new(rules: &ModelNameRules) -> Self {
        Self {
            noise: rules
                .noise
                .iter()
                .map(|n| n.to_uppercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Upper-case, strip every noise substring and trim.
    ///
    /// Removal repeats until nothing changes, since deleting one noise word
    /// can join the halves of another. An empty result is absent.
    pub fn clean(&self, raw: Option<&str>) -> Option<String> {
        let mut current = raw?.to_uppercase();

        loop {
            let mut next = current.clone();
            for noise in &self.noise {
                next = next.replace(noise.as_str(), "");
            }
            let next = next.trim().to_string();
            if next == current {
                break;
            }
            current = next;
        }

        if current.is_empty() {
            None
        } else {
            Some(current)
        }
    }
}

impl Default for ModelNameCleaner {
    fn default() -> Self {
        Self::new(&ModelNameRules::default())
    }
}
