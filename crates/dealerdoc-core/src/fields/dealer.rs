//! Dealer legal name extraction.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::rules::{KeywordSet, LineRule, RulePipeline, SuffixList};
use super::FieldExtractor;
use crate::ocr::LineCorpus;

/// Rule tables for the dealer name extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealerNameRules {
    /// Only this many leading lines are searched.
    pub line_window: usize,

    /// Minimum trimmed line length in characters.
    pub min_length: usize,

    /// Contact details and boilerplate markers that disqualify a line.
    pub bad_keywords: KeywordSet,

    /// Legal entity markers; at least one is required.
    pub legal_keywords: KeywordSet,

    /// Suffixes after which trailing text is cut, in priority order.
    pub suffixes: SuffixList,
}

impl Default for DealerNameRules {
    fn default() -> Self {
        Self {
            line_window: 30,
            min_length: 10,
            bad_keywords: KeywordSet::new([
                "PIN",
                "MAIL",
                "EMAIL",
                "E-MAIL",
                "PHONE",
                "PH:",
                "FAX",
                "NOTE",
                "N.B",
                "COMMITTEE",
                "PURCHASE",
                "SELLING",
                "PRICE",
                "TERMS",
                "CONDITIONS",
                "DIFFERENT MAKE",
                "MODELS OF",
            ]),
            legal_keywords: KeywordSet::new([
                "LTD",
                "LIMITED",
                "PVT",
                "CORPORATION",
                "COMPANY",
                "CO.",
                "MOTORS",
                "TRACTORS",
                "AGRO",
            ]),
            suffixes: SuffixList::new([
                " LTD",
                " LIMITED",
                " PVT",
                " CORPORATION",
                " MOTORS",
                " TRACTORS",
            ]),
        }
    }
}

/// Selects the longest legal-entity line near the top of the document.
#[derive(Debug, Clone)]
pub struct DealerNameExtractor {
    line_window: usize,
    pipeline: RulePipeline,
    suffixes: SuffixList,
}

impl DealerNameExtractor {
    pub fn new(rules: &DealerNameRules) -> Self {
        let pipeline = RulePipeline::new()
            .then(LineRule::MinChars(rules.min_length))
            .then(LineRule::ExcludesAny(rules.bad_keywords.clone()))
            .then(LineRule::RequiresAny(rules.legal_keywords.clone()));

        Self {
            line_window: rules.line_window,
            pipeline,
            suffixes: rules.suffixes.clone(),
        }
    }
}

impl Default for DealerNameExtractor {
    fn default() -> Self {
        Self::new(&DealerNameRules::default())
    }
}

impl FieldExtractor for DealerNameExtractor {
    type Output = String;

    fn extract(&self, corpus: &LineCorpus) -> Option<String> {
        let mut best: Option<(usize, String)> = None;

        for line in corpus.iter().take(self.line_window) {
            let text = line.text.to_uppercase().trim().to_string();

            if let Some(rule) = self.pipeline.rejected_by(&text) {
                trace!("Dealer line {:?} rejected by {}", text, rule);
                continue;
            }

            // Strictly longer replaces, so the first of equal-length lines is kept
            let len = text.chars().count();
            if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
                best = Some((len, text));
            }
        }

        let (_, selected) = best?;
        let dealer = self.suffixes.truncate_after_first(&selected).trim().to_string();

        debug!("Dealer name: {:?} (from {:?})", dealer, selected);
        Some(dealer)
    }
}
