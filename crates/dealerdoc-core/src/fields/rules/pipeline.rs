//! Ordered predicate pipelines over a single recognized line.

use super::keywords::KeywordSet;

/// A single line predicate. Lengths are counted in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRule {
    /// Line has at least this many characters.
    MinChars(usize),
    /// Line has strictly more than this many characters.
    MoreCharsThan(usize),
    /// Line contains none of the keywords.
    ExcludesAny(KeywordSet),
    /// Line contains at least one of the keywords.
    RequiresAny(KeywordSet),
    /// Line contains at least one ASCII digit.
    HasDigit,
}

impl LineRule {
    pub fn accepts(&self, text: &str) -> bool {
        match self {
            LineRule::MinChars(min) => text.chars().count() >= *min,
            LineRule::MoreCharsThan(min) => text.chars().count() > *min,
            LineRule::ExcludesAny(keywords) => !keywords.contains_any(text),
            LineRule::RequiresAny(keywords) => keywords.contains_any(text),
            LineRule::HasDigit => text.chars().any(|c| c.is_ascii_digit()),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LineRule::MinChars(_) => "min_chars",
            LineRule::MoreCharsThan(_) => "more_chars_than",
            LineRule::ExcludesAny(_) => "excludes_any",
            LineRule::RequiresAny(_) => "requires_any",
            LineRule::HasDigit => "has_digit",
        }
    }
}

/// Rules evaluated in order; a line is a candidate when every rule accepts it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulePipeline {
    rules: Vec<LineRule>,
}

impl RulePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to the end of the pipeline.
    pub fn then(mut self, rule: LineRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn accepts(&self, text: &str) -> bool {
        self.rejected_by(text).is_none()
    }

    /// Name of the first rule rejecting `text`, if any.
    pub fn rejected_by(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| !rule.accepts(text))
            .map(LineRule::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pipeline_accepts_everything() {
        assert!(RulePipeline::new().accepts(""));
    }

    #[test]
    fn test_pipeline_reports_first_rejecting_rule() {
        let pipeline = RulePipeline::new()
            .then(LineRule::ExcludesAny(KeywordSet::new(["WARRANTY"])))
            .then(LineRule::HasDigit)
            .then(LineRule::MoreCharsThan(8));

        assert_eq!(pipeline.rejected_by("WARRANTY 2 YEARS"), Some("excludes_any"));
        assert_eq!(pipeline.rejected_by("SWARAJ TRACTOR"), Some("has_digit"));
        assert_eq!(pipeline.rejected_by("DI 745"), Some("more_chars_than"));
        assert!(pipeline.accepts("SWARAJ 744 FE"));
    }

    #[test]
    fn test_lengths_count_characters() {
        assert!(LineRule::MinChars(3).accepts("ÄÖÜ"));
        assert!(!LineRule::MoreCharsThan(3).accepts("ÄÖÜ"));
    }
}
