//! Keyword tables matched as plain substrings of upper-cased text.

use serde::{Deserialize, Serialize};

/// An ordered set of upper-case keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Build a keyword set; entries are upper-cased so matching against
    /// upper-cased text stays consistent with user-supplied tables.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|k| k.as_ref().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }

    /// First keyword contained in `text`, in declaration order.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|keyword| text.contains(keyword.as_str()))
            .map(String::as_str)
    }

    pub fn contains_any(&self, text: &str) -> bool {
        self.find_in(text).is_some()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Ordered list of suffixes used to cut trailing text after a legal name.
///
/// The list order decides which suffix wins, not the position of the
/// suffix in the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuffixList(Vec<String>);

impl SuffixList {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            suffixes
                .into_iter()
                .map(|s| s.as_ref().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Truncate `text` right after the first occurrence of the first listed
    /// suffix it contains. Text without any suffix is returned unchanged.
    pub fn truncate_after_first<'a>(&self, text: &'a str) -> &'a str {
        for suffix in &self.0 {
            if let Some(pos) = text.find(suffix.as_str()) {
                return &text[..pos + suffix.len()];
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keywords_are_uppercased() {
        let set = KeywordSet::new(["ltd", "Motors", ""]);
        assert_eq!(set, KeywordSet::new(["LTD", "MOTORS"]));
        assert!(set.contains_any("ABC MOTORS"));
        assert_eq!(set.find_in("XYZ LTD MOTORS"), Some("LTD"));
    }

    #[test]
    fn test_find_in_uses_declaration_order() {
        let set = KeywordSet::new(["PVT", "LTD"]);
        assert_eq!(set.find_in("ACME LTD PVT"), Some("PVT"));
    }

    #[test]
    fn test_suffix_list_order_wins_over_text_order() {
        let suffixes = SuffixList::new([" LTD", " PVT"]);
        assert_eq!(
            suffixes.truncate_after_first("SWARAJ TRACTORS PVT LTD, PUNE ROAD"),
            "SWARAJ TRACTORS PVT LTD"
        );

        let suffixes = SuffixList::new([" PVT", " LTD"]);
        assert_eq!(
            suffixes.truncate_after_first("SWARAJ TRACTORS PVT LTD, PUNE ROAD"),
            "SWARAJ TRACTORS PVT"
        );
    }

    #[test]
    fn test_suffix_list_without_match() {
        let suffixes = SuffixList::new([" LTD"]);
        assert_eq!(suffixes.truncate_after_first("AGRO COMPANY"), "AGRO COMPANY");
    }
}
