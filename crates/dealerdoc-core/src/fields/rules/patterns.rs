//! Regex patterns for quotation field extraction.

use lazy_static::lazy_static;
use regex::Regex;

// Digits are ASCII only throughout extraction, matching `LineRule::HasDigit`
// and integer parsing.
lazy_static! {
    // Explicit power rating, e.g. "45HP" (text already upper-cased, spaces removed)
    pub static ref HORSE_POWER: Regex = Regex::new(r"([0-9]{2,3})HP").unwrap();

    // Truncated rating where the leading digit was lost, e.g. "H8" for "48HP"
    pub static ref HORSE_POWER_FALLBACK: Regex = Regex::new(r"H([0-9])").unwrap();

    // Maximal digit runs (length filtering happens in the extractor)
    pub static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();
}
