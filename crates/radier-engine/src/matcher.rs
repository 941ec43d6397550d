// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-to-region matching.
//
// Maps a natural-language erase command ("Remove invoice number") onto the
// regions the detector found. The default matcher is a small keyword rule
// table; anything smarter can be slotted in behind [`RegionMatcher`].

use radier_core::TextRegion;
use tracing::debug;

/// Selects which detected regions an erase command refers to.
///
/// Implementations must treat an empty selection as a normal outcome. A
/// region appears in the result at most once, in detection order.
pub trait RegionMatcher: Send + Sync {
    fn select(&self, regions: &[TextRegion], command: &str) -> Vec<TextRegion>;
}

/// Keyword family triggered when the command mentions invoices.
const INVOICE_TERMS: &[&str] = &["invoice", "inv", "bill"];
/// Keyword family for dates; bare years cover the common scanned range.
const DATE_TERMS: &[&str] = &["date", "2023", "2024"];
/// Keyword family for reference numbers.
const NUMBER_TERMS: &[&str] = &["no", "number", "#"];
/// A "name" is any short run of words.
const NAME_MAX_WORDS: usize = 3;

/// Rule-table matcher, case-insensitive, rules OR'd together.
///
/// | command contains      | region matches when                          |
/// |-----------------------|----------------------------------------------|
/// | `invoice`             | text contains `invoice`, `inv`, or `bill`    |
/// | `date`                | text contains `date`, `2023`, or `2024`      |
/// | `number`              | text contains `no`, `number`, or `#`         |
/// | `name`                | text has at most three words                 |
/// | `remove` and `text`   | always                                       |
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    fn matches(command: &str, text: &str) -> bool {
        if command.contains("invoice") && contains_any(text, INVOICE_TERMS) {
            return true;
        }
        if command.contains("date") && contains_any(text, DATE_TERMS) {
            return true;
        }
        if command.contains("number") && contains_any(text, NUMBER_TERMS) {
            return true;
        }
        if command.contains("name") && text.split_whitespace().count() <= NAME_MAX_WORDS {
            return true;
        }
        if command.contains("remove") && command.contains("text") {
            return true;
        }
        false
    }
}

impl RegionMatcher for KeywordMatcher {
    fn select(&self, regions: &[TextRegion], command: &str) -> Vec<TextRegion> {
        let command = command.to_lowercase();
        let selected: Vec<TextRegion> = regions
            .iter()
            .filter(|region| Self::matches(&command, &region.text.to_lowercase()))
            .cloned()
            .collect();
        debug!(
            candidates = regions.len(),
            selected = selected.len(),
            %command,
            "command matched regions"
        );
        selected
    }
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use radier_core::BoundingBox;

    fn region(text: &str, y: u32) -> TextRegion {
        TextRegion::new(BoundingBox::new(0, y, 50, y + 10), text, 0.8)
    }

    /// "Remove invoice number" picks the invoice line and leaves the total
    /// alone, and picks it exactly once even though two rules hit it.
    #[test]
    fn invoice_command_selects_only_invoice_region() {
        let regions = vec![region("Invoice No. 1234", 0), region("Total: $50", 20)];
        let selected = KeywordMatcher.select(&regions, "Remove invoice number");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].text, "Invoice No. 1234");
    }

    /// Matching is case-insensitive on both sides.
    #[test]
    fn matching_ignores_case() {
        let regions = vec![region("INVOICE 42", 0)];
        let selected = KeywordMatcher.select(&regions, "remove the Invoice");
        assert_eq!(selected.len(), 1);
    }

    /// Date commands match both the word and bare years.
    #[test]
    fn date_command_matches_years() {
        let regions = vec![region("12 March 2024", 0), region("Widgets x3", 20)];
        let selected = KeywordMatcher.select(&regions, "erase the date");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].text, "12 March 2024");
    }

    /// Name commands select short word runs only.
    #[test]
    fn name_command_selects_short_runs() {
        let regions = vec![
            region("Ada Lovelace", 0),
            region("A considerably longer line of descriptive text", 20),
        ];
        let selected = KeywordMatcher.select(&regions, "remove the name");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].text, "Ada Lovelace");
    }

    /// "remove" plus "text" is the catch-all; every region goes.
    #[test]
    fn remove_text_selects_everything() {
        let regions = vec![region("Invoice No. 1234", 0), region("Total: $50", 20)];
        let selected = KeywordMatcher.select(&regions, "remove all text");
        assert_eq!(selected.len(), 2);
    }

    /// A command with no matching rule selects nothing, and that is success.
    #[test]
    fn unmatched_command_selects_nothing() {
        let regions = vec![region("Invoice No. 1234", 0)];
        let selected = KeywordMatcher.select(&regions, "erase the watermark");
        assert!(selected.is_empty());
    }
}
