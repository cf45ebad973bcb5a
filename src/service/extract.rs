//! CVE identifier extraction
//!
//! Scans free text for CVE identifiers and normalizes them to the canonical
//! `CVE-YYYY-NNNN+` form. Pure text processing; no external effects.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Matches `CVE-2024-12345` as well as loosely-spaced variants like
/// `CVE 2024 12345`. Sequence part must be at least 4 digits.
static CVE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)CVE(?:-|\s+)\d{4}(?:-|\s+)\d{4,}").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Extract all CVE identifiers from `text`, normalized and de-duplicated.
///
/// Normalization upper-cases and collapses internal whitespace runs to a
/// single dash, so every returned id matches `^CVE-\d{4}-\d{4,}$`. Order is
/// first occurrence. Returns an empty list when nothing matches.
pub fn extract_cve_ids(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for m in CVE_PATTERN.find_iter(text) {
        let id = WHITESPACE_RUN
            .replace_all(m.as_str(), "-")
            .to_uppercase();
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(id: &str) -> bool {
        Regex::new(r"^CVE-\d{4}-\d{4,}$").unwrap().is_match(id)
    }

    #[test]
    fn extracts_tight_format() {
        let ids = extract_cve_ids("Patch released for CVE-2024-12345 today");
        assert_eq!(ids, vec!["CVE-2024-12345"]);
    }

    #[test]
    fn extracts_loose_format() {
        let ids = extract_cve_ids("tracking cve 2023 44487 in the wild");
        assert_eq!(ids, vec!["CVE-2023-44487"]);
    }

    #[test]
    fn mixed_case_and_spacing_normalize_to_one_id() {
        let ids = extract_cve_ids("CVE-2021-44228, cve 2021   44228, Cve-2021-44228");
        assert_eq!(ids, vec!["CVE-2021-44228"]);
    }

    #[test]
    fn preserves_first_occurrence_order() {
        let ids = extract_cve_ids("CVE-2024-1111 then CVE-2023-2222 then CVE-2024-1111");
        assert_eq!(ids, vec!["CVE-2024-1111", "CVE-2023-2222"]);
    }

    #[test]
    fn rejects_short_sequence_numbers() {
        assert!(extract_cve_ids("CVE-2024-123 is not a valid id").is_empty());
    }

    #[test]
    fn empty_on_no_match() {
        assert!(extract_cve_ids("nothing to see here").is_empty());
        assert!(extract_cve_ids("").is_empty());
    }

    #[test]
    fn all_outputs_are_canonical() {
        let text = "CVE-2024-12345 cve 2019 0708 CVE  2020  1472 noise CVE-1999-99999";
        for id in extract_cve_ids(text) {
            assert!(canonical(&id), "not canonical: {id}");
        }
    }
}
