//! "Did you mean" support for unmatched command tokens.

use strsim::levenshtein;

/// Edit-distance ceiling: anything farther than this is noise, not a typo.
const MAX_DISTANCE: usize = 2;

/// Closest candidate to `input` within the distance ceiling, comparing
/// case-insensitively. Ties keep the earlier candidate.
#[must_use]
pub fn closest(input: &str, candidates: &[String]) -> Option<String> {
    let needle = input.to_lowercase();
    let mut best: Option<(usize, &String)> = None;
    for candidate in candidates {
        let distance = levenshtein(&needle, &candidate.to_lowercase());
        if distance <= MAX_DISTANCE && best.is_none_or(|(seen, _)| distance < seen) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, candidate)| candidate.clone())
}

// =========================================
// Tests
// =========================================
