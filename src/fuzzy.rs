//! Fuzzy header/alias suggestions (C8): Damerau-Levenshtein edit distance
//! with a configurable threshold, plus a ranked fallback over many
//! candidates for option-alias suggestions.

/// The Damerau-Levenshtein edit distance between two strings (insertions,
/// deletions, substitutions, and adjacent transpositions each cost 1).
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (la, lb) = (a.len(), b.len());
    if la == 0 {
        return lb;
    }
    if lb == 0 {
        return la;
    }

    let mut d = vec![vec![0usize; lb + 2]; la + 2];
    let max_dist = la + lb;
    d[0][0] = max_dist;
    for i in 0..=la {
        d[i + 1][0] = max_dist;
        d[i + 1][1] = i;
    }
    for j in 0..=lb {
        d[0][j + 1] = max_dist;
        d[1][j + 1] = j;
    }

    let mut last_row: std::collections::HashMap<char, usize> = std::collections::HashMap::new();
    for i in 1..=la {
        let mut last_match_col = 0usize;
        for j in 1..=lb {
            let i1 = *last_row.get(&b[j - 1]).unwrap_or(&0);
            let j1 = last_match_col;
            let cost = if a[i - 1] == b[j - 1] {
                last_match_col = j;
                0
            } else {
                1
            };
            let deletion = d[i][j + 1] + 1;
            let insertion = d[i + 1][j] + 1;
            let substitution = d[i][j] + cost;
            let transposition = d[i1][j1] + (i - i1 - 1) + 1 + (j - j1 - 1);
            d[i + 1][j + 1] = deletion.min(insertion).min(substitution).min(transposition);
        }
        last_row.insert(a[i - 1], i);
    }
    d[la + 1][lb + 1]
}

/// The fuzzy-bound invariant: a suggestion is produced iff the edit
/// distance to the closest candidate is within `[1, threshold]`.
pub fn suggest(word: &str, candidates: &[String], threshold: u32) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;
    for c in candidates {
        let d = damerau_levenshtein(word, c);
        if d == 0 {
            continue;
        }
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, c.as_str()));
        }
    }
    best.filter(|(d, _)| *d >= 1 && *d as u32 <= threshold).map(|(_, c)| c.to_string())
}

/// A secondary, similarity-ranked suggestion over a larger candidate pool
/// (e.g. every option alias in a command), used when the primary
/// edit-distance threshold finds nothing but a softer hint is still
/// useful for completion.
pub fn best_ranked(word: &str, candidates: &[String]) -> Option<String> {
    if candidates.is_empty() {
        return None;
    }
    let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
    rust_fuzzy_search::fuzzy_search_best_n(word, &refs, 1)
        .into_iter()
        .next()
        .filter(|(_, score)| *score > 0.0)
        .map(|(s, _)| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_have_zero_distance() {
        assert_eq!(damerau_levenshtein("greet", "greet"), 0);
    }

    #[test]
    fn single_substitution_has_distance_one() {
        assert_eq!(damerau_levenshtein("greet", "great"), 1);
    }

    #[test]
    fn transposition_has_distance_one() {
        assert_eq!(damerau_levenshtein("ab", "ba"), 1);
    }

    #[test]
    fn suggest_respects_threshold() {
        let candidates = vec!["greet".to_string()];
        assert_eq!(suggest("greeting", &candidates, 2), None);
        assert_eq!(suggest("greett", &candidates, 2), Some("greet".to_string()));
    }

    #[test]
    fn suggest_never_suggests_exact_match() {
        let candidates = vec!["greet".to_string()];
        assert_eq!(suggest("greet", &candidates, 2), None);
    }
}
