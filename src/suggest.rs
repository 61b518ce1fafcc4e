//! Approximate name matching used to enrich not-found messages.

/// Largest edit distance at which a candidate still counts as a suggestion.
pub const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Classic dynamic-programming edit distance with unit costs, over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Returns the candidates that contain `input`, are contained in it, or sit
/// within `MAX_SUGGESTION_DISTANCE` edits of it. Candidate order is kept.
pub fn suggest(input: &str, candidates: &[String]) -> Vec<String> {
    let needle = input.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| {
            let candidate = candidate.to_lowercase();
            candidate.contains(&needle)
                || needle.contains(&candidate)
                || levenshtein(&needle, &candidate) <= MAX_SUGGESTION_DISTANCE
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn starters() -> Vec<String> {
        vec!["pikachu".into(), "raichu".into(), "bulbasaur".into()]
    }

    #[rstest]
    #[case("pikachu", "pikachu", 0)]
    #[case("pikachuu", "pikachu", 1)]
    #[case("kitten", "sitting", 3)]
    #[case("", "eevee", 5)]
    #[case("snorlax", "", 7)]
    #[case("flaw", "lawn", 2)]
    fn test_levenshtein(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein(a, b), expected);
        assert_eq!(levenshtein(b, a), expected);
    }

    #[test]
    fn test_exact_name_is_suggested() {
        assert!(suggest("pikachu", &starters()).contains(&"pikachu".to_string()));
    }

    #[test]
    fn test_one_edit_away_is_suggested() {
        assert!(suggest("pikachuu", &starters()).contains(&"pikachu".to_string()));
    }

    #[test]
    fn test_unrelated_input_suggests_nothing() {
        assert!(suggest("zzz", &starters()).is_empty());
    }

    #[test]
    fn test_substring_match_in_both_directions() {
        // "chu" is contained in two candidates; "bulbasaurs" contains one
        assert_eq!(suggest("chu", &starters()), vec!["pikachu", "raichu"]);
        assert_eq!(suggest("bulbasaurs", &starters()), vec!["bulbasaur"]);
    }

    #[test]
    fn test_case_insensitive_and_order_preserved() {
        let candidates = vec!["Raichu".to_string(), "Pikachu".to_string()];
        assert_eq!(suggest("PIKACHU", &candidates), vec!["Pikachu"]);
        assert_eq!(suggest("CHU", &candidates), vec!["Raichu", "Pikachu"]);
    }
}
