//! Levenshtein-based "did you mean" suggestions.

/// Find the closest candidate, case-insensitively. Returns None when the best
/// edit distance exceeds half the longer string.
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    let (name, dist) = candidates
        .iter()
        .map(|&c| (c, levenshtein(&input_lower, &c.to_lowercase())))
        .min_by_key(|&(_, dist)| dist)?;

    let max_len = input.chars().count().max(name.chars().count());
    (dist <= max_len / 2).then_some(name)
}

/// Levenshtein edit distance between two strings.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev = (0..=b.len()).collect::<Vec<_>>();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
