//! "Did you mean" support for feature names and document id checks.

/// Closest feature name to a misspelled `input`.
///
/// Spelling variants (`nearThresholdCount`, `near-threshold-count`) match
/// their snake_case form outright. Otherwise the candidate with the fewest
/// edits wins, as long as it needs at most a third of its length in edits.
pub(crate) fn suggest_feature<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let folded = fold_separators(input);
    if let Some(&exact) = candidates.iter().find(|c| fold_separators(c) == folded) {
        return Some(exact);
    }

    candidates
        .iter()
        .map(|&c| (c, edit_distance(&folded, &fold_separators(c))))
        .filter(|&(c, dist)| dist <= c.len() / 3)
        .min_by_key(|&(_, dist)| dist)
        .map(|(c, _)| c)
}

/// Lowercase and drop `_` / `-`, so naming conventions compare equal.
fn fold_separators(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Levenshtein distance over chars, single rolling row.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}

/// Document ids are lowercase alphanumeric words joined by single hyphens,
/// e.g. `scoring-default` or `features-jpy2`.
pub(crate) fn is_document_id(id: &str) -> bool {
    !id.is_empty()
        && id.split('-').all(|word| {
            !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}
