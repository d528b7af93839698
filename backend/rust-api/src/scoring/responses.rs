use std::collections::BTreeMap;

/// Counts submitted answers that match the key, ignoring case.
///
/// The key decides which questions are scored: submitted entries for
/// unknown questions are ignored and missing or empty answers simply score
/// nothing.
pub fn score_responses(
    submitted: &BTreeMap<String, String>,
    answer_key: &BTreeMap<String, String>,
) -> u32 {
    answer_key
        .iter()
        .filter(|(question, expected)| {
            submitted
                .get(question.as_str())
                .filter(|answer| !answer.is_empty())
                .is_some_and(|answer| answer.to_lowercase() == expected.to_lowercase())
        })
        .count() as u32
}
