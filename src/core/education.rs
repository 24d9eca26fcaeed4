use crate::models::EduEntry;

/// Ordinal education levels, matched as case-insensitive substrings
///
/// Order matters for requirements: the first keyword found in the
/// requirement text decides its level.
pub static EDUCATION_LEVELS: [(&str, u8); 6] = [
    ("high school", 1),
    ("associate", 2),
    ("bachelor", 3),
    ("master", 4),
    ("phd", 5),
    ("doctorate", 5),
];

/// Level assumed when a requirement names no known degree
pub const DEFAULT_REQUIRED_LEVEL: u8 = 3;

/// Level required by `text`, or `None` when the text is empty
pub fn required_level(text: &str) -> Option<u8> {
    let text = text.to_lowercase();
    if text.is_empty() {
        return None;
    }

    let level = EDUCATION_LEVELS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, level)| *level)
        .unwrap_or(DEFAULT_REQUIRED_LEVEL);

    Some(level)
}

/// Highest level named by any degree, 0 if none is recognised
pub fn candidate_level(entries: &[EduEntry]) -> u8 {
    entries
        .iter()
        .map(|entry| entry.degree.to_lowercase())
        .flat_map(|degree| {
            EDUCATION_LEVELS
                .iter()
                .filter(move |(keyword, _)| degree.contains(keyword))
                .map(|(_, level)| *level)
        })
        .max()
        .unwrap_or(0)
}

/// Calculate the education sub-score (0-100)
///
/// Neutral 50 when either side is missing; otherwise scored by how many
/// levels the candidate falls short.
pub fn score_education(required_text: &str, entries: &[EduEntry]) -> f64 {
    if entries.is_empty() {
        return 50.0;
    }
    let Some(required) = required_level(required_text) else {
        return 50.0;
    };

    let candidate = candidate_level(entries);

    if candidate >= required {
        100.0
    } else if candidate + 1 == required {
        75.0
    } else if candidate + 2 == required {
        50.0
    } else if candidate > 0 {
        25.0
    } else {
        0.0
    }
}
