/// How a single required skill was met by the candidate's skill list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillMatch {
    Exact,
    Partial,
    Missing,
}

impl SkillMatch {
    /// Contribution of this match toward the skill score (0-1)
    #[inline]
    pub fn weight(self) -> f64 {
        match self {
            SkillMatch::Exact => 1.0,
            SkillMatch::Partial => 0.5,
            SkillMatch::Missing => 0.0,
        }
    }
}

/// Classify one required skill against the candidate's skills
///
/// Exact wins over partial: a case-insensitive equality anywhere in the
/// list beats a substring hit (in either direction) earlier in the list.
pub fn classify_skill(required: &str, candidate_skills: &[String]) -> SkillMatch {
    let required = required.trim().to_lowercase();
    if required.is_empty() {
        return SkillMatch::Missing;
    }
    let candidates: Vec<String> = candidate_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if candidates.iter().any(|c| *c == required) {
        SkillMatch::Exact
    } else if candidates
        .iter()
        .any(|c| c.contains(required.as_str()) || required.contains(c.as_str()))
    {
        SkillMatch::Partial
    } else {
        SkillMatch::Missing
    }
}

/// Calculate the skills sub-score (0-100)
///
/// An empty requirement list is a vacuous match; blank entries on either
/// side are ignored. Compound candidate phrases may satisfy several
/// required skills at once; no dedup is applied.
pub fn score_skills(required: &[String], candidate_skills: &[String]) -> f64 {
    let required: Vec<&String> = required.iter().filter(|s| !s.trim().is_empty()).collect();
    if required.is_empty() {
        return 100.0;
    }

    let total: f64 = required
        .iter()
        .map(|skill| classify_skill(skill, candidate_skills).weight())
        .sum();

    (100.0 * total / required.len() as f64).min(100.0)
}
