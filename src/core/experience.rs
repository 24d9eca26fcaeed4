use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::models::WorkEntry;

static PLUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\+\s*years?").unwrap());
static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*-\s*(\d+)\s*years?").unwrap());
static MINIMUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:at least|minimum|min\.?)\s*(\d+)\s*years?").unwrap());
static BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*years?").unwrap());

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4})").unwrap());
static YEAR_MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{2})").unwrap());

/// Recognised shapes of a required-experience phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearsPattern {
    /// "3+ years"
    Plus,
    /// "2-4 years", lower bound taken
    Range,
    /// "at least 5 years", "minimum 2 years", "min. 1 year"
    Minimum,
    /// "4 years"
    Bare,
}

/// Evaluation order; the first pattern that matches decides
pub const YEARS_PATTERNS: [YearsPattern; 4] = [
    YearsPattern::Plus,
    YearsPattern::Range,
    YearsPattern::Minimum,
    YearsPattern::Bare,
];

impl YearsPattern {
    fn regex(self) -> &'static Regex {
        match self {
            YearsPattern::Plus => &PLUS_RE,
            YearsPattern::Range => &RANGE_RE,
            YearsPattern::Minimum => &MINIMUM_RE,
            YearsPattern::Bare => &BARE_RE,
        }
    }

    fn extract(self, caps: &Captures<'_>) -> Option<f64> {
        // Every pattern carries its threshold (or the range's lower bound) in group 1
        caps.get(1)?.as_str().parse::<f64>().ok()
    }

    /// Years required by `text` if this pattern matches it
    pub fn match_text(self, text: &str) -> Option<f64> {
        self.regex().captures(text).and_then(|caps| self.extract(&caps))
    }
}

/// Parse a free-text requirement into a year threshold, 0 when unrecognised
pub fn parse_required_years(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    YEARS_PATTERNS
        .iter()
        .find_map(|pattern| pattern.match_text(text))
        .unwrap_or(0.0)
}

fn parse_year(date: &str) -> Option<i32> {
    YEAR_RE.captures(date)?.get(1)?.as_str().parse().ok()
}

fn parse_year_month(date: &str) -> Option<(i32, i32)> {
    let caps = YEAR_MONTH_RE.captures(date)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    Some((year, month))
}

/// Duration of one work entry in years, never negative
///
/// Open-ended entries (`"present"` or empty end date) run to `current_year`
/// using whole years. Month precision is used only when both dates carry a
/// `YYYY-MM` component.
pub fn entry_duration_years(entry: &WorkEntry, current_year: i32) -> f64 {
    let start = entry.start_date.trim();
    let end = entry.end_date.trim();

    let Some(start_year) = parse_year(start) else {
        return 0.0;
    };

    let open_ended = end.is_empty() || end.eq_ignore_ascii_case("present");

    let years = if open_ended {
        (current_year - start_year) as f64
    } else {
        match (parse_year_month(start), parse_year_month(end)) {
            (Some((sy, sm)), Some((ey, em))) => ((ey * 12 + em) - (sy * 12 + sm)) as f64 / 12.0,
            _ => match parse_year(end) {
                Some(end_year) => (end_year - start_year) as f64,
                None => return 0.0,
            },
        }
    };

    years.max(0.0)
}

/// Total years across all work entries
pub fn candidate_years(entries: &[WorkEntry], current_year: i32) -> f64 {
    entries
        .iter()
        .map(|entry| entry_duration_years(entry, current_year))
        .sum()
}

/// Map candidate years against the requirement on the fixed ramp
///
/// | candidate years      | score                      |
/// |----------------------|----------------------------|
/// | >= required          | 100                        |
/// | >= 0.7 * required    | 70 + 30 * ratio            |
/// | >= 0.5 * required    | 50 + 20 * ratio            |
/// | > 0                  | 30 + 20 * ratio            |
/// | 0                    | 0                          |
pub fn ramp_score(candidate_years: f64, required_years: f64) -> f64 {
    if required_years <= 0.0 {
        return 100.0;
    }

    let ratio = candidate_years / required_years;

    if candidate_years >= required_years {
        100.0
    } else if candidate_years >= 0.7 * required_years {
        70.0 + 30.0 * ratio
    } else if candidate_years >= 0.5 * required_years {
        50.0 + 20.0 * ratio
    } else if candidate_years > 0.0 {
        30.0 + 20.0 * ratio
    } else {
        0.0
    }
}

/// Calculate the experience sub-score (0-100)
pub fn score_experience(required_text: &str, entries: &[WorkEntry], current_year: i32) -> f64 {
    let required_years = parse_required_years(required_text);
    if required_years <= 0.0 {
        return 100.0;
    }

    ramp_score(candidate_years(entries, current_year), required_years)
}
