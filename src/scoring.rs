//! Scoring-mode classification and penalty arithmetic.
//!
//! The upstream does not say whether a contest ranks ties by time and wrong
//! attempts, so the mode is guessed from the contest name. Educational rounds
//! and Div. 3 / Div. 4 rounds use ICPC-style penalty; other contests with the
//! same rules but different names are misclassified, and so are names that
//! happen to contain a marker (e.g. "Codeforces Round (Div. 1, based on
//! Education Olympiad)").
//!
//! Whitespace directly after "div." is dropped on both sides of the match, so
//! the `div.3` marker recognises the upstream's "Div. 3" spelling. Other
//! whitespace is kept, so words never run together into a marker.

use crate::constants::{DEFAULT_PENALTY_MARKERS, WRONG_ATTEMPT_PENALTY_SECONDS};
use crate::types::RawResultRow;

/// Decides whether a contest is penalty-based from its name
pub trait ScoringClassifier: Send + Sync {
    fn is_penalty_based(&self, contest_name: &str) -> bool;
}

/// Case-insensitive substring match against a list of markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringClassifier {
    markers: Vec<String>,
}

impl SubstringClassifier {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| normalize(m.as_ref()))
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for SubstringClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PENALTY_MARKERS)
    }
}

impl ScoringClassifier for SubstringClassifier {
    fn is_penalty_based(&self, contest_name: &str) -> bool {
        let name = normalize(contest_name);
        self.markers.iter().any(|marker| name.contains(marker.as_str()))
    }
}

/// Lowercase and join "div. 3" into "div.3"
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() && out.ends_with("div.") {
            continue;
        }
        out.push(c);
    }
    out
}

/// Solve time plus 20 minutes per rejected attempt, summed over solved problems
pub fn row_penalty(row: &RawResultRow) -> u64 {
    row.problem_results
        .iter()
        .filter(|problem| problem.is_solved())
        .map(|problem| {
            problem.best_submission_time_seconds.unwrap_or(0)
                + u64::from(problem.rejected_attempt_count) * WRONG_ATTEMPT_PENALTY_SECONDS
        })
        .sum()
}
