//! Standings transformation.
//!
//! Turns one decoded `contest.standings` result into the global leaderboard,
//! the roster's slice of it, and the roster's mean score. Pure: no I/O and no
//! shared state, so it can run for concurrent requests without locking.

use serde::Serialize;
use tracing::debug;

use crate::roster::Roster;
use crate::scoring::{row_penalty, ScoringClassifier};
use crate::types::{RawResultRow, StandingsResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    /// Handle exactly as the upstream spells it
    pub handle: String,
    pub rank: u32,
    pub points: f64,
    /// Set for every participant of a penalty-based contest, for none otherwise
    pub penalty: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsView {
    pub contest_name: String,
    pub penalty_based: bool,
    /// Upstream row order
    pub global_standings: Vec<Participant>,
    /// Roster members from `global_standings`, same relative order
    pub roster_standings: Vec<Participant>,
    /// `None` when no roster member took part; distinct from an average of 0
    pub roster_average: Option<f64>,
}

pub fn transform(
    result: &StandingsResult,
    roster: &Roster,
    classifier: &dyn ScoringClassifier,
) -> StandingsView {
    let contest_name = result.contest.name.clone();
    let penalty_based = classifier.is_penalty_based(&contest_name);

    let global_standings: Vec<Participant> = result
        .rows
        .iter()
        .map(|row| participant(row, penalty_based))
        .collect();

    let roster_standings: Vec<Participant> = global_standings
        .iter()
        .filter(|p| roster.contains(&p.handle))
        .cloned()
        .collect();

    let roster_average = average_points(&roster_standings);

    debug!(
        contest_id = ?result.contest.id,
        contest = %contest_name,
        penalty_based,
        rows = global_standings.len(),
        roster_hits = roster_standings.len(),
        "Transformed standings"
    );

    StandingsView {
        contest_name,
        penalty_based,
        global_standings,
        roster_standings,
        roster_average,
    }
}

fn participant(row: &RawResultRow, penalty_based: bool) -> Participant {
    Participant {
        handle: row.party.lead().handle.clone(),
        rank: row.rank,
        points: row.points,
        penalty: penalty_based.then(|| row_penalty(row)),
    }
}

fn average_points(participants: &[Participant]) -> Option<f64> {
    if participants.is_empty() {
        return None;
    }
    let total: f64 = participants.iter().map(|p| p.points).sum();
    Some(round2(total / participants.len() as f64))
}

/// Round to two decimal places on the exact binary value, ties to even.
///
/// `{:.2}` formats the exact decimal expansion of the float, so 0.125 becomes
/// "0.12" and 0.625 becomes "0.62", while 1/3 still becomes "0.33".
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SubstringClassifier;
    use serde_json::json;

    fn result(name: &str, rows: serde_json::Value) -> StandingsResult {
        serde_json::from_value(json!({
            "contest": { "id": 1, "name": name },
            "rows": rows
        }))
        .unwrap()
    }

    fn row(handle: &str, rank: u32, points: f64) -> serde_json::Value {
        json!({
            "party": { "members": [{ "handle": handle }] },
            "rank": rank,
            "points": points,
            "problemResults": [
                { "points": points, "bestSubmissionTimeSeconds": 300, "rejectedAttemptCount": 0 }
            ]
        })
    }

    #[test]
    fn test_roster_keeps_global_order() {
        let r = result(
            "Good Bye 2023",
            json!([row("zed", 1, 900.0), row("Amy", 2, 700.0), row("bob", 2, 700.0), row("Cat", 4, 100.0)]),
        );
        let roster = Roster::new(["cat", "zed", "amy"]);
        let view = transform(&r, &roster, &SubstringClassifier::default());

        let handles: Vec<&str> = view.roster_standings.iter().map(|p| p.handle.as_str()).collect();
        assert_eq!(handles, ["zed", "Amy", "Cat"]);
        assert_eq!(view.roster_average, Some(566.67));
    }

    #[test]
    fn test_penalty_populated_for_every_row_or_none() {
        let rows = json!([row("a", 1, 3.0), row("b", 2, 0.0)]);

        let edu = transform(
            &result("Educational Codeforces Round 160", rows.clone()),
            &Roster::default(),
            &SubstringClassifier::default(),
        );
        assert!(edu.global_standings.iter().all(|p| p.penalty.is_some()));
        assert_eq!(edu.global_standings[0].penalty, Some(300));
        assert_eq!(edu.global_standings[1].penalty, Some(0));
        assert!(edu.penalty_based);

        let div2 = transform(
            &result("Codeforces Round 912 (Div. 2)", rows),
            &Roster::default(),
            &SubstringClassifier::default(),
        );
        assert!(div2.global_standings.iter().all(|p| p.penalty.is_none()));
        assert!(!div2.penalty_based);
    }

    #[test]
    fn test_zero_average_differs_from_absent() {
        let r = result("Good Bye 2023", json!([row("a", 1, 0.0)]));
        let hit = transform(&r, &Roster::new(["a"]), &SubstringClassifier::default());
        let miss = transform(&r, &Roster::new(["b"]), &SubstringClassifier::default());
        assert_eq!(hit.roster_average, Some(0.0));
        assert_eq!(miss.roster_average, None);
    }

    #[test]
    fn test_empty_rows() {
        let r = result("Codeforces Round 900 (Div. 3)", json!([]));
        let view = transform(&r, &Roster::new(["a"]), &SubstringClassifier::default());
        assert!(view.global_standings.is_empty());
        assert!(view.roster_standings.is_empty());
        assert_eq!(view.roster_average, None);
        assert!(view.penalty_based);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(500.0), 500.0);
    }

    #[test]
    fn test_round2_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(0.625), 0.62);
        assert_eq!(round2(2.675), 2.67);
    }
}
