use serde::{Deserialize, Serialize};

/// Wrapper every upstream response arrives in
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

/// `result` of a `contest.standings` call
#[derive(Debug, Clone, Deserialize)]
pub struct StandingsResult {
    pub contest: ContestMeta,
    pub rows: Vec<RawResultRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContestMeta {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

/// One participant row. The upstream omits zero-valued fields, so those default.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResultRow {
    pub party: Party,
    pub rank: u32,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub problem_results: Vec<ProblemResult>,
}

/// A contestant or team. Always has at least one member; teams are
/// represented by their first member.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "PartyRepr")]
pub struct Party {
    members: Vec<Member>,
}

#[derive(Deserialize)]
struct PartyRepr {
    members: Vec<Member>,
}

impl TryFrom<PartyRepr> for Party {
    type Error = String;

    fn try_from(repr: PartyRepr) -> Result<Self, Self::Error> {
        if repr.members.is_empty() {
            return Err("party has no members".to_string());
        }
        Ok(Party {
            members: repr.members,
        })
    }
}

impl Party {
    pub fn lead(&self) -> &Member {
        &self.members[0]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub handle: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemResult {
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub best_submission_time_seconds: Option<u64>,
    #[serde(default)]
    pub rejected_attempt_count: u32,
}

impl ProblemResult {
    pub fn is_solved(&self) -> bool {
        self.points > 0.0
    }
}

/// Entry of `contest.list`, passed through to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub start_time_seconds: Option<i64>,
    #[serde(default)]
    pub relative_time_seconds: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_defaults_for_omitted_fields() {
        let row: RawResultRow = serde_json::from_value(json!({
            "party": { "members": [{ "handle": "tourist" }] },
            "rank": 3,
            "problemResults": [{ "points": 0.0 }]
        }))
        .unwrap();

        assert_eq!(row.points, 0.0);
        assert_eq!(row.party.lead().handle, "tourist");
        assert_eq!(row.problem_results[0].best_submission_time_seconds, None);
        assert_eq!(row.problem_results[0].rejected_attempt_count, 0);
        assert!(!row.problem_results[0].is_solved());
    }

    #[test]
    fn test_team_is_led_by_first_member() {
        let row: RawResultRow = serde_json::from_value(json!({
            "party": { "members": [{ "handle": "first" }, { "handle": "second" }] },
            "rank": 1,
            "points": 10
        }))
        .unwrap();

        assert_eq!(row.party.lead().handle, "first");
    }

    #[test]
    fn test_missing_handle_is_rejected() {
        let result = serde_json::from_value::<RawResultRow>(json!({
            "party": { "members": [{ "participantType": "CONTESTANT" }] },
            "rank": 1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_party_is_rejected() {
        let result = serde_json::from_value::<RawResultRow>(json!({
            "party": { "members": [] },
            "rank": 1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_contest_id_is_optional() {
        let with_id: StandingsResult = serde_json::from_value(json!({
            "contest": { "id": 1915, "name": "Codeforces Round 918 (Div. 4)" },
            "rows": []
        }))
        .unwrap();
        assert_eq!(with_id.contest.id, Some(1915));

        let without_id: StandingsResult = serde_json::from_value(json!({
            "contest": { "name": "Good Bye 2023" },
            "rows": []
        }))
        .unwrap();
        assert_eq!(without_id.contest.id, None);
    }

    #[test]
    fn test_missing_contest_name_is_rejected() {
        let result = serde_json::from_value::<StandingsResult>(json!({
            "contest": { "id": 1 },
            "rows": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_contest_type_field_is_renamed() {
        let contest: Contest = serde_json::from_value(json!({
            "id": 1900,
            "name": "Codeforces Round 912 (Div. 2)",
            "type": "CF",
            "phase": "FINISHED",
            "frozen": false,
            "durationSeconds": 7200,
            "startTimeSeconds": 1701959700
        }))
        .unwrap();

        assert_eq!(contest.kind.as_deref(), Some("CF"));
        assert_eq!(contest.duration_seconds, Some(7200));
        assert_eq!(contest.relative_time_seconds, None);
    }
}
