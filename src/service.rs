use std::sync::Arc;
use tracing::{info, instrument};

use crate::client::{StandingsQuery, StandingsSource};
use crate::error::Result;
use crate::metrics::StandingsMetrics;
use crate::roster::Roster;
use crate::scoring::ScoringClassifier;
use crate::standings::{transform, StandingsView};
use crate::types::Contest;

/// Fetches upstream standings and shapes them for the local roster.
///
/// Holds only read-only collaborators, so one instance serves all requests.
#[derive(Clone)]
pub struct StandingsService {
    source: Arc<dyn StandingsSource>,
    roster: Arc<Roster>,
    classifier: Arc<dyn ScoringClassifier>,
    count: u32,
}

impl StandingsService {
    pub fn new(
        source: Arc<dyn StandingsSource>,
        roster: Roster,
        classifier: Arc<dyn ScoringClassifier>,
        count: u32,
    ) -> Self {
        Self {
            source,
            roster: Arc::new(roster),
            classifier,
            count,
        }
    }

    /// Full leaderboard with the roster's slice
    #[instrument(skip(self))]
    pub async fn standings(&self, contest_id: u64) -> Result<StandingsView> {
        let query = StandingsQuery::full(contest_id, self.count);
        self.fetch_and_transform(&query, "full").await
    }

    /// Leaderboard fetched for roster handles only, unofficial entries included.
    /// An empty roster falls back to the full leaderboard.
    #[instrument(skip(self))]
    pub async fn roster_standings(&self, contest_id: u64) -> Result<StandingsView> {
        if self.roster.is_empty() {
            info!("Roster is empty, fetching full standings");
            return self.standings(contest_id).await;
        }
        let query = StandingsQuery::for_handles(contest_id, self.count, self.roster.handles().to_vec());
        self.fetch_and_transform(&query, "roster").await
    }

    #[instrument(skip(self))]
    pub async fn contests(&self, gym: bool) -> Result<Vec<Contest>> {
        let contests = self.source.fetch_contests(gym).await?;
        info!(count = contests.len(), "Fetched contest list");
        Ok(contests)
    }

    async fn fetch_and_transform(
        &self,
        query: &StandingsQuery,
        scope: &'static str,
    ) -> Result<StandingsView> {
        let raw = self.source.fetch_standings(query).await?;
        let view = transform(&raw, &self.roster, self.classifier.as_ref());

        info!(
            contest_id = query.contest_id,
            contest = %view.contest_name,
            rows = view.global_standings.len(),
            roster_hits = view.roster_standings.len(),
            penalty_based = view.penalty_based,
            "Built standings"
        );
        StandingsMetrics::record_served(scope, view.global_standings.len(), view.roster_standings.len());
        Ok(view)
    }
}
