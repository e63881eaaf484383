//! League fetch orchestration: one standings request, then one history
//! request per team, strictly sequential.
//!
//! The inter-request delays are the rate-limit contract with the
//! upstream; team fetches must never run concurrently.

use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::cache::{league_key, Store, TtlCache};
use crate::config::FetchConfig;
use crate::domain::league::{HistoryResponse, StandingsResponse};
use crate::domain::{LeagueBundle, LeagueSnapshot, TeamHistory};
use crate::error::{Error, FetchError, Result};
use crate::fetch::{ProxyChain, Transport};

pub struct Orchestrator<T, S> {
    fetcher: ProxyChain<T>,
    cache: Option<TtlCache<S>>,
    base_url: String,
    settle_delay: Duration,
    team_delay: Duration,
}

impl<T: Transport, S: Store> Orchestrator<T, S> {
    pub fn new(
        fetcher: ProxyChain<T>,
        cache: Option<TtlCache<S>>,
        base_url: impl Into<String>,
        pacing: &FetchConfig,
    ) -> Self {
        Self {
            fetcher,
            cache,
            base_url: base_url.into(),
            settle_delay: Duration::from_millis(pacing.settle_delay_ms),
            team_delay: Duration::from_millis(pacing.team_delay_ms),
        }
    }

    /// Fetch a league's standings and every member's history.
    ///
    /// A cache hit short-circuits without any network access. A standings
    /// failure is fatal; a team whose history fetch exhausts its retries
    /// is omitted from the bundle and the run continues. Only a fully
    /// completed run is written back to the cache.
    pub async fn fetch_league_data(&self, league_id: u64) -> Result<LeagueBundle> {
        let key = league_key(league_id);

        if let Some(cache) = &self.cache {
            if let Some(bundle) = cache.get::<LeagueBundle>(&key) {
                info!(league_id, "serving cached league data");
                return Ok(bundle);
            }
        }

        let snapshot = self.fetch_standings(league_id).await?;
        info!(
            league = %snapshot.league_name,
            teams = snapshot.standings.len(),
            "fetched standings"
        );

        // Separate the standings burst from the per-team burst.
        sleep(self.settle_delay).await;

        let mut teams_history = Vec::with_capacity(snapshot.standings.len());
        for team in &snapshot.standings {
            sleep(self.team_delay).await;

            match self.fetch_history(team.entry).await {
                Ok(history) => {
                    info!(entry = team.entry, team = %team.entry_name, gameweeks = history.len(), "fetched history");
                    teams_history.push(TeamHistory {
                        entry: team.entry,
                        entry_name: team.entry_name.clone(),
                        history,
                    });
                }
                Err(err) => {
                    warn!(entry = team.entry, team = %team.entry_name, error = %err, "history fetch failed, omitting team");
                }
            }
        }

        let bundle = LeagueBundle {
            snapshot,
            teams_history,
        };

        if let Some(cache) = &self.cache {
            cache.put(&key, &bundle);
        }

        Ok(bundle)
    }

    async fn fetch_standings(&self, league_id: u64) -> Result<LeagueSnapshot> {
        let url = format!("{}/leagues-classic/{league_id}/standings/", self.base_url);

        let body = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| Error::Orchestration(Box::new(e)))?;

        let response: StandingsResponse = decode(body)
            .map_err(|e| Error::Orchestration(Box::new(e)))?;

        Ok(response.into())
    }

    async fn fetch_history(&self, entry: u64) -> std::result::Result<Vec<crate::domain::GameweekEntry>, FetchError> {
        let url = format!("{}/entry/{entry}/history/", self.base_url);

        let body = self.fetcher.fetch(&url).await?;
        let response: HistoryResponse = decode(body)?;
        Ok(response.current)
    }
}

fn decode<R: serde::de::DeserializeOwned>(body: Value) -> std::result::Result<R, FetchError> {
    serde_json::from_value(body).map_err(|e| FetchError::MalformedBody(e.to_string()))
}
