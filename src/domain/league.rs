//! Wire-shaped league types.
//!
//! Field names mirror the upstream FPL payloads so the structs double as
//! deserialization targets and as the cached/output representation.

use serde::{Deserialize, Serialize};

/// One row of the classic-league standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    /// Stable numeric team id, used for the history endpoint.
    pub entry: u64,
    pub entry_name: String,
    #[serde(default)]
    pub player_name: String,
    /// Current league rank as reported upstream.
    pub rank: u32,
    /// Cumulative season total.
    pub total: i64,
    /// This gameweek's score.
    #[serde(default)]
    pub event_total: i64,
    /// Transfer points deducted this gameweek.
    #[serde(default)]
    pub event_transfers_cost: i64,
}

/// Immutable result of one standings fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub league_name: String,
    /// Teams in upstream standings order.
    pub standings: Vec<TeamStanding>,
}

/// One gameweek of one team's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameweekEntry {
    /// Gameweek number, 1-based.
    pub event: u32,
    /// Cumulative points through this gameweek.
    pub total_points: i64,
    /// Points scored this gameweek.
    pub points: i64,
    #[serde(default)]
    pub event_transfers_cost: i64,
}

impl GameweekEntry {
    /// Gameweek score net of transfer deductions.
    #[must_use]
    pub fn net_points(&self) -> i64 {
        self.points - self.event_transfers_cost
    }
}

/// One team's full, chronologically ordered history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamHistory {
    pub entry: u64,
    pub entry_name: String,
    pub history: Vec<GameweekEntry>,
}

/// Everything one successful orchestrator run produces. This is the unit
/// that is cached and handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueBundle {
    pub snapshot: LeagueSnapshot,
    /// Histories for teams whose fetch succeeded, in standings order.
    /// Teams may be missing here; consumers treat them as all-zero.
    pub teams_history: Vec<TeamHistory>,
}

/// Upstream standings payload: `{ league: { name }, standings: { results } }`.
#[derive(Debug, Deserialize)]
pub struct StandingsResponse {
    pub league: LeagueInfo,
    pub standings: StandingsPage,
}

#[derive(Debug, Deserialize)]
pub struct LeagueInfo {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct StandingsPage {
    pub results: Vec<TeamStanding>,
}

impl From<StandingsResponse> for LeagueSnapshot {
    fn from(resp: StandingsResponse) -> Self {
        Self {
            league_name: resp.league.name,
            standings: resp.standings.results,
        }
    }
}

/// Upstream history payload: `{ current: [GameweekEntry] }`.
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub current: Vec<GameweekEntry>,
}
