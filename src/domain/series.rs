//! Dense, rank-ordered gameweek series built from raw team histories.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::league::{TeamHistory, TeamStanding};
use crate::error::SeriesError;

/// One team's position at one gameweek.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub entry: u64,
    /// 1..=N, dense within each gameweek.
    pub rank: u32,
    /// Cumulative total through this gameweek (0 when no history entry).
    pub total_points: i64,
    /// This gameweek's score (0 when no history entry).
    pub event_points: i64,
}

/// One gameweek with every team ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedGameweekPoint {
    pub gameweek: u32,
    pub entries: Vec<RankedEntry>,
}

/// Build one point per gameweek from 1 to the maximum gameweek observed
/// across all histories.
///
/// Every point contains every team from `standings`, even teams with no
/// history at all or with gaps: a missing entry counts as cumulative 0.
/// Teams are sorted by descending cumulative total; the sort is stable
/// over standings order, so ties and repeated runs rank identically.
pub fn build_series(
    standings: &[TeamStanding],
    histories: &[TeamHistory],
) -> Result<Vec<RankedGameweekPoint>, SeriesError> {
    if standings.is_empty() {
        return Err(SeriesError::NoTeams);
    }

    let max_gameweek = histories
        .iter()
        .flat_map(|h| h.history.iter().map(|e| e.event))
        .max()
        .ok_or(SeriesError::EmptyHistory)?;

    let by_entry: HashMap<u64, &TeamHistory> =
        histories.iter().map(|h| (h.entry, h)).collect();

    let series = (1..=max_gameweek)
        .map(|gameweek| {
            let mut entries: Vec<RankedEntry> = standings
                .iter()
                .map(|team| {
                    let (total_points, event_points) = by_entry
                        .get(&team.entry)
                        .and_then(|h| h.history.iter().find(|e| e.event == gameweek))
                        .map_or((0, 0), |e| (e.total_points, e.points));

                    RankedEntry {
                        entry: team.entry,
                        rank: 0,
                        total_points,
                        event_points,
                    }
                })
                .collect();

            // Stable sort: equal totals keep standings order.
            entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
            for (i, entry) in entries.iter_mut().enumerate() {
                entry.rank = i as u32 + 1;
            }

            RankedGameweekPoint { gameweek, entries }
        })
        .collect();

    Ok(series)
}
