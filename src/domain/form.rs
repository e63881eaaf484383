//! Rolling form signal: each team's last few gameweeks against the field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::league::TeamStanding;
use crate::domain::series::RankedGameweekPoint;

/// How many trailing gameweeks the form guide covers.
pub const FORM_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Above,
    Equal,
    Below,
}

/// One gameweek's verdict for one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMark {
    pub gameweek: u32,
    pub classification: Classification,
}

/// At most [`FORM_WINDOW`] marks, oldest first.
pub type FormSignal = Vec<FormMark>;

/// Classify every team's gameweek score against the field mean over the
/// last [`FORM_WINDOW`] points of `series`.
///
/// Strict inequality on both sides; a score exactly on the mean is
/// `Equal`. The comparison cross-multiplies instead of dividing so a
/// fractional mean never misclassifies through rounding.
#[must_use]
pub fn compute_form(
    standings: &[TeamStanding],
    series: &[RankedGameweekPoint],
) -> HashMap<u64, FormSignal> {
    let tail_start = series.len().saturating_sub(FORM_WINDOW);
    let tail = &series[tail_start..];

    let mut signals: HashMap<u64, FormSignal> = standings
        .iter()
        .map(|team| (team.entry, Vec::with_capacity(tail.len())))
        .collect();

    for point in tail {
        let field_size = point.entries.len() as i64;
        if field_size == 0 {
            continue;
        }
        let field_sum: i64 = point.entries.iter().map(|e| e.event_points).sum();

        for entry in &point.entries {
            let Some(signal) = signals.get_mut(&entry.entry) else {
                continue;
            };
            // entry.event_points <=> field_sum / field_size, exactly.
            let classification = match (entry.event_points * field_size).cmp(&field_sum) {
                std::cmp::Ordering::Greater => Classification::Above,
                std::cmp::Ordering::Equal => Classification::Equal,
                std::cmp::Ordering::Less => Classification::Below,
            };
            signal.push(FormMark {
                gameweek: point.gameweek,
                classification,
            });
        }
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::RankedEntry;

    fn standing(entry: u64) -> TeamStanding {
        TeamStanding {
            entry,
            entry_name: format!("team-{entry}"),
            player_name: String::new(),
            rank: 0,
            total: 0,
            event_total: 0,
            event_transfers_cost: 0,
        }
    }

    fn point(gameweek: u32, scores: &[(u64, i64)]) -> RankedGameweekPoint {
        RankedGameweekPoint {
            gameweek,
            entries: scores
                .iter()
                .enumerate()
                .map(|(i, &(entry, event_points))| RankedEntry {
                    entry,
                    rank: i as u32 + 1,
                    total_points: 0,
                    event_points,
                })
                .collect(),
        }
    }

    #[test]
    fn test_above_and_below_mean() {
        let standings = vec![standing(1), standing(2)];
        let series = vec![point(1, &[(1, 60), (2, 40)])];

        let form = compute_form(&standings, &series);
        assert_eq!(form[&1][0].classification, Classification::Above);
        assert_eq!(form[&2][0].classification, Classification::Below);
    }

    #[test]
    fn test_exact_mean_is_equal() {
        let standings = vec![standing(1), standing(2)];
        let series = vec![point(1, &[(1, 50), (2, 50)])];

        let form = compute_form(&standings, &series);
        assert_eq!(form[&1][0].classification, Classification::Equal);
        assert_eq!(form[&2][0].classification, Classification::Equal);
    }

    #[test]
    fn test_fractional_mean() {
        // Mean is 50.67; no integer score is ever Equal here.
        let standings = vec![standing(1), standing(2), standing(3)];
        let series = vec![point(1, &[(1, 51), (2, 50), (3, 51)])];

        let form = compute_form(&standings, &series);
        assert_eq!(form[&1][0].classification, Classification::Above);
        assert_eq!(form[&2][0].classification, Classification::Below);
        assert_eq!(form[&3][0].classification, Classification::Above);
    }

    #[test]
    fn test_window_keeps_last_five() {
        let standings = vec![standing(1), standing(2)];
        let series: Vec<_> = (1..=7)
            .map(|gw| point(gw, &[(1, 60), (2, 40)]))
            .collect();

        let form = compute_form(&standings, &series);
        let signal = &form[&1];
        assert_eq!(signal.len(), FORM_WINDOW);
        let gameweeks: Vec<u32> = signal.iter().map(|m| m.gameweek).collect();
        assert_eq!(gameweeks, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_empty_series_yields_empty_signals() {
        let standings = vec![standing(1)];
        let form = compute_form(&standings, &[]);
        assert!(form[&1].is_empty());
    }
}
