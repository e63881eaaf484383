//! League-agnostic data types and pure aggregation over them.
//!
//! Nothing in this module performs IO; the orchestrator produces a
//! [`LeagueBundle`](league::LeagueBundle) and everything here derives
//! views from it.

pub mod form;
pub mod league;
pub mod series;

pub use form::{compute_form, Classification, FormMark, FormSignal};
pub use league::{GameweekEntry, LeagueBundle, LeagueSnapshot, TeamHistory, TeamStanding};
pub use series::{build_series, RankedEntry, RankedGameweekPoint};
