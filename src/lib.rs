//! Gaffer - FPL mini-league standings and rank-history pipeline.
//!
//! This crate fetches a classic-league's standings and every member
//! team's gameweek history from the Fantasy Premier League API, then
//! turns the raw per-team histories into a dense, rank-ordered series
//! suitable for charting.
//!
//! # Architecture
//!
//! The fetch stack is layered, leaf-first:
//!
//! - **`fetch::transport`** - one HTTP GET, fixed headers, no retry
//! - **`fetch::retry`** - bounded retry with linear backoff
//! - **`fetch::proxy`** - ordered proxy fallback, full retry budget per route
//! - **`orchestrator`** - standings then per-team histories, paced to
//!   stay under the upstream's informal rate limits
//! - **`domain`** - pure aggregation: ranked gameweek series and the
//!   rolling form signal
//!
//! The TTL response cache sits beside the orchestrator as a
//! short-circuit: a fresh cached bundle means no network access at all.
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with production defaults
//! - [`domain`] - league types, series builder, form calculator
//! - [`error`] - error types for the crate
//! - [`fetch`] - transport, retry policy, proxy fallback
//! - [`cache`] - TTL cache over pluggable string stores
//! - [`orchestrator`] - the league fetch sequence
//! - [`app`] - pipeline assembly and terminal output

pub mod app;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod orchestrator;
