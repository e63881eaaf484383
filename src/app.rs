//! Pipeline assembly and terminal output.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::warn;

use crate::cache::{FileStore, TtlCache};
use crate::config::Config;
use crate::domain::{
    build_series, compute_form, Classification, FormSignal, RankedGameweekPoint, TeamHistory,
    TeamStanding,
};
use crate::error::Result;
use crate::fetch::{HttpTransport, ProxyChain, RetryPolicy};
use crate::orchestrator::Orchestrator;

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub league_id: u64,
    /// Dump the full view as JSON instead of a table.
    pub json: bool,
    /// Skip the response cache for this run.
    pub no_cache: bool,
}

/// Everything the presentation boundary consumes.
#[derive(Debug, Serialize)]
pub struct LeagueView {
    pub league_name: String,
    pub standings: Vec<TeamStanding>,
    pub teams_history: Vec<TeamHistory>,
    pub series: Vec<RankedGameweekPoint>,
    pub form: HashMap<u64, FormSignal>,
}

pub struct App;

impl App {
    pub async fn run(config: Config, options: AppOptions) -> Result<()> {
        let view = Self::build_view(&config, &options).await?;

        if options.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            render(&view);
        }

        Ok(())
    }

    async fn build_view(config: &Config, options: &AppOptions) -> Result<LeagueView> {
        let retry = RetryPolicy::from(&config.fetch);
        let fetcher = ProxyChain::new(
            HttpTransport::new(),
            config.network.proxies.clone(),
            retry,
        );

        let cache = if config.cache.enabled && !options.no_cache {
            open_cache(config)
        } else {
            None
        };

        let orchestrator = Orchestrator::new(
            fetcher,
            cache,
            config.network.api_url.clone(),
            &config.fetch,
        );

        let bundle = orchestrator.fetch_league_data(options.league_id).await?;
        let series = build_series(&bundle.snapshot.standings, &bundle.teams_history)?;
        let form = compute_form(&bundle.snapshot.standings, &series);

        Ok(LeagueView {
            league_name: bundle.snapshot.league_name,
            standings: bundle.snapshot.standings,
            teams_history: bundle.teams_history,
            series,
            form,
        })
    }
}

fn open_cache(config: &Config) -> Option<TtlCache<FileStore>> {
    let dir = config
        .cache
        .dir
        .clone()
        .or_else(|| dirs::cache_dir().map(|d| d.join("gaffer")))?;

    match FileStore::new(dir) {
        Ok(store) => Some(TtlCache::new(
            store,
            Duration::from_secs(config.cache.ttl_secs),
        )),
        Err(e) => {
            warn!(error = %e, "cache directory unavailable, running uncached");
            None
        }
    }
}

#[derive(Tabled)]
struct StandingRow {
    #[tabled(rename = "Rank")]
    rank: u32,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "Manager")]
    manager: String,
    #[tabled(rename = "Total")]
    total: i64,
    #[tabled(rename = "GW")]
    event_total: i64,
    #[tabled(rename = "Form")]
    form: String,
}

/// Form guide over the last gameweeks: `+` above the field mean, `=` on
/// it, `-` below it.
fn form_guide(signal: Option<&FormSignal>) -> String {
    signal
        .map(|marks| {
            marks
                .iter()
                .map(|m| match m.classification {
                    Classification::Above => '+',
                    Classification::Equal => '=',
                    Classification::Below => '-',
                })
                .collect()
        })
        .unwrap_or_default()
}

fn render(view: &LeagueView) {
    let gameweeks = view.series.len();
    println!(
        "{} — {} teams, {} gameweeks",
        view.league_name,
        view.standings.len(),
        gameweeks
    );

    let rows: Vec<StandingRow> = view
        .standings
        .iter()
        .map(|team| StandingRow {
            rank: team.rank,
            team: team.entry_name.clone(),
            manager: team.player_name.clone(),
            total: team.total,
            event_total: team.event_total,
            form: form_guide(view.form.get(&team.entry)),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
