//! End-to-end orchestration over a scripted transport: cache
//! short-circuiting, fatal standings failures, tolerated team failures,
//! and the series built from the resulting bundle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use gaffer::cache::{league_key, MemoryStore, TtlCache};
use gaffer::config::FetchConfig;
use gaffer::domain::{build_series, compute_form, Classification};
use gaffer::error::{Error, FetchError};
use gaffer::fetch::{ProxyChain, ProxyRoute, RetryPolicy, Transport};
use gaffer::orchestrator::Orchestrator;

const BASE: &str = "https://fantasy.premierleague.com/api";

type CallLog = Arc<Mutex<Vec<String>>>;

struct StubTransport {
    calls: CallLog,
    fail_substrings: Vec<&'static str>,
    standings: Value,
    histories: HashMap<u64, Value>,
}

impl StubTransport {
    fn new(standings: Value, histories: HashMap<u64, Value>) -> (Self, CallLog) {
        let calls = CallLog::default();
        let transport = Self {
            calls: Arc::clone(&calls),
            fail_substrings: Vec::new(),
            standings,
            histories,
        };
        (transport, calls)
    }

    fn failing_on(mut self, substring: &'static str) -> Self {
        self.fail_substrings.push(substring);
        self
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &str) -> Result<Value, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        if self.fail_substrings.iter().any(|s| url.contains(s)) {
            return Err(FetchError::Network {
                status: Some(429),
                message: "too many requests".into(),
            });
        }

        if url.contains("/standings/") {
            return Ok(self.standings.clone());
        }

        for (entry, history) in &self.histories {
            if url.contains(&format!("/entry/{entry}/")) {
                return Ok(history.clone());
            }
        }

        Err(FetchError::Network {
            status: Some(404),
            message: format!("no stub for {url}"),
        })
    }
}

fn standings_body() -> Value {
    json!({
        "league": { "name": "Sunday League" },
        "standings": { "results": [
            { "entry": 1, "entry_name": "A", "player_name": "Alice", "rank": 1,
              "total": 170, "event_total": 50, "event_transfers_cost": 0 },
            { "entry": 2, "entry_name": "B", "player_name": "Bea", "rank": 2,
              "total": 160, "event_total": 40, "event_transfers_cost": 4 },
            { "entry": 3, "entry_name": "C", "player_name": "Cal", "rank": 3,
              "total": 150, "event_total": 60, "event_transfers_cost": 0 },
        ]}
    })
}

fn history_body(weeks: &[(u32, i64, i64)]) -> Value {
    json!({
        "current": weeks.iter().map(|&(event, total_points, points)| json!({
            "event": event,
            "total_points": total_points,
            "points": points,
            "event_transfers_cost": 0,
        })).collect::<Vec<_>>()
    })
}

fn histories() -> HashMap<u64, Value> {
    HashMap::from([
        (1, history_body(&[(1, 60, 60), (2, 120, 60), (3, 170, 50)])),
        (2, history_body(&[(1, 55, 55), (2, 120, 65), (3, 160, 40)])),
        (3, history_body(&[(1, 40, 40), (2, 90, 50), (3, 150, 60)])),
    ])
}

fn orchestrator(
    transport: StubTransport,
    cache: Option<TtlCache<MemoryStore>>,
) -> Orchestrator<StubTransport, MemoryStore> {
    let pacing = FetchConfig::default();
    let chain = ProxyChain::new(
        transport,
        vec![ProxyRoute::Direct],
        RetryPolicy::new(
            pacing.max_attempts,
            Duration::from_millis(pacing.base_delay_ms),
        ),
    );
    Orchestrator::new(chain, cache, BASE, &pacing)
}

#[tokio::test(start_paused = true)]
async fn full_fetch_preserves_standings_order() {
    let (transport, calls) = StubTransport::new(standings_body(), histories());
    let orch = orchestrator(transport, None);

    let bundle = orch.fetch_league_data(862023).await.unwrap();

    assert_eq!(bundle.snapshot.league_name, "Sunday League");
    assert_eq!(bundle.snapshot.standings.len(), 3);
    assert_eq!(bundle.teams_history.len(), 3);

    let order: Vec<u64> = bundle.teams_history.iter().map(|h| h.entry).collect();
    assert_eq!(order, vec![1, 2, 3]);

    // Standings first, then histories in standings order.
    let urls = calls.lock().unwrap().clone();
    assert!(urls[0].contains("/leagues-classic/862023/standings/"));
    assert!(urls[1].contains("/entry/1/"));
    assert!(urls[2].contains("/entry/2/"));
    assert!(urls[3].contains("/entry/3/"));
}

#[tokio::test(start_paused = true)]
async fn failed_team_is_omitted_but_series_is_dense() {
    let (transport, _calls) = StubTransport::new(standings_body(), histories());
    let orch = orchestrator(transport.failing_on("/entry/2/"), None);

    let bundle = orch.fetch_league_data(862023).await.unwrap();

    // B's retries were exhausted; the run still completed.
    assert_eq!(bundle.teams_history.len(), 2);
    assert!(bundle.teams_history.iter().all(|h| h.entry != 2));

    let series = build_series(&bundle.snapshot.standings, &bundle.teams_history).unwrap();
    assert_eq!(series.len(), 3);
    for point in &series {
        assert_eq!(point.entries.len(), 3);
        let b = point.entries.iter().find(|e| e.entry == 2).unwrap();
        assert_eq!(b.total_points, 0);
        assert_eq!(b.rank, 3);
    }
}

#[tokio::test(start_paused = true)]
async fn standings_failure_aborts_before_any_history() {
    let (transport, calls) = StubTransport::new(standings_body(), histories());
    let orch = orchestrator(transport.failing_on("/standings/"), None);

    let err = orch.fetch_league_data(862023).await.unwrap_err();
    assert!(matches!(err, Error::Orchestration(_)));

    // Retries happened, but no team history was ever attempted.
    let urls = calls.lock().unwrap().clone();
    assert_eq!(urls.len(), 3);
    assert!(urls.iter().all(|u| u.contains("/standings/")));
}

#[tokio::test(start_paused = true)]
async fn cache_hit_skips_the_network() {
    let cache = TtlCache::new(MemoryStore::new(), Duration::from_secs(3600));
    let (transport, calls) = StubTransport::new(standings_body(), histories());
    let orch = orchestrator(transport, Some(cache));

    let first = orch.fetch_league_data(862023).await.unwrap();
    assert_eq!(calls.lock().unwrap().len(), 4); // standings + 3 histories

    let second = orch.fetch_league_data(862023).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(calls.lock().unwrap().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_cached_when_standings_fail() {
    let cache = TtlCache::new(MemoryStore::new(), Duration::from_secs(3600));
    let (transport, calls) = StubTransport::new(standings_body(), histories());
    let orch = orchestrator(transport.failing_on("/standings/"), Some(cache));

    assert!(orch.fetch_league_data(862023).await.is_err());
    let after_first = calls.lock().unwrap().len();

    // A second run goes back to the network rather than reading a
    // half-finished record.
    assert!(orch.fetch_league_data(862023).await.is_err());
    assert!(calls.lock().unwrap().len() > after_first);
}

#[tokio::test(start_paused = true)]
async fn form_follows_event_points_from_the_bundle() {
    let (transport, _calls) = StubTransport::new(standings_body(), histories());
    let orch = orchestrator(transport, None);

    let bundle = orch.fetch_league_data(862023).await.unwrap();
    let series = build_series(&bundle.snapshot.standings, &bundle.teams_history).unwrap();
    let form = compute_form(&bundle.snapshot.standings, &series);

    // GW3 scores are 50/40/60 (mean 50): A equal, B below, C above.
    assert_eq!(form[&1].last().unwrap().classification, Classification::Equal);
    assert_eq!(form[&2].last().unwrap().classification, Classification::Below);
    assert_eq!(form[&3].last().unwrap().classification, Classification::Above);
}

#[test]
fn cache_key_is_scoped_to_the_league() {
    assert_eq!(league_key(862023), "fpl_data_862023");
}
