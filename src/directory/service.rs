//! Cached team directory service
//!
//! Owns the directory cache, loads it lazily from the injected store on
//! first use, writes it back after every new entry, and collapses
//! concurrent lookups for the same key into one request.

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use super::cache::{stats_key, DirectoryCache, TeamEntry, STATS_CACHE_KEY, TEAM_CACHE_KEY};
use super::client::DirectoryClient;
use super::{DirectoryError, QuickStats, TeamInfo};
use crate::storage::CacheStore;

type InFlight<T> = Shared<BoxFuture<'static, Option<T>>>;

/// Resolves team numbers; the seam the enrichment coordinator depends on
#[async_trait]
pub trait TeamLookup: Send + Sync {
    async fn get_team_info(&self, number: &str) -> Option<TeamInfo>;
}

/// Cache counts, for status output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheSummary {
    pub teams: usize,
    pub not_found: usize,
    pub stats: usize,
}

struct DirectoryInner {
    client: Arc<dyn DirectoryClient>,
    store: Option<Arc<dyn CacheStore>>,
    cache: Mutex<DirectoryCache>,
    loaded: OnceCell<()>,
    /// Serializes snapshot + write so the last write always holds every entry
    persist_lock: Mutex<()>,
    /// Bumped by `clear_cache`; requests started under an older generation
    /// do not record their results
    generation: AtomicU64,
    teams_in_flight: Mutex<HashMap<String, InFlight<TeamInfo>>>,
    stats_in_flight: Mutex<HashMap<String, InFlight<QuickStats>>>,
}

/// Team directory with affirmative, negative, and in-flight caching
#[derive(Clone)]
pub struct TeamDirectory {
    inner: Arc<DirectoryInner>,
}

impl TeamDirectory {
    /// Create a directory backed by a durable store
    pub fn new(client: Arc<dyn DirectoryClient>, store: Arc<dyn CacheStore>) -> Self {
        Self::build(client, Some(store))
    }

    /// Create a directory whose cache lives only as long as the process
    pub fn in_memory(client: Arc<dyn DirectoryClient>) -> Self {
        Self::build(client, None)
    }

    fn build(client: Arc<dyn DirectoryClient>, store: Option<Arc<dyn CacheStore>>) -> Self {
        Self {
            inner: Arc::new(DirectoryInner {
                client,
                store,
                cache: Mutex::new(DirectoryCache::new()),
                loaded: OnceCell::new(),
                persist_lock: Mutex::new(()),
                generation: AtomicU64::new(0),
                teams_in_flight: Mutex::new(HashMap::new()),
                stats_in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Look up a team.
    ///
    /// Returns `None` both for confirmed-absent numbers (cached) and for
    /// transient failures (not cached, retried on the next call).
    pub async fn get_team_info(&self, number: &str) -> Option<TeamInfo> {
        self.ensure_loaded().await;

        let lookup = {
            let mut in_flight = self.inner.teams_in_flight.lock();
            // Checked under the in-flight lock: a finishing request updates the
            // cache before it leaves the in-flight map
            if let Some(entry) = self.inner.cache.lock().team(number) {
                debug!("Team {} served from cache", number);
                return entry.clone().into_option();
            }

            in_flight
                .entry(number.to_string())
                .or_insert_with(|| {
                    let inner = self.inner.clone();
                    let number = number.to_string();
                    let generation = inner.generation.load(Ordering::SeqCst);
                    async move { inner.resolve_team(number, generation).await }
                        .boxed()
                        .shared()
                })
                .clone()
        };

        lookup.await
    }

    /// Look up quick stats for a team, for `season` or the current season.
    ///
    /// Missing stats are common for real teams, so a 404 is not cached.
    /// Season 0 means the current season.
    pub async fn get_quick_stats(&self, number: &str, season: Option<u32>) -> Option<QuickStats> {
        self.ensure_loaded().await;

        let season = season.filter(|s| *s != 0);

        let key = stats_key(number, season);
        let lookup = {
            let mut in_flight = self.inner.stats_in_flight.lock();
            if let Some(stats) = self.inner.cache.lock().stats(&key) {
                debug!("Stats {} served from cache", key);
                return Some(*stats);
            }

            in_flight
                .entry(key.clone())
                .or_insert_with(|| {
                    let inner = self.inner.clone();
                    let number = number.to_string();
                    let generation = inner.generation.load(Ordering::SeqCst);
                    async move { inner.resolve_stats(number, season, key, generation).await }
                        .boxed()
                        .shared()
                })
                .clone()
        };

        lookup.await
    }

    /// Drop every cached answer, in memory and in the store.
    ///
    /// Requests already in flight still answer their own callers, but their
    /// results are not recorded and later lookups fetch afresh.
    pub async fn clear_cache(&self) {
        // Load first so a later lazy load cannot resurrect cleared entries
        self.ensure_loaded().await;

        let _persist = self.inner.persist_lock.lock();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.teams_in_flight.lock().clear();
        self.inner.stats_in_flight.lock().clear();
        self.inner.cache.lock().clear();

        if let Some(store) = &self.inner.store {
            for key in [TEAM_CACHE_KEY, STATS_CACHE_KEY] {
                if let Err(e) = store.remove(key) {
                    warn!("Failed to remove persisted {}: {:#}", key, e);
                }
            }
        }
        info!("Directory cache cleared");
    }

    /// Current cache counts
    pub async fn cache_summary(&self) -> CacheSummary {
        self.ensure_loaded().await;

        let cache = self.inner.cache.lock();
        CacheSummary {
            teams: cache.found_count(),
            not_found: cache.not_found_count(),
            stats: cache.stats_count(),
        }
    }

    /// Load persisted state once per instance; concurrent callers wait on the first
    async fn ensure_loaded(&self) {
        self.inner
            .loaded
            .get_or_init(|| async { self.inner.load_from_store() })
            .await;
    }
}

#[async_trait]
impl TeamLookup for TeamDirectory {
    async fn get_team_info(&self, number: &str) -> Option<TeamInfo> {
        TeamDirectory::get_team_info(self, number).await
    }
}

impl DirectoryInner {
    fn load_from_store(&self) {
        let Some(store) = &self.store else {
            return;
        };

        let mut cache = self.cache.lock();

        match store.load(TEAM_CACHE_KEY) {
            Ok(Some(blob)) => {
                if let Err(e) = cache.load_teams(&blob) {
                    warn!("Ignoring corrupt team cache: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read team cache: {:#}", e),
        }

        match store.load(STATS_CACHE_KEY) {
            Ok(Some(blob)) => {
                if let Err(e) = cache.load_stats(&blob) {
                    warn!("Ignoring corrupt stats cache: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read stats cache: {:#}", e),
        }

        info!(
            "Loaded directory cache: {} teams, {} not found, {} stats",
            cache.found_count(),
            cache.not_found_count(),
            cache.stats_count()
        );
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn resolve_team(&self, number: String, generation: u64) -> Option<TeamInfo> {
        let result = match self.client.fetch_team(&number).await {
            Ok(team) => {
                self.record_team(&number, TeamEntry::Found(team.clone()), generation);
                Some(team)
            }
            Err(DirectoryError::NotFound) => {
                info!("Team {} not found", number);
                self.record_team(&number, TeamEntry::NotFound, generation);
                None
            }
            Err(e) => {
                error!("Error fetching team {}: {}", number, e);
                None
            }
        };

        // After a clear the map may already hold a newer request for this number
        let mut in_flight = self.teams_in_flight.lock();
        if self.is_current(generation) {
            in_flight.remove(&number);
        }
        result
    }

    async fn resolve_stats(
        &self,
        number: String,
        season: Option<u32>,
        key: String,
        generation: u64,
    ) -> Option<QuickStats> {
        let result = match self.client.fetch_quick_stats(&number, season).await {
            Ok(stats) => {
                self.record_stats(&key, stats, generation);
                Some(stats)
            }
            Err(DirectoryError::NotFound) => {
                info!("Quick stats not found for team {}", number);
                None
            }
            Err(e) => {
                error!("Error fetching quick stats for team {}: {}", number, e);
                None
            }
        };

        let mut in_flight = self.stats_in_flight.lock();
        if self.is_current(generation) {
            in_flight.remove(&key);
        }
        result
    }

    fn record_team(&self, number: &str, entry: TeamEntry, generation: u64) {
        let _persist = self.persist_lock.lock();
        if !self.is_current(generation) {
            debug!("Discarding team {} fetched before a cache clear", number);
            return;
        }
        let blob = {
            let mut cache = self.cache.lock();
            cache.insert_team(number, entry);
            cache.encode_teams()
        };
        self.persist(TEAM_CACHE_KEY, blob);
    }

    fn record_stats(&self, key: &str, stats: QuickStats, generation: u64) {
        let _persist = self.persist_lock.lock();
        if !self.is_current(generation) {
            debug!("Discarding stats {} fetched before a cache clear", key);
            return;
        }
        let blob = {
            let mut cache = self.cache.lock();
            cache.insert_stats(key, stats);
            cache.encode_stats()
        };
        self.persist(STATS_CACHE_KEY, blob);
    }

    /// Write a blob before the lookup returns.
    ///
    /// Store I/O blocks the calling thread, so on a multi-thread runtime the
    /// worker is handed off with `block_in_place` first.
    fn persist(&self, key: &str, blob: serde_json::Result<String>) {
        let Some(store) = &self.store else {
            return;
        };

        let save = |blob: String| match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| store.save(key, &blob))
            }
            _ => store.save(key, &blob),
        };
        let result = blob.map_err(anyhow::Error::from).and_then(save);
        if let Err(e) = result {
            warn!("Failed to persist {}: {:#}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StatLine;
    use crate::storage::MemoryStore;
    use futures_util::future::join_all;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone)]
    enum Canned {
        Team(TeamInfo),
        Stats(QuickStats),
        NotFound,
        Fail,
    }

    /// Directory fake that answers from a table and counts requests
    #[derive(Default)]
    struct FakeClient {
        answers: Mutex<HashMap<String, Canned>>,
        team_calls: AtomicUsize,
        stats_calls: AtomicUsize,
        delay: Option<Duration>,
        /// When set, each request waits for one permit before answering
        gate: Option<Arc<tokio::sync::Semaphore>>,
    }

    impl FakeClient {
        fn with(self, key: &str, answer: Canned) -> Self {
            self.set(key, answer);
            self
        }

        fn set(&self, key: &str, answer: Canned) {
            self.answers.lock().insert(key.to_string(), answer);
        }

        fn team_calls(&self) -> usize {
            self.team_calls.load(Ordering::SeqCst)
        }

        fn stats_calls(&self) -> usize {
            self.stats_calls.load(Ordering::SeqCst)
        }

        /// The answer is fixed when the request starts, not when it completes
        async fn answer(&self, key: &str) -> Canned {
            let answer = self.answers.lock().get(key).cloned().unwrap_or(Canned::NotFound);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(gate) = &self.gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }
            answer
        }
    }

    #[async_trait]
    impl DirectoryClient for FakeClient {
        async fn fetch_team(&self, number: &str) -> Result<TeamInfo, DirectoryError> {
            self.team_calls.fetch_add(1, Ordering::SeqCst);
            match self.answer(number).await {
                Canned::Team(team) => Ok(team),
                Canned::NotFound => Err(DirectoryError::NotFound),
                Canned::Fail => Err(DirectoryError::Status(500)),
                Canned::Stats(_) => Err(DirectoryError::Decode("wrong shape".to_string())),
            }
        }

        async fn fetch_quick_stats(
            &self,
            number: &str,
            season: Option<u32>,
        ) -> Result<QuickStats, DirectoryError> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            match self.answer(&stats_key(number, season)).await {
                Canned::Stats(stats) => Ok(stats),
                Canned::NotFound => Err(DirectoryError::NotFound),
                Canned::Fail => Err(DirectoryError::Transport("connection reset".to_string())),
                Canned::Team(_) => Err(DirectoryError::Decode("wrong shape".to_string())),
            }
        }
    }

    fn wpi() -> TeamInfo {
        TeamInfo::new("254", "WPI Robotics")
    }

    fn sample_stats() -> QuickStats {
        QuickStats {
            total: StatLine::new(101.25, 7),
            auto: StatLine::new(30.0, 2),
            driver_controlled: StatLine::new(50.0, 0),
            endgame: StatLine::new(21.25, 15),
        }
    }

    #[tokio::test]
    async fn test_not_found_is_negatively_cached() {
        let client = Arc::new(FakeClient::default());
        let directory = TeamDirectory::in_memory(client.clone());

        assert_eq!(directory.get_team_info("9999999").await, None);
        assert_eq!(directory.get_team_info("9999999").await, None);
        assert_eq!(client.team_calls(), 1);
    }

    #[tokio::test]
    async fn test_found_team_is_cached() {
        let client = Arc::new(FakeClient::default().with("254", Canned::Team(wpi())));
        let directory = TeamDirectory::in_memory(client.clone());

        let first = directory.get_team_info("254").await;
        let second = directory.get_team_info("254").await;
        assert_eq!(first, Some(wpi()));
        assert_eq!(second, first);
        assert_eq!(client.team_calls(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let client = Arc::new(FakeClient::default().with("254", Canned::Fail));
        let directory = TeamDirectory::in_memory(client.clone());

        assert_eq!(directory.get_team_info("254").await, None);
        assert_eq!(client.team_calls(), 1);

        client.set("254", Canned::Team(wpi()));
        assert_eq!(directory.get_team_info("254").await, Some(wpi()));
        assert_eq!(client.team_calls(), 2);

        assert_eq!(directory.cache_summary().await.teams, 1);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_request() {
        let client = Arc::new(FakeClient {
            delay: Some(Duration::from_millis(20)),
            ..Default::default()
        });
        client.set("254", Canned::Team(wpi()));
        let directory = TeamDirectory::in_memory(client.clone());

        let results = join_all((0..8).map(|_| directory.get_team_info("254"))).await;
        assert!(results.iter().all(|r| r.as_ref() == Some(&wpi())));
        assert_eq!(client.team_calls(), 1);

        // In-flight entry is gone once resolved
        assert!(directory.inner.teams_in_flight.lock().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_failures_are_not_sticky() {
        let client = Arc::new(FakeClient {
            delay: Some(Duration::from_millis(10)),
            ..Default::default()
        });
        client.set("254", Canned::Fail);
        let directory = TeamDirectory::in_memory(client.clone());

        let results = join_all((0..4).map(|_| directory.get_team_info("254"))).await;
        assert!(results.iter().all(Option::is_none));
        assert_eq!(client.team_calls(), 1);

        client.set("254", Canned::Team(wpi()));
        assert_eq!(directory.get_team_info("254").await, Some(wpi()));
        assert_eq!(client.team_calls(), 2);
    }

    #[tokio::test]
    async fn test_different_numbers_resolve_independently() {
        let client = Arc::new(
            FakeClient::default()
                .with("254", Canned::Team(wpi()))
                .with("1678", Canned::Fail),
        );
        let directory = TeamDirectory::in_memory(client.clone());

        let (a, b, c) = tokio::join!(
            directory.get_team_info("254"),
            directory.get_team_info("1678"),
            directory.get_team_info("31415"),
        );
        assert_eq!(a, Some(wpi()));
        assert_eq!(b, None);
        assert_eq!(c, None);
        assert_eq!(client.team_calls(), 3);

        let summary = directory.cache_summary().await;
        assert_eq!(summary, CacheSummary { teams: 1, not_found: 1, stats: 0 });
    }

    #[tokio::test]
    async fn test_every_new_entry_is_persisted() {
        let client = Arc::new(FakeClient::default().with("254", Canned::Team(wpi())));
        let store = Arc::new(MemoryStore::new());
        let directory = TeamDirectory::new(client.clone(), store.clone());

        directory.get_team_info("254").await;
        assert_eq!(store.writes(), 1);
        directory.get_team_info("9999999").await;
        assert_eq!(store.writes(), 2);

        // Cache hits do not write
        directory.get_team_info("254").await;
        directory.get_team_info("9999999").await;
        assert_eq!(store.writes(), 2);

        let blob = store.get(TEAM_CACHE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["254"]["name"], "WPI Robotics");
        assert!(value["9999999"].is_null());
    }

    #[tokio::test]
    async fn test_cache_survives_restart() {
        let store = Arc::new(MemoryStore::new());
        let first_client = Arc::new(
            FakeClient::default()
                .with("254", Canned::Team(wpi()))
                .with("254-current", Canned::Stats(sample_stats())),
        );
        let first = TeamDirectory::new(first_client, store.clone());
        first.get_team_info("254").await;
        first.get_team_info("9999999").await;
        first.get_quick_stats("254", None).await;

        let second_client = Arc::new(FakeClient::default());
        let second = TeamDirectory::new(second_client.clone(), store.clone());
        assert_eq!(second.get_team_info("254").await, Some(wpi()));
        assert_eq!(second.get_team_info("9999999").await, None);
        assert_eq!(second.get_quick_stats("254", None).await, Some(sample_stats()));
        assert_eq!(second_client.team_calls(), 0);
        assert_eq!(second_client.stats_calls(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_store_is_treated_as_empty() {
        let store = Arc::new(MemoryStore::new().with_blob(TEAM_CACHE_KEY, "{{not json"));
        let client = Arc::new(FakeClient::default().with("254", Canned::Team(wpi())));
        let directory = TeamDirectory::new(client.clone(), store.clone());

        assert_eq!(directory.get_team_info("254").await, Some(wpi()));
        assert_eq!(client.team_calls(), 1);
        // Overwritten with a valid blob
        let blob = store.get(TEAM_CACHE_KEY).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&blob).is_ok());
    }

    #[tokio::test]
    async fn test_quick_stats_cached_per_season() {
        let client = Arc::new(
            FakeClient::default()
                .with("254-current", Canned::Stats(sample_stats()))
                .with("254-2023", Canned::Stats(QuickStats::default())),
        );
        let directory = TeamDirectory::in_memory(client.clone());

        assert_eq!(directory.get_quick_stats("254", None).await, Some(sample_stats()));
        assert_eq!(directory.get_quick_stats("254", None).await, Some(sample_stats()));
        assert_eq!(client.stats_calls(), 1);

        assert_eq!(directory.get_quick_stats("254", Some(2023)).await, Some(QuickStats::default()));
        assert_eq!(client.stats_calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_stats_are_not_cached() {
        let client = Arc::new(FakeClient::default());
        let directory = TeamDirectory::in_memory(client.clone());

        assert_eq!(directory.get_quick_stats("254", None).await, None);
        assert_eq!(directory.get_quick_stats("254", None).await, None);
        assert_eq!(client.stats_calls(), 2);

        client.set("254-current", Canned::Fail);
        assert_eq!(directory.get_quick_stats("254", None).await, None);
        assert_eq!(client.stats_calls(), 3);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let client = Arc::new(
            FakeClient::default()
                .with("254", Canned::Team(wpi()))
                .with("254-current", Canned::Stats(sample_stats())),
        );
        let store = Arc::new(MemoryStore::new());
        let directory = TeamDirectory::new(client.clone(), store.clone());

        directory.get_team_info("254").await;
        directory.get_team_info("9999999").await;
        directory.get_quick_stats("254", None).await;
        assert_eq!(client.team_calls(), 2);

        directory.clear_cache().await;
        assert_eq!(directory.cache_summary().await, CacheSummary::default());
        assert!(store.get(TEAM_CACHE_KEY).is_none());
        assert!(store.get(STATS_CACHE_KEY).is_none());

        directory.get_team_info("254").await;
        directory.get_team_info("9999999").await;
        directory.get_quick_stats("254", None).await;
        assert_eq!(client.team_calls(), 4);
        assert_eq!(client.stats_calls(), 2);
    }

    async fn wait_for(calls: impl Fn() -> usize, expected: usize) {
        while calls() < expected {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_clear_cache_drops_in_flight_team_lookup() {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        let client = Arc::new(FakeClient {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        client.set("254", Canned::Team(TeamInfo::new("254", "Stale")));
        let store = Arc::new(MemoryStore::new());
        let directory = TeamDirectory::new(client.clone(), store.clone());

        let before = tokio::spawn({
            let directory = directory.clone();
            async move { directory.get_team_info("254").await }
        });
        wait_for(|| client.team_calls(), 1).await;

        directory.clear_cache().await;
        client.set("254", Canned::Team(wpi()));

        let after = tokio::spawn({
            let directory = directory.clone();
            async move { directory.get_team_info("254").await }
        });
        // The post-clear lookup issues its own request instead of joining the old one
        wait_for(|| client.team_calls(), 2).await;

        // Semaphore is FIFO: the pre-clear request completes first
        gate.add_permits(1);
        assert_eq!(before.await.unwrap().map(|t| t.name), Some("Stale".to_string()));
        assert!(store.get(TEAM_CACHE_KEY).is_none());
        assert_eq!(directory.cache_summary().await, CacheSummary::default());

        gate.add_permits(1);
        assert_eq!(after.await.unwrap(), Some(wpi()));
        let blob = store.get(TEAM_CACHE_KEY).unwrap();
        assert!(blob.contains("WPI Robotics"));
        assert!(!blob.contains("Stale"));

        assert_eq!(directory.get_team_info("254").await, Some(wpi()));
        assert_eq!(client.team_calls(), 2);
        assert!(directory.inner.teams_in_flight.lock().is_empty());
    }

    #[tokio::test]
    async fn test_clear_cache_drops_in_flight_stats_lookup() {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        let client = Arc::new(FakeClient {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        client.set("254-current", Canned::Stats(sample_stats()));
        let store = Arc::new(MemoryStore::new());
        let directory = TeamDirectory::new(client.clone(), store.clone());

        let before = tokio::spawn({
            let directory = directory.clone();
            async move { directory.get_quick_stats("254", None).await }
        });
        wait_for(|| client.stats_calls(), 1).await;
        directory.clear_cache().await;

        gate.add_permits(1);
        assert_eq!(before.await.unwrap(), Some(sample_stats()));
        assert!(store.get(STATS_CACHE_KEY).is_none());
        assert_eq!(directory.cache_summary().await.stats, 0);

        gate.add_permits(1);
        assert_eq!(directory.get_quick_stats("254", None).await, Some(sample_stats()));
        assert_eq!(client.stats_calls(), 2);
        assert!(store.get(STATS_CACHE_KEY).is_some());
    }

    #[tokio::test]
    async fn test_season_zero_means_current() {
        let client = Arc::new(FakeClient::default().with("254-current", Canned::Stats(sample_stats())));
        let directory = TeamDirectory::in_memory(client.clone());

        assert_eq!(directory.get_quick_stats("254", Some(0)).await, Some(sample_stats()));
        assert_eq!(directory.get_quick_stats("254", None).await, Some(sample_stats()));
        assert_eq!(client.stats_calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_file_store_writes_on_multi_thread_runtime() {
        let temp = tempfile::tempdir().unwrap();
        let store = Arc::new(crate::storage::FileStore::new(temp.path()).unwrap());
        let client = Arc::new(FakeClient::default().with("254", Canned::Team(wpi())));
        let directory = TeamDirectory::new(client, store.clone());

        let handle = tokio::spawn({
            let directory = directory.clone();
            async move { directory.get_team_info("254").await }
        });
        assert_eq!(handle.await.unwrap(), Some(wpi()));
        assert!(store.load(TEAM_CACHE_KEY).unwrap().unwrap().contains("WPI Robotics"));
    }

    #[tokio::test]
    async fn test_team_lookup_trait_object() {
        let client = Arc::new(FakeClient::default().with("254", Canned::Team(wpi())));
        let lookup: Arc<dyn TeamLookup> = Arc::new(TeamDirectory::in_memory(client));
        assert_eq!(lookup.get_team_info("254").await, Some(wpi()));
    }
}
