//! Offline asset cache
//!
//! A background worker that sits between the session and the network.
//! On install it seeds the static store with the application shell; on
//! activation it claims control, purging stores left behind by earlier
//! versions. Requests are routed through an ordered rule table and served
//! by one of six strategies.

pub mod fetch;
pub mod store;
pub mod strategy;

pub use fetch::{FetchedResponse, Fetcher, HttpFetcher};
pub use store::{CacheStore, EntryInfo, ResponseSnapshot, CURRENT_STORES, DYNAMIC_STORE, STATIC_STORE};
pub use strategy::{CacheRequest, ResourceKind, RoutingTable, Strategy};

use crate::error::{VibesError, VibesResult};
use futures_util::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Version tag written to the claim file by the active worker
const CACHE_VERSION: &str = "v1";

/// Name of the claim file at the cache root
const CLAIM_FILE: &str = "controller";

/// Lifecycle phase of the cache worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Stores seeded, not yet controlling requests
    Installed,
    /// A different version still holds the claim
    Waiting,
    /// Controlling requests for this version
    Active,
}

/// Control messages accepted by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Take over immediately instead of waiting for the old claim to clear
    SkipWaiting,
    /// Bulk-seed the dynamic store with the given URLs, best effort
    CacheUrls(Vec<String>),
}

pub struct CacheWorker {
    root: PathBuf,
    static_store: CacheStore,
    dynamic_store: CacheStore,
    fetcher: Arc<dyn Fetcher>,
    table: RoutingTable,
    phase: WorkerPhase,
}

impl CacheWorker {
    pub fn new(root: impl Into<PathBuf>, fetcher: Arc<dyn Fetcher>, table: RoutingTable) -> Self {
        let root = root.into();
        Self {
            static_store: CacheStore::open(&root, STATIC_STORE),
            dynamic_store: CacheStore::open(&root, DYNAMIC_STORE),
            root,
            fetcher,
            table,
            phase: WorkerPhase::Installed,
        }
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    pub fn static_store(&self) -> &CacheStore {
        &self.static_store
    }

    pub fn dynamic_store(&self) -> &CacheStore {
        &self.dynamic_store
    }

    /// Seed the static store with the application shell. Individual
    /// failures are logged and skipped; install succeeds as long as the
    /// root directory can be created. Returns how many shell assets were
    /// cached.
    pub async fn install(&mut self) -> VibesResult<usize> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| VibesError::CacheStoreCreate {
                name: STATIC_STORE.to_string(),
                reason: e.to_string(),
            })?;

        let urls: Vec<String> = self.table.shell_urls().to_vec();
        let seeded = self.seed(&self.static_store, &urls).await?;

        self.phase = WorkerPhase::Installed;
        info!("Cache installed with {seeded} shell assets");
        Ok(seeded)
    }

    /// Fetch each URL into `store`, skipping failures. Returns how many
    /// landed.
    async fn seed(&self, store: &CacheStore, urls: &[String]) -> VibesResult<usize> {
        let jobs = urls.iter().map(|url| {
            let fetcher = Arc::clone(&self.fetcher);
            let store = store.clone();
            let url = url.clone();
            async move {
                match fetcher.fetch(&url).await {
                    Ok(resp) if resp.ok() => {
                        let snap = ResponseSnapshot {
                            url: url.clone(),
                            status: resp.status,
                            content_type: resp.content_type,
                            body: resp.body,
                        };
                        store.put(&snap).await.map(|()| true)
                    }
                    Ok(resp) => {
                        warn!("Skipping asset {url}: status {}", resp.status);
                        Ok(false)
                    }
                    Err(e) => {
                        warn!("Skipping asset {url}: {e}");
                        Ok(false)
                    }
                }
            }
        });

        let mut seeded = 0;
        for result in join_all(jobs).await {
            if result? {
                seeded += 1;
            }
        }
        Ok(seeded)
    }

    /// Try to claim control. If a different version already holds the
    /// claim the worker parks in `Waiting` until told to skip; otherwise
    /// stale stores are purged and the claim is rewritten.
    pub async fn try_activate(&mut self) -> VibesResult<WorkerPhase> {
        let claim_path = self.root.join(CLAIM_FILE);
        if let Ok(existing) = fs::read_to_string(&claim_path).await {
            if existing.trim() != CACHE_VERSION {
                debug!("Claim held by {}, waiting", existing.trim());
                self.phase = WorkerPhase::Waiting;
                return Ok(self.phase);
            }
        }
        self.activate().await?;
        Ok(self.phase)
    }

    /// Deliver a control message
    pub async fn on_message(&mut self, message: WorkerMessage) -> VibesResult<()> {
        match message {
            WorkerMessage::SkipWaiting => {
                if self.phase != WorkerPhase::Active {
                    self.activate().await?;
                }
            }
            WorkerMessage::CacheUrls(urls) => {
                let seeded = self.seed(&self.dynamic_store, &urls).await?;
                info!("Seeded {seeded} of {} requested URLs", urls.len());
            }
        }
        Ok(())
    }

    async fn activate(&mut self) -> VibesResult<()> {
        for name in store::list_store_dirs(&self.root).await? {
            if !CURRENT_STORES.contains(&name.as_str()) {
                info!("Purging stale cache store {name}");
                let _ = fs::remove_dir_all(self.root.join(&name)).await;
            }
        }

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| VibesError::io("creating cache root", e))?;
        fs::write(self.root.join(CLAIM_FILE), CACHE_VERSION)
            .await
            .map_err(|e| VibesError::io("writing cache claim", e))?;

        self.phase = WorkerPhase::Active;
        info!("Cache worker active ({CACHE_VERSION})");
        Ok(())
    }

    /// Serve a request through the routing table
    pub async fn handle(&self, request: &CacheRequest) -> VibesResult<FetchedResponse> {
        match self.table.route(request) {
            Strategy::Passthrough => self.fetcher.fetch(&request.url).await,
            Strategy::BootstrapNetworkOnly => match self.fetcher.fetch(&request.url).await {
                Ok(resp) => Ok(resp),
                Err(e) => {
                    warn!("Bootstrap unreachable, serving empty script: {e}");
                    Ok(fetch::empty_script())
                }
            },
            Strategy::NetworkWithPlaceholder => match self.fetcher.fetch(&request.url).await {
                Ok(resp) => Ok(resp),
                Err(e) => {
                    debug!("Media {} unreachable, serving placeholder: {e}", request.url);
                    Ok(match request.kind {
                        ResourceKind::Video => fetch::video_placeholder(),
                        _ => fetch::image_placeholder(),
                    })
                }
            },
            Strategy::NetworkFirst => self.network_first(request).await,
            Strategy::CacheFirst => self.cache_first(request).await,
            Strategy::StaleWhileRevalidate => self.stale_while_revalidate(request).await,
        }
    }

    async fn cache_first(&self, request: &CacheRequest) -> VibesResult<FetchedResponse> {
        if let Some(snap) = self.static_store.get(&request.url).await? {
            return Ok(snapshot_response(snap));
        }

        match self.fetcher.fetch(&request.url).await {
            Ok(resp) => {
                if resp.ok() {
                    self.static_store
                        .put(&response_snapshot(&request.url, &resp))
                        .await?;
                }
                Ok(resp)
            }
            Err(e) => {
                // Offline navigation falls back to the cached shell root
                if request.kind == ResourceKind::Document {
                    if let Some(snap) = self.static_store.get(self.table.root_url()).await? {
                        debug!("Serving cached shell root for {}", request.url);
                        return Ok(snapshot_response(snap));
                    }
                }
                Err(e)
            }
        }
    }

    async fn network_first(&self, request: &CacheRequest) -> VibesResult<FetchedResponse> {
        match self.fetcher.fetch(&request.url).await {
            Ok(resp) => {
                if resp.ok() {
                    self.dynamic_store
                        .put(&response_snapshot(&request.url, &resp))
                        .await?;
                }
                Ok(resp)
            }
            Err(e) => match self.dynamic_store.get(&request.url).await? {
                Some(snap) => {
                    debug!("Network failed for {}, serving cached copy", request.url);
                    Ok(snapshot_response(snap))
                }
                None => Err(e),
            },
        }
    }

    async fn stale_while_revalidate(&self, request: &CacheRequest) -> VibesResult<FetchedResponse> {
        let cached = self.dynamic_store.get(&request.url).await?;

        match cached {
            Some(snap) => {
                let fetcher = Arc::clone(&self.fetcher);
                let store = self.dynamic_store.clone();
                let url = request.url.clone();
                tokio::spawn(async move {
                    match fetcher.fetch(&url).await {
                        Ok(resp) if resp.ok() => {
                            if let Err(e) = store.put(&response_snapshot(&url, &resp)).await {
                                warn!("Background refresh of {url} failed to store: {e}");
                            }
                        }
                        Ok(resp) => debug!("Background refresh of {url}: status {}", resp.status),
                        Err(e) => debug!("Background refresh of {url} failed: {e}"),
                    }
                });
                Ok(snapshot_response(snap))
            }
            None => {
                let resp = self.fetcher.fetch(&request.url).await?;
                if resp.ok() {
                    self.dynamic_store
                        .put(&response_snapshot(&request.url, &resp))
                        .await?;
                }
                Ok(resp)
            }
        }
    }

    /// Drop dynamic entries older than the retention window. Shell assets
    /// are exempt; they are replaced wholesale on version bumps.
    pub async fn gc(&self, days: u32) -> VibesResult<usize> {
        self.dynamic_store.remove_older_than(days).await
    }

    /// Remove both stores and the claim
    pub async fn clear(&mut self) -> VibesResult<()> {
        self.static_store.clear().await?;
        self.dynamic_store.clear().await?;
        let _ = fs::remove_file(self.root.join(CLAIM_FILE)).await;
        self.phase = WorkerPhase::Installed;
        Ok(())
    }
}

fn response_snapshot(url: &str, resp: &FetchedResponse) -> ResponseSnapshot {
    ResponseSnapshot {
        url: url.to_string(),
        status: resp.status,
        content_type: resp.content_type.clone(),
        body: resp.body.clone(),
    }
}

fn snapshot_response(snap: ResponseSnapshot) -> FetchedResponse {
    FetchedResponse {
        status: snap.status,
        content_type: snap.content_type,
        body: snap.body,
    }
}

/// Claim-file check without constructing a worker, for status display
pub async fn controller_version(root: &Path) -> Option<String> {
    fs::read_to_string(root.join(CLAIM_FILE))
        .await
        .ok()
        .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AssetsConfig;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Deterministic fetcher with per-URL canned responses and call counts
    struct MockFetcher {
        responses: Mutex<HashMap<String, VibesResult<FetchedResponse>>>,
        calls: Mutex<HashMap<String, usize>>,
        total: AtomicUsize,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                calls: Mutex::new(HashMap::new()),
                total: AtomicUsize::new(0),
            }
        }

        fn respond(&self, url: &str, body: &[u8]) {
            self.responses.lock().unwrap().insert(
                url.to_string(),
                Ok(FetchedResponse {
                    status: 200,
                    content_type: Some("text/plain".to_string()),
                    body: body.to_vec(),
                }),
            );
        }

        fn fail(&self, url: &str) {
            self.responses
                .lock()
                .unwrap()
                .insert(url.to_string(), Err(VibesError::fetch(url, "unreachable")));
        }

        fn calls(&self, url: &str) -> usize {
            *self.calls.lock().unwrap().get(url).unwrap_or(&0)
        }

        fn total_calls(&self) -> usize {
            self.total.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> VibesResult<FetchedResponse> {
            self.total.fetch_add(1, Ordering::SeqCst);
            *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
            match self.responses.lock().unwrap().get(url) {
                Some(Ok(resp)) => Ok(resp.clone()),
                Some(Err(_)) => Err(VibesError::fetch(url, "unreachable")),
                None => Err(VibesError::fetch(url, "no canned response")),
            }
        }
    }

    fn worker(temp: &TempDir, fetcher: Arc<MockFetcher>) -> CacheWorker {
        CacheWorker::new(
            temp.path(),
            fetcher,
            RoutingTable::new(&AssetsConfig::default()),
        )
    }

    /// Poll a store until the entry for `url` has the expected body, with
    /// a generous deadline for the background refresh to land
    async fn wait_for_body(store: &CacheStore, url: &str, expected: &[u8]) {
        for _ in 0..500 {
            if let Some(snap) = store.get(url).await.unwrap() {
                if snap.body == expected {
                    return;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("background refresh did not finish in time");
    }

    #[tokio::test]
    async fn cache_first_fetches_once_then_serves_from_cache() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let url = "https://studyvibes.app/manifest.json";
        fetcher.respond(url, b"{\"name\":\"Study Vibes\"}");

        let w = worker(&temp, Arc::clone(&fetcher));
        let req = CacheRequest::get(url, ResourceKind::Other);

        let first = w.handle(&req).await.unwrap();
        assert_eq!(first.body, b"{\"name\":\"Study Vibes\"}");
        assert_eq!(fetcher.calls(url), 1);
        assert!(w.static_store().contains(url).await);

        let second = w.handle(&req).await.unwrap();
        assert_eq!(second.body, first.body);
        assert_eq!(fetcher.calls(url), 1);
    }

    #[tokio::test]
    async fn cache_first_navigation_falls_back_to_shell_root() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let w = worker(&temp, Arc::clone(&fetcher));

        w.static_store()
            .put(&ResponseSnapshot {
                url: "https://studyvibes.app/".to_string(),
                status: 200,
                content_type: Some("text/html".to_string()),
                body: b"<html>shell</html>".to_vec(),
            })
            .await
            .unwrap();

        let url = "https://studyvibes.app/moods.json";
        fetcher.fail(url);
        let resp = w
            .handle(&CacheRequest::get(url, ResourceKind::Document))
            .await
            .unwrap();
        assert_eq!(resp.body, b"<html>shell</html>");
    }

    #[tokio::test]
    async fn cache_first_miss_offline_propagates_for_non_documents() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let w = worker(&temp, Arc::clone(&fetcher));

        let url = "https://studyvibes.app/moods.json";
        fetcher.fail(url);
        let err = w
            .handle(&CacheRequest::get(url, ResourceKind::Other))
            .await
            .unwrap_err();
        assert!(matches!(err, VibesError::FetchFailed { .. }));
    }

    #[tokio::test]
    async fn network_first_prefers_network_and_caches() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let url = "https://fonts.gstatic.com/s/inter/v13/a.woff2";
        fetcher.respond(url, b"font-bytes");

        let w = worker(&temp, Arc::clone(&fetcher));
        let req = CacheRequest::get(url, ResourceKind::Other);

        w.handle(&req).await.unwrap();
        w.handle(&req).await.unwrap();
        assert_eq!(fetcher.calls(url), 2);
        assert!(w.dynamic_store().contains(url).await);
    }

    #[tokio::test]
    async fn network_first_serves_cached_copy_on_failure() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let url = "https://fonts.gstatic.com/s/inter/v13/a.woff2";
        fetcher.respond(url, b"font-bytes");

        let w = worker(&temp, Arc::clone(&fetcher));
        let req = CacheRequest::get(url, ResourceKind::Other);
        w.handle(&req).await.unwrap();

        fetcher.fail(url);
        let resp = w.handle(&req).await.unwrap();
        assert_eq!(resp.body, b"font-bytes");
    }

    #[tokio::test]
    async fn network_first_with_no_cache_propagates_failure() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let url = "https://fonts.gstatic.com/s/inter/v13/a.woff2";
        fetcher.fail(url);

        let w = worker(&temp, Arc::clone(&fetcher));
        let err = w
            .handle(&CacheRequest::get(url, ResourceKind::Other))
            .await
            .unwrap_err();
        assert!(matches!(err, VibesError::FetchFailed { .. }));
    }

    #[tokio::test]
    async fn stale_while_revalidate_serves_cached_then_refreshes() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let url = "https://studyvibes.app/api/now";
        fetcher.respond(url, b"old");

        let w = worker(&temp, Arc::clone(&fetcher));
        let req = CacheRequest::get(url, ResourceKind::Other);

        // Cold path populates the store
        w.handle(&req).await.unwrap();

        fetcher.respond(url, b"new");
        let resp = w.handle(&req).await.unwrap();
        assert_eq!(resp.body, b"old");

        wait_for_body(w.dynamic_store(), url, b"new").await;
        assert_eq!(fetcher.calls(url), 2);
    }

    #[tokio::test]
    async fn stale_while_revalidate_failed_refresh_keeps_cached_copy() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let url = "https://studyvibes.app/api/now";
        fetcher.respond(url, b"old");

        let w = worker(&temp, Arc::clone(&fetcher));
        let req = CacheRequest::get(url, ResourceKind::Other);
        w.handle(&req).await.unwrap();

        fetcher.fail(url);
        let resp = w.handle(&req).await.unwrap();
        assert_eq!(resp.body, b"old");

        // Refresh runs in the background and fails without disturbing the
        // stored copy
        for _ in 0..500 {
            if fetcher.calls(url) >= 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(fetcher.calls(url), 2);
        let kept = w.dynamic_store().get(url).await.unwrap().unwrap();
        assert_eq!(kept.body, b"old");
    }

    #[tokio::test]
    async fn bootstrap_failure_yields_empty_script() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let url = "https://www.youtube.com/iframe_api";
        fetcher.fail(url);

        let w = worker(&temp, Arc::clone(&fetcher));
        let resp = w
            .handle(&CacheRequest::get(url, ResourceKind::Script))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert!(resp.body.is_empty());
        assert_eq!(
            resp.content_type.as_deref(),
            Some("application/javascript")
        );
        assert!(!w.static_store().contains(url).await);
    }

    #[tokio::test]
    async fn media_failures_get_placeholders() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.fail("https://studyvibes.app/bg/lofi.png");
        fetcher.fail("https://studyvibes.app/bg/rain.mp4");

        let w = worker(&temp, Arc::clone(&fetcher));
        let img = w
            .handle(&CacheRequest::get(
                "https://studyvibes.app/bg/lofi.png",
                ResourceKind::Image,
            ))
            .await
            .unwrap();
        assert_eq!(img.content_type.as_deref(), Some("image/png"));

        let vid = w
            .handle(&CacheRequest::get(
                "https://studyvibes.app/bg/rain.mp4",
                ResourceKind::Video,
            ))
            .await
            .unwrap();
        assert_eq!(vid.status, 404);
        assert!(vid.body.is_empty());
    }

    #[tokio::test]
    async fn non_get_bypasses_the_cache() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let url = "https://studyvibes.app/api/now";
        fetcher.respond(url, b"posted");

        let w = worker(&temp, Arc::clone(&fetcher));
        let mut req = CacheRequest::get(url, ResourceKind::Other);
        req.method = "POST".to_string();

        let resp = w.handle(&req).await.unwrap();
        assert_eq!(resp.body, b"posted");
        assert!(!w.dynamic_store().contains(url).await);
        assert!(!w.static_store().contains(url).await);
    }

    #[tokio::test]
    async fn install_seeds_shell_best_effort() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let table = RoutingTable::new(&AssetsConfig::default());
        for url in table.shell_urls() {
            fetcher.respond(url, b"asset");
        }
        // One asset offline must not fail the install
        fetcher.fail("https://www.youtube.com/iframe_api");

        let mut w = worker(&temp, Arc::clone(&fetcher));
        let seeded = w.install().await.unwrap();
        assert_eq!(seeded, table.shell_urls().len() - 1);
        assert_eq!(w.phase(), WorkerPhase::Installed);
        assert!(w.static_store().contains("https://studyvibes.app/").await);
        assert_eq!(fetcher.total_calls(), table.shell_urls().len());
    }

    #[tokio::test]
    async fn activation_purges_foreign_stores() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());

        let old = CacheStore::open(temp.path(), "study-vibes-static-v0");
        old.put(&ResponseSnapshot {
            url: "https://studyvibes.app/".to_string(),
            status: 200,
            content_type: None,
            body: vec![],
        })
        .await
        .unwrap();
        let keep = CacheStore::open(temp.path(), DYNAMIC_STORE);
        keep.put(&ResponseSnapshot {
            url: "https://studyvibes.app/api/now".to_string(),
            status: 200,
            content_type: None,
            body: b"keep".to_vec(),
        })
        .await
        .unwrap();

        let mut w = worker(&temp, fetcher);
        assert_eq!(w.try_activate().await.unwrap(), WorkerPhase::Active);
        assert!(!old.dir().exists());
        assert!(keep.contains("https://studyvibes.app/api/now").await);
        assert_eq!(
            controller_version(temp.path()).await.as_deref(),
            Some(CACHE_VERSION)
        );
    }

    #[tokio::test]
    async fn foreign_claim_parks_worker_until_skip_waiting() {
        let temp = TempDir::new().unwrap();
        tokio::fs::write(temp.path().join(CLAIM_FILE), "v0")
            .await
            .unwrap();

        let mut w = worker(&temp, Arc::new(MockFetcher::new()));
        assert_eq!(w.try_activate().await.unwrap(), WorkerPhase::Waiting);

        w.on_message(WorkerMessage::SkipWaiting).await.unwrap();
        assert_eq!(w.phase(), WorkerPhase::Active);
        assert_eq!(
            controller_version(temp.path()).await.as_deref(),
            Some(CACHE_VERSION)
        );
    }

    #[tokio::test]
    async fn cache_urls_message_seeds_dynamic_store_best_effort() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.respond("https://studyvibes.app/bg/lofi.mp4", b"loop");
        fetcher.fail("https://studyvibes.app/bg/rain.mp4");

        let mut w = worker(&temp, Arc::clone(&fetcher));
        w.on_message(WorkerMessage::CacheUrls(vec![
            "https://studyvibes.app/bg/lofi.mp4".to_string(),
            "https://studyvibes.app/bg/rain.mp4".to_string(),
        ]))
        .await
        .unwrap();

        assert!(w.dynamic_store().contains("https://studyvibes.app/bg/lofi.mp4").await);
        assert!(!w.dynamic_store().contains("https://studyvibes.app/bg/rain.mp4").await);
        assert!(!w.static_store().contains("https://studyvibes.app/bg/lofi.mp4").await);
    }

    #[tokio::test]
    async fn clear_removes_stores_and_claim() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let url = "https://studyvibes.app/api/now";
        fetcher.respond(url, b"x");

        let mut w = worker(&temp, Arc::clone(&fetcher));
        w.try_activate().await.unwrap();
        w.handle(&CacheRequest::get(url, ResourceKind::Other))
            .await
            .unwrap();

        w.clear().await.unwrap();
        assert!(!w.dynamic_store().contains(url).await);
        assert!(controller_version(temp.path()).await.is_none());
        assert_eq!(w.phase(), WorkerPhase::Installed);
    }
}
