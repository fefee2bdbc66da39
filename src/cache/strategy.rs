//! Request routing
//!
//! Every outbound request is classified against an ordered rule list and
//! mapped to a caching strategy. Rules are checked top to bottom; the
//! first match wins.

use crate::config::schema::AssetsConfig;

/// Coarse resource classification, decided by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Top-level navigation (app shell pages)
    Document,
    Image,
    Video,
    Script,
    Style,
    Other,
}

/// A request as seen by the caching layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRequest {
    pub method: String,
    pub url: String,
    pub kind: ResourceKind,
}

impl CacheRequest {
    pub fn get(url: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Fetch directly, never touch the cache
    Passthrough,
    /// Network only, with a synthetic empty script on failure
    BootstrapNetworkOnly,
    /// Network, with a minimal placeholder body on failure
    NetworkWithPlaceholder,
    /// Network preferred, cached copy on failure
    NetworkFirst,
    /// Cache preferred, network on miss
    CacheFirst,
    /// Cached copy served immediately, refreshed in the background
    StaleWhileRevalidate,
}

/// Ordered routing rules derived from the asset configuration
#[derive(Debug, Clone)]
pub struct RoutingTable {
    bootstrap_url: String,
    network_first_hosts: Vec<String>,
    shell_urls: Vec<String>,
    root_url: String,
}

/// Shell paths cached eagerly at install, relative to the asset base
const SHELL_PATHS: [&str; 3] = ["/", "/manifest.json", "/moods.json"];

impl RoutingTable {
    pub fn new(assets: &AssetsConfig) -> Self {
        let base = assets.base_url.trim_end_matches('/');
        let root_url = format!("{base}/");

        let mut shell_urls: Vec<String> = SHELL_PATHS
            .iter()
            .map(|path| format!("{base}{path}"))
            .collect();
        shell_urls.push(assets.fonts_url.clone());
        shell_urls.push(assets.bootstrap_url.clone());

        Self {
            bootstrap_url: assets.bootstrap_url.clone(),
            network_first_hosts: vec![
                "fonts.googleapis.com".to_string(),
                "fonts.gstatic.com".to_string(),
            ],
            shell_urls,
            root_url,
        }
    }

    /// URLs seeded into the static store at install time
    pub fn shell_urls(&self) -> &[String] {
        &self.shell_urls
    }

    /// The shell root, used as offline fallback for navigations
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn route(&self, request: &CacheRequest) -> Strategy {
        if request.method != "GET" {
            return Strategy::Passthrough;
        }
        if request.url == self.bootstrap_url {
            return Strategy::BootstrapNetworkOnly;
        }
        if matches!(request.kind, ResourceKind::Image | ResourceKind::Video) {
            return Strategy::NetworkWithPlaceholder;
        }
        if self
            .network_first_hosts
            .iter()
            .any(|host| request.url.contains(host.as_str()))
        {
            return Strategy::NetworkFirst;
        }
        if self.shell_urls.iter().any(|url| *url == request.url) {
            return Strategy::CacheFirst;
        }
        Strategy::StaleWhileRevalidate
    }
}
