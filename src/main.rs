use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::EnvFilter;

use staylite::adapters::cache::cached_listings::CachedListingRepository;
use staylite::adapters::cache::memory_cache::MemoryCache;
use staylite::adapters::catalog::load_catalog;
use staylite::adapters::clock::SystemClock;
use staylite::adapters::memory_store::InMemoryStore;
use staylite::config::load_config;
use staylite::mcp::server::StayMcpServer;
use staylite::ports::availability_store::AvailabilityStore;
use staylite::ports::booking_store::BookingStore;
use staylite::ports::cache::ListingCache;
use staylite::ports::listing_repository::ListingRepository;
use staylite::service::StayService;

fn find_config_path() -> PathBuf {
    let candidates = [PathBuf::from("config.yaml"), exe_dir().join("config.yaml")];

    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }

    candidates[0].clone()
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries MCP JSON-RPC, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting staylite server");

    let config_path = find_config_path();
    let config = load_config(&config_path)?;

    let store = if let Some(path) = &config.catalog.path {
        Arc::new(InMemoryStore::from_catalog(load_catalog(path)?))
    } else {
        tracing::warn!("No catalog configured, starting with an empty store");
        Arc::new(InMemoryStore::new())
    };

    let cache: Arc<dyn ListingCache> = Arc::new(MemoryCache::new(config.cache.max_entries));
    let listings: Arc<dyn ListingRepository> = Arc::new(CachedListingRepository::new(
        Arc::clone(&store) as Arc<dyn ListingRepository>,
        cache,
        Duration::from_secs(config.cache.listing_ttl_secs),
    ));

    let service = StayService::new(
        listings,
        Arc::clone(&store) as Arc<dyn AvailabilityStore>,
        store as Arc<dyn BookingStore>,
        Arc::new(SystemClock),
    )
    .with_rules(config.pricing.fee_schedule(), config.pricing.stay_policy());

    let server = StayMcpServer::new(Arc::new(service));

    let running = server.serve(stdio()).await?;
    running.waiting().await?;

    Ok(())
}
