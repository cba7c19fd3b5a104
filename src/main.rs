use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use tracing::info;

use linklet::api;
use linklet::cache::{LinkCache, MokaLinkCache, NullCache};
use linklet::config::AppConfig;
use linklet::logging;
use linklet::services::analytics::AnalyticsService;
use linklet::services::click::{ClickCounter, ClickRecorder};
use linklet::services::geoip::provider_from_config;
use linklet::services::link_service::LinkService;
use linklet::services::redirect::RedirectResolver;
use linklet::storage::{ClickStore, LinkStore, MemoryStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    let config = AppConfig::from_env();
    let _log_guard = logging::init(&config);

    let store = Arc::new(MemoryStore::new());
    let links: Arc<dyn LinkStore> = store.clone();
    let clicks: Arc<dyn ClickStore> = store;
    info!("Using storage backend: {}", links.backend_name());

    let cache: Arc<dyn LinkCache> = if config.cache.enabled {
        Arc::new(MokaLinkCache::new(
            config.cache.max_capacity,
            config.cache.default_ttl(),
        ))
    } else {
        info!("Resolution cache disabled, reads go straight to the store");
        Arc::new(NullCache)
    };

    let geoip = provider_from_config(&config.geoip);
    let recorder = ClickRecorder::new(clicks.clone(), geoip);
    let counter = Arc::new(ClickCounter::new(
        links.clone(),
        cache.clone(),
        config.clicks.flush_interval(),
    ));
    tokio::spawn(counter.clone().run());

    let resolver = web::Data::new(RedirectResolver::new(
        links.clone(),
        cache.clone(),
        recorder.clone(),
        counter.clone(),
    ));
    let link_service = web::Data::new(LinkService::new(
        links.clone(),
        cache,
        config.quotas.clone(),
    ));
    let analytics = web::Data::new(AnalyticsService::new(links, clicks));
    let app_config = web::Data::new(config.clone());

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    let result = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(resolver.clone())
            .app_data(link_service.clone())
            .app_data(analytics.clone())
            .app_data(app_config.clone())
            .configure(api::configure)
    })
    .bind(bind_address)?
    .run()
    .await;

    // Drain what we can before the process exits, even on a server error.
    recorder.shutdown();
    counter.flush().await;

    result
}
