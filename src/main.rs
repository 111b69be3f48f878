use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Compress, web, App, HttpServer};
use anyhow::Context;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi; // bring trait into scope for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use adsdesk::config::{AppConfig, Backend};
use adsdesk::kv::KvStore;
use adsdesk::openapi::ApiDoc;
use adsdesk::{config, AdStore, AppState};

fn build_kv(backend: &Backend) -> anyhow::Result<Arc<dyn KvStore>> {
    match backend {
        #[cfg(feature = "inmem-store")]
        Backend::Memory => {
            info!("Using in-memory key-value backend (contents are lost on exit)");
            Ok(Arc::new(adsdesk::kv::inmem::InMemKv::new()))
        }
        #[cfg(feature = "redis-store")]
        Backend::Redis { url } => {
            info!("Using Redis key-value backend at {url}");
            Ok(Arc::new(adsdesk::kv::redis::RedisKv::from_url(url)?))
        }
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("backend {other:?} not compiled into this build"),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env automatically only in debug builds; deployments set the environment themselves.
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("Bootstrapping adsdesk");
    let cfg = AppConfig::from_env().context("reading configuration")?;
    info!("Listing order: {:?}", cfg.listing_order);

    let kv = build_kv(&cfg.backend)?;
    let state = AppState {
        store: AdStore::new(kv).with_order(cfg.listing_order),
    };
    let openapi = ApiDoc::openapi();
    let frontend_url = cfg.frontend_url.clone();

    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            // local dev frontends
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allow_any_header()
            .allowed_methods(["GET", "POST", "OPTIONS"])
            .max_age(3600);
        if let Some(front) = &frontend_url {
            cors = cors.allowed_origin(front);
        }

        App::new()
            .wrap(TracingLogger::default())
            .wrap(Compress::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(config)
            .service(SwaggerUi::new("/docs/{_:.*}").url("/docs/openapi.json", openapi.clone()))
    })
    .bind((cfg.bind_addr.as_str(), cfg.port))
    .with_context(|| format!("binding {}:{}", cfg.bind_addr, cfg.port))?;

    info!("Listening on http://{}:{}", cfg.bind_addr, cfg.port);

    server.run().await?;
    Ok(())
}
