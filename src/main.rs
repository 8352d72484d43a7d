// src/main.rs

use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

mod config;
mod db;
mod models;
mod routes;
mod store;

use config::{Config, LogFormat, StoreBackend};
use store::{postgres::PgStore, supabase::{SupabaseAuth, SupabaseStore}, RecordStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    /// Cookie carrying the access token for browser callers.
    pub auth_cookie: Arc<str>,
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,employee_reports_api=debug,tower_http=info".into());

    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

async fn build_store(cfg: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let auth = SupabaseAuth::connect(&cfg.supabase_url, &cfg.supabase_anon_key, cfg.store_timeout)?;

    let store: Arc<dyn RecordStore> = match cfg.backend {
        StoreBackend::Supabase => Arc::new(SupabaseStore::new(auth)),
        StoreBackend::Postgres => {
            // checked by Config::from_env
            let url = cfg.database_url.as_deref().unwrap_or_default();
            Arc::new(PgStore::new(db::connect(url).await?, auth))
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;
    init_tracing(cfg.log_format);

    let state = AppState {
        store: build_store(&cfg).await?,
        auth_cookie: Arc::from(cfg.auth_cookie.as_str()),
    };

    // Browser clients call from the web app's origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, backend = ?cfg.backend, "reports API listening");

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
