//! Return Intelligence Service: binary entrypoint
//! Boots the Axum HTTP server: env config, tracing, AI collaborators, metrics.

use return_intelligence::metrics::Metrics;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "return_intelligence=info,tower_http=info,warn";

/// Compact logs by default; `LOG_FORMAT=json` switches to JSON lines.
/// Uses `try_init` because the hosting runtime may already own the global subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let router = return_intelligence::app()?;

    let router = match Metrics::install() {
        Ok(metrics) => router.merge(metrics.router()),
        Err(e) => {
            tracing::warn!(error = %e, "prometheus recorder not installed; /metrics disabled");
            router
        }
    };

    Ok(router.into())
}
