use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seoblog_core::job::DailyJob;
use seoblog_core::pipeline::Pipeline;

mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = seoblog_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let pipeline = Arc::new(Pipeline::from_settings(&settings)?);

    // The scheduler shares nothing with request handling beyond the immutable pipeline.
    let job = DailyJob::from_settings(&settings)?;
    tracing::info!(
        schedule = %job.schedule(),
        keyword = job.keyword(),
        "daily job scheduled"
    );
    tokio::spawn(job.run_forever(Arc::clone(&pipeline)));

    let app = routes::router(routes::AppState { pipeline });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, provider = %settings.llm_provider, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &seoblog_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
