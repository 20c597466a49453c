use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seoblog_core::job::DailyJob;
use seoblog_core::pipeline::Pipeline;

#[derive(Debug, Parser)]
#[command(name = "seoblog_worker")]
struct Args {
    /// Keyword to draft for. Defaults to DAILY_KEYWORD.
    #[arg(long)]
    keyword: Option<String>,

    /// Directory for generated posts. Defaults to DAILY_POSTS_DIR.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Run the job immediately, once, instead of waiting for the schedule.
    #[arg(long)]
    once: bool,

    /// Generate and print the payload without writing a file. Implies --once.
    #[arg(long)]
    dry_run: bool,
}

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

    let args = Args::parse();

    let mut job = DailyJob::from_settings(&settings)?;
    if let Some(keyword) = args.keyword {
        job = job.with_keyword(keyword);
    }
    if let Some(dir) = args.output_dir {
        job = job.with_output_dir(dir);
    }

    let pipeline = Arc::new(Pipeline::from_settings(&settings)?);

    if args.dry_run {
        let payload = job.generate(&pipeline).await?;
        tracing::info!(keyword = job.keyword(), dry_run = true, "daily blog generated (dry-run)");
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if args.once {
        return match job.run_once(&pipeline).await {
            Ok(path) => {
                tracing::info!(keyword = job.keyword(), path = %path.display(), "daily blog generated");
                Ok(())
            }
            Err(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(keyword = job.keyword(), error = %format!("{err:#}"), "daily task failed");
                Err(err)
            }
        };
    }

    tokio::select! {
        _ = job.run_forever(pipeline) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
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
