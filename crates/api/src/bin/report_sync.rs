//! Batch sync CLI.
//!
//! Populates the reporting table outside the HTTP server, for initial
//! backfills and cron-driven deployments.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use uuid::Uuid;

use course_report_api::config::Config;
use course_report_api::middleware::logging::init_logging;
use course_report_api::services::SyncService;
use domain::models::{SyncMode, SyncRequest};

#[derive(Debug, Parser)]
#[command(name = "report-sync", about = "Populate the course completion reporting table")]
struct Args {
    /// Sync a single company instead of all active companies.
    #[arg(long)]
    company_id: Option<Uuid>,

    /// Rows fetched per batch (overrides company settings).
    #[arg(long)]
    batch_size: Option<i64>,

    /// Force a full rebuild instead of an incremental run.
    #[arg(long)]
    full: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::load()?;
    init_logging(&config.logging);

    let pool = persistence::db::create_pool(&config.to_db_config()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;

    let service = SyncService::new(
        pool,
        config.sync.default_batch_size,
        config.alerts.cooldown_minutes,
    );

    let request = SyncRequest {
        mode: args.full.then_some(SyncMode::Full),
        batch_size: args.batch_size,
    };

    match args.company_id {
        Some(company_id) => {
            let outcome = service.sync_company(company_id, &request).await?;
            info!(
                company_id = %company_id,
                upserted = outcome.upserted,
                soft_deleted = outcome.soft_deleted,
                elapsed_ms = outcome.elapsed_ms,
                "Sync completed"
            );
        }
        None => {
            let summary = service.sync_all().await?;
            info!(
                companies = summary.outcomes.len(),
                failed = summary.errors.len(),
                upserted = summary.total_upserted(),
                soft_deleted = summary.total_soft_deleted(),
                "Sync run completed"
            );

            if !summary.any_succeeded() && !summary.errors.is_empty() {
                error!("All companies failed to sync");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
