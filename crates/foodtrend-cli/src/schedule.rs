//! Cron-driven repetition of the full pipeline.

use std::sync::Arc;

use foodtrend_core::AppConfig;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::pipeline::run_from_config;

/// Builds and starts a scheduler that runs one cycle per cron tick.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// as long as cycles should fire.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the cron expression is invalid or the
/// scheduler cannot start.
pub async fn build_scheduler(config: Arc<AppConfig>) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    let cron = config.schedule.clone();

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting trend report cycle");
            match run_from_config(&config, false).await {
                Ok(report) => tracing::info!(
                    records = report.total_records,
                    trends = report.trends,
                    blocks = report.blocks.len(),
                    "scheduler: cycle delivered"
                ),
                Err(e) => tracing::error!(error = ?e, "scheduler: cycle failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(cron = %cron, "scheduler started");
    Ok(scheduler)
}
