use std::sync::Arc;

use clap::{Parser, Subcommand};
use foodtrend_cli::{pipeline, schedule};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "foodtrend")]
#[command(about = "Overseas food-trend collection, synthesis, and LINE delivery")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline once.
    Run {
        /// Print the message blocks instead of pushing them to LINE.
        #[arg(long)]
        dry_run: bool,
    },
    /// Run only the harvesters and print per-source record counts.
    Collect,
    /// Run the pipeline on the configured cron schedule until interrupted.
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Arc::new(foodtrend_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run { dry_run } => {
            let report = pipeline::run_from_config(&config, dry_run).await?;
            if dry_run {
                for (i, block) in report.blocks.iter().enumerate() {
                    println!("----- block {} of {} -----", i + 1, report.blocks.len());
                    println!("{}", block.as_str());
                }
            }
            tracing::info!(
                records = report.total_records,
                trends = report.trends,
                blocks = report.blocks.len(),
                dry_run,
                "run complete"
            );
        }
        Commands::Collect => {
            let harvesters = foodtrend_sources::default_harvesters(&config)?;
            let timeout = std::time::Duration::from_secs(config.harvest_timeout_secs);
            let corpus = foodtrend_sources::collect_all(harvesters, timeout).await;
            for (source, count) in corpus.counts() {
                println!("{source:<15} {count:>5}");
            }
            println!("{:<15} {:>5}", "total", corpus.total());
        }
        Commands::Schedule => {
            let mut scheduler = schedule::build_scheduler(Arc::clone(&config)).await?;
            shutdown_signal().await;
            scheduler.shutdown().await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping scheduler");
}

#[cfg(test)]
mod tests;
