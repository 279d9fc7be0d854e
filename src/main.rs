//! Main entry point for the pahedl CLI

use clap::Parser;
use pahedl::cli::{Args, OutputFormatter};
use pahedl::core::Pipeline;
use pahedl::Progress;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args = Args::parse();
    let formatter = Arc::new(OutputFormatter::new(args.verbosity_level()));

    let mut pipeline = Pipeline::new()?;
    if let Some(output) = &args.output {
        pipeline = pipeline.with_output_dir(output);
    }
    if !args.no_progress && !args.print_url {
        let formatter_clone = formatter.clone();
        pipeline = pipeline.with_progress(move |progress: &Progress| {
            formatter_clone.update_progress(progress);
        });
    }

    // Print-url mode: resolve the form action without downloading
    if args.print_url {
        match pipeline.resolve_action_url(&args.url).await {
            Ok(action) => {
                println!("{}", action);
                return Ok(());
            }
            Err(e) => {
                formatter.error(&format!("[{}] {}", e.stage(), e));
                std::process::exit(1);
            }
        }
    }

    formatter.info(&format!("Resolving {}", args.url));
    let start_time = Instant::now();

    // Expected failures end the run with a stage report, never a panic
    match pipeline.run(&args.url).await {
        Ok(outcome) => {
            info!(
                "pipeline complete: {} bytes into {}",
                outcome.bytes_written,
                outcome.path.display()
            );
            formatter.print_download_complete(
                &outcome.target.filename,
                outcome.bytes_written,
                start_time.elapsed(),
            );
            Ok(())
        }
        Err(e) => {
            formatter.finish_progress("failed");
            formatter.error(&format!("[{}] {}", e.stage(), e));
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber from RUST_LOG (default: warn).
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}
