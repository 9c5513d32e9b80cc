//! Batch CLI binary.

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use odr_batch::{BatchArgs, BatchDriver};
use odr_vision::ObjectDetector;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = BatchArgs::parse();

    init_tracing()?;

    if !args.input.is_dir() {
        bail!("Input directory {} does not exist", args.input.display());
    }

    let config = args.detector_config();
    info!(
        model = %config.model_path.display(),
        labels = %config.labels_path.display(),
        "Loading object detector"
    );
    let detector = ObjectDetector::from_config(config).context("Failed to load object detector")?;

    let driver = BatchDriver::new(detector);
    let summary = driver.run(&args.input, &args.output)?;

    println!(
        "Processed {}/{} images into {}",
        summary.processed.len(),
        summary.total(),
        args.output.display()
    );
    for outcome in summary.processed.iter().filter(|o| o.replaced_report) {
        println!("  replaced report: {}", outcome.report.display());
    }
    for (path, reason) in &summary.failed {
        println!("  failed: {} ({})", path.display(), reason);
    }

    Ok(())
}

/// Human-readable logs on stderr, JSON when `LOG_FORMAT=json`.
fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("odr=info".parse()?)
        .add_directive("ort=warn".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    }
    Ok(())
}
