//! Chronosense recorder - interactive time perception test
//!
//! Prompts the player to judge when a randomly drawn target duration
//! (1-10 seconds) has elapsed, then appends the measured sample to the
//! shared log read by the server binary.
//!
//! # Usage
//! ```sh
//! cargo run
//! cargo run -- --data-file /tmp/samples.txt
//! ```

use anyhow::{Context, Result};
use chronosense::application::aggregator;
use chronosense::config::Config;
use chronosense::domain::sample::{Sample, TARGET_RANGE};
use chronosense::infrastructure::SampleLog;
use clap::Parser;
use rand::Rng;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Interactive time perception recorder", long_about = None)]
struct Cli {
    /// Sample log file (overrides DATA_FILE)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Skip the running-average summary after the round
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Default to WARN so tracing output does not interleave with the prompts.
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).compact();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let log = SampleLog::new(cli.data_file.unwrap_or(config.data_path));

    prompt("Press Enter to draw a target time...")?;
    let target = rand::rng().random_range(TARGET_RANGE);
    println!("Try to guess when {target} seconds have passed.");

    prompt("Press Enter to start...")?;
    let started = Instant::now();

    prompt("Press Enter when you think the time has elapsed...")?;
    let actual_secs = started.elapsed().as_secs_f64();

    let sample = Sample {
        target_secs: target,
        actual_secs,
    };
    println!("Expected time: {target} seconds");
    println!("Actual time: {actual_secs:.2} seconds");
    println!("Off by {:.2} seconds", sample.error_secs());

    // A failed append loses this sample but never blocks the player.
    if let Err(err) = log.append(&sample) {
        error!("Failed to record sample: {err:#}");
    } else {
        info!(
            "Recorded sample: target {} s, actual {:.2} s",
            target, actual_secs
        );
    }

    if !cli.quiet {
        match aggregator::load_error_mapping(&log) {
            Ok(errors) => {
                let average = errors.get(&target).copied().unwrap_or_default();
                println!("Average error at {target} seconds so far: {average:.2} seconds");
            }
            Err(err) => error!("Could not compute the running average: {err}"),
        }
    }

    Ok(())
}

fn prompt(message: &str) -> Result<()> {
    print!("{message}");
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(())
}
