//! Ethereum Vanity Address Miner CLI
//!
//! Patterns come from flags or the environment; a `.env` file in the
//! working directory is honored when present:
//!
//!   ACCEPTABLE_PATTERN='^0x00' FINAL_PATTERN='^0x000000' eth_vanity_miner

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use eth_vanity_miner::{
    Config, FileSink, KeyGenerator, PatternPair, Result, SearchPool, SearchSummary,
};

fn main() {
    // A .env file is optional, same contract as the original tool.
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let cancel = Arc::new(AtomicBool::new(false));
    install_cancel_handler(cancel.clone());

    match run(&config, cancel) {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Runs one search to completion.
///
/// The single point of process termination is `main`; everything below
/// it reports failures as values.
fn run(config: &Config, cancel: Arc<AtomicBool>) -> Result<SearchSummary> {
    let patterns = PatternPair::compile(&config.acceptable_pattern, &config.final_pattern)?;

    // Truncates whatever a previous run left behind.
    let sink = Arc::new(FileSink::create(&config.output)?);

    println!("Ethereum Vanity Address Miner");
    println!("=============================");
    println!("Acceptable: {}", patterns.acceptable());
    println!("Final:      {}", patterns.final_pattern());
    println!("Workers:    {}", config.worker_count());
    println!("Output:     {}", config.output.display());
    println!();
    println!("Searching... (Press Ctrl+C to stop)");
    println!();

    let pool = SearchPool::spawn(
        config.worker_count(),
        patterns,
        sink,
        cancel,
        |_| KeyGenerator::new(),
    );

    let report_interval = Duration::from_secs(config.report_interval.max(1));

    loop {
        if let Some(found) = pool.wait_for_winner(report_interval) {
            println!("Final Address: {}", found.address);
            println!("Private Key:   {}", found.secret_hex);
            println!("Worker:        {}", found.worker_id);
            break;
        }

        if pool.is_finished() {
            println!("\nStopped.");
            break;
        }

        print_progress(&pool);
    }

    // Drain the remaining workers before reporting.
    pool.join()
}

fn print_progress(pool: &SearchPool) {
    println!(
        "[{:>4}s] {} attempts ({}/s)",
        pool.elapsed().as_secs(),
        format_number(pool.attempts()),
        format_number(pool.attempts_per_second() as u64)
    );
}

fn print_summary(summary: &SearchSummary) {
    println!("\n--- Final Statistics ---");
    println!("Total attempts: {}", format_number(summary.attempts));
    if let Some(rate) = summary.attempts_per_second() {
        println!("Time elapsed:   {:.2}s", summary.elapsed.as_secs_f64());
        println!("Average speed:  {}/s", format_number(rate as u64));
    }
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn install_cancel_handler(cancel: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        cancel.store(true, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");
}
