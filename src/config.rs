//! Runtime configuration, read once at startup.

use std::path::PathBuf;

use clap::Parser;

/// Worker count used when the setting is absent, malformed, or zero.
pub const DEFAULT_WORKERS: usize = 8;

/// Regex-driven Ethereum vanity address miner.
///
/// Every flag can also come from the environment, matching the original
/// env-file driven interface.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Regex a persisted address must match (include the 0x prefix)
    #[arg(short = 'a', long, env = "ACCEPTABLE_PATTERN")]
    pub acceptable_pattern: String,

    /// Regex that stops the search (include the 0x prefix)
    #[arg(short = 'f', long, env = "FINAL_PATTERN")]
    pub final_pattern: String,

    /// Number of worker threads
    #[arg(
        short = 'w',
        long,
        env = "PARALLEL_CORES",
        default_value = "8",
        value_parser = lenient_workers
    )]
    pub workers: usize,

    /// File matched wallets are appended to (truncated at startup)
    #[arg(short = 'o', long, env = "OUTPUT_FILE", default_value = "wallets.txt")]
    pub output: PathBuf,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value_t = 5)]
    pub report_interval: u64,
}

impl Config {
    /// Returns the worker count, substituting the default for zero.
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            DEFAULT_WORKERS
        } else {
            self.workers
        }
    }
}

/// A malformed worker count falls back to zero (and so to the default)
/// instead of aborting, matching the original tool's behavior.
fn lenient_workers(s: &str) -> Result<usize, std::convert::Infallible> {
    Ok(s.trim().parse().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(workers: usize) -> Config {
        Config {
            acceptable_pattern: "^0x00".into(),
            final_pattern: "^0x0000".into(),
            workers,
            output: "wallets.txt".into(),
            report_interval: 5,
        }
    }

    #[test]
    fn zero_workers_falls_back_to_default() {
        assert_eq!(make_test_config(0).worker_count(), DEFAULT_WORKERS);
        assert_eq!(make_test_config(3).worker_count(), 3);
    }

    #[test]
    fn malformed_worker_count_is_lenient() {
        assert_eq!(lenient_workers("not-a-number").unwrap(), 0);
        assert_eq!(lenient_workers(" 12 ").unwrap(), 12);
    }
}
