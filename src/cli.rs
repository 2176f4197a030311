//! Command-line interface definition for hash-bruteforce
//!
//! Provides argument parsing and validation for the brute-force search.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::progress::DEFAULT_REPORT_INTERVAL;

/// Parallel keyspace hash brute-forcer for penetration testing
///
/// Enumerates every candidate over a charset, shortest first, until one hashes
/// to the target.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hash-bruteforce",
    author = "m0h1nd4",
    version,
    about = "Parallel keyspace hash brute-forcer for penetration testing",
    long_about = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                          HASH-BRUTEFORCE v1.0.0                              ║
║                  Parallel Keyspace Hash Brute-Forcer                         ║
║                         For Penetration Testing                              ║
╚══════════════════════════════════════════════════════════════════════════════╝

Recover short plaintexts from MD5, SHA-1, SHA-256 or SHA-512 digests by
exhaustive enumeration. The keyspace of each length is split into contiguous
index ranges across worker threads.

EXAMPLES:
    # MD5 of a short lowercase word
    hash-bruteforce -H 900150983cd24fb0d6963f7d28e17f72 -c lowercase -l 4

    # SHA-256, alphanumeric, 8 workers, barrier mode
    hash-bruteforce -H <sha256> -a sha256 -c alnum -t 8 -m barrier

    # Custom charset with a 30 second limit
    hash-bruteforce -H <md5> --custom-charset "abc123!" -l 6 --timeout 30s

    # Append recovered plaintexts to a potfile
    hash-bruteforce -H <md5> -c digits -l 8 -o cracked.pot

CHARSETS:
    digits (1)        - 0-9
    lowercase (2)     - a-z
    alphanumeric (3)  - a-z, A-Z, 0-9
    printable (4)     - all 95 printable ASCII characters

ALGORITHMS:
    md5 (1), sha1 (2), sha256 (3), sha512 (4)
"#,
    after_help = "Only use against hashes you are authorized to test."
)]
pub struct Args {
    /// Target hash (hex, case-insensitive)
    #[arg(short = 'H', long, required = true, value_name = "HEX")]
    pub hash: String,

    /// Hash algorithm: md5, sha1, sha256, sha512 (or 1-4)
    #[arg(short, long, value_name = "ALGO", default_value = "md5")]
    pub algo: String,

    /// Charset: digits, lowercase, alphanumeric, printable (or 1-4)
    #[arg(short, long, value_name = "CHARSET", default_value = "digits")]
    pub charset: String,

    /// Custom charset symbols (overrides --charset)
    #[arg(long, value_name = "SYMBOLS")]
    pub custom_charset: Option<String>,

    /// Maximum candidate length
    #[arg(short = 'l', long, value_name = "LEN", default_value_t = 5)]
    pub max_len: usize,

    /// Number of worker threads (0 = auto-detect)
    #[arg(short = 't', long, value_name = "NUM", default_value_t = 0)]
    pub workers: usize,

    /// Execution mode
    #[arg(short, long, value_enum, default_value_t = ExecutionMode::Streaming)]
    pub mode: ExecutionMode,

    /// Global timeout for streaming mode, e.g. "500ms", "30s", "5m" (0 = none)
    #[arg(long, value_name = "DURATION", default_value = "5m")]
    pub timeout: String,

    /// Attempts between progress updates (0 = disabled)
    #[arg(long, value_name = "NUM", default_value_t = DEFAULT_REPORT_INTERVAL)]
    pub progress_interval: u64,

    /// Fail on unknown algorithm or charset instead of using the default
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Append "hash:plaintext" to this file when found
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// How workers are scheduled across candidate lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionMode {
    /// One length at a time, partitioned across all workers
    Barrier,
    /// Every length in flight at once, raced against the timeout
    Streaming,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Barrier => f.write_str("barrier"),
            Self::Streaming => f.write_str("streaming"),
        }
    }
}

impl Args {
    /// Parse the timeout, `None` when disabled
    pub fn parse_timeout(&self) -> anyhow::Result<Option<Duration>> {
        parse_duration(&self.timeout)
    }
}

/// Parse a human-readable duration ("250ms", "30s", "5m", "1h", bare seconds)
pub fn parse_duration(duration_str: &str) -> anyhow::Result<Option<Duration>> {
    let s = duration_str.trim().to_lowercase();

    let (num_str, millis_per_unit) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1000)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60 * 1000)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 60 * 60 * 1000)
    } else {
        (s.as_str(), 1000)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid duration format: '{}'", duration_str))?;

    let millis = num
        .checked_mul(millis_per_unit)
        .ok_or_else(|| anyhow::anyhow!("Duration too large: '{}'", duration_str))?;

    if millis == 0 {
        Ok(None)
    } else {
        Ok(Some(Duration::from_millis(millis)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::try_parse_from(["hash-bruteforce", "-H", "abcd"]).unwrap();

        assert_eq!(args.hash, "abcd");
        assert_eq!(args.algo, "md5");
        assert_eq!(args.charset, "digits");
        assert_eq!(args.max_len, 5);
        assert_eq!(args.workers, 0);
        assert_eq!(args.mode, ExecutionMode::Streaming);
        assert_eq!(args.parse_timeout().unwrap(), Some(Duration::from_secs(300)));
        assert_eq!(args.progress_interval, DEFAULT_REPORT_INTERVAL);
    }

    #[test]
    fn test_parse_full_args() {
        let args = Args::try_parse_from([
            "hash-bruteforce",
            "-H", "abcd",
            "-a", "sha256",
            "-c", "lowercase",
            "-l", "3",
            "-t", "8",
            "-m", "barrier",
            "--timeout", "0",
            "--strict",
            "-o", "out.pot",
        ])
        .unwrap();

        assert_eq!(args.algo, "sha256");
        assert_eq!(args.mode, ExecutionMode::Barrier);
        assert_eq!(args.workers, 8);
        assert_eq!(args.parse_timeout().unwrap(), None);
        assert!(args.strict);
        assert_eq!(args.output, Some(PathBuf::from("out.pot")));
    }

    #[test]
    fn test_hash_is_required() {
        assert!(Args::try_parse_from(["hash-bruteforce"]).is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("250ms").unwrap(), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("30s").unwrap(), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("5m").unwrap(), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("1H").unwrap(), Some(Duration::from_secs(3600)));
        assert_eq!(parse_duration("45").unwrap(), Some(Duration::from_secs(45)));
        assert_eq!(parse_duration("0s").unwrap(), None);
        assert!(parse_duration("soon").is_err());
    }
}
