//! Progress display module
//!
//! Provides styled terminal output, the attempts/sec progress reporter, and the
//! final search summary.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::time::{Duration, Instant};

use crate::coordinator::{SearchOutcome, SearchState};

/// Attempts between progress samples
pub const DEFAULT_REPORT_INTERVAL: u64 = 50_000;

/// Color theme for the tool
pub mod theme {
    use colored::Color;

    pub const PRIMARY: Color = Color::Green;
    pub const ACCENT: Color = Color::Cyan;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
}

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║   ██╗  ██╗ █████╗ ███████╗██╗  ██╗    ██████╗ ███████╗                       ║
║   ██║  ██║██╔══██╗██╔════╝██║  ██║    ██╔══██╗██╔════╝                       ║
║   ███████║███████║███████╗███████║    ██████╔╝█████╗                         ║
║   ██╔══██║██╔══██║╚════██║██╔══██║    ██╔══██╗██╔══╝                         ║
║   ██║  ██║██║  ██║███████║██║  ██║    ██████╔╝██║                            ║
║   ╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝    ╚═════╝ ╚═╝                            ║
║                                                                              ║
║                  Parallel Keyspace Hash Brute-Forcer                         ║
║                       For Penetration Testing                                ║
║                                                              v1.0.0          ║
╚══════════════════════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.color(theme::PRIMARY));
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".color(theme::ACCENT), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".color(theme::WARNING), text.color(theme::WARNING));
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".color(theme::ERROR), text.color(theme::ERROR));
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled progress bar over the whole keyspace
pub fn create_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);

    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {pos}/{len} ({percent}%) {prefix} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Attempts per second, zero before any time has passed
pub fn attempts_per_second(attempts: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        attempts as f64 / secs
    } else {
        0.0
    }
}

/// Read-only observer of the shared attempts counter.
///
/// Workers hand it every new attempt count; it samples the rate once per
/// `interval` attempts and otherwise returns immediately.
pub struct ProgressReporter {
    interval: u64,
    started: Instant,
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(total: u64, interval: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            create_progress_bar(total, "starting...")
        };

        Self {
            interval,
            started: Instant::now(),
            bar,
        }
    }

    /// Reporter that draws nothing but still samples for logging
    pub fn hidden(interval: u64) -> Self {
        Self {
            interval,
            started: Instant::now(),
            bar: ProgressBar::hidden(),
        }
    }

    /// Whether `attempts` lands on a sampling point
    #[inline]
    pub fn is_due(&self, attempts: u64) -> bool {
        self.interval > 0 && attempts % self.interval == 0
    }

    #[inline]
    pub fn observe(&self, attempts: u64) {
        if !self.is_due(attempts) {
            return;
        }

        let rate = attempts_per_second(attempts, self.started.elapsed());
        self.bar.set_position(attempts);
        self.bar.set_message(format!("{} attempts/s", format_number(rate as u64)));
        debug!("Attempts: {}, Rate: {:.0}/s", attempts, rate);
    }

    /// Label the bar with the length currently being searched
    pub fn set_length(&self, length: usize) {
        self.bar.set_prefix(format!("len {}", length));
    }

    pub fn finish(&self, attempts: u64) {
        self.bar.set_position(attempts);
        self.bar.finish_and_clear();
    }
}

/// Print final statistics
pub fn print_summary(outcome: &SearchOutcome, verified_digest: Option<&str>) {
    println!();
    println!("{}", "═".repeat(60).green());
    let title = match outcome.state {
        SearchState::Found => "                     PASSWORD FOUND".green().bold(),
        SearchState::Exhausted => "                  KEYSPACE EXHAUSTED".yellow().bold(),
        SearchState::TimedOut => "                      TIMED OUT".yellow().bold(),
        SearchState::Cancelled => "                      CANCELLED".yellow().bold(),
        SearchState::Idle | SearchState::Searching => "                   SEARCH INCOMPLETE".red().bold(),
    };
    println!("{}", title);
    println!("{}", "═".repeat(60).green());
    println!();

    match outcome.plaintext {
        Some(ref plaintext) => {
            println!("  {} '{}'", "Plaintext:      ".green().bold(), plaintext.green().bold());
            if let Some(digest) = verified_digest {
                println!("  {} {}", "Hash verified:  ".green(), digest);
            }
        }
        None => println!("  {} {}", "Plaintext:      ".red(), "not found".red()),
    }
    println!("  {} {}", "Algorithm:      ".green(), outcome.algorithm);
    println!();

    println!("  {} {}", "Total attempts: ".green(), format_number(outcome.attempts));
    println!("  {} {}", "Keyspace:       ".green(), format_number(outcome.keyspace));
    println!("  {} {:.2}%", "Coverage:       ".green(), outcome.coverage());
    println!();
    println!("  {} {}", "Duration:       ".green(), format_duration(outcome.elapsed));
    println!(
        "  {} {} attempts/sec",
        "Speed:          ".green(),
        format_number(outcome.attempts_per_second() as u64)
    );
    println!();
    println!("{}", "═".repeat(60).green());
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}
