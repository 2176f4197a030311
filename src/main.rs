//! Hash Bruteforce - parallel keyspace hash brute-forcer for penetration testing
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use hash_bruteforce::cli::Args;
use hash_bruteforce::coordinator::{Coordinator, SearchConfig};
use hash_bruteforce::hasher::HashAlgorithm;
use hash_bruteforce::output::PotfileWriter;
use hash_bruteforce::progress::{
    format_number, print_banner, print_error, print_header, print_info, print_success, print_summary,
    print_warning,
};

/// Lengths above this grow the search time past practical limits
const LONG_SEARCH_WARNING_LEN: usize = 8;

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    // Run the application
    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // Print banner unless quiet mode
    if !args.quiet {
        print_banner();
    }

    // Validate arguments
    validate_args(&args)?;

    // Create search configuration
    let config = SearchConfig::from_args(&args)?;

    // Show configuration
    if !args.quiet {
        print_config(&args, &config);
    }

    let hasher = std::sync::Arc::clone(&config.hasher);
    let target_hex = config.target.to_hex();

    if !args.quiet {
        print_header("Starting brute force...");
    }

    let mut coordinator = Coordinator::new(config);
    let outcome = coordinator.run()?;

    let verified = outcome
        .plaintext
        .as_deref()
        .map(|plaintext| hasher.hex_digest(plaintext.as_bytes()));

    if !args.quiet {
        print_summary(&outcome, verified.as_deref());
    } else if let Some(ref plaintext) = outcome.plaintext {
        println!("{}", plaintext);
    }

    if let (Some(path), Some(plaintext)) = (args.output.as_ref(), outcome.plaintext.as_deref()) {
        let mut potfile = PotfileWriter::open(path.clone())?;
        potfile.write_result(&target_hex, plaintext)?;
        potfile.flush()?;

        if !args.quiet {
            print_success(&format!("Result appended to: {:?}", potfile.path()));
        }
    }

    Ok(())
}

/// Validate command-line arguments
fn validate_args(args: &Args) -> anyhow::Result<()> {
    if args.hash.trim().is_empty() {
        anyhow::bail!("Target hash must not be empty");
    }

    if args.max_len == 0 {
        anyhow::bail!("Maximum length must be at least 1");
    }

    if args.max_len > LONG_SEARCH_WARNING_LEN && !args.quiet {
        print_warning(&format!(
            "Lengths above {} take a very long time to enumerate!",
            LONG_SEARCH_WARNING_LEN
        ));
    }

    // Hint at a likely algorithm mix-up before the digest length check rejects it
    let guessed = HashAlgorithm::from_hex_len(args.hash.trim().len());
    if let (Some(guess), Some(chosen)) = (guessed, HashAlgorithm::from_identifier(&args.algo)) {
        if guess != chosen && !args.quiet {
            print_warning(&format!("Hash length suggests {}, but {} was selected", guess, chosen));
        }
    }

    // Surface timeout format errors before anything else runs
    args.parse_timeout()?;

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, config: &SearchConfig) {
    print_header("Configuration");

    print_info(&format!("Target hash:  {}", config.target.to_hex()));
    print_info(&format!("Algorithm:    {}", config.hasher.name()));
    print_info(&format!("Charset:      {} symbols", config.space.alphabet().len()));
    if args.verbose {
        print_info(&format!("Symbols:      {}", config.space.alphabet()));
    }
    print_info(&format!("Max length:   {}", config.space.max_length()));
    print_info(&format!(
        "Keyspace:     {} candidates",
        format_number(config.space.total_candidates())
    ));
    print_info(&format!("Mode:         {}", config.mode));
    print_info(&format!("Workers:      {} (CPU cores: {})", config.workers, num_cpus::get()));
    match config.timeout {
        Some(timeout) => print_info(&format!("Timeout:      {:?}", timeout)),
        None => print_info("Timeout:      none"),
    }
}
