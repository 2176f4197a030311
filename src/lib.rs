//! # Hash Bruteforce
//!
//! Parallel keyspace-partitioned hash brute-forcer for penetration testing.
//!
//! ## Features
//!
//! - **Indexed enumeration**: Every candidate maps to a unique integer, so the keyspace splits cleanly
//! - **Parallel workers**: Contiguous index ranges per worker thread, lock-free found/cancel flags
//! - **Two schedules**: Barrier (length by length) or streaming (all lengths raced against a timeout)
//! - **Algorithms**: MD5, SHA-1, SHA-256, SHA-512
//! - **Charsets**: Digits, lowercase, alphanumeric, printable ASCII, or custom
//!
//! ## Usage
//!
//! ```bash
//! # MD5 of a lowercase word up to 4 characters
//! hash-bruteforce -H 900150983cd24fb0d6963f7d28e17f72 -c lowercase -l 4
//!
//! # SHA-1, digits up to 8, barrier mode with 8 workers
//! hash-bruteforce -H <sha1> -a sha1 -c digits -l 8 -m barrier -t 8
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use hash_bruteforce::charset::Charset;
//! use hash_bruteforce::cli::ExecutionMode;
//! use hash_bruteforce::coordinator::{Coordinator, SearchConfig};
//! use hash_bruteforce::hasher::HashAlgorithm;
//! use hash_bruteforce::keyspace::SearchSpace;
//! use std::sync::Arc;
//!
//! let space = SearchSpace::new(Charset::Lowercase.alphabet(), 3).unwrap();
//! let config = SearchConfig::new(
//!     "900150983cd24fb0d6963f7d28e17f72",
//!     Arc::new(HashAlgorithm::Md5),
//!     space,
//! )
//! .unwrap()
//! .with_mode(ExecutionMode::Barrier);
//!
//! let outcome = Coordinator::new(config).run().unwrap();
//! assert_eq!(outcome.plaintext.as_deref(), Some("abc"));
//! ```

pub mod charset;
pub mod cli;
pub mod coordinator;
pub mod error;
pub mod hasher;
pub mod keyspace;
pub mod output;
pub mod partition;
pub mod progress;
pub mod worker;

pub use cli::Args;
pub use coordinator::{Coordinator, SearchConfig, SearchOutcome, SearchState};
pub use error::{Result, SearchError};
