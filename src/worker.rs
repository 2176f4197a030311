//! Search workers and the state they share
//!
//! A worker walks one `WorkItem` in increasing index order. The only state it
//! writes is in `SharedState`, and only through atomic operations.

use crossbeam_channel::Sender;
use log::debug;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use crate::charset::Alphabet;
use crate::hasher::CandidateHasher;
use crate::keyspace::CandidateEncoder;
use crate::partition::WorkItem;
use crate::progress::ProgressReporter;

const FOUND_UNSET: u8 = 0;
const FOUND_SET: u8 = 1;
const FOUND_CONSUMED: u8 = 2;

/// Lifecycle of the found flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoundState {
    Unset,
    /// A worker won the race and published its candidate
    Set,
    /// The coordinator took the published candidate
    Consumed,
}

/// Counters and flags shared by every worker of one search
#[derive(Debug)]
pub struct SharedState {
    attempts: AtomicU64,
    found: AtomicU8,
    cancel: AtomicBool,
    /// Outlives the search so callers can cancel from outside
    external: Arc<AtomicBool>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::with_external_cancel(Arc::new(AtomicBool::new(false)))
    }

    pub fn with_external_cancel(external: Arc<AtomicBool>) -> Self {
        Self {
            attempts: AtomicU64::new(0),
            found: AtomicU8::new(FOUND_UNSET),
            cancel: AtomicBool::new(false),
            external,
        }
    }

    /// Count one hashed candidate, returning the new total
    #[inline]
    pub fn record_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.found.load(Ordering::Acquire) != FOUND_UNSET || self.is_cancelled()
    }

    /// Race to move the found flag from unset to set. Exactly one caller wins.
    pub fn try_claim(&self) -> bool {
        self.found
            .compare_exchange(FOUND_UNSET, FOUND_SET, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark the published result as taken
    pub fn consume(&self) -> bool {
        self.found
            .compare_exchange(FOUND_SET, FOUND_CONSUMED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn found_state(&self) -> FoundState {
        match self.found.load(Ordering::Acquire) {
            FOUND_UNSET => FoundState::Unset,
            FOUND_SET => FoundState::Set,
            _ => FoundState::Consumed,
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire) || self.external.load(Ordering::Acquire)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only inputs plus the shared counters of one search
pub struct SearchContext {
    pub hasher: Arc<dyn CandidateHasher>,
    pub target: Vec<u8>,
    pub alphabet: Alphabet,
    pub shared: SharedState,
    pub reporter: ProgressReporter,
}

/// Why a worker returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Every index in the range was tried
    Completed,
    /// A found or cancel flag was observed before the range ended
    Stopped,
    /// The worker hashed a match; `published` if it won the race
    Matched { published: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub attempts: u64,
    pub exit: WorkerExit,
}

pub struct Worker {
    id: usize,
    ctx: Arc<SearchContext>,
    results: Sender<String>,
}

impl Worker {
    pub fn new(id: usize, ctx: Arc<SearchContext>, results: Sender<String>) -> Self {
        Self { id, ctx, results }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Search `item`, stopping early on a match or on either flag
    pub fn run(&self, item: WorkItem) -> WorkerReport {
        let ctx = &*self.ctx;
        let mut encoder = CandidateEncoder::new(&ctx.alphabet, item.length);
        let mut digest = vec![0u8; ctx.hasher.output_len()];
        let mut attempts = 0u64;

        for index in item.indices() {
            if ctx.shared.should_stop() {
                return WorkerReport {
                    attempts,
                    exit: WorkerExit::Stopped,
                };
            }

            let candidate = encoder.encode(index);
            ctx.hasher.digest_into(candidate.as_bytes(), &mut digest);
            attempts += 1;
            ctx.reporter.observe(ctx.shared.record_attempt());

            if digest == ctx.target {
                let published = ctx.shared.try_claim();
                if published {
                    debug!("Worker {} matched '{}' at {}", self.id, candidate, item);
                    // Capacity one and a single winner, so this never blocks
                    let _ = self.results.send(candidate.to_string());
                }
                return WorkerReport {
                    attempts,
                    exit: WorkerExit::Matched { published },
                };
            }
        }

        WorkerReport {
            attempts,
            exit: WorkerExit::Completed,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::charset::Charset;
    use crate::hasher::HashAlgorithm;
    use crossbeam_channel::bounded;

    /// Every input hashes to the same single byte
    pub(crate) struct AlwaysMatch;

    impl CandidateHasher for AlwaysMatch {
        fn name(&self) -> &str {
            "always-match"
        }

        fn output_len(&self) -> usize {
            1
        }

        fn digest_into(&self, _input: &[u8], out: &mut [u8]) {
            out[0] = 0;
        }
    }

    fn context(hasher: Arc<dyn CandidateHasher>, target: Vec<u8>, charset: Charset) -> Arc<SearchContext> {
        Arc::new(SearchContext {
            hasher,
            target,
            alphabet: charset.alphabet(),
            shared: SharedState::new(),
            reporter: ProgressReporter::hidden(0),
        })
    }

    fn md5_of(s: &str) -> Vec<u8> {
        hex::decode(HashAlgorithm::Md5.hex_digest(s.as_bytes())).unwrap()
    }

    #[test]
    fn test_completes_range_without_match() {
        let ctx = context(Arc::new(HashAlgorithm::Md5), md5_of("zzz"), Charset::Digits);
        let (tx, rx) = bounded(1);
        let worker = Worker::new(0, Arc::clone(&ctx), tx);

        let report = worker.run(WorkItem { length: 2, start: 10, end: 60 });

        assert_eq!(report, WorkerReport { attempts: 50, exit: WorkerExit::Completed });
        assert_eq!(ctx.shared.attempts(), 50);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_publishes_match() {
        let ctx = context(Arc::new(HashAlgorithm::Md5), md5_of("42"), Charset::Digits);
        let (tx, rx) = bounded(1);
        let worker = Worker::new(0, Arc::clone(&ctx), tx);

        let report = worker.run(WorkItem::whole(2, 100));

        assert_eq!(report.exit, WorkerExit::Matched { published: true });
        assert_eq!(report.attempts, 43);
        assert_eq!(rx.try_recv().unwrap(), "42");
        assert_eq!(ctx.shared.found_state(), FoundState::Set);
    }

    #[test]
    fn test_honors_flags_before_hashing() {
        let ctx = context(Arc::new(HashAlgorithm::Md5), md5_of("1"), Charset::Digits);
        let (tx, _rx) = bounded(1);
        let worker = Worker::new(0, Arc::clone(&ctx), tx);

        ctx.shared.cancel();
        let report = worker.run(WorkItem::whole(1, 10));
        assert_eq!(report, WorkerReport { attempts: 0, exit: WorkerExit::Stopped });

        let ctx = context(Arc::new(HashAlgorithm::Md5), md5_of("1"), Charset::Digits);
        let (tx, _rx) = bounded(1);
        let worker = Worker::new(0, Arc::clone(&ctx), tx);

        assert!(ctx.shared.try_claim());
        let report = worker.run(WorkItem::whole(1, 10));
        assert_eq!(report, WorkerReport { attempts: 0, exit: WorkerExit::Stopped });
    }

    #[test]
    fn test_external_cancel_flag() {
        let external = Arc::new(AtomicBool::new(false));
        let shared = SharedState::with_external_cancel(Arc::clone(&external));
        assert!(!shared.should_stop());

        external.store(true, Ordering::Release);
        assert!(shared.is_cancelled());
        assert!(shared.should_stop());
    }

    #[test]
    fn test_concurrent_matches_publish_once() {
        let ctx = context(Arc::new(AlwaysMatch), vec![0], Charset::Digits);
        let (tx, rx) = bounded(1);

        let reports: Vec<WorkerReport> = std::thread::scope(|s| {
            let handles: Vec<_> = crate::partition::partition(2, 100, 8)
                .into_iter()
                .enumerate()
                .map(|(id, item)| {
                    let worker = Worker::new(id, Arc::clone(&ctx), tx.clone());
                    s.spawn(move || worker.run(item))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let published = reports
            .iter()
            .filter(|r| r.exit == WorkerExit::Matched { published: true })
            .count();
        assert_eq!(published, 1);
        assert!(reports.iter().all(|r| r.attempts <= 1));
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_found_flag_lifecycle() {
        let shared = SharedState::new();
        assert_eq!(shared.found_state(), FoundState::Unset);
        assert!(!shared.consume());

        assert!(shared.try_claim());
        assert!(!shared.try_claim());
        assert!(shared.should_stop());

        assert!(shared.consume());
        assert_eq!(shared.found_state(), FoundState::Consumed);
        assert!(!shared.consume());
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let shared = Arc::new(SharedState::new());
        let winners: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let shared = Arc::clone(&shared);
                    s.spawn(move || shared.try_claim() as usize)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(winners, 1);
    }
}
