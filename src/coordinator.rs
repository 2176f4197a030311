//! Core search engine
//!
//! Drives the search over candidate lengths, schedules workers in barrier or
//! streaming mode, and collects the single published result.

use crate::charset::{Alphabet, Charset};
use crate::cli::{Args, ExecutionMode};
use crate::error::Result;
use crate::hasher::{CandidateHasher, HashAlgorithm, TargetHash};
use crate::keyspace::SearchSpace;
use crate::partition::{partition, WorkItem};
use crate::progress::{attempts_per_second, ProgressReporter, DEFAULT_REPORT_INTERVAL};
use crate::worker::{SearchContext, SharedState, Worker, WorkerExit, WorkerReport};

use crossbeam_channel::{bounded, RecvTimeoutError};
use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Worker cap when auto-detecting
pub const MAX_AUTO_WORKERS: usize = 16;

/// Explicit worker counts are capped at this multiple of the CPU count
pub const WORKERS_PER_CPU_LIMIT: usize = 4;

/// Search configuration
pub struct SearchConfig {
    pub target: TargetHash,
    pub hasher: Arc<dyn CandidateHasher>,
    pub space: SearchSpace,
    pub workers: usize,
    pub mode: ExecutionMode,
    pub timeout: Option<Duration>,
    pub report_interval: u64,
    pub quiet: bool,
}

impl SearchConfig {
    /// Validate the target against the hasher. Defaults to streaming mode, auto
    /// worker count, no timeout, and no progress bar.
    pub fn new(target_hex: &str, hasher: Arc<dyn CandidateHasher>, space: SearchSpace) -> Result<Self> {
        let target = TargetHash::parse(target_hex, hasher.as_ref())?;

        Ok(Self {
            target,
            hasher,
            space,
            workers: resolve_workers(0),
            mode: ExecutionMode::Streaming,
            timeout: None,
            report_interval: DEFAULT_REPORT_INTERVAL,
            quiet: true,
        })
    }

    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let algorithm = if args.strict {
            HashAlgorithm::resolve_strict(&args.algo)?
        } else {
            let (algorithm, substituted) = HashAlgorithm::resolve_or_default(&args.algo);
            if substituted {
                warn!("Unknown hash algorithm '{}', falling back to {}", args.algo, algorithm);
            }
            algorithm
        };

        let alphabet = match args.custom_charset {
            Some(ref symbols) => Alphabet::new(symbols)?,
            None if args.strict => Charset::resolve_strict(&args.charset)?.alphabet(),
            None => {
                let (charset, substituted) = Charset::resolve_or_default(&args.charset);
                if substituted {
                    warn!("Unknown charset '{}', falling back to {}", args.charset, charset);
                }
                charset.alphabet()
            }
        };

        let space = SearchSpace::new(alphabet, args.max_len)?;

        let config = Self::new(&args.hash, Arc::new(algorithm), space)?
            .with_workers(args.workers)
            .with_mode(args.mode)
            .with_timeout(args.parse_timeout()?)
            .with_report_interval(args.progress_interval)
            .with_quiet(args.quiet);

        Ok(config)
    }

    /// Requested worker count, `0` for auto
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = resolve_workers(workers);
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_report_interval(mut self, interval: u64) -> Self {
        self.report_interval = interval;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Turn a requested worker count into the one actually used
pub fn resolve_workers(requested: usize) -> usize {
    let cpus = num_cpus::get().max(1);

    if requested == 0 {
        return cpus.min(MAX_AUTO_WORKERS);
    }

    let limit = cpus * WORKERS_PER_CPU_LIMIT;
    if requested > limit {
        warn!("Requested {} workers, capping at {} ({} CPUs)", requested, limit, cpus);
        return limit;
    }

    requested
}

/// Search lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Searching,
    Found,
    Exhausted,
    TimedOut,
    Cancelled,
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Searching)
    }
}

/// What a finished search reports
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub state: SearchState,
    pub plaintext: Option<String>,
    pub attempts: u64,
    pub elapsed: Duration,
    pub algorithm: String,
    /// Candidates across every length
    pub keyspace: u64,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        self.state == SearchState::Found
    }

    pub fn attempts_per_second(&self) -> f64 {
        attempts_per_second(self.attempts, self.elapsed)
    }

    /// Share of the keyspace tried, in percent
    pub fn coverage(&self) -> f64 {
        if self.keyspace == 0 {
            return 0.0;
        }
        self.attempts as f64 / self.keyspace as f64 * 100.0
    }
}

/// Requests cancellation of a running search from another thread
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Main search driver
pub struct Coordinator {
    config: SearchConfig,
    state: SearchState,
    cancel: Arc<AtomicBool>,
}

impl Coordinator {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            state: SearchState::Idle,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Handle for cancelling the search in progress. Each `run` starts uncancelled.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancel),
        }
    }

    /// Run one complete search
    pub fn run(&mut self) -> Result<SearchOutcome> {
        let space = &self.config.space;
        let keyspace = space.total_candidates();

        self.cancel.store(false, Ordering::Release);
        self.state = SearchState::Searching;
        let started = Instant::now();

        let ctx = Arc::new(SearchContext {
            hasher: Arc::clone(&self.config.hasher),
            target: self.config.target.as_bytes().to_vec(),
            alphabet: space.alphabet().clone(),
            shared: SharedState::with_external_cancel(Arc::clone(&self.cancel)),
            reporter: ProgressReporter::new(keyspace, self.config.report_interval, self.config.quiet),
        });

        info!(
            "Searching {} candidates ({} symbols, lengths 1-{}) for {} digest in {} mode with {} workers",
            keyspace,
            space.alphabet().len(),
            space.max_length(),
            self.config.hasher.name(),
            self.config.mode,
            self.config.workers
        );

        let result = match self.config.mode {
            ExecutionMode::Barrier => self.run_barrier(&ctx),
            ExecutionMode::Streaming => self.run_streaming(&ctx, started),
        };

        let attempts = ctx.shared.attempts();
        ctx.reporter.finish(attempts);

        let (state, plaintext) = match result {
            Ok(finished) => finished,
            Err(e) => {
                self.state = SearchState::Idle;
                return Err(e);
            }
        };
        self.state = state;

        Ok(SearchOutcome {
            state,
            plaintext,
            attempts,
            elapsed: started.elapsed(),
            algorithm: self.config.hasher.name().to_string(),
            keyspace,
        })
    }

    fn build_pool(&self, threads: usize) -> Result<ThreadPool> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("bf-worker-{}", i))
            .build()?;
        Ok(pool)
    }

    /// One length at a time; every worker finishes before the next length starts
    fn run_barrier(&self, ctx: &Arc<SearchContext>) -> Result<(SearchState, Option<String>)> {
        let space = &self.config.space;
        let workers = self.config.workers;
        let pool = self.build_pool(workers)?;
        let (tx, rx) = bounded::<String>(1);

        if self.config.timeout.is_some() {
            warn!("Timeout is only enforced in streaming mode; barrier search runs until found or exhausted");
        }

        for length in space.lengths() {
            let total = space.combinations(length);
            let items = partition(length, total, workers);

            debug!("Length {}: {} candidates across {} work items", length, total, items.len());
            ctx.reporter.set_length(length);

            let reports: Vec<WorkerReport> = pool.install(|| {
                items
                    .par_iter()
                    .enumerate()
                    .map(|(id, item)| Worker::new(id, Arc::clone(ctx), tx.clone()).run(*item))
                    .collect()
            });

            let stopped = reports.iter().filter(|r| r.exit == WorkerExit::Stopped).count();
            debug!("Length {} done, {} of {} workers stopped early", length, stopped, reports.len());

            if let Ok(plaintext) = rx.try_recv() {
                ctx.shared.consume();
                return Ok((SearchState::Found, Some(plaintext)));
            }

            if ctx.shared.is_cancelled() {
                info!("Search cancelled after length {}", length);
                return Ok((SearchState::Cancelled, None));
            }
        }

        Ok((SearchState::Exhausted, None))
    }

    /// All lengths at once on a pool bounded by the worker budget, raced against the deadline
    fn run_streaming(&self, ctx: &Arc<SearchContext>, started: Instant) -> Result<(SearchState, Option<String>)> {
        let space = &self.config.space;
        let threads = self.config.workers.min(space.max_length()).max(1);
        let pool = self.build_pool(threads)?;
        let (tx, rx) = bounded::<String>(1);

        for length in space.lengths() {
            let item = WorkItem::whole(length, space.combinations(length));
            let worker = Worker::new(length, Arc::clone(ctx), tx.clone());

            pool.spawn(move || {
                let report = worker.run(item);
                debug!("Length {} task finished after {} attempts: {:?}", item.length, report.attempts, report.exit);
            });
        }

        // Only the tasks hold senders now, so the channel disconnects once all finish
        drop(tx);

        let received = match self.config.timeout {
            Some(timeout) => rx.recv_deadline(started + timeout),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        // Dropping the pool does not join its threads; they exit at their next flag check
        match received {
            Ok(plaintext) => {
                ctx.shared.consume();
                Ok((SearchState::Found, Some(plaintext)))
            }
            Err(RecvTimeoutError::Timeout) => {
                ctx.shared.cancel();
                info!("Timed out after {:?} with {} attempts", started.elapsed(), ctx.shared.attempts());
                Ok((SearchState::TimedOut, None))
            }
            Err(RecvTimeoutError::Disconnected) if ctx.shared.is_cancelled() => {
                info!("Search cancelled");
                Ok((SearchState::Cancelled, None))
            }
            Err(RecvTimeoutError::Disconnected) => Ok((SearchState::Exhausted, None)),
        }
    }
}
