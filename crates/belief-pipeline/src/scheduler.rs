//! Batch execution across users.
//!
//! Users are independent: each gets its own cycle, its own cancellation token
//! and its own deadline. A failing or stalled user never aborts the batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn, Instrument};

use belief_core::config::SchedulerConfig;
use belief_core::errors::{BeliefError, BeliefResult, ErrorCode};
use belief_core::traits::{Cancellable, CancellationToken};
use belief_observability::tracing_setup::events;
use belief_observability::{batch_span, PipelineMetrics};

use crate::engine::BeliefPipeline;
use crate::report::{BatchReport, CycleReport, UserOutcome, UserResult};

/// Cancellation that also fires once a deadline has passed.
#[derive(Debug)]
pub struct DeadlineToken {
    deadline: Instant,
    cancelled: AtomicBool,
}

impl DeadlineToken {
    pub fn new(deadline: Instant) -> Self {
        Self {
            deadline,
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn after(timeout: Duration) -> Self {
        Self::new(Instant::now() + timeout)
    }

    pub fn is_past_deadline(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

impl Cancellable for DeadlineToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed) || self.is_past_deadline()
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Runs [`BeliefPipeline::run_user`] for many users with bounded concurrency
/// and a per-user timeout.
pub struct BatchScheduler {
    pipeline: Arc<BeliefPipeline>,
    config: SchedulerConfig,
}

impl BatchScheduler {
    /// Scheduler using the pipeline's own scheduler settings.
    pub fn new(pipeline: Arc<BeliefPipeline>) -> Self {
        let config = pipeline.config().scheduler.clone();
        Self::with_config(pipeline, config)
    }

    pub fn with_config(pipeline: Arc<BeliefPipeline>, config: SchedulerConfig) -> Self {
        Self { pipeline, config }
    }

    pub fn pipeline(&self) -> &Arc<BeliefPipeline> {
        &self.pipeline
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.batch_timeout_ms)
    }

    /// Run one cycle per distinct user on the blocking pool.
    ///
    /// A cycle past its deadline has its token cancelled and is reported as
    /// timed out; work it already committed stays committed.
    pub async fn run_batch(&self, user_ids: &[String], now: DateTime<Utc>) -> BatchReport {
        let users = distinct(user_ids);
        let span = batch_span!(users.len());
        async {
            let started_at = Utc::now();
            let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_users.max(1)));
            let timeout = self.timeout();
            let mut tasks = JoinSet::new();

            for user_id in users {
                let pipeline = Arc::clone(&self.pipeline);
                let semaphore = Arc::clone(&semaphore);
                tasks.spawn(async move {
                    let outcome = match semaphore.acquire_owned().await {
                        Ok(_permit) => run_with_timeout(pipeline, &user_id, now, timeout).await,
                        Err(e) => failed(
                            &user_id,
                            &BeliefError::ConcurrencyError(format!("scheduler closed: {e}")),
                        ),
                    };
                    UserResult { user_id, outcome }
                });
            }

            let mut results = Vec::new();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(result) => results.push(result),
                    Err(e) => error!(error = %e, "batch task aborted"),
                }
            }
            self.finish(started_at, results)
        }
        .instrument(span)
        .await
    }

    /// Synchronous batch on a rayon pool sized to `max_concurrent_users`.
    ///
    /// Deadlines are cooperative here: a cycle notices its deadline at the next
    /// cancellation check and stops there.
    pub fn run_batch_blocking(&self, user_ids: &[String], now: DateTime<Utc>) -> BatchReport {
        let users = distinct(user_ids);
        let span = batch_span!(users.len());
        let _entered = span.enter();
        let started_at = Utc::now();
        let timeout = self.timeout();
        let timeout_ms = self.config.batch_timeout_ms;

        let run = |user_id: &String| {
            let token = DeadlineToken::after(timeout);
            let outcome = match self.pipeline.run_user(user_id, now, &token) {
                Ok(report) => UserOutcome::Completed(report),
                Err(BeliefError::Cancelled { .. }) if token.is_past_deadline() => {
                    timed_out(self.pipeline.metrics(), user_id, timeout_ms)
                }
                Err(err) => {
                    self.pipeline.metrics().add_cycles_failed(1);
                    failed(user_id, &err)
                }
            };
            UserResult {
                user_id: user_id.clone(),
                outcome,
            }
        };

        let results: Vec<UserResult> = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_concurrent_users.max(1))
            .build()
        {
            Ok(pool) => pool.install(|| users.par_iter().map(run).collect()),
            Err(e) => {
                warn!(error = %e, "dedicated pool unavailable, using the global pool");
                users.par_iter().map(run).collect()
            }
        };
        self.finish(started_at, results)
    }

    fn finish(&self, started_at: DateTime<Utc>, mut results: Vec<UserResult>) -> BatchReport {
        results.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        let report = BatchReport {
            started_at,
            results,
            metrics: self.pipeline.metrics().snapshot(),
        };
        info!(
            users = report.results.len(),
            completed = report.completed().count(),
            failed = report.failed_users().len(),
            timed_out = report.timed_out_users().len(),
            "batch complete"
        );
        report
    }
}

async fn run_with_timeout(
    pipeline: Arc<BeliefPipeline>,
    user_id: &str,
    now: DateTime<Utc>,
    timeout: Duration,
) -> UserOutcome {
    let metrics = Arc::clone(pipeline.metrics());
    let token = CancellationToken::new();
    let worker_token = token.clone();
    let worker_user = user_id.to_string();
    let handle = tokio::task::spawn_blocking(move || -> BeliefResult<CycleReport> {
        pipeline.run_user(&worker_user, now, &worker_token)
    });

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(Ok(report))) => UserOutcome::Completed(report),
        Ok(Ok(Err(err))) => {
            metrics.add_cycles_failed(1);
            failed(user_id, &err)
        }
        Ok(Err(join_err)) => {
            metrics.add_cycles_failed(1);
            failed(
                user_id,
                &BeliefError::ConcurrencyError(format!("cycle task aborted: {join_err}")),
            )
        }
        Err(_) => {
            token.cancel();
            timed_out(&metrics, user_id, timeout.as_millis() as u64)
        }
    }
}

fn failed(user_id: &str, err: &BeliefError) -> UserOutcome {
    events::cycle_failed(user_id, err.error_code(), &err.to_string());
    UserOutcome::Failed {
        error_code: err.error_code().to_string(),
        message: err.to_string(),
    }
}

fn timed_out(metrics: &PipelineMetrics, user_id: &str, timeout_ms: u64) -> UserOutcome {
    metrics.add_cycles_timed_out(1);
    events::cycle_timed_out(user_id, timeout_ms);
    UserOutcome::TimedOut { timeout_ms }
}

fn distinct(user_ids: &[String]) -> Vec<String> {
    let mut users = user_ids.to_vec();
    users.sort();
    users.dedup();
    users
}
