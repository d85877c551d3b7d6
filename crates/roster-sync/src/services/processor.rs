//! Sync processor - drains one outbox stream
//!
//! Events are dispatched one at a time in `created_at` order. A failing
//! event is marked failed and the batch moves on; only outbox storage
//! failures abort a tick.
//!
//! In claim mode each event is claimed right before it is dispatched, so a
//! lease only has to outlast a single event.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use roster_common::SyncConfig;
use roster_core::{OutboxRepository, SyncEvent, SyncEventKind};

use super::error::ServiceResult;
use super::handlers::{Dispatch, SyncHandler};

/// Lease-based claiming for multi-instance deployments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimConfig {
    pub worker_id: String,
    pub lease: Duration,
}

/// Polling behaviour of one processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub batch_size: i64,
    pub poll_interval: Duration,
    /// `None` means plain polling (single instance)
    pub claim: Option<ClaimConfig>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            poll_interval: Duration::from_secs(5),
            claim: None,
        }
    }
}

impl ProcessorConfig {
    /// Settings for the role stream
    pub fn for_roles(config: &SyncConfig) -> Self {
        Self::with_interval(config, config.role_poll_interval())
    }

    /// Settings for the channel stream
    pub fn for_channels(config: &SyncConfig) -> Self {
        Self::with_interval(config, config.channel_poll_interval())
    }

    fn with_interval(config: &SyncConfig, poll_interval: Duration) -> Self {
        Self {
            batch_size: config.batch_size,
            poll_interval,
            claim: config.claim_lease().map(|lease| ClaimConfig {
                worker_id: config.worker_id.clone(),
                lease,
            }),
        }
    }
}

/// Outcome counts of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fetched: usize,
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.fetched == 0
    }
}

/// Polling processor for the stream handled by `H`
pub struct SyncProcessor<H: SyncHandler> {
    outbox: Arc<dyn OutboxRepository<H::Kind>>,
    handler: H,
    config: ProcessorConfig,
}

impl<H: SyncHandler> SyncProcessor<H> {
    /// Create a new SyncProcessor
    pub fn new(
        outbox: Arc<dyn OutboxRepository<H::Kind>>,
        handler: H,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            outbox,
            handler,
            config,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Process one batch of pending events
    ///
    /// # Errors
    /// Fails only when the outbox itself cannot be read or updated.
    #[instrument(skip(self), fields(stream = <H::Kind as SyncEventKind>::STREAM))]
    pub async fn run_tick(&self) -> ServiceResult<TickReport> {
        let mut report = TickReport::default();

        match &self.config.claim {
            Some(claim) => self.drain_claimed(claim, &mut report).await?,
            None => {
                let events = self.outbox.find_pending(self.config.batch_size).await?;
                report.fetched = events.len();
                for event in &events {
                    self.process_event(event, &mut report).await?;
                }
            }
        }

        if report.is_empty() {
            debug!("No pending events");
        } else {
            info!(
                fetched = report.fetched,
                processed = report.processed,
                failed = report.failed,
                skipped = report.skipped,
                "Batch complete"
            );
        }

        Ok(report)
    }

    /// Claim and dispatch one event at a time, up to the batch size
    async fn drain_claimed(&self, claim: &ClaimConfig, report: &mut TickReport) -> ServiceResult<()> {
        let limit = usize::try_from(self.config.batch_size).unwrap_or(0);

        while report.fetched < limit {
            let claimed = self
                .outbox
                .claim_pending(1, &claim.worker_id, claim.lease)
                .await?;
            let Some(event) = claimed.first() else {
                break;
            };

            report.fetched += 1;
            self.process_event(event, report).await?;
        }

        Ok(())
    }

    async fn process_event(
        &self,
        event: &SyncEvent<H::Kind>,
        report: &mut TickReport,
    ) -> ServiceResult<()> {
        match self.handler.dispatch(event).await {
            Ok(Dispatch::Applied) => {
                debug!(event_id = event.id, kind = %event.kind, "Event applied");
                self.outbox.mark_processed(event.id).await?;
                report.processed += 1;
            }
            Ok(Dispatch::Skipped(reason)) => {
                info!(
                    event_id = event.id,
                    kind = %event.kind,
                    team_id = %event.team_id,
                    subject_id = %event.subject_id,
                    reason,
                    "Nothing to sync"
                );
                self.outbox.mark_processed(event.id).await?;
                report.skipped += 1;
            }
            Err(e) => {
                warn!(
                    event_id = event.id,
                    kind = %event.kind,
                    team_id = %event.team_id,
                    failure = e.failure_class(),
                    error = %e,
                    "Sync event failed"
                );
                self.outbox.mark_failed(event.id, &e.to_string()).await?;
                report.failed += 1;
            }
        }

        Ok(())
    }

    /// Poll on a fixed interval until `shutdown` flips to true
    ///
    /// Ticks never overlap; a tick in progress finishes before shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let stream = <H::Kind as SyncEventKind>::STREAM;
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            stream,
            interval_ms = u64::try_from(self.config.poll_interval.as_millis()).unwrap_or(u64::MAX),
            batch_size = self.config.batch_size,
            claiming = self.config.claim.is_some(),
            "Sync processor started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_tick().await {
                        error!(stream, error = %e, code = e.error_code(), "Sync tick failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!(stream, "Sync processor stopped");
    }
}
