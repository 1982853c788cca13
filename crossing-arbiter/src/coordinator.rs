//! The arbitration loop.
//!
//! Ingest and tick phases strictly alternate on a single task, so a tick
//! always reads a fully merged revision of the world. Until every train
//! has announced its cars the loop only ingests (startup barrier); after
//! that it ticks on a fixed interval and ingests whatever batches arrive
//! in between.

use std::time::Duration;

use futures::{FutureExt, Stream, StreamExt};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::arbiter::{ArbitrationEngine, TickOutcome};
use crate::config::Config;
use crate::dispatch::{Dispatcher, Inbound, IngestSummary, PositionReport, Transport};
use crate::track::CrossingList;

/// Error from the arbitration loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    /// The inbound stream ended during the startup barrier
    #[error(
        "inbound stream ended before every train announced \
         {cars_per_train} car(s) ({registered} registered)"
    )]
    NotReady {
        cars_per_train: usize,
        registered: usize,
    },
}

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: usize,
    pub reports_accepted: usize,
    pub reports_rejected: usize,
    pub yields_sent: usize,
    pub texts_sent: usize,
}

/// Drives ingest and arbitration for one fleet.
pub struct Coordinator<T> {
    dispatcher: Dispatcher<T>,
    engine: ArbitrationEngine,
    crossings: CrossingList,
    cars_per_train: usize,
    tick_interval: Duration,
}

impl<T: Transport> Coordinator<T> {
    pub fn new(config: &Config, crossings: CrossingList, transport: T) -> Self {
        Self {
            dispatcher: Dispatcher::new(config.train_count, transport),
            engine: ArbitrationEngine::new(config.arbiter.clone()),
            crossings,
            cars_per_train: config.cars_per_train,
            tick_interval: config.tick_interval,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    pub fn engine(&self) -> &ArbitrationEngine {
        &self.engine
    }

    /// True once every train has announced its cars.
    pub fn is_ready(&self) -> bool {
        self.dispatcher
            .snapshot()
            .roster()
            .is_complete(self.cars_per_train)
    }

    /// Ingest phase: merge every report of the batch as one revision, then
    /// forward any texts.
    ///
    /// Returns the ingest counts and the number of texts delivered.
    pub fn ingest(&mut self, batch: Vec<Inbound>) -> (IngestSummary, usize) {
        let mut reports: Vec<PositionReport> = Vec::new();
        let mut notes = Vec::new();
        for message in batch {
            match message {
                Inbound::Report(report) => reports.push(report),
                Inbound::Notify { car, text } => notes.push((car, text)),
            }
        }

        let summary = self.dispatcher.ingest(&reports);

        let mut texts = 0;
        for (car, text) in notes {
            match self.dispatcher.unicast(&car, &text) {
                Ok(true) => texts += 1,
                Ok(false) => {}
                Err(err) => warn!(%car, error = %err, "failed to deliver text"),
            }
        }

        (summary, texts)
    }

    /// Tick phase: arbitrate every crossing and deliver the instructions.
    ///
    /// Does nothing until the startup barrier has been passed.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.engine.is_steady() {
            if !self.is_ready() {
                return TickOutcome::default();
            }
            self.engine.mark_steady();
            info!(
                trains = self.dispatcher.snapshot().roster().train_count(),
                "every train announced, arbitration started"
            );
        }

        let snapshot = self.dispatcher.snapshot();
        let outcome = self.engine.tick(&snapshot, &self.crossings);

        for instruction in &outcome.yields {
            if let Err(err) = self.dispatcher.emit_yield(instruction.clone()) {
                warn!(
                    group = %instruction.group,
                    error = %err,
                    "failed to deliver yield instruction"
                );
            }
        }

        outcome
    }

    /// Run until the inbound stream ends.
    ///
    /// A final tick is run on the last revision before returning.
    pub async fn run<S>(mut self, inbound: S) -> Result<RunSummary, CoordinatorError>
    where
        S: Stream<Item = Inbound> + Unpin,
    {
        let mut inbound = inbound.fuse();
        let mut summary = RunSummary::default();

        info!(
            crossings = self.crossings.len(),
            cars_per_train = self.cars_per_train,
            "waiting for every train to announce its cars"
        );
        while !self.is_ready() {
            let Some(batch) = next_batch(&mut inbound).await else {
                return Err(CoordinatorError::NotReady {
                    cars_per_train: self.cars_per_train,
                    registered: self.dispatcher.snapshot().roster().car_count(),
                });
            };
            self.ingest_counted(batch, &mut summary);
        }

        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = interval.tick() => self.tick_counted(&mut summary),
                batch = next_batch(&mut inbound) => match batch {
                    Some(batch) => self.ingest_counted(batch, &mut summary),
                    None => {
                        self.tick_counted(&mut summary);
                        info!(
                            ticks = summary.ticks,
                            yields = summary.yields_sent,
                            "inbound stream ended"
                        );
                        return Ok(summary);
                    }
                },
            }
        }
    }

    fn ingest_counted(&mut self, batch: Vec<Inbound>, summary: &mut RunSummary) {
        let (ingested, texts) = self.ingest(batch);
        summary.reports_accepted += ingested.accepted;
        summary.reports_rejected += ingested.rejected;
        summary.texts_sent += texts;
    }

    fn tick_counted(&mut self, summary: &mut RunSummary) {
        let outcome = self.tick();
        summary.ticks += 1;
        summary.yields_sent += outcome.yields.len();
    }
}

/// Wait for the next message, then take every message already queued
/// behind it so the batch is merged in one step.
async fn next_batch<S>(inbound: &mut S) -> Option<Vec<Inbound>>
where
    S: Stream<Item = Inbound> + Unpin,
{
    let first = inbound.next().await?;
    let mut batch = vec![first];

    while let Some(Some(message)) = inbound.next().now_or_never() {
        batch.push(message);
    }

    Some(batch)
}
