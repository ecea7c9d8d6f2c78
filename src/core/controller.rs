use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::acquire::MetadataSource;
use crate::core::filename::{self, SaveIntent};
use crate::core::progress::{DownloadSim, Tick};
use crate::core::validator;
use crate::error::AcquireError;
use crate::models::history::HistoryEntry;
use crate::models::media::SlotKey;
use crate::models::settings::AppSettings;
use crate::models::state::{reduce, RequestState, StateEvent};
use crate::storage::history::HistoryStore;

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input: silently ignored, state untouched.
    Ignored,
    /// A request is already in flight; new submissions are rejected, not
    /// queued, and the in-flight request is never cancelled.
    Busy,
    /// Failed the platform allow-list; no request was issued.
    Rejected,
    Resolved,
    Failed,
}

#[derive(Debug)]
pub enum DownloadOutcome {
    /// Another slot is active, or the key is not part of the current result.
    NotStarted,
    Cancelled,
    Completed {
        entry: HistoryEntry,
        save: SaveIntent,
    },
}

/// Top-level controller: owns the single request state, serializes
/// acquisition, and drives the download simulation to completion.
pub struct Controller {
    state: RequestState,
    source: Arc<dyn MetadataSource>,
    sim: DownloadSim,
    history: HistoryStore,
    deadline: Duration,
    tick: Duration,
    settle: Duration,
}

impl Controller {
    pub fn new(
        source: Arc<dyn MetadataSource>,
        history: HistoryStore,
        settings: &AppSettings,
    ) -> Self {
        Self::with_sim(source, history, settings, DownloadSim::uniform())
    }

    pub fn with_sim(
        source: Arc<dyn MetadataSource>,
        history: HistoryStore,
        settings: &AppSettings,
        sim: DownloadSim,
    ) -> Self {
        Self {
            state: RequestState::default(),
            source,
            sim,
            history,
            deadline: settings.acquire.deadline(),
            tick: settings.simulator.tick(),
            settle: settings.simulator.settle(),
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn progress(&self, key: &SlotKey) -> f64 {
        self.sim.progress(key)
    }

    /// Validate and acquire. Every transition fully replaces the state.
    pub async fn submit(&mut self, raw: &str) -> SubmitOutcome {
        if self.state.in_flight {
            return SubmitOutcome::Busy;
        }
        if raw.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        if !validator::validate(raw) {
            self.state = reduce(StateEvent::ValidationFailed);
            return SubmitOutcome::Rejected;
        }

        self.state = reduce(StateEvent::SubmitStarted);

        let fetched = match tokio::time::timeout(
            self.deadline,
            self.source.fetch_metadata(raw),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AcquireError::TimedOut(self.deadline)),
        };

        match fetched {
            Ok(extraction) => {
                // A fresh descriptor invalidates every pinned slot.
                self.sim.reset();
                self.state = reduce(StateEvent::Resolved {
                    descriptor: extraction.descriptor,
                    sources: extraction.sources,
                });
                SubmitOutcome::Resolved
            }
            Err(e) => {
                tracing::warn!("Acquisition failed for {}: {}", raw, e);
                self.state = reduce(StateEvent::AcquisitionFailed);
                SubmitOutcome::Failed
            }
        }
    }

    /// Run one slot to completion, forwarding percent over the channel.
    /// Cancellation wins any tie with the ticker and leaves the slot in its
    /// terminal cancelled phase.
    pub async fn start_download(
        &mut self,
        key: &SlotKey,
        cancel: CancellationToken,
        progress: mpsc::Sender<f64>,
    ) -> Result<DownloadOutcome> {
        let Some(descriptor) = self.state.result.clone() else {
            return Ok(DownloadOutcome::NotStarted);
        };
        let Some(variant) = descriptor.find_format(key) else {
            return Ok(DownloadOutcome::NotStarted);
        };
        if !self.sim.begin(key) {
            return Ok(DownloadOutcome::NotStarted);
        }

        let mut ticker = tokio::time::interval(self.tick);
        // The first interval tick completes immediately; consume it so the
        // first increment lands one full tick after start.
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.sim.cancel();
                    return Ok(DownloadOutcome::Cancelled);
                }
                _ = ticker.tick() => {
                    match self.sim.tick() {
                        Some(Tick::Advanced(percent)) => {
                            let _ = progress.send(percent).await;
                        }
                        Some(Tick::Full) => {
                            let _ = progress.send(100.0).await;
                            break;
                        }
                        None => return Ok(DownloadOutcome::NotStarted),
                    }
                }
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.sim.cancel();
                return Ok(DownloadOutcome::Cancelled);
            }
            _ = tokio::time::sleep(self.settle) => {}
        }

        self.sim.settle();
        let save = filename::save_intent(&descriptor.title, &variant.extension);
        let entry = HistoryEntry::new(
            &descriptor.title,
            descriptor.thumbnail_or_fallback(),
            &variant.quality,
        );
        self.history.record(entry.clone())?;
        tracing::info!("Simulated download settled: {}", save.filename);

        Ok(DownloadOutcome::Completed { entry, save })
    }
}
