//! Headless client that runs one encounter from a content directory.
//!
//! # Architecture
//!
//! ```text
//! Client (composition root)
//!   ├─→ Content (config.toml, items.ron, roster.ron)
//!   ├─→ Runtime (encounter worker, providers, event bus)
//!   └─→ Output (one JSON line per published event)
//! ```
//!
//! Every roster entry is driven by the provider its controller names. Idle
//! participants have no provider, so their windows resolve through the
//! configured timeout action.

mod builder;
pub mod logging;

pub use builder::ClientBuilder;

use std::io::Write;

use anyhow::{Context, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use skirmish_core::EncounterSummary;
use skirmish_runtime::{EncounterRuntime, Event, LifecycleEvent};

/// A running encounter together with a subscription to every event it
/// publishes.
pub struct Client {
    runtime: EncounterRuntime,
    events: broadcast::Receiver<Event>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn runtime(&self) -> &EncounterRuntime {
        &self.runtime
    }

    /// Streams events to `out` as JSON lines until the encounter ends, then
    /// returns its summary.
    ///
    /// Lagging behind the bus skips the dropped events with a warning.
    pub async fn run(mut self, out: &mut impl Write) -> Result<EncounterSummary> {
        loop {
            match self.events.recv().await {
                Ok(event) => {
                    let line = event.to_json().context("Failed to encode event")?;
                    writeln!(out, "{line}").context("Failed to write event")?;
                    if matches!(event, Event::Lifecycle(LifecycleEvent::EncounterEnded { .. })) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event stream lagged; events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
        out.flush().context("Failed to flush output")?;

        let summary = self
            .runtime
            .finished()
            .await
            .context("Encounter did not produce a summary")?;
        info!(
            encounter = %self.runtime.id(),
            reason = %summary.reason,
            rounds = summary.rounds,
            "encounter finished"
        );
        Ok(summary)
    }
}
