//! Periodic regeneration of mimic values.

use std::sync::Arc;
use std::time::Duration;

use mimic_core::{EntropySource, MimicError, MimicResult, MimicSettings, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::generator::generate_with;

/// Background task that regenerates a mimic every
/// `regenerate_interval_seconds` and sends each result to a channel.
///
/// The first result is sent one full interval after [`spawn`](Self::spawn);
/// producing the initial value is left to the caller. The task ends when
/// [`stop`](Self::stop) is called, when the receiver is dropped, or after a
/// [`MimicError::DomainRequired`] or [`MimicError::Dns`] has been delivered,
/// since retrying with the same settings would fail again.
#[derive(Debug)]
pub struct Regenerator {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Regenerator {
    /// Start regenerating on the current tokio runtime.
    #[must_use]
    pub fn spawn(
        settings: MimicSettings,
        entropy: Arc<dyn EntropySource>,
        results: mpsc::Sender<Result<MimicResult>>,
    ) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let period = Duration::from_secs(u64::from(settings.regenerate_interval_seconds.max(1)));

        info!(
            mimic_type = %settings.mimic_type,
            interval_secs = period.as_secs(),
            "starting regenerator"
        );

        let handle = tokio::spawn(run(settings, entropy, results, shutdown_rx, period));
        Self { shutdown, handle }
    }

    /// Returns true once the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signal the task to stop and wait for it to exit.
    pub async fn stop(self) {
        // The task may already be gone, in which case nobody is listening.
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!("regenerator task failed: {e}");
        }
    }
}

async fn run(
    settings: MimicSettings,
    entropy: Arc<dyn EntropySource>,
    results: mpsc::Sender<Result<MimicResult>>,
    mut shutdown: watch::Receiver<bool>,
    period: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => {
                info!("regenerator stopped");
                break;
            }
            _ = ticker.tick() => {
                let result = generate_with(&settings, entropy.as_ref());
                let bad_domain = matches!(
                    result,
                    Err(MimicError::DomainRequired | MimicError::Dns(_))
                );

                if results.send(result).await.is_err() {
                    debug!("result receiver dropped, stopping regenerator");
                    break;
                }
                if bad_domain {
                    warn!("DNS mimic has no usable domain, regeneration paused until settings change");
                    break;
                }
                debug!(mimic_type = %settings.mimic_type, "regenerated mimic");
            }
        }
    }
}
