//! Transmitter runs the driver on a dedicated tokio task

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace};

use crate::driver::{EncodedPacket, TelemetryDriver};
use crate::{Result, TelemetryError};
use crate::sink::ByteSink;
use crate::source::TelemetrySource;

/// Consecutive transport failures after which the task gives up.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 10;

/// Why a transmitter task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    Cancelled,
    TransportFailures,
}

/// Counters reported when a transmitter task ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransmitStats {
    /// Cycles run, including those that emitted nothing
    pub cycles: u64,
    /// Packets accepted by the sink
    pub packets: u64,
    /// Packets the sink rejected
    pub failures: u64,
    pub stop: StopReason,
}

/// Handles to a running transmitter task.
pub struct TransmitterChannels {
    /// Most recent packet written; `None` before the first and after the task ends
    pub packets: watch::Receiver<Option<Arc<EncodedPacket>>>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
    pub task: JoinHandle<TransmitStats>,
}

impl TransmitterChannels {
    /// Stream of written packets, ending when the task stops.
    ///
    /// Backed by a watch channel, so a slow consumer sees only the latest packet.
    pub fn packets(&self) -> impl Stream<Item = Arc<EncodedPacket>> + use<> {
        WatchStream::new(self.packets.clone())
            .skip_while(|opt| {
                // Nothing written yet
                let is_none = opt.is_none();
                async move { is_none }
            })
            .take_while(|opt| {
                let is_some = opt.is_some();
                async move { is_some }
            })
            .filter_map(|opt| async move { opt })
    }

    /// Cancel the task and wait for its final counters.
    pub async fn shutdown(self) -> std::result::Result<TransmitStats, tokio::task::JoinError> {
        self.cancel.cancel();
        self.task.await
    }
}

/// Spawns the periodic transmit loop.
pub struct Transmitter;

impl Transmitter {
    /// Spawn a task that runs a driver cycle once per update interval.
    ///
    /// The task is the only owner of the driver, so the change cache and the packet
    /// counter are never shared. Must be called from within a tokio runtime.
    ///
    /// Fails without spawning if the driver's update interval is zero.
    pub fn spawn<S, K>(
        driver: TelemetryDriver,
        source: S,
        sink: K,
    ) -> Result<TransmitterChannels>
    where
        S: TelemetrySource + Send + 'static,
        K: ByteSink + Send + 'static,
    {
        if driver.interval().is_zero() {
            return Err(TelemetryError::config_invalid("update interval must be non-zero"));
        }

        let (packet_tx, packet_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        let task = tokio::spawn(async move {
            Self::transmit_task(driver, source, sink, packet_tx, cancel_task).await
        });

        Ok(TransmitterChannels { packets: packet_rx, cancel, task })
    }

    async fn transmit_task<S, K>(
        mut driver: TelemetryDriver,
        source: S,
        mut sink: K,
        packet_tx: watch::Sender<Option<Arc<EncodedPacket>>>,
        cancel: CancellationToken,
    ) -> TransmitStats
    where
        S: TelemetrySource,
        K: ByteSink,
    {
        info!("Transmitter started ({:?} interval)", driver.interval());
        let mut stats = TransmitStats::default();
        let mut consecutive_failures = 0u32;

        let mut ticker = tokio::time::interval(driver.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Transmitter cancelled");
                    stats.stop = StopReason::Cancelled;
                    break;
                }
                _ = ticker.tick() => {}
            }

            stats.cycles += 1;
            match driver.tick(&source, &mut sink) {
                Ok(Some(packet)) => {
                    consecutive_failures = 0;
                    stats.packets += 1;
                    trace!("Packet {} written ({} bytes)", packet.id, packet.len());
                    packet_tx.send_replace(Some(Arc::new(packet)));
                }
                Ok(None) => {}
                Err(e) => {
                    consecutive_failures += 1;
                    stats.failures += 1;
                    error!(
                        "Transport error ({}/{}): {}",
                        consecutive_failures, MAX_CONSECUTIVE_FAILURES, e
                    );

                    if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                        error!("Too many transport errors, shutting down");
                        stats.stop = StopReason::TransportFailures;
                        break;
                    }
                }
            }
        }

        packet_tx.send_replace(None);
        info!(
            "Transmitter ended after {} cycles ({} packets, {} failures)",
            stats.cycles, stats.packets, stats.failures
        );
        stats
    }
}
