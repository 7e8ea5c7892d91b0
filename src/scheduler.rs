//! # Transmit Scheduler
//!
//! Drives the sample -> normalize -> pack -> encode -> write pipeline at a
//! fixed rate. One tick owns its whole pipeline execution; the only shared
//! state is the mapping table, which arrives as an immutable snapshot
//! through a `watch` channel so reconfiguration never interleaves with an
//! in-flight tick.
//!
//! Failure policy: a failed or timed-out write marks the tick failed and
//! the loop moves on - RF link flakiness is expected and a dropped frame
//! beats a stale one. If a tick overruns the period, the next tick is
//! skipped rather than queued (`MissedTickBehavior::Skip`): channel data is
//! always latest-sample-wins.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::crsf::encoder::encode_rc_frame;
use crate::mapping::{build_channel_set, ChannelDefaults, MappingTable};
use crate::sampler::{InputSampler, InputSnapshot};
use crate::serial::SerialPortIO;

/// Scheduler timing and channel-default policy.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerSettings {
    /// Time between RC frames.
    pub period: Duration,
    /// Budget for one blocking serial write; exceeding it fails the tick.
    pub write_timeout: Duration,
    /// Default values for unmapped channels.
    pub defaults: ChannelDefaults,
}

impl SchedulerSettings {
    /// Settings for a target frame rate in Hz.
    pub fn at_rate(rate_hz: u32, write_timeout: Duration, defaults: ChannelDefaults) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / rate_hz as f64),
            write_timeout,
            defaults,
        }
    }
}

/// Counters accumulated across the life of the transmit loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Frames successfully written.
    pub sent: u64,
    /// Ticks whose write failed or timed out.
    pub failed: u64,
    /// Raw samples clamped into the channel domain.
    pub clamped: u64,
    /// Ticks that fell back to the last known snapshot.
    pub sampler_failures: u64,
}

/// The fixed-rate transmit pipeline.
pub struct TransmitScheduler<S, P> {
    sampler: S,
    port: P,
    mapping: watch::Receiver<Arc<MappingTable>>,
    settings: SchedulerSettings,
    last_snapshot: Option<InputSnapshot>,
    stats: TickStats,
}

impl<S: InputSampler, P: SerialPortIO> TransmitScheduler<S, P> {
    pub fn new(
        sampler: S,
        port: P,
        mapping: watch::Receiver<Arc<MappingTable>>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            sampler,
            port,
            mapping,
            settings,
            last_snapshot: None,
            stats: TickStats::default(),
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Run the transmit loop until the future is dropped.
    ///
    /// Ticks are short and idempotent, so shutdown is simply dropping this
    /// future (e.g. from the losing branch of a `select!`) and releasing
    /// the port.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.settings.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(period_us = self.settings.period.as_micros() as u64, "transmit loop started");

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// Execute one pipeline tick. Returns whether a frame reached the port.
    pub async fn tick(&mut self) -> bool {
        let snapshot = match self.sampler.sample() {
            Ok(snapshot) => {
                self.last_snapshot = Some(snapshot.clone());
                snapshot
            }
            Err(e) => {
                // Keep the link alive on the last known values; other
                // channels may still be safety-critical.
                self.stats.sampler_failures += 1;
                warn!("input sampling failed ({e}), holding last known values");
                self.last_snapshot.clone().unwrap_or_default()
            }
        };

        let table = self.mapping.borrow().clone();
        let (channels, report) = build_channel_set(&table, &snapshot, &self.settings.defaults);
        if report.clamped > 0 {
            self.stats.clamped += report.clamped as u64;
            warn!(clamped = report.clamped, "raw samples outside expected range were clamped");
        }
        if report.overridden > 0 {
            debug!(overridden = report.overridden, "channel conflicts resolved last-write-wins");
        }

        let frame = encode_rc_frame(&channels);
        let write_timeout = self.settings.write_timeout;
        let port = &mut self.port;
        let result = timeout(write_timeout, async {
            port.write_all(&frame).await?;
            port.flush().await
        })
        .await;

        match result {
            Ok(Ok(())) => {
                self.stats.sent += 1;
                true
            }
            Ok(Err(e)) => {
                self.stats.failed += 1;
                warn!("frame write failed: {e}");
                false
            }
            Err(_) => {
                self.stats.failed += 1;
                warn!(timeout_ms = write_timeout.as_millis() as u64, "frame write timed out");
                false
            }
        }
    }
}
