//! Frame scheduling
//!
//! [`FrameScheduler`] turns host frame timestamps into clamped frame steps.
//! [`FrameDriver`] produces those timestamps on a tokio interval for hosts
//! without a display refresh signal.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::scroll::{ScrollConfig, ScrollConfigExt};

#[derive(Debug)]
pub struct FrameScheduler {
    running: bool,
    last: Option<Duration>,
    max_step: f64,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(config: &ScrollConfig) -> Self {
        Self::with_max_step(config.max_frame_step())
    }

    pub fn with_max_step(max_step: f64) -> Self {
        Self {
            running: false,
            last: None,
            max_step: max_step.max(0.0),
            frames: 0,
        }
    }

    /// Start producing frames; returns false if already running
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.last = None;
        debug!("Frame scheduler started");
        true
    }

    /// Stop; no frame begins after this returns
    pub fn stop(&mut self) {
        if self.running {
            debug!("Frame scheduler stopped after {} frames", self.frames);
        }
        self.running = false;
        self.last = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Begin a frame at host time `now`, returning its step in seconds
    ///
    /// The first frame after a start has a zero step. Steps are clamped to
    /// the configured maximum and never negative.
    pub fn begin_frame(&mut self, now: Duration) -> Option<f64> {
        if !self.running {
            return None;
        }
        let dt = match self.last {
            Some(last) => now.saturating_sub(last).as_secs_f64().min(self.max_step),
            None => 0.0,
        };
        self.last = Some(now);
        self.frames += 1;
        Some(dt)
    }
}

/// Interval-driven frame source
#[derive(Debug, Clone)]
pub struct FrameDriver {
    tick: Duration,
}

impl FrameDriver {
    pub fn new(config: &ScrollConfig) -> Self {
        Self::with_tick(config.animation_tick_duration())
    }

    pub fn with_tick(tick: Duration) -> Self {
        Self { tick }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Call `on_frame` with the time since start on every tick until
    /// shutdown; returns the number of frames produced
    pub async fn run<F>(&self, mut on_frame: F, mut shutdown: watch::Receiver<bool>) -> u64
    where
        F: FnMut(Duration),
    {
        let start = Instant::now();
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut frames = 0;

        info!("Frame driver started: tick={}ms", self.tick.as_millis());

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Frame driver received shutdown signal");
                        break;
                    }
                }
                now = interval.tick() => {
                    frames += 1;
                    on_frame(now.duration_since(start));
                }
            }
        }

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_frame_requires_start() {
        let mut scheduler = FrameScheduler::with_max_step(0.1);
        assert_eq!(scheduler.begin_frame(Duration::ZERO), None);

        assert!(scheduler.start());
        assert!(!scheduler.start());
        assert_eq!(scheduler.begin_frame(Duration::from_millis(1000)), Some(0.0));
        let dt = scheduler.begin_frame(Duration::from_millis(1016)).unwrap();
        assert!((dt - 0.016).abs() < 1e-9);

        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.begin_frame(Duration::from_millis(1032)), None);
        assert_eq!(scheduler.frames(), 2);
    }

    #[test]
    fn test_long_gap_is_clamped() {
        let mut scheduler = FrameScheduler::new(&ScrollConfig::default());
        scheduler.start();
        scheduler.begin_frame(Duration::ZERO);
        assert_eq!(scheduler.begin_frame(Duration::from_secs(30)), Some(0.1));
        // Clock going backwards yields a zero step
        assert_eq!(scheduler.begin_frame(Duration::from_secs(29)), Some(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_ticks_until_shutdown() {
        let driver = FrameDriver::with_tick(Duration::from_millis(10));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut stamps = Vec::new();

        let stop = async {
            tokio::time::sleep(Duration::from_millis(35)).await;
            shutdown_tx.send(true).unwrap();
        };
        let (frames, ()) = tokio::join!(driver.run(|now| stamps.push(now), shutdown_rx), stop);

        assert!(frames >= 3);
        assert_eq!(frames as usize, stamps.len());
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
        assert!(*stamps.last().unwrap() <= Duration::from_millis(35));
    }
}
