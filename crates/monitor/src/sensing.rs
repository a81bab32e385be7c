//! Sensing loop worker
//!
//! Pulls one landmark frame per cycle on a dedicated OS thread (landmark
//! sources block) and publishes the results into the shared store. A failed
//! read skips the cycle; only a closed source or a stop request ends the loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

use landmark_source::{LandmarkSource, SourceError};

use crate::{MonitorError, SharedStore};

/// Counters published by the sensing thread
#[derive(Debug, Default)]
pub struct SensingStats {
    cycles: AtomicU64,
    acquisition_failures: AtomicU64,
    alive: AtomicBool,
}

impl SensingStats {
    /// Completed sensing cycles
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Cycles skipped because no frame could be acquired
    pub fn acquisition_failures(&self) -> u64 {
        self.acquisition_failures.load(Ordering::Relaxed)
    }

    /// Whether the loop is still running
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// Sensing loop launcher
pub struct SensingLoop;

impl SensingLoop {
    /// Spawn the loop on its own thread
    pub fn spawn<S>(mut source: S, store: SharedStore) -> Result<SensingHandle, MonitorError>
    where
        S: LandmarkSource + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(SensingStats::default());
        stats.alive.store(true, Ordering::Release);

        let shutdown_clone = shutdown.clone();
        let stats_clone = stats.clone();

        let thread = std::thread::Builder::new()
            .name("sensing".to_string())
            .spawn(move || {
                info!("Sensing loop started");
                while !shutdown_clone.load(Ordering::SeqCst) {
                    match source.next_frame() {
                        Ok(frame) => {
                            store.process_frame(&frame);
                            stats_clone.cycles.fetch_add(1, Ordering::Relaxed);
                            metrics::counter!("sensing_cycles_total").increment(1);
                        }
                        Err(SourceError::Closed) => {
                            info!("Landmark source closed");
                            break;
                        }
                        Err(e) => {
                            stats_clone.acquisition_failures.fetch_add(1, Ordering::Relaxed);
                            metrics::counter!("acquisition_failures_total").increment(1);
                            match e {
                                SourceError::Unavailable(reason) => {
                                    debug!("Skipping sensing cycle: {}", reason)
                                }
                                other => warn!("Landmark source error: {}", other),
                            }
                        }
                    }
                }
                stats_clone.alive.store(false, Ordering::Release);
                info!("Sensing loop stopped");
            })?;

        Ok(SensingHandle {
            shutdown,
            stats,
            thread: Some(thread),
        })
    }
}

/// Control handle for a running sensing loop
pub struct SensingHandle {
    shutdown: Arc<AtomicBool>,
    stats: Arc<SensingStats>,
    thread: Option<JoinHandle<()>>,
}

impl SensingHandle {
    /// Ask the loop to finish after the current cycle
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Shared view of the loop counters
    pub fn stats(&self) -> Arc<SensingStats> {
        self.stats.clone()
    }

    /// Wait for the thread to exit
    pub fn join(mut self) -> Result<(), MonitorError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| MonitorError::SensingPanicked),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dms::{DetectionState, DmsConfig, DrowsinessReason, DrowsinessState};
    use landmark_source::{ChannelSource, LandmarkFrame};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn store() -> SharedStore {
        SharedStore::new(DetectionState::new(DmsConfig::default()).unwrap())
    }

    #[test]
    fn test_loop_publishes_detection() {
        let store = store();
        let (tx, rx) = mpsc::channel();
        let source = ChannelSource::new(rx, Duration::from_millis(20));

        let t0 = Instant::now();
        store.start(t0);
        let handle = SensingLoop::spawn(source, store.clone()).unwrap();
        let stats = handle.stats();

        for ms in (0..=6_000u64).step_by(100) {
            tx.send(LandmarkFrame::empty(t0 + Duration::from_millis(ms)))
                .unwrap();
        }
        drop(tx);
        handle.join().unwrap();

        assert_eq!(stats.cycles(), 61);
        assert!(!stats.is_alive());
        assert_eq!(
            store.drowsiness(),
            DrowsinessState::Latched(DrowsinessReason::HandEye)
        );
    }

    /// Fails every other read, then closes
    struct Flaky {
        calls: u32,
        t0: Instant,
    }

    impl LandmarkSource for Flaky {
        fn next_frame(&mut self) -> Result<LandmarkFrame, SourceError> {
            self.calls += 1;
            if self.calls > 10 {
                Err(SourceError::Closed)
            } else if self.calls % 2 == 0 {
                Err(SourceError::Unavailable("camera busy".into()))
            } else {
                Ok(LandmarkFrame::empty(self.t0))
            }
        }
    }

    #[test]
    fn test_loop_survives_acquisition_failures() {
        let handle = SensingLoop::spawn(
            Flaky {
                calls: 0,
                t0: Instant::now(),
            },
            store(),
        )
        .unwrap();
        let stats = handle.stats();
        handle.join().unwrap();

        assert_eq!(stats.cycles(), 5);
        assert_eq!(stats.acquisition_failures(), 5);
    }

    #[test]
    fn test_stop_request() {
        let (_tx, rx) = mpsc::channel::<LandmarkFrame>();
        let source = ChannelSource::new(rx, Duration::from_millis(5));
        let handle = SensingLoop::spawn(source, store()).unwrap();
        let stats = handle.stats();

        handle.stop();
        handle.join().unwrap();
        assert!(!stats.is_alive());
    }
}
