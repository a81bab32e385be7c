//! Once-per-period refresh of the presented session time

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::SharedStore;

/// Spawn the ticker on the current tokio runtime.
///
/// Runs until the runtime shuts down or the handle is aborted.
pub fn spawn_ticker(store: SharedStore, period: Duration) -> JoinHandle<()> {
    info!("Starting session ticker every {:?}", period);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let elapsed = store.tick(crate::now());
            debug!("Session elapsed {}s", elapsed.as_secs());
        }
    })
}
