//! Background rotation loop.
//!
//! [`run_rotation`] ticks at [`ROTATION_TICK`] and asks the service to
//! rotate stale words until the shutdown signal flips to `true`.
//!
//! [`ROTATION_TICK`]: crate::rotation::ROTATION_TICK

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::service::WordService;

/// Drive rotation ticks every `period` until `shutdown` reads `true` or
/// its sender is dropped.
///
/// Returns the total number of slots rotated.
pub async fn run_rotation(
    service: Arc<WordService>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut total: u64 = 0;

    info!(period = ?period, "Rotation loop starting");

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            _ = interval.tick() => {
                let rotated = service.rotate_expired();
                if rotated > 0 {
                    debug!(rotated, "Rotation tick replaced words");
                    total = total.saturating_add(u64::try_from(rotated).unwrap_or(u64::MAX));
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!(total_rotated = total, "Rotation loop stopped");
    total
}

/// Spawn [`run_rotation`] on a background task.
pub fn spawn_rotation(
    service: Arc<WordService>,
    period: Duration,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<u64> {
    tokio::spawn(run_rotation(service, period, shutdown))
}
