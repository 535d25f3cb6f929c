//! Timer utilities for search time management.
//!
//! Spawns a background thread that signals a stop flag once a deadline is
//! reached.

use std::thread;
use std::time::{Duration, Instant};

use crate::sync::StopFlag;

/// Duration from now until `deadline`, or `None` if it has already passed.
#[inline]
fn duration_until(deadline: Instant) -> Option<Duration> {
    let now = Instant::now();
    if deadline > now {
        Some(deadline - now)
    } else {
        None
    }
}

/// Spawns a timer thread that sets `stop_flag` once `deadline` passes.
/// Signals immediately, without spawning, if `deadline` has already passed.
pub fn spawn_deadline_timer(deadline: Instant, stop_flag: StopFlag) {
    match duration_until(deadline) {
        Some(duration) => {
            thread::spawn(move || {
                thread::sleep(duration);
                stop_flag.stop();
            });
        }
        None => stop_flag.stop(),
    }
}
