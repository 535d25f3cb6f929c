//! Time control: turns `go`'s wtime/btime/winc/binc/movetime/movestogo into
//! a soft/hard millisecond budget for iterative deepening.

use std::time::Duration;

pub const DEFAULT_MOVES_TO_GO: u64 = 30;

const PANIC_THRESHOLD_MS: u64 = 5000;
const MIN_MOVES_TO_GO: u64 = 10;
const CRITICAL_TIME_MARGIN_MS: u64 = 50;
const PANIC_TIME_FRACTION: f64 = 0.05;
const PANIC_MIN_FRACTION: u64 = 5;
const PANIC_HARD_FRACTION: u64 = 3;
const LONG_TIME_CONTROL_MS: u64 = 300_000;
const MEDIUM_TIME_CONTROL_MS: u64 = 60_000;
const LONG_MOVES_ESTIMATE: u64 = 40;
const MEDIUM_MOVES_ESTIMATE: u64 = 30;
const SHORT_MOVES_ESTIMATE: u64 = 25;

#[derive(Debug, Clone, Copy)]
pub struct TimeConfig {
    pub move_overhead_ms: u64,
    pub soft_time_percent: u64,
    pub hard_time_percent: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        TimeConfig { move_overhead_ms: 50, soft_time_percent: 70, hard_time_percent: 90 }
    }
}

/// Which of `go`'s mutually-exclusive time specifications applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    #[default]
    Infinite,
    MoveTime {
        time_ms: u64,
    },
    Incremental {
        time_left_ms: u64,
        inc_ms: u64,
        movestogo: Option<u64>,
    },
}

impl TimeControl {
    #[must_use]
    pub fn incremental(time_left: Duration, inc: Duration, movestogo: Option<u64>) -> Self {
        TimeControl::Incremental { time_left_ms: time_left.as_millis() as u64, inc_ms: inc.as_millis() as u64, movestogo }
    }

    #[must_use]
    pub fn move_time(time: Duration) -> Self {
        TimeControl::MoveTime { time_ms: time.as_millis() as u64 }
    }

    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite)
    }

    /// `(soft_time_ms, hard_time_ms)`, or `(u64::MAX, u64::MAX)` for an
    /// unbounded search.
    #[must_use]
    pub fn compute_limits(&self, config: &TimeConfig) -> (u64, u64) {
        match self {
            TimeControl::Infinite => (u64::MAX, u64::MAX),
            TimeControl::MoveTime { time_ms } => {
                let capped = (*time_ms).max(1);
                (capped, capped)
            }
            TimeControl::Incremental { time_left_ms, inc_ms, movestogo } => {
                compute_incremental_limits(*time_left_ms, *inc_ms, *movestogo, config)
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_incremental_limits(time_left_ms: u64, inc_ms: u64, movestogo: Option<u64>, config: &TimeConfig) -> (u64, u64) {
    let safe_ms = time_left_ms.saturating_sub(config.move_overhead_ms);

    if time_left_ms <= config.move_overhead_ms.saturating_add(CRITICAL_TIME_MARGIN_MS) {
        let fallback = (time_left_ms / 2).max(1);
        return (fallback, fallback);
    }

    if safe_ms < PANIC_THRESHOLD_MS {
        let panic_factor = safe_ms as f64 / PANIC_THRESHOLD_MS as f64;
        let target = (safe_ms as f64 * PANIC_TIME_FRACTION * panic_factor) as u64 + inc_ms;
        let target = target.min(safe_ms / PANIC_MIN_FRACTION).max(1);
        let hard = (safe_ms / PANIC_HARD_FRACTION).max(target).max(1);
        return (target, hard);
    }

    let moves_to_go = movestogo
        .unwrap_or(if safe_ms > LONG_TIME_CONTROL_MS {
            LONG_MOVES_ESTIMATE
        } else if safe_ms > MEDIUM_TIME_CONTROL_MS {
            MEDIUM_MOVES_ESTIMATE
        } else {
            SHORT_MOVES_ESTIMATE
        })
        .max(MIN_MOVES_TO_GO);

    let base_time = safe_ms / moves_to_go + inc_ms;
    let soft_cap = safe_ms * config.soft_time_percent / 100;
    let hard_cap = safe_ms * config.hard_time_percent / 100;
    let soft_ms = base_time.min(soft_cap).max(1);
    let hard_ms = hard_cap.max(soft_ms).max(1);
    (soft_ms, hard_ms)
}
