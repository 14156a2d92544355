//! Settle timer
//!
//! The settle timer gates new decisions until a dispatched action is presumed
//! physically complete. While it is non-zero no decision may be requested or
//! applied; it strictly decreases by one per cycle and never goes negative.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Countdown of cycles remaining until the in-flight action is presumed
/// complete.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct SettleTimer {
    remaining: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SettleTimer {
    /// Cycles remaining until settled.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// True when no action is in flight and a decision may be evaluated.
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }

    /// Arm the timer for a newly dispatched action.
    pub fn arm(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    /// Count down one cycle. Saturates at zero.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_monotonic_decrement() {
        let mut timer = SettleTimer::default();
        timer.arm(3);

        let mut previous = timer.remaining();
        while !timer.is_settled() {
            timer.tick();
            assert!(timer.remaining() < previous);
            previous = timer.remaining();
        }

        // Ticking at zero stays at zero
        timer.tick();
        assert_eq!(timer.remaining(), 0);
        assert!(timer.is_settled());
    }

    #[test]
    fn test_rearm() {
        let mut timer = SettleTimer::default();
        assert!(timer.is_settled());

        timer.arm(8);
        assert_eq!(timer.remaining(), 8);
        assert!(!timer.is_settled());

        timer.tick();
        timer.arm(2);
        assert_eq!(timer.remaining(), 2);
    }
}
