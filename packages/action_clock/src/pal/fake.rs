//! Fake platform implementation for testing.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::pal::abstractions::Platform;

/// The fake cycle counter ticks at 1 GHz so cycle math in tests is easy to follow.
pub(crate) const FAKE_CYCLES_PER_SECOND: u64 = 1_000_000_000;

/// Internal state for the fake platform that can be shared between clones.
#[derive(Debug, Default)]
struct FakePlatformState {
    time: Cell<Duration>,
    cycles: Cell<u64>,
}

/// Fake implementation of the platform abstraction for testing.
///
/// This implementation allows tests to control the timestamps instead of relying on
/// the real clock. Multiple clones of the same `FakePlatform` share the same underlying
/// state, allowing tests to move time forward after a session has been created.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakePlatform {
    state: Rc<FakePlatformState>,
}

impl FakePlatform {
    /// Creates a new fake platform at time zero with a zero cycle count.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward, advancing the cycle counter at [`FAKE_CYCLES_PER_SECOND`].
    ///
    /// This affects all clones of this platform.
    pub(crate) fn advance(&self, by: Duration) {
        self.state.time.set(
            self.state
                .time
                .get()
                .checked_add(by)
                .expect("fake time does not realistically overflow"),
        );

        let cycles: u64 = by
            .as_nanos()
            .checked_mul(u128::from(FAKE_CYCLES_PER_SECOND))
            .and_then(|c| c.checked_div(1_000_000_000))
            .and_then(|c| c.try_into().ok())
            .expect("fake cycle count does not realistically overflow");

        self.state.cycles.set(
            self.state
                .cycles
                .get()
                .checked_add(cycles)
                .expect("fake cycle count does not realistically overflow"),
        );
    }

    /// Moves only the cycle counter forward, leaving the clock untouched.
    pub(crate) fn advance_cycles(&self, by: u64) {
        self.state.cycles.set(
            self.state
                .cycles
                .get()
                .checked_add(by)
                .expect("fake cycle count does not realistically overflow"),
        );
    }
}

impl Platform for FakePlatform {
    fn cycle_count(&self) -> u64 {
        self.state.cycles.get()
    }

    fn monotonic_time(&self) -> Duration {
        self.state.time.get()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn initializes_at_zero() {
        let platform = FakePlatform::new();
        assert_eq!(platform.monotonic_time(), Duration::ZERO);
        assert_eq!(platform.cycle_count(), 0);
    }

    #[test]
    fn advance_moves_clock_and_cycles() {
        let platform = FakePlatform::new();
        platform.advance(Duration::from_millis(150));

        assert_eq!(platform.monotonic_time(), Duration::from_millis(150));
        assert_eq!(platform.cycle_count(), 150_000_000);
    }

    #[test]
    fn advance_cycles_leaves_clock_alone() {
        let platform = FakePlatform::new();
        platform.advance_cycles(42);

        assert_eq!(platform.monotonic_time(), Duration::ZERO);
        assert_eq!(platform.cycle_count(), 42);
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();

        platform1.advance(Duration::from_millis(100));
        assert_eq!(platform2.monotonic_time(), Duration::from_millis(100));

        platform2.advance(Duration::from_millis(200));
        assert_eq!(platform1.monotonic_time(), Duration::from_millis(300));
    }
}
