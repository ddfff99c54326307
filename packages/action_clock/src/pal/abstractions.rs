//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Duration;

/// Provides the timestamp sources read at the start and end of every action.
///
/// This trait abstracts the underlying platform-specific counters, allowing for both
/// real implementations (hardware registers and the operating system clock) and fake
/// implementations (for testing).
pub(crate) trait Platform: Debug + 'static {
    /// Reads the free-running cycle counter.
    ///
    /// The value is opaque and only meaningful as a difference between two reads on the
    /// same platform instance, converted through a [`CycleRate`](crate::CycleRate).
    fn cycle_count(&self) -> u64;

    /// Reads the monotonic clock as time elapsed since an arbitrary platform epoch.
    fn monotonic_time(&self) -> Duration;
}
