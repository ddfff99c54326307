//! Real platform implementation using the hardware cycle counter and `std::time::Instant`.

use std::time::{Duration, Instant};

use crate::pal::abstractions::Platform;

/// Real implementation of the platform abstraction.
///
/// On `x86_64` the cycle counter is the time stamp counter read via `rdtsc`. Other targets
/// have no portable cycle register, so the monotonic clock in nanoseconds stands in for it.
#[derive(Debug, Clone)]
pub(crate) struct RealPlatform {
    epoch: Instant,
}

impl RealPlatform {
    pub(crate) fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Platform for RealPlatform {
    #[cfg(target_arch = "x86_64")]
    #[cfg_attr(test, mutants::skip)] // Hardware counter, no meaningful mutation to detect.
    #[allow(unused_unsafe, reason = "the intrinsic is safe on newer toolchains only")]
    fn cycle_count(&self) -> u64 {
        // SAFETY: `rdtsc` has no preconditions and is available on every x86_64 processor.
        unsafe {
            core::arch::x86_64::_rdtsc()
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    #[cfg_attr(test, mutants::skip)] // Hardware counter, no meaningful mutation to detect.
    fn cycle_count(&self) -> u64 {
        self.epoch
            .elapsed()
            .as_nanos()
            .try_into()
            .expect("a process does not run for 584 years")
    }

    fn monotonic_time(&self) -> Duration {
        self.epoch.elapsed()
    }
}
