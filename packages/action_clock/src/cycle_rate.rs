//! Conversion between cycle counter ticks and real time.

use std::fmt;
use std::num::NonZero;
use std::time::Duration;

/// How many cycle counter ticks elapse per second on the machine doing the measuring.
///
/// Cycle counts are only used for the supplementary high-resolution figures in detailed
/// output, so a rough rate is acceptable. The default is a typical desktop base clock;
/// use [`Session::calibrate_cycle_rate()`](crate::Session::calibrate_cycle_rate) to measure
/// the real rate of the current machine.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use action_clock::CycleRate;
///
/// let rate = CycleRate::new(NonZero::new(2_000_000_000).unwrap());
/// assert_eq!(rate.to_millis(4_000_000), 2.0);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CycleRate {
    cycles_per_second: NonZero<u64>,
}

impl CycleRate {
    /// Rate assumed when nothing else has been configured.
    ///
    /// On `x86_64` this is the 2.6 GHz base clock of a typical laptop processor. Other targets
    /// count nanoseconds in place of cycles, which makes the rate exactly 1 GHz.
    #[cfg(target_arch = "x86_64")]
    pub const DEFAULT: Self = Self {
        cycles_per_second: NonZero::new(2_600_000_000).expect("literal is not zero"),
    };

    /// Rate assumed when nothing else has been configured.
    ///
    /// On `x86_64` this is the 2.6 GHz base clock of a typical laptop processor. Other targets
    /// count nanoseconds in place of cycles, which makes the rate exactly 1 GHz.
    #[cfg(not(target_arch = "x86_64"))]
    pub const DEFAULT: Self = Self {
        cycles_per_second: NonZero::new(1_000_000_000).expect("literal is not zero"),
    };

    /// Creates a rate from a known cycles-per-second figure.
    #[must_use]
    pub const fn new(cycles_per_second: NonZero<u64>) -> Self {
        Self { cycles_per_second }
    }

    /// Derives a rate from a pair of samples: cycles counted over a known elapsed time.
    ///
    /// Returns `None` if either sample is zero, as no meaningful rate can be derived.
    #[must_use]
    pub fn from_samples(cycles: u64, elapsed: Duration) -> Option<Self> {
        let nanos = elapsed.as_nanos();

        if nanos == 0 {
            return None;
        }

        let per_second = u128::from(cycles)
            .checked_mul(1_000_000_000)?
            .checked_div(nanos)?;

        NonZero::new(u64::try_from(per_second).ok()?).map(Self::new)
    }

    /// The number of cycles counted per second.
    #[must_use]
    pub const fn cycles_per_second(&self) -> NonZero<u64> {
        self.cycles_per_second
    }

    /// Converts a cycle count into the real time it represents.
    #[must_use]
    pub fn to_duration(&self, cycles: u64) -> Duration {
        let nanos = u128::from(cycles)
            .checked_mul(1_000_000_000)
            .expect("u64 times 1e9 always fits in u128")
            .checked_div(u128::from(self.cycles_per_second.get()))
            .expect("NonZero guards against division by zero");

        Duration::from_nanos(
            nanos
                .try_into()
                .expect("cycle counts of a realistic measurement fit in u64 nanoseconds"),
        )
    }

    /// Converts a cycle count into fractional milliseconds.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "supplementary figure, a few ulps of imprecision are irrelevant"
    )]
    pub fn to_millis(&self, cycles: u64) -> f64 {
        cycles as f64 * 1000.0 / self.cycles_per_second.get() as f64
    }
}

impl Default for CycleRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CycleRate {
    #[expect(
        clippy::cast_precision_loss,
        reason = "display only, rounded to one decimal anyway"
    )]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} MHz",
            self.cycles_per_second.get() as f64 / 1_000_000.0
        )
    }
}
