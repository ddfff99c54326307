//! Platform facade for switching between real and fake implementations.

use std::time::Duration;

use crate::pal::abstractions::Platform;
#[cfg(test)]
use crate::pal::fake::FakePlatform;
use crate::pal::real::RealPlatform;

/// Facade that allows switching between real and fake platform implementations.
///
/// This enum provides a unified interface to either the real platform
/// (hardware counter and operating system clock) or fake platform (for testing).
#[derive(Debug, Clone)]
pub(crate) enum PlatformFacade {
    /// Real platform implementation.
    Real(RealPlatform),

    /// Fake platform implementation for testing.
    #[cfg(test)]
    Fake(FakePlatform),
}

impl PlatformFacade {
    /// Creates a new platform facade using the real implementation.
    pub(crate) fn real() -> Self {
        Self::Real(RealPlatform::new())
    }

    /// Creates a new platform facade using the fake implementation.
    #[cfg(test)]
    pub(crate) fn fake(fake_platform: FakePlatform) -> Self {
        Self::Fake(fake_platform)
    }
}

impl Platform for PlatformFacade {
    fn cycle_count(&self) -> u64 {
        match self {
            Self::Real(platform) => platform.cycle_count(),
            #[cfg(test)]
            Self::Fake(platform) => platform.cycle_count(),
        }
    }

    fn monotonic_time(&self) -> Duration {
        match self {
            Self::Real(platform) => platform.monotonic_time(),
            #[cfg(test)]
            Self::Fake(platform) => platform.monotonic_time(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn platform_facade_real() {
        let facade = PlatformFacade::real();
        assert!(matches!(facade, PlatformFacade::Real(_)));
    }

    #[test]
    fn platform_facade_fake() {
        let facade = PlatformFacade::fake(FakePlatform::new());
        assert!(matches!(facade, PlatformFacade::Fake(_)));
    }

    #[test]
    fn platform_facade_forwards_to_fake() {
        let fake_platform = FakePlatform::new();
        let facade = PlatformFacade::fake(fake_platform.clone());

        fake_platform.advance(Duration::from_millis(300));

        assert_eq!(facade.monotonic_time(), Duration::from_millis(300));
        assert_eq!(facade.cycle_count(), 300_000_000);
    }
}
