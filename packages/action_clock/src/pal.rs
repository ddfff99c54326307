//! Platform abstraction layer for action timestamps.
//!
//! This module provides a platform abstraction that allows switching between
//! the real timestamp sources (hardware cycle counter and monotonic clock) and
//! fake implementations for testing purposes.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::{FAKE_CYCLES_PER_SECOND, FakePlatform};
