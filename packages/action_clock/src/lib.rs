//! Nested timing of named code regions ("actions") with per-session totals.
//!
//! This package measures how long named actions take, both in wall-clock time and in cycles of
//! the processor's cycle counter, and aggregates the wall-clock time per action name. When a
//! measurement session ends, the totals are written out ranked by duration, with each action's
//! share of the longest one.
//!
//! The core types are:
//! - [`Session`] - Owns the accumulated totals and the output destination
//! - [`Registry`] - Opens and closes actions, matching closes to opens by name
//! - [`ActionGuard`] - Closes an action at the end of a scope
//! - [`Report`] - Ranked snapshot of the accumulated totals
//! - [`CycleRate`] - Converts cycle counts into time for detailed output
//!
//! This package is meant as a development tool for finding where time goes, not as a
//! production telemetry pipeline.
//!
//! # Simple usage
//!
//! ```
//! use action_clock::Session;
//!
//! let session = Session::new();
//!
//! {
//!     let mut registry = session.registry("main");
//!
//!     registry.start("load");
//!     let data = (0..10_000).collect::<Vec<u64>>();
//!     registry.log("load");
//!
//!     registry.start("sum");
//!     let sum: u64 = data.iter().sum();
//!     registry.log("sum");
//!     # _ = sum;
//! } // "main" is closed here; this was the last registry, so the totals are printed.
//! ```
//!
//! The output looks like this, with the percentage of the longest action, the accumulated
//! milliseconds and the action name:
//!
//! ```text
//!  ### action time totals [% of longest, ms, action]
//!      100.0       3.2[ms]  main
//!       71.9       2.3[ms]  load
//!        9.4       0.3[ms]  sum
//!  ### sum of subtimes/longest time: 2.6/3.2
//! ```
//!
//! The trailer compares the sum of all other actions against the longest one. When the longest
//! action encloses the others, the sum should stay below it.
//!
//! # Matching closes to opens
//!
//! [`Registry::log()`] closes the most recently started open action with the given name, so the
//! same name may be open several times and actions do not need to be closed in reverse order.
//! Closing a name that is not open writes a warning and changes nothing. Closing with an empty
//! name closes the most recent action, whatever its name.
//!
//! ```
//! use action_clock::Session;
//!
//! let session = Session::new();
//! let mut registry = session.registry("");
//!
//! registry.start("request");
//! registry.start("db_query");
//! registry.log("request"); // Closes "request" even though "db_query" is newer.
//! registry.log("db_query");
//! ```
//!
//! # Scoped measurement
//!
//! ```
//! use action_clock::Session;
//!
//! let session = Session::new();
//! let mut registry = session.registry("");
//!
//! {
//!     let mut frame = registry.scope("frame");
//!     let _layout = frame.scope("layout");
//!     // Both actions are closed at the end of this block, innermost first.
//! }
//! ```
//!
//! # Output
//!
//! Output goes to stdout unless redirected with [`Session::set_output_file()`] or
//! [`Session::set_output()`]. Registries built with
//! [`detailed_output(true)`](RegistryBuilder::detailed_output) additionally write an indented
//! line for every started and closed action. Diagnostic events are also emitted through the
//! `log` facade at debug and info level.
//!
//! # Threading
//!
//! Sessions and registries are single-threaded and cannot be sent between threads. Threads that
//! need timing should each create their own session.

mod action_guard;
mod cycle_rate;
mod error;
mod in_flight;
mod pal;
mod registry;
mod registry_builder;
mod report;
mod session;
mod sink;

pub use action_guard::ActionGuard;
pub use cycle_rate::CycleRate;
pub use error::Error;
pub(crate) use error::Result;
pub use registry::Registry;
pub use registry_builder::RegistryBuilder;
pub use report::{Report, ReportAction};
pub use session::Session;
