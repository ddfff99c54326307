//! Nested timing of named actions.

use std::fmt;
use std::time::Duration;

use crate::ActionGuard;
use crate::in_flight::{InFlightStack, TimedAction};
use crate::pal::{Platform, PlatformFacade};
use crate::session::SharedState;

/// Column that per-action lines in detailed output are aligned to.
const LINE_PREFIX_WIDTH: usize = 30;

const CLOSE_PREFIX: &str = " ### log() for action:";

/// Measures named actions and accumulates their durations into a [`Session`](crate::Session).
///
/// Actions are opened with [`start()`](Self::start) and closed with [`log()`](Self::log).
/// Closing by name resolves to the most recently started open action with that name, so
/// actions can nest and need not be closed in strict reverse order. Closing with an empty name
/// closes the most recent action whatever its name.
///
/// Each registry counts as live in its session until dropped. Dropping a registry force-closes
/// any actions still open; dropping the last live registry of a session writes the session's
/// report and clears its totals.
///
/// # Examples
///
/// ```
/// use action_clock::Session;
///
/// let session = Session::new();
/// let mut registry = session.registry("pipeline");
///
/// registry.start("decode");
/// registry.start("decompress");
/// registry.log("decompress");
/// registry.log("decode");
///
/// registry.log("pipeline");
/// assert_eq!(registry.open_actions(), 0);
/// ```
#[derive(Debug)]
pub struct Registry {
    session: SharedState,
    platform: PlatformFacade,
    in_flight: InFlightStack,
    logging_enabled: bool,
    detailed_output: bool,
    nesting_level: usize,
}

impl Registry {
    pub(crate) fn new(session: SharedState, logging_enabled: bool, detailed_output: bool) -> Self {
        let platform = {
            let mut state = session.borrow_mut();
            state.register_registry();
            state.platform().clone()
        };

        Self {
            session,
            platform,
            in_flight: InFlightStack::new(),
            logging_enabled,
            detailed_output,
            nesting_level: 0,
        }
    }

    /// Starts measuring an action.
    ///
    /// The same name may be started again while an earlier instance is still open; each start
    /// needs its own close. Does nothing if logging is disabled for this registry.
    pub fn start(&mut self, name: impl Into<String>) {
        if !self.logging_enabled {
            return;
        }

        let name = name.into();
        self.nesting_level = self.nesting_level.saturating_add(1);

        if self.detailed_output {
            let indent = Indent(self.indent_depth());
            self.session
                .borrow_mut()
                .write_line(format_args!("{:LINE_PREFIX_WIDTH$}{indent}{name}", ""));
        }

        log::debug!("started action '{name}'");

        // Timestamps are taken after any output so that writing is not charged to the action.
        let start_cycles = self.platform.cycle_count();
        let start_micros = as_micros(self.platform.monotonic_time());

        self.in_flight.push(TimedAction {
            name,
            start_cycles,
            start_micros,
        });
    }

    /// Stops measuring an action and adds its duration to the session totals.
    ///
    /// With a non-empty `name`, closes the most recently started open action of that name. If
    /// there is none, a warning is written to stderr and to the session output and nothing else
    /// happens.
    ///
    /// With an empty `name`, closes the most recently started open action and writes a warning
    /// noting the implicit close (see also [`log_last()`](Self::log_last)).
    ///
    /// Does nothing if logging is disabled for this registry or no action is open.
    pub fn log(&mut self, name: &str) {
        if !self.logging_enabled || self.in_flight.is_empty() {
            return;
        }

        self.close(name);
    }

    /// Closes the most recently started open action, whatever its name.
    ///
    /// Equivalent to `log("")`.
    pub fn log_last(&mut self) {
        self.log("");
    }

    /// Starts an action and returns a guard that closes it when dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use action_clock::Session;
    ///
    /// let session = Session::new();
    /// let mut registry = session.registry("");
    ///
    /// for chunk in 0..3 {
    ///     let _chunk = registry.scope("chunk");
    ///     // Process the chunk.
    /// }
    /// ```
    pub fn scope(&mut self, name: impl Into<String>) -> ActionGuard<'_> {
        ActionGuard::new(self, name.into())
    }

    /// Enables or disables all recording by this registry.
    ///
    /// Actions already open stay open; while disabled they cannot be closed except by
    /// dropping the registry.
    pub fn set_logging_enabled(&mut self, enabled: bool) {
        self.logging_enabled = enabled;
    }

    /// Whether this registry records actions.
    #[must_use]
    pub fn is_logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// Enables or disables a line of output for every started and closed action.
    pub fn set_detailed_output(&mut self, enabled: bool) {
        self.detailed_output = enabled;
    }

    /// Whether this registry writes a line for every started and closed action.
    #[must_use]
    pub fn is_detailed_output(&self) -> bool {
        self.detailed_output
    }

    /// The number of actions started but not yet closed.
    #[must_use]
    pub fn open_actions(&self) -> usize {
        self.in_flight.len()
    }

    /// Names of the actions started but not yet closed, in the order they were started.
    pub fn open_action_names(&self) -> impl Iterator<Item = &str> {
        self.in_flight.names()
    }

    /// How deeply the current action is nested within this registry.
    #[must_use]
    pub fn nesting_level(&self) -> usize {
        self.nesting_level
    }

    fn close(&mut self, name: &str) {
        // End timestamps are taken before any output so that writing is not charged to the action.
        let end_cycles = self.platform.cycle_count();
        let end_micros = as_micros(self.platform.monotonic_time());

        let action = if name.is_empty() {
            let Some(action) = self.in_flight.pop_last() else {
                return;
            };

            self.session.borrow_mut().write_line(format_args!(
                " ### WARNING log() automatically closed action: {}",
                action.name
            ));

            action
        } else if let Some(action) = self.in_flight.remove_latest(name) {
            action
        } else {
            let warning = format!(" ### WARNING action '{name}' has not been found");
            eprintln!("{warning}");
            self.session
                .borrow_mut()
                .write_line(format_args!("{warning}"));
            return;
        };

        let elapsed_millis = micros_to_millis(end_micros.saturating_sub(action.start_micros));
        let elapsed_cycles = end_cycles.saturating_sub(action.start_cycles);

        if self.detailed_output {
            let indent = Indent(self.indent_depth());
            let mut session = self.session.borrow_mut();
            let cycle_millis = session.cycle_rate().to_millis(elapsed_cycles);

            session.write_line(format_args!(
                "{CLOSE_PREFIX:<LINE_PREFIX_WIDTH$}{indent}{} # ms/ms(cycles)/Mcycles: {elapsed_millis:.3} / {cycle_millis:.3} / {:.3}",
                action.name,
                mega(elapsed_cycles)
            ));
        }

        self.session
            .borrow_mut()
            .accumulate(&action.name, elapsed_millis);

        self.nesting_level = self.nesting_level.saturating_sub(1);

        log::debug!(
            "closed action '{}' after {elapsed_millis:.3} ms",
            action.name
        );
    }

    // Indentation nests this registry's actions below those of other live registries.
    fn indent_depth(&self) -> usize {
        self.nesting_level
            .saturating_add(self.session.borrow().live_registries())
            .saturating_sub(1)
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        // Closing ignores `logging_enabled` here, otherwise actions left open by a registry
        // that was disabled afterwards would never drain.
        while !self.in_flight.is_empty() {
            self.session.borrow_mut().write_line(format_args!(
                " ### registry dropped with open actions, forcing close"
            ));
            self.close("");
        }

        self.session.borrow_mut().unregister_registry();
    }
}

/// Four spaces per level.
struct Indent(usize);

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.0 {
            f.write_str("    ")?;
        }
        Ok(())
    }
}

fn as_micros(time: Duration) -> u64 {
    time.as_micros()
        .try_into()
        .expect("monotonic time since the platform epoch fits in u64 microseconds")
}

#[expect(
    clippy::cast_precision_loss,
    reason = "exact below 2^53 microseconds, i.e. for any realistic measurement"
)]
fn micros_to_millis(micros: u64) -> f64 {
    micros as f64 / 1000.0
}

#[expect(
    clippy::cast_precision_loss,
    reason = "informational figure printed with three decimals"
)]
fn mega(cycles: u64) -> f64 {
    cycles as f64 / 1_000_000.0
}
