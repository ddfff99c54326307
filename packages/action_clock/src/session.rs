use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use foldhash::{HashMap, HashMapExt};

use crate::pal::{Platform, PlatformFacade};
use crate::sink::OutputSink;
use crate::{CycleRate, Registry, RegistryBuilder, Report, Result};

/// State shared between a [`Session`] and every [`Registry`] created from it.
pub(crate) type SharedState = Rc<RefCell<SessionState>>;

/// A measurement session: the context that owns accumulated action times and the output sink.
///
/// Registries created from the same session accumulate into the same per-action totals and
/// write to the same output. The session counts its live registries; when the last one is
/// dropped, the totals are written to the output as a [`Report`] and then cleared, so the next
/// wave of registries starts a fresh report.
///
/// Sessions are independent of each other. They are single-threaded: neither a session nor its
/// registries can be sent to another thread.
///
/// # Examples
///
/// ```
/// use action_clock::Session;
///
/// let session = Session::new();
///
/// {
///     let mut registry = session.registry("request");
///
///     registry.start("parse");
///     // Parse the request.
///     registry.log("parse");
///
///     registry.start("respond");
///     // Produce the response.
///     registry.log("respond");
/// } // "request" is force-closed here and, as the last registry, the totals are printed.
/// ```
#[derive(Debug)]
pub struct Session {
    state: SharedState,
}

#[derive(Debug)]
pub(crate) struct SessionState {
    totals: HashMap<String, f64>,
    live_registries: usize,
    sink: OutputSink,
    platform: PlatformFacade,
    cycle_rate: CycleRate,
}

impl Session {
    /// Creates a session that writes to stdout and reads the real timestamp sources.
    #[expect(
        clippy::new_without_default,
        reason = "to avoid ambiguity with the notion of a 'default session' that is not actually a default session"
    )]
    #[must_use]
    pub fn new() -> Self {
        Self::with_platform(PlatformFacade::real())
    }

    pub(crate) fn with_platform(platform: PlatformFacade) -> Self {
        Self {
            state: Rc::new(RefCell::new(SessionState {
                totals: HashMap::new(),
                live_registries: 0,
                sink: OutputSink::Stdout,
                platform,
                cycle_rate: CycleRate::default(),
            })),
        }
    }

    /// Creates a registry with default settings, immediately starting `initial_action`
    /// unless it is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use action_clock::Session;
    ///
    /// let session = Session::new();
    /// let mut registry = session.registry("whole_run");
    /// assert_eq!(registry.open_actions(), 1);
    ///
    /// registry.log("whole_run");
    /// assert_eq!(registry.open_actions(), 0);
    /// ```
    pub fn registry(&self, initial_action: impl Into<String>) -> Registry {
        self.registry_builder().initial_action(initial_action).build()
    }

    /// Starts configuring a registry that measures into this session.
    ///
    /// # Examples
    ///
    /// ```
    /// use action_clock::Session;
    ///
    /// let session = Session::new();
    /// let registry = session
    ///     .registry_builder()
    ///     .detailed_output(true)
    ///     .initial_action("render")
    ///     .build();
    /// ```
    #[must_use]
    pub fn registry_builder(&self) -> RegistryBuilder<'_> {
        RegistryBuilder::new(self)
    }

    pub(crate) fn shared_state(&self) -> SharedState {
        Rc::clone(&self.state)
    }

    /// Sends all further output of this session to `writer`.
    pub fn set_output(&self, writer: impl Write + 'static) {
        self.state.borrow_mut().sink = OutputSink::Writer(Box::new(writer));
    }

    /// Sends all further output of this session to stdout, which is also the initial setting.
    pub fn set_output_stdout(&self) {
        self.state.borrow_mut().sink = OutputSink::Stdout;
    }

    /// Sends all further output of this session to a file, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputFileOpen`](crate::Error::OutputFileOpen) if the file cannot be
    /// opened for writing. The previous output remains in effect in that case.
    pub fn set_output_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let sink = OutputSink::open_file(path.as_ref())?;

        log::info!("action timings are written to '{}'", path.as_ref().display());

        self.state.borrow_mut().sink = sink;
        Ok(())
    }

    /// Sends all further output of this session to a file, terminating the process if the file
    /// cannot be opened.
    ///
    /// This is for tools where timing output is the whole point of the run and carrying on
    /// without it is useless. A diagnostic is printed to stdout before exiting with status 1.
    #[cfg_attr(test, mutants::skip)] // Terminates the process, cannot be tested in-process.
    pub fn set_output_file_or_exit(&self, path: impl AsRef<Path>) {
        if let Err(e) = self.set_output_file(path) {
            println!(" ### ERROR {e}");

            #[expect(
                clippy::exit,
                reason = "failing to open the requested output is fatal for this entry point"
            )]
            std::process::exit(1);
        }
    }

    /// The cycles-per-second rate used to convert cycle counts in detailed output.
    #[must_use]
    pub fn cycle_rate(&self) -> CycleRate {
        self.state.borrow().cycle_rate
    }

    /// Replaces the cycles-per-second rate used to convert cycle counts in detailed output.
    pub fn set_cycle_rate(&self, rate: CycleRate) {
        self.state.borrow_mut().cycle_rate = rate;
    }

    /// Measures the cycle counter against the monotonic clock over `window` and adopts the
    /// resulting rate. Blocks the current thread for `window`.
    ///
    /// If no rate can be derived (e.g. the counter did not advance), the previous rate is kept.
    /// Returns the rate in effect after the call.
    pub fn calibrate_cycle_rate(&self, window: Duration) -> CycleRate {
        let platform = self.state.borrow().platform.clone();

        let start_cycles = platform.cycle_count();
        let start_time = platform.monotonic_time();

        thread::sleep(window);

        let cycles = platform.cycle_count().saturating_sub(start_cycles);
        let elapsed = platform.monotonic_time().saturating_sub(start_time);

        let mut state = self.state.borrow_mut();

        if let Some(rate) = CycleRate::from_samples(cycles, elapsed) {
            log::info!("calibrated cycle rate: {rate}");
            state.cycle_rate = rate;
        } else {
            log::info!("cycle rate calibration inconclusive, keeping {}", state.cycle_rate);
        }

        state.cycle_rate
    }

    /// Writes the accumulated time of every action to the output, longest first.
    ///
    /// Writes nothing if no action has been closed since the totals were last cleared.
    /// The totals are not modified, so calling this repeatedly produces identical output.
    pub fn dump_total_time_actions(&self) {
        self.state.borrow_mut().dump_total_time_actions();
    }

    /// Creates a snapshot of the accumulated time of every action.
    #[must_use]
    pub fn to_report(&self) -> Report {
        Report::from_totals(&self.state.borrow().totals)
    }

    /// The accumulated wall-clock milliseconds of an action, if it has been closed at least once
    /// since the totals were last cleared.
    #[must_use]
    pub fn total_millis(&self, action: &str) -> Option<f64> {
        self.state.borrow().totals.get(action).copied()
    }

    /// The number of registries created from this session that have not yet been dropped.
    #[must_use]
    pub fn live_registries(&self) -> usize {
        self.state.borrow().live_registries
    }

    /// Whether no action has been closed since the totals were last cleared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().totals.is_empty()
    }

    /// Discards the accumulated totals without reporting them.
    pub fn clear(&self) {
        self.state.borrow_mut().totals.clear();
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_report())
    }
}

impl SessionState {
    pub(crate) fn platform(&self) -> &PlatformFacade {
        &self.platform
    }

    pub(crate) fn cycle_rate(&self) -> CycleRate {
        self.cycle_rate
    }

    pub(crate) fn live_registries(&self) -> usize {
        self.live_registries
    }

    pub(crate) fn write_line(&mut self, line: fmt::Arguments<'_>) {
        self.sink.write_line(line);
    }

    pub(crate) fn accumulate(&mut self, action: &str, millis: f64) {
        if let Some(total) = self.totals.get_mut(action) {
            *total += millis;
        } else {
            self.totals.insert(action.to_owned(), millis);
        }
    }

    pub(crate) fn register_registry(&mut self) {
        self.live_registries = self
            .live_registries
            .checked_add(1)
            .expect("usize::MAX live registries is not a realistic scenario");
    }

    /// Accounts for a dropped registry. When it was the last one, the totals are reported
    /// and cleared.
    pub(crate) fn unregister_registry(&mut self) {
        self.live_registries = self.live_registries.saturating_sub(1);

        if self.live_registries == 0 {
            self.dump_total_time_actions();
            self.totals.clear();
        }
    }

    fn dump_total_time_actions(&mut self) {
        if self.totals.is_empty() {
            return;
        }

        let report = Report::from_totals(&self.totals);

        for line in report.to_string().lines() {
            self.sink.write_line(format_args!("{line}"));
        }
    }
}
