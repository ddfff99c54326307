//! Configuration of new registries.

use crate::{Registry, Session};

/// Builder for a [`Registry`] with non-default settings.
///
/// Obtain one from [`Session::registry_builder()`].
///
/// # Examples
///
/// ```
/// use action_clock::Session;
///
/// let session = Session::new();
///
/// // A registry that prints a line for every start and close.
/// let mut verbose = session
///     .registry_builder()
///     .detailed_output(true)
///     .initial_action("batch")
///     .build();
///
/// // A registry that ignores everything, e.g. when timing is switched off by the caller.
/// let mut quiet = session.registry_builder().logging_enabled(false).build();
/// quiet.start("ignored");
/// assert_eq!(quiet.open_actions(), 0);
/// ```
#[derive(Debug)]
#[must_use = "the builder does nothing until `build()` is called"]
pub struct RegistryBuilder<'a> {
    session: &'a Session,
    initial_action: String,
    logging_enabled: bool,
    detailed_output: bool,
}

impl<'a> RegistryBuilder<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self {
            session,
            initial_action: String::new(),
            logging_enabled: true,
            detailed_output: false,
        }
    }

    /// Names an action to start as soon as the registry is built. Empty means none.
    pub fn initial_action(mut self, name: impl Into<String>) -> Self {
        self.initial_action = name.into();
        self
    }

    /// Whether the registry records anything at all. Enabled by default.
    pub fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Whether the registry writes a line for every started and closed action, in addition to
    /// contributing to the final report. Disabled by default.
    pub fn detailed_output(mut self, enabled: bool) -> Self {
        self.detailed_output = enabled;
        self
    }

    /// Creates the registry, counting it as live in the session, and starts the initial action
    /// if one was named.
    #[must_use]
    pub fn build(self) -> Registry {
        let mut registry = Registry::new(
            self.session.shared_state(),
            self.logging_enabled,
            self.detailed_output,
        );

        if !self.initial_action.is_empty() {
            registry.start(self.initial_action);
        }

        registry
    }
}
