use std::ops::{Deref, DerefMut};

use crate::Registry;

/// Closes an action when it goes out of scope.
///
/// Returned by [`Registry::scope()`]. The guard dereferences to the registry it came from, so
/// nested actions are opened from the guard itself. Closing is done by name, so the guard
/// closes the most recent open action with its name even if other actions opened inside the
/// scope are still open.
///
/// # Examples
///
/// ```
/// use action_clock::Session;
///
/// let session = Session::new();
/// let mut registry = session.registry("");
///
/// {
///     let mut frame = registry.scope("frame");
///     {
///         let _physics = frame.scope("physics");
///         // Step the simulation.
///     }
///     // Render.
/// }
///
/// assert_eq!(registry.open_actions(), 0);
/// ```
#[derive(Debug)]
#[must_use = "the action is closed as soon as the guard is dropped"]
pub struct ActionGuard<'a> {
    registry: &'a mut Registry,
    name: String,
}

impl<'a> ActionGuard<'a> {
    pub(crate) fn new(registry: &'a mut Registry, name: String) -> Self {
        registry.start(name.clone());

        Self { registry, name }
    }

    /// The name of the action this guard closes.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Closes the action now instead of at the end of the scope.
    pub fn finish(self) {
        drop(self);
    }
}

impl Deref for ActionGuard<'_> {
    type Target = Registry;

    fn deref(&self) -> &Self::Target {
        &*self.registry
    }
}

impl DerefMut for ActionGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.registry
    }
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.registry.log(&self.name);
    }
}
