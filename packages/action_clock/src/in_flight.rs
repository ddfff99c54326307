//! Actions that have been started but not yet closed.

use std::collections::BTreeMap;

use foldhash::{HashMap, HashMapExt};
use smallvec::SmallVec;

/// An open action and the timestamps captured when it started.
#[derive(Clone, Debug)]
pub(crate) struct TimedAction {
    pub(crate) name: String,
    pub(crate) start_cycles: u64,
    pub(crate) start_micros: u64,
}

/// Ordered collection of open actions.
///
/// Actions are appended at the back. They are removed either from the back (closing the most
/// recent action whatever its name) or by name, in which case the most recently pushed action
/// with that name is removed and the relative order of the rest is preserved. Names need not
/// be unique.
///
/// The per-name index makes closing by name logarithmic instead of a scan from the back,
/// with identical results.
#[derive(Debug)]
pub(crate) struct InFlightStack {
    // Keyed by push sequence number, so iteration order is push order.
    entries: BTreeMap<u64, TimedAction>,

    // Sequence numbers of the open entries for each name, oldest first. Never holds empty lists.
    by_name: HashMap<String, SmallVec<[u64; 2]>>,

    next_sequence: u64,
}

impl InFlightStack {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_name: HashMap::new(),
            next_sequence: 0,
        }
    }

    pub(crate) fn push(&mut self, action: TimedAction) {
        let sequence = self.next_sequence;
        self.next_sequence = self
            .next_sequence
            .checked_add(1)
            .expect("pushing 2^64 actions is not a realistic scenario");

        self.by_name
            .entry(action.name.clone())
            .or_default()
            .push(sequence);
        self.entries.insert(sequence, action);
    }

    /// Removes the most recently pushed action, regardless of its name.
    pub(crate) fn pop_last(&mut self) -> Option<TimedAction> {
        let (sequence, action) = self.entries.pop_last()?;

        let positions = self
            .by_name
            .get_mut(&action.name)
            .expect("every entry is present in the name index");

        // The newest entry overall is necessarily the newest entry for its name.
        let indexed = positions.pop();
        debug_assert_eq!(indexed, Some(sequence));

        if positions.is_empty() {
            self.by_name.remove(&action.name);
        }

        Some(action)
    }

    /// Removes the most recently pushed action named `name`, if there is one.
    pub(crate) fn remove_latest(&mut self, name: &str) -> Option<TimedAction> {
        let positions = self.by_name.get_mut(name)?;

        let sequence = positions
            .pop()
            .expect("empty position lists are removed from the index");

        if positions.is_empty() {
            self.by_name.remove(name);
        }

        Some(
            self.entries
                .remove(&sequence)
                .expect("the name index only refers to present entries"),
        )
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the open actions, oldest first.
    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|action| action.name.as_str())
    }
}
