//! Per-action time totals, ranked for human consumption.

use std::cmp::Ordering;
use std::fmt;

use foldhash::{HashMap, HashMapExt};

/// A snapshot of the accumulated time of every action recorded by a [`Session`](crate::Session).
///
/// Actions are ordered by accumulated time, longest first, with ties broken by name so the
/// order is deterministic. Each action also carries its time as a percentage of the longest
/// action, which for properly nested measurements is the outermost one.
///
/// For human-readable output, use the `Display` trait implementation. For machine-readable
/// output, inspect report contents via [`actions()`](Self::actions).
///
/// # Examples
///
/// ```
/// use action_clock::Session;
///
/// let session = Session::new();
/// let mut registry = session.registry("startup");
/// registry.start("load_config");
/// registry.log("load_config");
/// registry.log("startup");
///
/// let report = session.to_report();
/// for action in report.actions() {
///     println!(
///         "{}: {:.1} ms ({:.1}% of longest)",
///         action.name(),
///         action.total_millis(),
///         action.percent_of_longest()
///     );
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Report {
    // Sorted by total time descending, then by name ascending.
    actions: Box<[ReportAction]>,
}

/// Accumulated time of a single action in a [`Report`].
#[derive(Clone, Debug)]
pub struct ReportAction {
    name: String,
    total_millis: f64,
    percent_of_longest: f64,
}

impl Report {
    /// Creates a report from accumulated per-action milliseconds.
    pub(crate) fn from_totals(totals: &HashMap<String, f64>) -> Self {
        let mut ranked = totals
            .iter()
            .map(|(name, total_millis)| (name.clone(), *total_millis))
            .collect::<Vec<_>>();

        ranked.sort_by(|(a_name, a_total), (b_name, b_total)| {
            b_total
                .total_cmp(a_total)
                .then_with(|| a_name.cmp(b_name))
        });

        let longest = ranked.first().map_or(0.0, |(_, total)| *total);

        let actions = ranked
            .into_iter()
            .map(|(name, total_millis)| ReportAction {
                name,
                total_millis,
                percent_of_longest: percent_of(total_millis, longest),
            })
            .collect();

        Self { actions }
    }

    /// Merges two reports into a new report.
    ///
    /// Actions with the same name have their totals added together, as if both sets of
    /// measurements had been recorded by a single session.
    ///
    /// # Examples
    ///
    /// ```
    /// use action_clock::{Report, Session};
    ///
    /// let first = Session::new();
    /// let second = Session::new();
    ///
    /// let mut registry = first.registry("work");
    /// registry.log("work");
    /// let mut registry = second.registry("work");
    /// registry.log("work");
    ///
    /// let merged = Report::merge(&first.to_report(), &second.to_report());
    /// assert_eq!(merged.actions().count(), 1);
    /// ```
    #[must_use]
    pub fn merge(a: &Self, b: &Self) -> Self {
        let mut totals = HashMap::with_capacity(a.actions.len().saturating_add(b.actions.len()));

        for action in a.actions.iter().chain(b.actions.iter()) {
            *totals.entry(action.name.clone()).or_insert(0.0) += action.total_millis;
        }

        Self::from_totals(&totals)
    }

    /// Whether the report contains no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterates through the actions, longest accumulated time first.
    pub fn actions(&self) -> impl Iterator<Item = &ReportAction> {
        self.actions.iter()
    }

    /// The accumulated time of the longest action, if there is any action.
    #[must_use]
    pub fn longest_millis(&self) -> Option<f64> {
        self.actions.first().map(|action| action.total_millis)
    }

    /// The sum of the accumulated times of all actions.
    ///
    /// When actions are nested this counts nested time more than once, so it is only
    /// meaningful compared against [`longest_millis()`](Self::longest_millis).
    #[must_use]
    pub fn sum_millis(&self) -> f64 {
        self.actions.iter().map(|action| action.total_millis).sum()
    }

    /// Prints the report to stdout.
    ///
    /// Prints nothing if the report is empty.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        if self.is_empty() {
            return;
        }
        print!("{self}");
    }
}

impl ReportAction {
    /// The name of the action.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wall-clock time accumulated by the action, in milliseconds.
    #[must_use]
    pub fn total_millis(&self) -> f64 {
        self.total_millis
    }

    /// The accumulated time as a percentage of the longest action in the same report.
    #[must_use]
    pub fn percent_of_longest(&self) -> f64 {
        self.percent_of_longest
    }
}

// An all-zero report has every action tied with the longest one.
fn percent_of(total: f64, longest: f64) -> f64 {
    match longest.partial_cmp(&0.0) {
        Some(Ordering::Greater) => total * 100.0 / longest,
        _ => 100.0,
    }
}

impl fmt::Display for ReportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>10.1} {:>9.1}[ms]  {}",
            self.percent_of_longest, self.total_millis, self.name
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(longest) = self.longest_millis() else {
            return writeln!(f, "No action timings captured.");
        };

        writeln!(f, " ### action time totals [% of longest, ms, action]")?;

        for action in &self.actions {
            writeln!(f, "{action}")?;
        }

        writeln!(
            f,
            " ### sum of subtimes/longest time: {:.1}/{longest:.1}",
            self.sum_millis() - longest
        )
    }
}
