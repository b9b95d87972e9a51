use std::time::Duration;

use crate::{cost::Cost, initial::InitialTour, stats::SearchStatistics, tour::Tour};

/// Why the search loop stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The queue ran empty, so the returned tour is optimal.
    Exhausted,
    /// The time budget elapsed first. The returned tour is the best one found, without a claim of optimality.
    TimeLimit,
}

impl Termination {
    pub fn is_optimal(&self) -> bool {
        matches!(self, Termination::Exhausted)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Exhausted => write!(f, "exhausted"),
            Termination::TimeLimit => write!(f, "time limit"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchResult {
    /// The best tour found.
    pub tour: Tour,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
    pub termination: Termination,
    /// The tour the search was seeded with.
    pub initial: InitialTour,
    pub statistics: SearchStatistics,
}

impl SearchResult {
    pub fn cost(&self) -> Cost {
        self.tour.cost()
    }

    /// Number of times the best tour was improved, not counting the initial tour.
    pub fn improvements(&self) -> u64 {
        self.statistics.improvements
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "cost: {} (initial {} via {}), time: {:.2?}, improvements: {}, stopped: {}",
            self.cost(),
            self.initial.tour.cost(),
            self.initial.origin,
            self.elapsed,
            self.improvements(),
            self.termination
        )?;
        write!(f, "{}", self.statistics)
    }
}
