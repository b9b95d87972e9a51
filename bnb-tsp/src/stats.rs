use serde::Serialize;

use crate::cost::Cost;

/// Counters collected while searching the state space.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStatistics {
    /// States built, the root included.
    pub states_created: u64,
    /// States expanded into children.
    pub states_expanded: u64,
    /// States discarded because their bound could not beat the best tour, including states still queued at the end.
    pub pruned: u64,
    /// States discarded because they can never close into a tour of finite cost.
    pub infeasible: u64,
    /// Times a strictly cheaper tour replaced the best one. The initial tour is not counted.
    pub improvements: u64,
    /// Largest number of states waiting in the queue at once.
    pub max_queue_len: usize,
    /// The lower bound of the reduced root state.
    pub root_lower_bound: Cost,
}

impl SearchStatistics {
    pub fn on_state_created(&mut self) {
        self.states_created = self.states_created.saturating_add(1);
    }

    pub fn on_state_expanded(&mut self) {
        self.states_expanded = self.states_expanded.saturating_add(1);
    }

    pub fn on_pruned(&mut self, count: u64) {
        self.pruned = self.pruned.saturating_add(count);
    }

    pub fn on_infeasible(&mut self) {
        self.infeasible = self.infeasible.saturating_add(1);
    }

    pub fn on_improvement(&mut self) {
        self.improvements = self.improvements.saturating_add(1);
    }

    pub fn on_queue_len(&mut self, len: usize) {
        self.max_queue_len = self.max_queue_len.max(len);
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "States created:   {}", self.states_created)?;
        writeln!(f, "States expanded:  {}", self.states_expanded)?;
        writeln!(f, "Pruned (bound):   {}", self.pruned)?;
        writeln!(f, "Infeasible:       {}", self.infeasible)?;
        writeln!(f, "Improvements:     {}", self.improvements)?;
        writeln!(f, "Max queue length: {}", self.max_queue_len)?;
        write!(f, "Root lower bound: {}", self.root_lower_bound)
    }
}
