use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};

/// Settings of a single branch-and-bound run.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Wall-clock budget, measured from the start of the run including the initial tour.
    pub time_limit: Duration,
    /// Seed of the random fallback. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Cap on random permutations when nearest neighbor fails everywhere. `None` never gives up.
    pub max_random_attempts: Option<usize>,
}

impl SolverConfig {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(60);
    pub const DEFAULT_MAX_RANDOM_ATTEMPTS: usize = 100_000;

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_random_attempts(mut self, max_random_attempts: Option<usize>) -> Self {
        self.max_random_attempts = max_random_attempts;
        self
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            time_limit: Self::DEFAULT_TIME_LIMIT,
            seed: None,
            max_random_attempts: Some(Self::DEFAULT_MAX_RANDOM_ATTEMPTS),
        }
    }
}
