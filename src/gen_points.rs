use std::str::FromStr;

use bnb_tsp::{EuclideanCost, Point};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Fraction of directed edges removed in hard mode.
const FRACTION_OF_PATHS_TO_REMOVE: f64 = 0.20;

const MAX_ELEVATION: f64 = 0.1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Uniform points in the unit square.
    Easy,
    /// Elevated points with some directed edges removed.
    Hard,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Easy
    }
}

impl FromStr for Mode {
    type Err = String;
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "easy" => Ok(Mode::Easy),
            "hard" => Ok(Mode::Hard),
            _ => Err(format!("unknown mode '{}', expected 'easy' or 'hard'", mode)),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Easy => write!(f, "easy"),
            Mode::Hard => write!(f, "hard"),
        }
    }
}

/// An endless stream of random instances with `n` points.
pub struct RandomInstanceGenerator {
    n: usize,
    mode: Mode,
    rng: StdRng,
}

impl RandomInstanceGenerator {
    pub fn new(n: usize, mode: Mode, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        RandomInstanceGenerator { n, mode, rng }
    }

    fn random_point(&mut self) -> Point {
        match self.mode {
            Mode::Easy => Point::new(self.rng.gen::<f64>(), self.rng.gen::<f64>()),
            Mode::Hard => Point::with_elevation(
                self.rng.gen::<f64>(),
                self.rng.gen::<f64>(),
                self.rng.gen::<f64>() * MAX_ELEVATION,
            ),
        }
    }

    fn remove_paths(&mut self, model: &mut EuclideanCost) {
        if self.n < 2 {
            return;
        }
        let to_remove = (self.n as f64 * FRACTION_OF_PATHS_TO_REMOVE) as usize;
        while model.num_forbidden() < to_remove {
            let from = self.rng.gen_range(0..self.n);
            let to = self.rng.gen_range(0..self.n);
            if from != to {
                model.forbid(from, to);
            }
        }
    }
}

impl Iterator for RandomInstanceGenerator {
    type Item = EuclideanCost;

    fn next(&mut self) -> Option<Self::Item> {
        let points = (0..self.n).map(|_| self.random_point()).collect();
        let mut model = EuclideanCost::new(points);
        if self.mode == Mode::Hard {
            self.remove_paths(&mut model);
        }
        Some(model)
    }
}

#[cfg(test)]
mod test_gen_points {
    use super::*;
    use bnb_tsp::CostModel;

    #[test]
    fn test_easy_instances() {
        let model = RandomInstanceGenerator::new(10, Mode::Easy, Some(3))
            .next()
            .unwrap();
        assert_eq!(model.n(), 10);
        assert_eq!(model.num_forbidden(), 0);
        assert!(model
            .points()
            .iter()
            .all(|p| (0.0..1.0).contains(&p.x()) && p.elevation() == 0.0));
    }

    #[test]
    fn test_hard_instances_remove_paths() {
        let model = RandomInstanceGenerator::new(20, Mode::Hard, Some(3))
            .next()
            .unwrap();
        assert_eq!(model.num_forbidden(), 4);
        let infinite = (0..20)
            .flat_map(|from| (0..20).map(move |to| (from, to)))
            .filter(|&(from, to)| from != to && model.cost(from, to).is_infinite())
            .count();
        assert_eq!(infinite, 4);
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let a: Vec<Point> = RandomInstanceGenerator::new(5, Mode::Hard, Some(8))
            .next()
            .unwrap()
            .points()
            .to_vec();
        let b: Vec<Point> = RandomInstanceGenerator::new(5, Mode::Hard, Some(8))
            .next()
            .unwrap()
            .points()
            .to_vec();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("hard".parse::<Mode>(), Ok(Mode::Hard));
        assert!("medium".parse::<Mode>().is_err());
    }
}
