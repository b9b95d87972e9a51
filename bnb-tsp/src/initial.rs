use rand::{seq::SliceRandom, Rng};

use crate::{
    cost::{Cost, CostModel},
    error::{Result, SolveError},
    tour::{tour_cost, Tour},
};

/// How the initial tour was obtained.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeedOrigin {
    /// Nearest neighbor succeeded from `start` after all smaller starts failed.
    NearestNeighbor { start: usize },
    /// Every nearest neighbor start failed and the `attempts`-th random permutation had finite cost.
    RandomPermutation { attempts: usize },
}

impl std::fmt::Display for SeedOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedOrigin::NearestNeighbor { start } => write!(f, "nearest neighbor from {}", start),
            SeedOrigin::RandomPermutation { attempts } => {
                write!(f, "random permutation after {} attempts", attempts)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InitialTour {
    pub tour: Tour,
    pub origin: SeedOrigin,
}

/// Builds a feasible tour to seed the search.
///
/// Nearest neighbor is tried from every start in index order. If all of them fail, random permutations are drawn
/// until one of them has finite cost. With `max_attempts == None` this does not terminate on instances that have
/// no finite tour at all.
pub fn initial_tour<C, R>(model: &C, rng: &mut R, max_attempts: Option<usize>) -> Result<InitialTour>
where
    C: CostModel + ?Sized,
    R: Rng + ?Sized,
{
    let n = model.n();
    if n == 0 {
        return Err(SolveError::EmptyInstance);
    }

    for start in 0..n {
        if let Some(tour) = nearest_neighbor_from(model, start) {
            log::info!("Nearest neighbor from {} found a tour of cost {}.", start, tour.cost());
            return Ok(InitialTour {
                tour,
                origin: SeedOrigin::NearestNeighbor { start },
            });
        }
        log::trace!("Nearest neighbor from {} failed.", start);
    }

    log::warn!("Nearest neighbor failed from every start. Falling back to random permutations.");
    let (tour, attempts) = random_tour(model, rng, max_attempts)?;
    log::info!(
        "Random permutation {} has cost {}.",
        attempts,
        tour.cost()
    );
    Ok(InitialTour {
        tour,
        origin: SeedOrigin::RandomPermutation { attempts },
    })
}

/// Greedily moves to the cheapest unvisited point. Fails if some step or the closing move is forbidden.
pub fn nearest_neighbor_from<C>(model: &C, start: usize) -> Option<Tour>
where
    C: CostModel + ?Sized,
{
    let n = model.n();
    let mut remaining: Vec<usize> = (0..n).filter(|&p| p != start).collect();
    let mut route = Vec::with_capacity(n);
    route.push(start);
    let mut current = start;
    let mut cost = Cost::ZERO;

    while !remaining.is_empty() {
        let mut best: Option<(usize, Cost)> = None;
        for (idx, &p) in remaining.iter().enumerate() {
            let c = model.cost(current, p);
            if c.is_finite() && best.map_or(true, |(_, b)| c < b) {
                best = Some((idx, c));
            }
        }
        let (idx, c) = best?;
        current = remaining.remove(idx);
        route.push(current);
        cost += c;
    }

    if n > 1 {
        let closing = model.cost(current, start);
        if closing.is_infinite() {
            return None;
        }
        cost += closing;
    }

    Some(Tour::new(route, cost))
}

/// Shuffles all points until the tour has finite cost. Returns the tour and the number of permutations drawn.
pub fn random_tour<C, R>(model: &C, rng: &mut R, max_attempts: Option<usize>) -> Result<(Tour, usize)>
where
    C: CostModel + ?Sized,
    R: Rng + ?Sized,
{
    let n = model.n();
    if n == 0 {
        return Err(SolveError::EmptyInstance);
    }
    let mut perm: Vec<usize> = (0..n).collect();
    let mut attempts = 0;
    loop {
        if let Some(max) = max_attempts {
            if attempts >= max {
                log::warn!("No finite tour after {} random permutations.", attempts);
                return Err(SolveError::Infeasible { attempts });
            }
        }
        attempts += 1;
        perm.shuffle(rng);
        let cost = tour_cost(&perm, model);
        if cost.is_finite() {
            return Ok((Tour::new(perm, cost), attempts));
        }
    }
}
