use std::time::Instant;

use crate::{
    config::SolverConfig,
    cost::CostModel,
    error::{Result, SolveError},
    initial::initial_tour,
    node::NodeState,
    queue::{LowerBounded, NodeQueue},
    result::{SearchResult, Termination},
    stats::SearchStatistics,
    tour::Tour,
};

/// Solves `model` by branch and bound within the budget of `config`.
pub fn branch_and_bound<C>(model: &C, config: &SolverConfig) -> Result<SearchResult>
where
    C: CostModel + ?Sized,
{
    BranchAndBound::new(model, config.clone()).solve()
}

/// Best-first branch and bound over partial tours, bounded by reduced cost matrices.
#[derive(Debug, Clone)]
pub struct BranchAndBound<'a, C: ?Sized> {
    model: &'a C,
    config: SolverConfig,
}

impl<'a, C> BranchAndBound<'a, C>
where
    C: CostModel + ?Sized,
{
    pub fn new(model: &'a C, config: SolverConfig) -> Self {
        BranchAndBound { model, config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve(&self) -> Result<SearchResult> {
        let timer = Instant::now();
        let n = self.model.n();
        if n == 0 {
            return Err(SolveError::EmptyInstance);
        }

        let mut rng = self.config.rng();
        let initial = initial_tour(self.model, &mut rng, self.config.max_random_attempts)?;
        log::info!(
            "Initial tour of cost {} via {}.",
            initial.tour.cost(),
            initial.origin
        );

        let start = initial.tour.first().unwrap_or(0);
        let mut search = Search::new(self.model, initial.tour.clone(), start);
        log::info!(
            "Starting branch and bound on {} points from {}. Root lower bound: {}",
            n,
            start,
            search.stats.root_lower_bound
        );

        let termination = search.run(&timer, &self.config);
        let elapsed = timer.elapsed();
        log::info!(
            "Branch and bound stopped ({}) after {:.2?}: {} -> {} with {} improvements.",
            termination,
            elapsed,
            initial.tour.cost(),
            search.bssf.cost(),
            search.stats.improvements
        );

        Ok(SearchResult {
            tour: search.bssf,
            elapsed,
            termination,
            initial,
            statistics: search.stats,
        })
    }
}

/// What happened to a freshly branched child.
#[derive(Debug)]
enum ChildOutcome {
    /// A complete tour strictly cheaper than the best one.
    Improved(Tour),
    /// A complete tour that does not beat the best one.
    Closed,
    /// A partial tour that may still beat the best one.
    Open(NodeState),
    /// A partial tour whose bound cannot beat the best one.
    Pruned,
    /// A state that can never close into a tour of finite cost.
    Infeasible,
}

/// The mutable state of one run. The best tour so far lives here and nowhere else.
struct Search<'a, C: ?Sized> {
    model: &'a C,
    bssf: Tour,
    queue: NodeQueue<NodeState>,
    stats: SearchStatistics,
}

impl<'a, C> Search<'a, C>
where
    C: CostModel + ?Sized,
{
    fn new(model: &'a C, bssf: Tour, start: usize) -> Self {
        let root = NodeState::root(model, start);
        let mut stats = SearchStatistics::default();
        stats.root_lower_bound = root.lower_bound();
        stats.on_state_created();

        let mut queue = NodeQueue::new();
        if model.n() > 1 {
            queue.insert(root);
        }
        stats.on_queue_len(queue.len());

        Search {
            model,
            bssf,
            queue,
            stats,
        }
    }

    fn run(&mut self, timer: &Instant, config: &SolverConfig) -> Termination {
        let termination = loop {
            if self.queue.is_empty() {
                break Termination::Exhausted;
            }
            if timer.elapsed() >= config.time_limit {
                break Termination::TimeLimit;
            }
            if let Some(node) = self.next_candidate() {
                self.expand(node);
            }
        };
        self.stats.on_pruned(self.queue.len() as u64);
        termination
    }

    /// Pops states until one can still beat the best tour. Stale states are dropped on the way.
    fn next_candidate(&mut self) -> Option<NodeState> {
        while let Some(node) = self.queue.extract_min() {
            if node.lower_bound() < self.bssf.cost() {
                return Some(node);
            }
            log::trace!(
                "Dropping stale state with bound {} >= {}.",
                node.lower_bound(),
                self.bssf.cost()
            );
            self.stats.on_pruned(1);
        }
        None
    }

    fn expand(&mut self, node: NodeState) {
        self.stats.on_state_expanded();
        for to in node.unvisited() {
            let child = node.branch(to);
            self.stats.on_state_created();
            match self.evaluate(child) {
                ChildOutcome::Improved(tour) => {
                    log::debug!("Improved best tour: {} -> {}", self.bssf.cost(), tour.cost());
                    self.bssf = tour;
                    self.stats.on_improvement();
                }
                ChildOutcome::Open(child) => self.queue.insert(child),
                ChildOutcome::Closed | ChildOutcome::Pruned => self.stats.on_pruned(1),
                ChildOutcome::Infeasible => self.stats.on_infeasible(),
            }
        }
        self.stats.on_queue_len(self.queue.len());
    }

    fn evaluate(&self, child: NodeState) -> ChildOutcome {
        if child.lower_bound().is_infinite() {
            return ChildOutcome::Infeasible;
        }
        if child.is_complete() {
            if !child.can_close() {
                return ChildOutcome::Infeasible;
            }
            let tour = Tour::with_cost_from(child.into_route(), self.model);
            return if tour.cost() < self.bssf.cost() {
                ChildOutcome::Improved(tour)
            } else {
                ChildOutcome::Closed
            };
        }
        if child.lower_bound() < self.bssf.cost() {
            ChildOutcome::Open(child)
        } else {
            ChildOutcome::Pruned
        }
    }
}

#[cfg(test)]
mod test_bnb {
    use super::*;
    use crate::{
        cost::{Cost, EuclideanCost, MatrixCost},
        point::Point,
        tour::tour_cost,
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::time::Duration;

    const INF: f64 = f64::INFINITY;

    fn unlimited() -> SolverConfig {
        SolverConfig::default()
            .with_seed(0)
            .with_time_limit(Duration::from_secs(3600))
    }

    fn random_points(rng: &mut StdRng, n: usize) -> EuclideanCost {
        EuclideanCost::new(
            (0..n)
                .map(|_| Point::new(rng.gen::<f64>(), rng.gen::<f64>()))
                .collect(),
        )
    }

    /// Cheapest tour by trying every order that starts at point 0.
    fn brute_force<C: CostModel>(model: &C) -> Cost {
        fn permute<C: CostModel>(model: &C, route: &mut Vec<usize>, rest: &mut Vec<usize>, best: &mut Cost) {
            if rest.is_empty() {
                *best = best.min(tour_cost(route, model));
                return;
            }
            for i in 0..rest.len() {
                let p = rest.remove(i);
                route.push(p);
                permute(model, route, rest, best);
                route.pop();
                rest.insert(i, p);
            }
        }
        let mut best = Cost::INFINITY;
        let mut rest: Vec<usize> = (1..model.n()).collect();
        permute(model, &mut vec![0], &mut rest, &mut best);
        best
    }

    fn assert_close(a: Cost, b: Cost) {
        assert!(
            (a.as_float() - b.as_float()).abs() < 1e-9,
            "{} differs from {}",
            a,
            b
        );
    }

    #[test]
    fn test_unit_square() {
        let model = EuclideanCost::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]);
        let result = branch_and_bound(&model, &unlimited()).unwrap();
        assert_eq!(result.cost(), Cost::new(4.0));
        assert_eq!(result.termination, Termination::Exhausted);
        assert!(result.tour.is_feasible(4));

        let order = result.tour.rotated_to(0).unwrap();
        let clockwise: &[usize] = &[0, 1, 2, 3];
        let counter_clockwise: &[usize] = &[0, 3, 2, 1];
        assert!(order.points() == clockwise || order.points() == counter_clockwise);
    }

    #[test]
    fn test_optimal_on_small_instances() {
        let mut rng = StdRng::seed_from_u64(2024);
        for n in 3..=8 {
            for _ in 0..3 {
                let model = random_points(&mut rng, n);
                let optimum = brute_force(&model);
                let result = branch_and_bound(&model, &unlimited()).unwrap();
                assert_eq!(result.termination, Termination::Exhausted);
                assert!(result.tour.is_feasible(n));
                assert_close(result.cost(), optimum);
                assert_close(result.cost(), tour_cost(result.tour.points(), &model));
            }
        }
    }

    #[test]
    fn test_root_bound_is_admissible() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 4..=7 {
            let model = random_points(&mut rng, n);
            let optimum = brute_force(&model);
            let root = NodeState::root(&model, 0);
            assert!(root.lower_bound().as_float() <= optimum.as_float() + 1e-9);

            let result = branch_and_bound(&model, &unlimited()).unwrap();
            assert_eq!(result.statistics.root_lower_bound, root.lower_bound());
        }
    }

    #[test]
    fn test_asymmetric_with_forbidden_edges() {
        let costs = [
            [INF, 3.0, 93.0, 13.0, 33.0, 9.0],
            [4.0, INF, 77.0, 42.0, 21.0, 16.0],
            [45.0, 17.0, INF, 36.0, 16.0, 28.0],
            [39.0, 90.0, 80.0, INF, 56.0, 7.0],
            [28.0, 46.0, 88.0, 33.0, INF, 25.0],
            [3.0, 88.0, 18.0, 46.0, 92.0, INF],
        ];
        let mut model = MatrixCost::from_fn(6, |from, to| costs[from][to]);
        assert_close(branch_and_bound(&model, &unlimited()).unwrap().cost(), brute_force(&model));

        model = MatrixCost::from_fn(6, |from, to| {
            if (from, to) == (0, 1) || (from, to) == (5, 0) {
                INF
            } else {
                costs[from][to]
            }
        });
        let result = branch_and_bound(&model, &unlimited()).unwrap();
        assert!(result.cost().is_finite());
        assert_close(result.cost(), brute_force(&model));
    }

    #[test]
    fn test_zero_time_limit_returns_seed() {
        let mut rng = StdRng::seed_from_u64(5);
        let model = random_points(&mut rng, 12);
        let config = SolverConfig::default()
            .with_seed(1)
            .with_time_limit(Duration::from_secs(0));
        let result = branch_and_bound(&model, &config).unwrap();
        assert_eq!(result.termination, Termination::TimeLimit);
        assert_eq!(result.improvements(), 0);
        assert_eq!(result.tour, result.initial.tour);
        assert_eq!(result.statistics.states_created, 1);
        assert_eq!(result.statistics.pruned, 1);
    }

    #[test]
    fn test_infeasible_instance() {
        // point 2 may only be entered from 0, and that move is forbidden
        let model = MatrixCost::from_fn(5, |from, to| {
            if (from == 2 && to != 0) || (to == 2 && from != 0) || (from, to) == (0, 2) {
                INF
            } else {
                1.0
            }
        });
        let config = unlimited().with_max_random_attempts(Some(200));
        match branch_and_bound(&model, &config) {
            Err(SolveError::Infeasible { attempts }) => assert_eq!(attempts, 200),
            other => panic!("expected an infeasible instance, got {:?}", other.map(|r| r.cost())),
        }
    }

    #[test]
    fn test_degenerate_sizes() {
        let empty = EuclideanCost::new(vec![]);
        assert!(matches!(
            branch_and_bound(&empty, &unlimited()),
            Err(SolveError::EmptyInstance)
        ));

        let single = EuclideanCost::new(vec![Point::new(0.5, 0.5)]);
        let result = branch_and_bound(&single, &unlimited()).unwrap();
        assert_eq!(result.cost(), Cost::ZERO);
        assert_eq!(result.tour.points(), &[0]);

        let pair = EuclideanCost::new(vec![Point::new(0.0, 0.0), Point::new(0.0, 2.0)]);
        let result = branch_and_bound(&pair, &unlimited()).unwrap();
        assert_eq!(result.cost(), Cost::new(4.0));
        assert_eq!(result.termination, Termination::Exhausted);
    }

    fn unit_square() -> EuclideanCost {
        EuclideanCost::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_stale_states_are_dropped() {
        let model = unit_square();
        let optimum = Tour::with_cost_from(vec![0, 1, 2, 3], &model);
        let root = NodeState::root(&model, 0);
        let mut search = Search::new(&model, optimum, 0);
        // bounds 4.0 and 3 + sqrt(2), none below the optimum
        search.queue.insert(root.branch(1));
        search.queue.insert(root.branch(2));
        assert_eq!(search.queue.len(), 3);

        assert!(search.next_candidate().is_none());
        assert!(search.queue.is_empty());
        assert_eq!(search.stats.pruned, 3);
        assert_eq!(search.stats.states_expanded, 0);
    }

    #[test]
    fn test_last_stale_state_is_not_expanded() {
        let model = unit_square();
        let optimum = Tour::with_cost_from(vec![0, 1, 2, 3], &model);
        let mut search = Search::new(&model, optimum.clone(), 0);

        let termination = search.run(&Instant::now(), &unlimited());
        assert_eq!(termination, Termination::Exhausted);
        assert_eq!(search.stats.states_expanded, 0);
        assert_eq!(search.stats.states_created, 1);
        assert_eq!(search.stats.pruned, 1);
        assert_eq!(search.bssf, optimum);
    }

    #[test]
    fn test_live_state_survives_the_sweep() {
        let model = unit_square();
        let incumbent = Tour::new(vec![0, 1, 2, 3], Cost::new(4.2));
        let root = NodeState::root(&model, 0);
        let mut search = Search::new(&model, incumbent, 0);
        search.queue.insert(root.branch(2));

        let live = search.next_candidate().unwrap();
        assert_eq!(live.route(), &[0]);
        assert_eq!(live.lower_bound(), Cost::new(4.0));
        assert_eq!(search.stats.pruned, 0);
        assert_eq!(search.queue.len(), 1);

        assert!(search.next_candidate().is_none());
        assert_eq!(search.stats.pruned, 1);
    }

    #[test]
    fn test_statistics_are_consistent() {
        let mut rng = StdRng::seed_from_u64(99);
        let model = random_points(&mut rng, 8);
        let result = branch_and_bound(&model, &unlimited()).unwrap();
        let stats = &result.statistics;
        assert!(stats.states_created >= stats.states_expanded);
        assert!(stats.max_queue_len >= 1);
        assert!(stats.pruned + stats.infeasible + stats.states_expanded <= stats.states_created);
        assert!(result.cost() <= result.initial.tour.cost());
        if result.improvements() == 0 {
            assert_eq!(result.tour, result.initial.tour);
        }
    }
}
