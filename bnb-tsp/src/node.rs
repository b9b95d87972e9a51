use fixedbitset::FixedBitSet;

use crate::{
    cost::{Cost, CostModel},
    matrix::ReducedMatrix,
    queue::LowerBounded,
};

/// One partial tour of the state space: the route so far, its own reduced matrix and the bound derived from it.
#[derive(Clone, Debug)]
pub struct NodeState {
    matrix: ReducedMatrix,
    route: Vec<usize>,
    last: usize,
    visited: FixedBitSet,
}

impl NodeState {
    /// The reduced root state of a tour starting at `start`.
    pub fn root<C>(model: &C, start: usize) -> Self
    where
        C: CostModel + ?Sized,
    {
        let mut matrix = ReducedMatrix::from_model(model);
        matrix.reduce();
        let mut visited = FixedBitSet::with_capacity(model.n());
        visited.insert(start);
        NodeState {
            matrix,
            route: vec![start],
            last: start,
            visited,
        }
    }

    pub fn matrix(&self) -> &ReducedMatrix {
        &self.matrix
    }

    pub fn route(&self) -> &[usize] {
        self.route.as_slice()
    }

    pub fn into_route(self) -> Vec<usize> {
        self.route
    }

    pub fn last(&self) -> usize {
        self.last
    }

    pub fn start(&self) -> usize {
        self.route[0]
    }

    pub fn depth(&self) -> usize {
        self.route.len()
    }

    pub fn is_visited(&self, point: usize) -> bool {
        self.visited.contains(point)
    }

    pub fn is_complete(&self) -> bool {
        self.visited.count_ones(..) == self.matrix.n()
    }

    /// Whether the reduced matrix still allows the move from the last point back to the start.
    pub fn can_close(&self) -> bool {
        self.matrix.is_allowed(self.last, self.start())
    }

    pub fn unvisited(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.matrix.n()).filter(move |&p| !self.visited.contains(p))
    }

    /// The reduced child state that extends the route by `to`.
    pub fn branch(&self, to: usize) -> NodeState {
        debug_assert!(!self.is_visited(to));
        let mut matrix = self.matrix.branch(self.last, to);
        matrix.reduce();

        let mut route = Vec::with_capacity(self.route.len() + 1);
        route.extend_from_slice(&self.route);
        route.push(to);

        let mut visited = self.visited.clone();
        visited.insert(to);

        NodeState {
            matrix,
            route,
            last: to,
            visited,
        }
    }
}

impl LowerBounded for NodeState {
    fn lower_bound(&self) -> Cost {
        self.matrix.lower_bound()
    }
}
