use std::{
    fmt,
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use ndarray::Array2;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::point::Point;

/// The cost of moving between two points. An infinite cost marks a forbidden move.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize)]
pub struct Cost(f64);

impl Cost {
    pub const ZERO: Cost = Cost(0.0);
    pub const INFINITY: Cost = Cost(f64::INFINITY);

    pub fn new(cost: f64) -> Self {
        Cost(cost)
    }

    pub fn as_float(&self) -> f64 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    pub fn is_infinite(&self) -> bool {
        self.0.is_infinite()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// The smaller of both costs.
    pub fn min(self, other: Cost) -> Cost {
        if other < self {
            other
        } else {
            self
        }
    }
}

impl Add for Cost {
    type Output = Self;
    fn add(self, rhs: Cost) -> Self::Output {
        Cost(self.0 + rhs.0)
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        *self = Cost(self.0 + rhs.0)
    }
}

impl Sub for Cost {
    type Output = Self;
    fn sub(self, rhs: Cost) -> Self::Output {
        Cost(self.0 - rhs.0)
    }
}

impl SubAssign for Cost {
    fn sub_assign(&mut self, rhs: Cost) {
        *self = Cost(self.0 - rhs.0)
    }
}

impl Sum<Cost> for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::ZERO, |a, b| a + b)
    }
}

impl<'a> Sum<&'a Cost> for Cost {
    fn sum<I: Iterator<Item = &'a Cost>>(iter: I) -> Self {
        iter.fold(Cost::ZERO, |a, b| a + *b)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "∞")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<f64> for Cost {
    fn from(cost: f64) -> Self {
        Cost::new(cost)
    }
}

/// A pairwise cost function over `n()` points, indexed `0..n()`.
///
/// Costs may be asymmetric. `Cost::INFINITY` means there is no edge from `from` to `to`.
pub trait CostModel {
    fn n(&self) -> usize;

    fn cost(&self, from: usize, to: usize) -> Cost;
}

impl<C: CostModel + ?Sized> CostModel for &C {
    fn n(&self) -> usize {
        (**self).n()
    }

    fn cost(&self, from: usize, to: usize) -> Cost {
        (**self).cost(from, to)
    }
}

/// Euclidean distances between points, with optional forbidden directed edges.
#[derive(Clone, Debug, Default)]
pub struct EuclideanCost {
    points: Vec<Point>,
    forbidden: FxHashSet<(usize, usize)>,
}

impl EuclideanCost {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            forbidden: FxHashSet::default(),
        }
    }

    /// Removes the directed edge `from -> to`.
    pub fn forbid(&mut self, from: usize, to: usize) {
        self.forbidden.insert((from, to));
    }

    pub fn num_forbidden(&self) -> usize {
        self.forbidden.len()
    }

    pub fn points(&self) -> &[Point] {
        self.points.as_slice()
    }
}

impl CostModel for EuclideanCost {
    fn n(&self) -> usize {
        self.points.len()
    }

    fn cost(&self, from: usize, to: usize) -> Cost {
        if self.forbidden.contains(&(from, to)) {
            return Cost::INFINITY;
        }
        Cost::new(self.points[from].distance(&self.points[to]))
    }
}

/// A dense cost matrix where entry `[[from, to]]` is the cost of the move.
#[derive(Clone, Debug)]
pub struct MatrixCost(Array2<f64>);

impl MatrixCost {
    /// Panics if the matrix is not square.
    pub fn new(costs: Array2<f64>) -> Self {
        assert_eq!(costs.nrows(), costs.ncols());
        MatrixCost(costs)
    }

    pub fn from_fn<F>(n: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f64,
    {
        MatrixCost(Array2::from_shape_fn((n, n), |(from, to)| f(from, to)))
    }
}

impl CostModel for MatrixCost {
    fn n(&self) -> usize {
        self.0.nrows()
    }

    fn cost(&self, from: usize, to: usize) -> Cost {
        Cost::new(self.0[[from, to]])
    }
}

#[cfg(test)]
mod test_cost {
    use super::*;

    #[test]
    fn test_infinity_absorbs() {
        assert!((Cost::INFINITY + Cost::new(3.0)).is_infinite());
        let total: Cost = vec![Cost::new(1.0), Cost::INFINITY, Cost::new(2.0)]
            .into_iter()
            .sum();
        assert_eq!(total, Cost::INFINITY);
        assert!(Cost::new(1e12) < Cost::INFINITY);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost::INFINITY.to_string(), "∞");
        assert_eq!(Cost::new(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_min() {
        assert_eq!(Cost::new(2.0).min(Cost::new(1.0)), Cost::new(1.0));
        assert_eq!(Cost::INFINITY.min(Cost::new(1.0)), Cost::new(1.0));
        assert_eq!(Cost::ZERO.min(Cost::INFINITY), Cost::ZERO);
    }

    #[test]
    fn test_euclidean_forbidden() {
        let mut model = EuclideanCost::new(vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
        assert_eq!(model.cost(0, 1), Cost::new(5.0));
        model.forbid(0, 1);
        assert!(model.cost(0, 1).is_infinite());
        assert_eq!(model.cost(1, 0), Cost::new(5.0));
    }

    #[test]
    fn test_matrix_cost() {
        let model = MatrixCost::from_fn(3, |from, to| (10 * from + to) as f64);
        assert_eq!(model.n(), 3);
        assert_eq!(model.cost(2, 1), Cost::new(21.0));
    }
}
