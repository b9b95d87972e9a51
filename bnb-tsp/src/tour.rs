use crate::cost::{Cost, CostModel};

/// A closed tour over point indices. Note that the edge from `points.last()` back to `points.first()` is implicit
/// and included in `cost`, and that no point appears more than once.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    points: Vec<usize>,
    cost: Cost,
}

impl IntoIterator for Tour {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tour {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl Tour {
    pub fn new(points: Vec<usize>, cost: Cost) -> Self {
        debug_assert!({
            let mut sorted = points.clone();
            sorted.sort_unstable();
            sorted.dedup();
            sorted.len() == points.len()
        });
        Self { points, cost }
    }

    pub fn with_cost_from<C>(points: Vec<usize>, model: &C) -> Self
    where
        C: CostModel + ?Sized,
    {
        let cost = tour_cost(&points, model);
        Self::new(points, cost)
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn points(&self) -> &[usize] {
        self.points.as_slice()
    }

    pub fn first(&self) -> Option<usize> {
        self.points.first().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the tour visits each of the `n` points exactly once at finite cost.
    pub fn is_feasible(&self, n: usize) -> bool {
        if self.points.len() != n || !self.cost.is_finite() {
            return false;
        }
        let mut seen = vec![false; n];
        for &p in &self.points {
            if p >= n || seen[p] {
                return false;
            }
            seen[p] = true;
        }
        true
    }

    /// The same cycle, rotated so that it starts at `start`.
    pub fn rotated_to(&self, start: usize) -> Option<Tour> {
        let idx = self.points.iter().position(|&p| p == start)?;
        let mut points = self.points.clone();
        points.rotate_left(idx);
        Some(Tour::new(points, self.cost))
    }
}

/// Sum of all consecutive moves plus the closing move back to the first point.
pub fn tour_cost<C>(points: &[usize], model: &C) -> Cost
where
    C: CostModel + ?Sized,
{
    if points.len() < 2 {
        return Cost::ZERO;
    }
    let mut cost: Cost = points.windows(2).map(|e| model.cost(e[0], e[1])).sum();
    if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
        cost += model.cost(last, first);
    }
    cost
}
