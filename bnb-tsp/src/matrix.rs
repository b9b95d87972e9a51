use std::fmt::{Display, Formatter, Result};

use ndarray::{Array2, ArrayViewMut1};

use crate::cost::{Cost, CostModel};

/// What a call to [`ReducedMatrix::reduce`] subtracted.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Reduction {
    pub rows: Cost,
    pub columns: Cost,
}

impl Reduction {
    pub fn total(&self) -> Cost {
        self.rows + self.columns
    }
}

/// A cost snapshot together with the lower bound accumulated so far.
///
/// Entry `[[from, to]]` is the remaining cost of moving from `from` to `to`. Forbidden moves, including the
/// diagonal, are `Cost::INFINITY`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReducedMatrix {
    costs: Array2<Cost>,
    lower_bound: Cost,
}

impl ReducedMatrix {
    /// The unreduced matrix of `model`, with a lower bound of zero.
    pub fn from_model<C>(model: &C) -> Self
    where
        C: CostModel + ?Sized,
    {
        let n = model.n();
        let costs = Array2::from_shape_fn((n, n), |(from, to)| {
            if from == to {
                Cost::INFINITY
            } else {
                model.cost(from, to)
            }
        });
        ReducedMatrix {
            costs,
            lower_bound: Cost::ZERO,
        }
    }

    pub fn n(&self) -> usize {
        self.costs.nrows()
    }

    pub fn lower_bound(&self) -> Cost {
        self.lower_bound
    }

    pub fn get(&self, from: usize, to: usize) -> Cost {
        self.costs[[from, to]]
    }

    pub fn is_allowed(&self, from: usize, to: usize) -> bool {
        self.get(from, to).is_finite()
    }

    /// Subtracts the minimum of every row, then of every column, and raises the lower bound by the total.
    ///
    /// Lines without any finite entry are left alone. Afterwards every line with a finite entry contains a zero.
    pub fn reduce(&mut self) -> Reduction {
        let mut reduction = Reduction::default();
        for row in self.costs.rows_mut() {
            reduction.rows += reduce_line(row);
        }
        for column in self.costs.columns_mut() {
            reduction.columns += reduce_line(column);
        }
        self.lower_bound += reduction.total();
        reduction
    }

    /// The matrix of the state that extends a route ending in `from` by the move to `to`.
    ///
    /// The bound inherits the current entry of that move; the returned matrix is not reduced yet.
    pub fn branch(&self, from: usize, to: usize) -> ReducedMatrix {
        let mut child = self.clone();
        child.lower_bound += self.get(from, to);
        child.costs.row_mut(from).fill(Cost::INFINITY);
        child.costs.column_mut(to).fill(Cost::INFINITY);
        child.costs[[to, from]] = Cost::INFINITY;
        child
    }
}

fn reduce_line(mut line: ArrayViewMut1<Cost>) -> Cost {
    let min = line.iter().fold(Cost::INFINITY, |acc, &c| acc.min(c));
    if min.is_zero() || min.is_infinite() {
        return Cost::ZERO;
    }
    for c in line.iter_mut().filter(|c| c.is_finite()) {
        *c -= min;
    }
    min
}

impl Display for ReducedMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for row in self.costs.rows() {
            let line = row
                .iter()
                .map(|c| format!("{:>6}", c.to_string()))
                .collect::<Vec<String>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        write!(f, "lower bound: {}", self.lower_bound)
    }
}
