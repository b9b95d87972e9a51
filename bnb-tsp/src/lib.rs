//! Exact and time-bounded tours by best-first branch and bound over reduced cost matrices.

pub mod bnb;
pub mod config;
pub mod cost;
pub mod error;
pub mod initial;
pub mod matrix;
mod node;
pub mod point;
pub mod queue;
pub mod result;
pub mod stats;
pub mod tour;

pub use bnb::{branch_and_bound, BranchAndBound};
pub use config::SolverConfig;
pub use cost::{Cost, CostModel, EuclideanCost, MatrixCost};
pub use error::{Result, SolveError};
pub use node::NodeState;
pub use point::Point;
pub use result::{SearchResult, Termination};
pub use tour::Tour;
