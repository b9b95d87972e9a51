use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SolveError {
    #[error("the instance has no points")]
    EmptyInstance,
    #[error("no tour of finite cost found: nearest neighbor failed from every start and {attempts} random permutations were infinite")]
    Infeasible { attempts: usize },
}

pub type Result<T> = std::result::Result<T, SolveError>;
