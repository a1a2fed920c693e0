mod cholesky;
mod linear_solver;
mod lu;

pub use cholesky::{CholeskyDecomposition, CholeskySolver};
pub use linear_solver::{LinearSolver, RANK_TOLERANCE};
pub use lu::{LuDecomposition, LuSolver};
