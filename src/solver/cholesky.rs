use nalgebra::{Cholesky, DMatrix, DVector, Dyn};
use ndarray::{Array1, ArrayView1, ArrayView2};

use super::{
    LinearSolver,
    linear_solver::{check_rhs, has_full_rank, square_dim},
};
use crate::{MlErr, Result};

/// A Cholesky factorization, absent when the matrix isn't positive definite.
pub struct CholeskyDecomposition {
    chol: Option<Cholesky<f64, Dyn>>,
    diagonal: Vec<f64>,
    dim: usize,
}

/// Solver for symmetric positive definite systems, such as the hessian of a logistic
/// regression. Only the lower triangle of the matrix is read.
///
/// The `k`-th pivot is `l_kk^2`, the part of `a_kk` the previous columns don't explain. A
/// matrix is singular when that part is negligible next to `a_kk`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CholeskySolver;

impl CholeskySolver {
    pub fn new() -> Self {
        Self
    }
}

impl LinearSolver for CholeskySolver {
    type Decomposition = CholeskyDecomposition;

    fn decompose(&self, a: ArrayView2<f64>) -> Result<CholeskyDecomposition> {
        let dim = square_dim(a)?;
        let diagonal = a.diag().iter().map(|v| v.abs()).collect();
        let chol = DMatrix::from_fn(dim, dim, |i, j| a[[i, j]]).cholesky();

        Ok(CholeskyDecomposition {
            chol,
            diagonal,
            dim,
        })
    }

    fn is_nonsingular(&self, decomposition: &CholeskyDecomposition) -> bool {
        decomposition.chol.as_ref().is_some_and(|chol| {
            let l = chol.l_dirty().diagonal();
            has_full_rank(l.iter().map(|l| l * l), &decomposition.diagonal)
        })
    }

    fn solve(
        &self,
        decomposition: &CholeskyDecomposition,
        b: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        let dim = decomposition.dim;
        check_rhs(b, dim)?;

        let chol = decomposition
            .chol
            .as_ref()
            .filter(|_| self.is_nonsingular(decomposition))
            .ok_or(MlErr::SingularMatrix { dim })?;

        let b = DVector::from_iterator(dim, b.iter().copied());
        Ok(chol.solve(&b).iter().copied().collect())
    }
}
