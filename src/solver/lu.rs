use nalgebra::{DMatrix, DVector, Dyn, LU};
use ndarray::{Array1, ArrayView1, ArrayView2};

use super::{
    LinearSolver,
    linear_solver::{check_rhs, has_full_rank, square_dim},
};
use crate::{MlErr, Result};

/// A `LU` decomposition with partial pivoting.
#[derive(Debug)]
pub struct LuDecomposition {
    lu: LU<f64, Dyn, Dyn>,
    scales: Vec<f64>,
    dim: usize,
}

/// General purpose solver using `LU` decomposition with partial pivoting. A matrix is
/// singular when a pivot of `U` is negligible next to the largest entry of its column.
#[derive(Clone, Copy, Debug, Default)]
pub struct LuSolver;

impl LuSolver {
    pub fn new() -> Self {
        Self
    }
}

impl LinearSolver for LuSolver {
    type Decomposition = LuDecomposition;

    fn decompose(&self, a: ArrayView2<f64>) -> Result<LuDecomposition> {
        let dim = square_dim(a)?;
        let scales = a
            .columns()
            .into_iter()
            .map(|col| col.iter().fold(0.0, |max: f64, v| max.max(v.abs())))
            .collect();
        let lu = DMatrix::from_fn(dim, dim, |i, j| a[[i, j]]).lu();

        Ok(LuDecomposition { lu, scales, dim })
    }

    // Partial pivoting only swaps rows, so the k-th pivot still belongs to column k.
    fn is_nonsingular(&self, decomposition: &LuDecomposition) -> bool {
        let u = decomposition.lu.u();
        has_full_rank(u.diagonal().iter().copied(), &decomposition.scales)
    }

    fn solve(&self, decomposition: &LuDecomposition, b: ArrayView1<f64>) -> Result<Array1<f64>> {
        let dim = decomposition.dim;
        check_rhs(b, dim)?;
        if !self.is_nonsingular(decomposition) {
            return Err(MlErr::SingularMatrix { dim });
        }

        let b = DVector::from_iterator(dim, b.iter().copied());
        let x = decomposition
            .lu
            .solve(&b)
            .ok_or(MlErr::SingularMatrix { dim })?;

        Ok(x.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn solves_a_diagonal_system() {
        let a = array![[0.5, 0.0], [0.0, 0.5]];
        let b = array![0.0, -1.0];

        let x = LuSolver.solve_system(a.view(), b.view()).unwrap();
        assert_eq!(x.to_vec(), vec![0.0, -2.0]);
    }

    #[test]
    fn solves_with_pivoting() {
        let a = array![[0.0, 2.0, 1.0], [1.0, 1.0, 0.0], [3.0, 0.0, 1.0]];
        let expected = array![1.0, -2.0, 3.0];
        let b = a.dot(&expected);

        let x = LuSolver.solve_system(a.view(), b.view()).unwrap();
        for (x, e) in x.iter().zip(&expected) {
            assert!((x - e).abs() < 1e-12, "got {x}, expected {e}");
        }
    }

    #[test]
    fn detects_singular_matrices() {
        let a = array![[0.5, 0.5], [0.5, 0.5]];
        let lu = LuSolver.decompose(a.view()).unwrap();

        assert!(!LuSolver.is_nonsingular(&lu));
        assert!(matches!(
            LuSolver.solve(&lu, array![1.0, 1.0].view()),
            Err(MlErr::SingularMatrix { dim: 2 })
        ));
        assert!(
            LuSolver
                .solve_system(a.view(), array![1.0, 1.0].view())
                .unwrap_err()
                .is_numerical()
        );
    }

    #[test]
    fn detects_rounded_rank_deficiency() {
        let x = array![[1.0, 0.7, 1.3], [1.0, 0.7, 1.3], [1.0, 0.7, 1.3]];
        let a = x.t().dot(&x) * 0.25;
        let lu = LuSolver.decompose(a.view()).unwrap();

        assert!(!LuSolver.is_nonsingular(&lu));
        assert!(matches!(
            LuSolver.solve(&lu, array![1.0, 0.0, -1.0].view()),
            Err(MlErr::SingularMatrix { dim: 3 })
        ));
    }

    #[test]
    fn accepts_nearly_collinear_columns() {
        let a = array![[1.0, 1.0], [1.0, 1.0 + 1e-6]];
        let b = array![2.0, 2.0 + 1e-6];

        let x = LuSolver.solve_system(a.view(), b.view()).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-6 && (x[1] - 1.0).abs() < 1e-6, "{x}");
    }

    #[test]
    fn zero_columns_are_singular() {
        let a = array![[2.0, 0.0], [1.0, 0.0]];
        assert!(!LuSolver.is_nonsingular(&LuSolver.decompose(a.view()).unwrap()));
    }

    #[test]
    fn rejects_non_square_matrices() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert!(LuSolver.decompose(a.view()).unwrap_err().is_configuration());
    }

    #[test]
    fn rejects_mismatched_rhs() {
        let lu = LuSolver.decompose(array![[2.0]].view()).unwrap();
        assert!(LuSolver.solve(&lu, array![1.0, 2.0].view()).is_err());
    }
}
