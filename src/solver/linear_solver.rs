use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{MlErr, Result};

/// A pivot whose magnitude is at most this fraction of its column's scale counts as zero.
pub const RANK_TOLERANCE: f64 = 1e-8;

/// A dense linear system solver: decomposes `A` once, then solves `A x = b`.
pub trait LinearSolver {
    type Decomposition;

    /// Decomposes the square matrix `a`.
    ///
    /// # Errors
    /// `SizeMismatch` if `a` is not square.
    fn decompose(&self, a: ArrayView2<f64>) -> Result<Self::Decomposition>;

    /// Returns `true` if the decomposed matrix has full rank, up to `RANK_TOLERANCE`.
    fn is_nonsingular(&self, decomposition: &Self::Decomposition) -> bool;

    /// Solves `A x = b` with a previous decomposition of `A`.
    ///
    /// # Errors
    /// `SingularMatrix` if the decomposition is singular, `SizeMismatch` if `b` doesn't
    /// match the dimension of `A`.
    fn solve(&self, decomposition: &Self::Decomposition, b: ArrayView1<f64>)
    -> Result<Array1<f64>>;

    /// Decomposes `a`, checks it is nonsingular and solves `a x = b`.
    fn solve_system(&self, a: ArrayView2<f64>, b: ArrayView1<f64>) -> Result<Array1<f64>> {
        let decomposition = self.decompose(a)?;
        if !self.is_nonsingular(&decomposition) {
            return Err(MlErr::SingularMatrix { dim: a.nrows() });
        }

        self.solve(&decomposition, b)
    }
}

/// Returns `true` if every pivot exceeds `RANK_TOLERANCE` times its column's scale.
///
/// Rounding rarely leaves the pivot of a rank deficient matrix at exactly zero, so the test is
/// relative. A zero or `NaN` scale makes the matrix singular.
pub(super) fn has_full_rank<I>(pivots: I, scales: &[f64]) -> bool
where
    I: IntoIterator<Item = f64>,
{
    pivots
        .into_iter()
        .zip(scales)
        .all(|(pivot, scale)| pivot.abs() > RANK_TOLERANCE * scale)
}

/// Checks `a` is square and returns its dimension.
pub(super) fn square_dim(a: ArrayView2<f64>) -> Result<usize> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(MlErr::SizeMismatch {
            a: "matrix rows",
            b: "matrix cols",
            got: rows,
            expected: cols,
        });
    }

    Ok(rows)
}

/// Checks the right hand side matches the system's dimension.
pub(super) fn check_rhs(b: ArrayView1<f64>, dim: usize) -> Result<()> {
    if b.len() != dim {
        return Err(MlErr::SizeMismatch {
            a: "right hand side",
            b: "matrix",
            got: b.len(),
            expected: dim,
        });
    }

    Ok(())
}
