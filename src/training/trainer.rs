use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, linalg, s};

use crate::{MlErr, Result, arch::Model, dataset::Dataset, solver::LinearSolver};

/// Fits a `Model` with iteratively reweighted least squares.
///
/// Each `iteration` takes one Newton-Raphson step on the log-likelihood by solving the
/// weighted normal equations `H delta = g`, then updates the model's parameters in place.
/// The trainer borrows the model mutably, so it is the only writer of the parameters for
/// as long as it lives.
pub struct Trainer<'a, M, S>
where
    M: Model,
    S: LinearSolver,
{
    model: &'a mut M,
    dataset: &'a Dataset,
    solver: S,

    gradient: Array1<f64>,
    hessian: Array2<f64>,
    error: f64,
    iterations: usize,
}

impl<'a, M, S> Trainer<'a, M, S>
where
    M: Model,
    S: LinearSolver,
{
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained, with `P` parameters.
    /// * `dataset` - The training set, every example having `P - 1` inputs.
    /// * `solver` - The solver for the weighted normal equations.
    ///
    /// # Returns
    /// The trainer, or a configuration error if the dataset is empty or its examples don't
    /// match the model's parameter count.
    pub fn new(model: &'a mut M, dataset: &'a Dataset, solver: S) -> Result<Self> {
        let size = model.size();
        let trainer = Self {
            model,
            dataset,
            solver,
            gradient: Array1::zeros(size),
            hessian: Array2::zeros((size, size)),
            error: f64::INFINITY,
            iterations: 0,
        };

        trainer.check_shapes()?;
        Ok(trainer)
    }

    /// Performs one Newton step.
    ///
    /// On success the model's parameters and the error are updated. On failure neither is
    /// touched.
    ///
    /// # Errors
    /// * `SingularMatrix` if the hessian can't be solved.
    /// * `SizeMismatch` or `EmptyDataset` if the shapes of the model and the dataset no
    ///   longer agree.
    pub fn iteration(&mut self) -> Result<()> {
        self.check_shapes()?;

        let design = self.design_matrix();
        let (residuals, weights) = self.residuals_and_weights()?;

        self.gradient.fill(0.0);
        self.hessian.fill(0.0);

        let weighted = &design * &weights.insert_axis(Axis(1));
        linalg::general_mat_vec_mul(1.0, &design.t(), &residuals, 1.0, &mut self.gradient);
        linalg::general_mat_mul(1.0, &design.t(), &weighted, 1.0, &mut self.hessian);

        // The product rounds (j, k) and (k, j) differently, keep the upper triangle.
        let p = self.hessian.nrows();
        for j in 1..p {
            for k in 0..j {
                self.hessian[[j, k]] = self.hessian[[k, j]];
            }
        }

        let delta = self
            .solver
            .solve_system(self.hessian.view(), self.gradient.view())
            .inspect_err(|e| warn!("aborting iteration {}: {e}", self.iterations + 1))?;

        let params = self.model.params_mut();
        let previous = Array1::from(params.to_vec());
        for (param, d) in params.iter_mut().zip(&delta) {
            *param -= d;
        }

        self.error = relative_step(delta.view(), previous.view());
        self.iterations += 1;

        debug!(iteration = self.iterations; "irls step done, error = {}", self.error);
        Ok(())
    }

    /// Returns the convergence metric of the last successful iteration, `f64::INFINITY` if
    /// none ran yet.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Returns the amount of successful iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the gradient accumulated on the last iteration.
    pub fn gradient(&self) -> ArrayView1<'_, f64> {
        self.gradient.view()
    }

    /// Returns the hessian accumulated on the last iteration.
    pub fn hessian(&self) -> ArrayView2<'_, f64> {
        self.hessian.view()
    }

    pub fn model(&self) -> &M {
        &*self.model
    }

    /// Builds the `(n, P)` design matrix: a column of ones followed by the inputs.
    fn design_matrix(&self) -> Array2<f64> {
        let mut design = Array2::ones((self.dataset.len(), self.gradient.len()));
        design.slice_mut(s![.., 1..]).assign(&self.dataset.inputs());
        design
    }

    /// Computes `predicted - target` and `predicted * (1 - predicted)` per example.
    fn residuals_and_weights(&self) -> Result<(Array1<f64>, Array1<f64>)> {
        let n = self.dataset.len();
        let mut residuals = Array1::zeros(n);
        let mut weights = Array1::zeros(n);

        for (i, (x, target)) in self.dataset.rows().enumerate() {
            let y = *self
                .model
                .predict(x)?
                .first()
                .ok_or(MlErr::SizeMismatch {
                    a: "prediction",
                    b: "target",
                    got: 0,
                    expected: 1,
                })?;

            residuals[i] = y - target;
            weights[i] = y * (1.0 - y);
        }

        Ok((residuals, weights))
    }

    fn check_shapes(&self) -> Result<()> {
        let size = self.model.size();

        if size != self.gradient.len() {
            return Err(MlErr::SizeMismatch {
                a: "params",
                b: "gradient",
                got: size,
                expected: self.gradient.len(),
            });
        }
        if size == 0 {
            return Err(MlErr::SizeMismatch {
                a: "params",
                b: "intercept",
                got: 0,
                expected: 1,
            });
        }
        if self.dataset.is_empty() {
            return Err(MlErr::EmptyDataset);
        }
        if self.dataset.x_size() != size - 1 {
            return Err(MlErr::SizeMismatch {
                a: "example input",
                b: "params",
                got: self.dataset.x_size(),
                expected: size - 1,
            });
        }

        Ok(())
    }
}

/// Computes the largest relative step `|delta[k]| / |previous[k]|`.
///
/// A coefficient that was exactly zero counts as converged only if it didn't move, and as
/// `f64::INFINITY` otherwise. A `NaN` step also counts as `f64::INFINITY`.
pub fn relative_step(delta: ArrayView1<f64>, previous: ArrayView1<f64>) -> f64 {
    delta
        .iter()
        .zip(previous)
        .map(|(d, p)| {
            let (d, p) = (d.abs(), p.abs());
            if d.is_nan() || (p == 0.0 && d != 0.0) {
                f64::INFINITY
            } else if p == 0.0 {
                0.0
            } else {
                d / p
            }
        })
        .fold(0.0, f64::max)
}
