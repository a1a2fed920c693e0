use std::num::NonZeroUsize;

use log::{info, warn};

use super::Trainer;
use crate::{MlErr, Result, arch::Model, solver::LinearSolver};

/// Summary of a `fit` run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    /// The amount of iterations performed by this run.
    pub iterations: usize,
    /// The convergence metric after the last iteration.
    pub error: f64,
    /// Whether `error` went below the tolerance.
    pub converged: bool,
}

/// Runs `trainer` until its error drops below `tolerance` or `max_iterations` is reached.
///
/// # Arguments
/// * `trainer` - The trainer to drive.
/// * `max_iterations` - Upper bound on the amount of iterations.
/// * `tolerance` - Finite, non negative threshold for the convergence metric.
///
/// # Errors
/// `InvalidConfig` for a bad tolerance. Any error raised by an iteration is propagated,
/// leaving the model with the parameters of the last successful iteration.
pub fn fit<M, S>(
    trainer: &mut Trainer<'_, M, S>,
    max_iterations: NonZeroUsize,
    tolerance: f64,
) -> Result<FitReport>
where
    M: Model,
    S: LinearSolver,
{
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(MlErr::InvalidConfig(format!(
            "tolerance must be finite and non negative, got {tolerance}"
        )));
    }

    info!("fitting {} parameters, tolerance {tolerance}", trainer.model().size());

    let mut iterations = 0;
    while iterations < max_iterations.get() {
        trainer.iteration()?;
        iterations += 1;

        if trainer.error() < tolerance {
            info!("converged after {iterations} iterations, error {}", trainer.error());
            return Ok(FitReport {
                iterations,
                error: trainer.error(),
                converged: true,
            });
        }
    }

    warn!(
        "did not converge after {iterations} iterations, error {}",
        trainer.error()
    );

    Ok(FitReport {
        iterations,
        error: trainer.error(),
        converged: false,
    })
}
