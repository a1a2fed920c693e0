use ndarray::{Array1, ArrayView1};

use crate::Result;

/// A model whose parameters can be fitted by a trainer.
///
/// The model owns its parameter vector. A trainer holding `&mut` to the model is the only
/// writer of the parameters while it runs.
pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize {
        self.params().len()
    }

    /// Returns the model's parameters. Index 0 is the intercept.
    fn params(&self) -> &[f64];

    /// Returns the model's parameters for in place updates.
    fn params_mut(&mut self) -> &mut [f64];

    /// Computes the model's output for a single example.
    ///
    /// # Arguments
    /// * `input` - The example's features, `size() - 1` of them.
    ///
    /// # Returns
    /// The output vector, its first component being the scalar prediction.
    fn predict(&self, input: ArrayView1<f64>) -> Result<Array1<f64>>;
}
