use ndarray::{Array1, ArrayView1, aview1};

use super::{Model, links::LinkFn};
use crate::{MlErr, Result};

/// A generalized linear model: an intercept plus one coefficient per feature, passed
/// through a link function.
#[derive(Clone, Debug)]
pub struct MultipleLinearRegression {
    params: Vec<f64>,
    link: LinkFn,
}

impl MultipleLinearRegression {
    /// Returns a new `MultipleLinearRegression` with every parameter set to zero.
    ///
    /// # Arguments
    /// * `input_count` - The amount of features the model consumes.
    /// * `link` - The link function applied to the linear predictor.
    pub fn new(input_count: usize, link: LinkFn) -> Self {
        Self {
            params: vec![0.0; input_count + 1],
            link,
        }
    }

    /// Returns a new `MultipleLinearRegression` with the given parameters, intercept first.
    pub fn with_params(params: Vec<f64>, link: LinkFn) -> Result<Self> {
        if params.is_empty() {
            return Err(MlErr::SizeMismatch {
                a: "params",
                b: "intercept",
                got: 0,
                expected: 1,
            });
        }

        Ok(Self { params, link })
    }

    /// Returns the amount of features the model consumes.
    pub fn input_count(&self) -> usize {
        self.params.len() - 1
    }

    pub fn link(&self) -> LinkFn {
        self.link
    }

    /// Computes the linear predictor `b0 + b1 * x1 + ... + bn * xn`.
    pub fn linear_predictor(&self, input: ArrayView1<f64>) -> Result<f64> {
        if input.len() != self.input_count() {
            return Err(MlErr::SizeMismatch {
                a: "input",
                b: "coefficients",
                got: input.len(),
                expected: self.input_count(),
            });
        }

        let (intercept, coefficients) = self.params.split_at(1);
        Ok(intercept[0] + aview1(coefficients).dot(&input))
    }

    /// Returns `true` when the prediction for `input` is at least `threshold`.
    pub fn classify(&self, input: ArrayView1<f64>, threshold: f64) -> Result<bool> {
        Ok(self.predict(input)?[0] >= threshold)
    }
}

impl Model for MultipleLinearRegression {
    fn params(&self) -> &[f64] {
        &self.params
    }

    fn params_mut(&mut self) -> &mut [f64] {
        &mut self.params
    }

    fn predict(&self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        let z = self.linear_predictor(input)?;
        Ok(Array1::from_elem(1, self.link.f(z)))
    }
}
