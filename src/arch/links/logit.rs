/// The logit link. Its inverse, the logistic function, maps the linear predictor into `(0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Logit;

impl Logit {
    pub fn new() -> Self {
        Self
    }

    /// Maps a linear predictor `z` to a probability.
    pub fn f(&self, z: f64) -> f64 {
        1. / (1. + (-z).exp())
    }
}
