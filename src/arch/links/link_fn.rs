use super::Logit;

/// The inverse link a regression applies to its linear predictor.
///
/// The trainer weighs each example by `p * (1 - p)`, the variance of a Bernoulli outcome, so
/// only links whose outputs are probabilities belong here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkFn {
    Logit(Logit),
}

impl LinkFn {
    pub fn logit() -> Self {
        LinkFn::Logit(Logit::new())
    }

    pub fn f(&self, z: f64) -> f64 {
        match self {
            LinkFn::Logit(l) => l.f(z),
        }
    }
}

impl Default for LinkFn {
    fn default() -> Self {
        Self::logit()
    }
}
