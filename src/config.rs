use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{MlErr, Result, arch::links::LinkFn, dataset::Dataset};

const DEFAULT_MAX_ITERATIONS: NonZeroUsize = NonZeroUsize::new(25).unwrap();

/// The specification for the `LinkFn` enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkFnSpec {
    #[default]
    Logit,
}

impl From<LinkFnSpec> for LinkFn {
    fn from(spec: LinkFnSpec) -> Self {
        match spec {
            LinkFnSpec::Logit => LinkFn::logit(),
        }
    }
}

/// The specification for the `LinearSolver` trait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverSpec {
    #[default]
    Lu,
    Cholesky,
}

/// Where the training set comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSpec {
    Local {
        path: PathBuf,
        x_size: usize,
        y_size: usize,
    },
    Inline {
        data: Vec<f64>,
        x_size: usize,
        y_size: usize,
    },
    Synthetic {
        samples: usize,
        coefficients: Vec<f64>,
        seed: Option<u64>,
    },
}

impl DatasetSpec {
    /// Builds the dataset this spec describes.
    pub fn load(&self) -> Result<Dataset> {
        match self {
            DatasetSpec::Local {
                path,
                x_size,
                y_size,
            } => Dataset::from_csv(path, *x_size, *y_size),
            DatasetSpec::Inline {
                data,
                x_size,
                y_size,
            } => Dataset::new(data.clone(), *x_size, *y_size),
            DatasetSpec::Synthetic {
                samples,
                coefficients,
                seed,
            } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_os_rng(),
                };
                Dataset::synthetic(*samples, coefficients, &mut rng)
            }
        }
    }
}

/// The specification of a whole fitting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSpec {
    pub link: LinkFnSpec,
    pub solver: SolverSpec,
    pub max_iterations: NonZeroUsize,
    pub tolerance: f64,
    pub dataset: DatasetSpec,
}

impl Default for FitSpec {
    fn default() -> Self {
        Self {
            link: LinkFnSpec::Logit,
            solver: SolverSpec::Lu,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: 1e-8,
            dataset: DatasetSpec::Synthetic {
                samples: 200,
                coefficients: vec![-0.5, 1.5, -2.0],
                seed: Some(42),
            },
        }
    }
}

impl FitSpec {
    /// Parses and validates a spec from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Reads, parses and validates a spec from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(MlErr::InvalidConfig(format!(
                "tolerance must be finite and non negative, got {}",
                self.tolerance
            )));
        }

        Ok(())
    }
}
