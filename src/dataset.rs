use std::{fs, path::Path};

use ndarray::{Array2, ArrayView1, ArrayView2, s};
use rand::Rng;

use crate::{MlErr, Result, arch::links::Logit};

/// A read-only training set stored row-major: each row holds `x_size` inputs followed by
/// `y_size` ideal values.
#[derive(Debug, Clone)]
pub struct Dataset {
    x_size: usize,
    y_size: usize,
    data: Array2<f64>,
}

impl Dataset {
    /// Creates a new `Dataset` from raw row-major data.
    ///
    /// # Arguments
    /// * `data` - The rows, one after the other.
    /// * `x_size` - The amount of inputs per row.
    /// * `y_size` - The amount of ideal values per row, at least one.
    ///
    /// # Returns
    /// The dataset, or a `SizeMismatch` if `data` can't be split in whole rows.
    pub fn new(data: Vec<f64>, x_size: usize, y_size: usize) -> Result<Self> {
        if y_size == 0 {
            return Err(MlErr::SizeMismatch {
                a: "ideal",
                b: "target",
                got: 0,
                expected: 1,
            });
        }

        let row_size = x_size + y_size;
        let remainder = data.len() % row_size;
        let data = Array2::from_shape_vec((data.len() / row_size, row_size), data).map_err(|_| {
            MlErr::SizeMismatch {
                a: "data",
                b: "row size",
                got: remainder,
                expected: 0,
            }
        })?;

        Ok(Self {
            x_size,
            y_size,
            data,
        })
    }

    /// Creates a new `Dataset` from `(input, ideal)` rows.
    ///
    /// Every row must have the same input and ideal lengths as the first one.
    pub fn from_rows<I, X, Y>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (X, Y)>,
        X: AsRef<[f64]>,
        Y: AsRef<[f64]>,
    {
        let mut rows = rows.into_iter().peekable();
        let Some((x, y)) = rows.peek() else {
            return Err(MlErr::EmptyDataset);
        };

        let (x_size, y_size) = (x.as_ref().len(), y.as_ref().len());
        let mut data = Vec::new();

        for (x, y) in rows {
            let (x, y) = (x.as_ref(), y.as_ref());
            if x.len() != x_size {
                return Err(MlErr::SizeMismatch {
                    a: "example input",
                    b: "first example input",
                    got: x.len(),
                    expected: x_size,
                });
            }
            if y.len() != y_size {
                return Err(MlErr::SizeMismatch {
                    a: "example ideal",
                    b: "first example ideal",
                    got: y.len(),
                    expected: y_size,
                });
            }

            data.extend_from_slice(x);
            data.extend_from_slice(y);
        }

        Self::new(data, x_size, y_size)
    }

    /// Loads a comma separated file where each line is a row. Blank lines are skipped.
    pub fn from_csv<P: AsRef<Path>>(path: P, x_size: usize, y_size: usize) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let row_size = x_size + y_size;
        let mut data = Vec::new();

        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let values = line
                .split(',')
                .map(|v| {
                    let v = v.trim();
                    v.parse::<f64>().map_err(|_| MlErr::Parse {
                        line: i + 1,
                        value: v.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            if values.len() != row_size {
                return Err(MlErr::SizeMismatch {
                    a: "csv line",
                    b: "row size",
                    got: values.len(),
                    expected: row_size,
                });
            }

            data.extend(values);
        }

        Self::new(data, x_size, y_size)
    }

    /// Samples a binary classification dataset out of a known logistic model.
    ///
    /// # Arguments
    /// * `samples` - The amount of rows.
    /// * `coefficients` - The intercept followed by one coefficient per feature.
    /// * `rng` - A random number generator.
    pub fn synthetic<R: Rng>(samples: usize, coefficients: &[f64], rng: &mut R) -> Result<Self> {
        let Some((&intercept, slopes)) = coefficients.split_first() else {
            return Err(MlErr::InvalidConfig(
                "synthetic coefficients must contain at least the intercept".into(),
            ));
        };

        let link = Logit;
        let mut data = Vec::with_capacity(samples * (slopes.len() + 1));

        for _ in 0..samples {
            let x: Vec<f64> = slopes.iter().map(|_| rng.random_range(-3.0..3.0)).collect();
            let z = intercept + x.iter().zip(slopes).map(|(x, b)| x * b).sum::<f64>();
            let y = if rng.random::<f64>() < link.f(z) { 1.0 } else { 0.0 };

            data.extend(x);
            data.push(y);
        }

        Self::new(data, slopes.len(), 1)
    }

    /// Returns the amount of rows.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the amount of inputs per row.
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// Returns the amount of ideal values per row.
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Returns a `(len, x_size)` view over every example's inputs.
    pub fn inputs(&self) -> ArrayView2<'_, f64> {
        self.data.slice(s![.., ..self.x_size])
    }

    /// Returns the inputs of the `row`-th example.
    pub fn input(&self, row: usize) -> ArrayView1<'_, f64> {
        self.data.slice(s![row, ..self.x_size])
    }

    /// Returns the target of the `row`-th example, that is, its first ideal value.
    pub fn target(&self, row: usize) -> f64 {
        self.data[[row, self.x_size]]
    }

    /// Iterates over the `(input, target)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (ArrayView1<'_, f64>, f64)> {
        (0..self.len()).map(move |i| (self.input(i), self.target(i)))
    }
}
