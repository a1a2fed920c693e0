use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyDataset,
    InvalidConfig(String),
    SingularMatrix {
        dim: usize,
    },
    Parse {
        line: usize,
        value: String,
    },
    Io(io::Error),
    Json(serde_json::Error),
}

impl MlErr {
    /// Returns `true` if this error comes from a failed decomposition or solve.
    pub fn is_numerical(&self) -> bool {
        matches!(self, MlErr::SingularMatrix { .. })
    }

    /// Returns `true` if this error comes from mismatched shapes or invalid settings.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MlErr::SizeMismatch { .. } | MlErr::EmptyDataset | MlErr::InvalidConfig(_)
        )
    }
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            MlErr::EmptyDataset => write!(f, "The training set has no rows"),
            MlErr::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            MlErr::SingularMatrix { dim } => {
                write!(f, "The {dim}x{dim} hessian is singular, no step can be taken")
            }
            MlErr::Parse { line, value } => {
                write!(f, "dataset line {line}: cannot parse '{value}' as f64")
            }
            MlErr::Io(e) => write!(f, "io error: {e}"),
            MlErr::Json(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            MlErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors() {
        assert!(MlErr::SingularMatrix { dim: 2 }.is_numerical());
        assert!(!MlErr::SingularMatrix { dim: 2 }.is_configuration());
        assert!(MlErr::EmptyDataset.is_configuration());

        let mismatch = MlErr::SizeMismatch {
            a: "example input",
            b: "params",
            got: 3,
            expected: 2,
        };
        assert!(mismatch.is_configuration());
        assert!(!mismatch.is_numerical());
    }
}
