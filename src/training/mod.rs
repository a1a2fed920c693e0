mod fit;
mod trainer;

pub use fit::{FitReport, fit};
pub use trainer::{Trainer, relative_step};
