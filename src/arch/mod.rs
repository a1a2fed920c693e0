pub mod links;
mod model;
mod regression;

pub use model::Model;
pub use regression::MultipleLinearRegression;
