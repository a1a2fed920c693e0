use std::env;

use anyhow::Context;
use irls::{
    arch::{Model, MultipleLinearRegression, links::LinkFn},
    config::{FitSpec, SolverSpec},
    dataset::Dataset,
    solver::{CholeskySolver, LinearSolver, LuSolver},
    training::{FitReport, Trainer, fit},
};
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = match env::args().nth(1) {
        Some(path) => {
            FitSpec::from_json_file(&path).with_context(|| format!("loading spec '{path}'"))?
        }
        None => FitSpec::default(),
    };

    let dataset = spec.dataset.load().context("loading dataset")?;
    info!(
        "loaded {} examples with {} features",
        dataset.len(),
        dataset.x_size()
    );

    let mut model = MultipleLinearRegression::new(dataset.x_size(), LinkFn::from(spec.link));
    let report = match spec.solver {
        SolverSpec::Lu => run(&mut model, &dataset, LuSolver, &spec)?,
        SolverSpec::Cholesky => run(&mut model, &dataset, CholeskySolver, &spec)?,
    };

    println!(
        "iterations: {}, error: {:e}, converged: {}",
        report.iterations, report.error, report.converged
    );
    println!("coefficients: {:?}", model.params());

    let mut correct = 0;
    for (x, target) in dataset.rows() {
        if model.classify(x, 0.5)? == (target >= 0.5) {
            correct += 1;
        }
    }

    println!(
        "training accuracy: {:.2}%",
        100.0 * correct as f64 / dataset.len() as f64
    );

    Ok(())
}

fn run<S: LinearSolver>(
    model: &mut MultipleLinearRegression,
    dataset: &Dataset,
    solver: S,
    spec: &FitSpec,
) -> anyhow::Result<FitReport> {
    let mut trainer = Trainer::new(model, dataset, solver)?;
    let report = fit(&mut trainer, spec.max_iterations, spec.tolerance)?;
    Ok(report)
}
