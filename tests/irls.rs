use std::num::NonZeroUsize;

use irls::{
    MlErr,
    arch::{Model, MultipleLinearRegression, links::LinkFn},
    config::FitSpec,
    dataset::Dataset,
    solver::{CholeskySolver, LinearSolver, LuSolver},
    training::{Trainer, fit, relative_step},
};
use ndarray::Array1;
use rand::{SeedableRng, rngs::StdRng};

fn overlapping() -> Dataset {
    let xs = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];
    let ys = [0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0];

    Dataset::from_rows(xs.iter().zip(&ys).map(|(&x, &y)| ([x], [y]))).unwrap()
}

fn converge<S: LinearSolver>(model: &mut MultipleLinearRegression, dataset: &Dataset, solver: S) {
    let mut trainer = Trainer::new(model, dataset, solver).unwrap();

    for _ in 0..10 {
        trainer.iteration().unwrap();
        if trainer.error() < 1e-8 {
            return;
        }
    }

    panic!("no convergence in 10 iterations, error {}", trainer.error());
}

#[test]
fn error_goes_to_zero_within_ten_iterations() {
    let dataset = overlapping();
    let mut model = MultipleLinearRegression::new(1, LinkFn::logit());
    let mut trainer = Trainer::new(&mut model, &dataset, LuSolver).unwrap();

    let mut errors = Vec::new();
    for _ in 0..10 {
        trainer.iteration().unwrap();
        errors.push(trainer.error());
    }

    assert_eq!(errors[0], f64::INFINITY);
    assert!(errors[9] < 1e-12, "{errors:?}");
    assert!(errors[1..6].windows(2).all(|w| w[1] < w[0]), "{errors:?}");
}

#[test]
fn lu_and_cholesky_agree() {
    let dataset = overlapping();

    let mut lu_model = MultipleLinearRegression::new(1, LinkFn::logit());
    converge(&mut lu_model, &dataset, LuSolver);

    let mut chol_model = MultipleLinearRegression::new(1, LinkFn::logit());
    converge(&mut chol_model, &dataset, CholeskySolver);

    for (a, b) in lu_model.params().iter().zip(chol_model.params()) {
        assert!((a - b).abs() < 1e-9, "lu {a}, cholesky {b}");
    }
    assert!(lu_model.params()[0] < 0.0);
    assert!(lu_model.params()[1] > 0.0);
}

#[test]
fn fixed_point_is_stable() {
    let dataset = overlapping();
    let mut model = MultipleLinearRegression::new(1, LinkFn::logit());
    converge(&mut model, &dataset, LuSolver);
    let converged = model.params().to_vec();

    let mut trainer = Trainer::new(&mut model, &dataset, LuSolver).unwrap();
    trainer.iteration().unwrap();
    trainer.iteration().unwrap();

    assert!(trainer.error() < 1e-12, "error {}", trainer.error());
    for (a, b) in trainer.model().params().iter().zip(&converged) {
        assert!((a - b).abs() <= 1e-12 * b.abs(), "{a} moved away from {b}");
    }
}

#[test]
fn error_matches_the_step_taken() {
    let dataset = overlapping();
    let mut model =
        MultipleLinearRegression::with_params(vec![-1.0, 0.5], LinkFn::logit()).unwrap();
    let mut trainer = Trainer::new(&mut model, &dataset, LuSolver).unwrap();

    let before = Array1::from(trainer.model().params().to_vec());
    trainer.iteration().unwrap();
    let after = Array1::from(trainer.model().params().to_vec());

    let delta = &before - &after;
    let expected = relative_step(delta.view(), before.view());

    assert!((trainer.error() - expected).abs() <= 1e-12 * expected);
}

fn first_step_error<S: LinearSolver>(dataset: &Dataset, solver: S) -> MlErr {
    let mut model = MultipleLinearRegression::new(dataset.x_size(), LinkFn::logit());
    let mut trainer = Trainer::new(&mut model, dataset, solver).unwrap();

    trainer.iteration().unwrap_err()
}

fn assert_singular<S: LinearSolver>(row: &[f64], copies: usize, solver: S) {
    let dataset =
        Dataset::from_rows((0..copies).map(|i| (row.to_vec(), vec![(i % 2) as f64]))).unwrap();
    let mut model = MultipleLinearRegression::new(row.len(), LinkFn::logit());
    let mut trainer = Trainer::new(&mut model, &dataset, solver).unwrap();

    let err = trainer.iteration().unwrap_err();

    assert!(
        matches!(err, MlErr::SingularMatrix { dim } if dim == row.len() + 1),
        "{row:?} x {copies}: {err}"
    );
    assert!(
        trainer.model().params().iter().all(|&p| p == 0.0),
        "{row:?} x {copies} moved to {:?}",
        trainer.model().params()
    );
    assert_eq!(trainer.error(), f64::INFINITY);
}

#[test]
fn identical_rows_are_singular() {
    let cases: [(&[f64], usize); 6] = [
        (&[2.0, -1.0], 3),
        (&[2.0, -1.0], 7),
        (&[0.1], 3),
        (&[0.3], 3),
        (&[0.7, 1.3], 5),
        (&[0.1], 2000),
    ];

    for (row, copies) in cases {
        assert_singular(row, copies, LuSolver);
        assert_singular(row, copies, CholeskySolver);
    }
}

#[test]
fn duplicated_feature_is_singular() {
    let dataset = Dataset::from_rows(
        [0.1, 0.4, 0.9, 1.7, 2.2, 3.1]
            .iter()
            .enumerate()
            .map(|(i, &x)| (vec![x, 3.0 * x], vec![(i % 2) as f64])),
    )
    .unwrap();

    for err in [
        first_step_error(&dataset, LuSolver),
        first_step_error(&dataset, CholeskySolver),
    ] {
        assert!(err.is_numerical(), "{err}");
    }
}

#[test]
fn wrong_input_length_is_rejected() {
    let dataset = Dataset::from_rows([(vec![1.0, 2.0], vec![1.0])]).unwrap();
    let mut model = MultipleLinearRegression::new(3, LinkFn::logit());

    let err = Trainer::new(&mut model, &dataset, LuSolver).err().unwrap();
    assert!(err.is_configuration(), "{err}");
}

#[test]
fn ragged_examples_are_rejected() {
    let err = Dataset::from_rows([
        (vec![1.0], vec![0.0]),
        (vec![1.0], vec![1.0]),
        (vec![1.0, 3.0], vec![1.0]),
    ])
    .unwrap_err();

    assert!(err.is_configuration(), "{err}");
}

#[test]
fn recovers_synthetic_coefficients() {
    let truth = [-0.5, 1.5, -2.0];
    let mut rng = StdRng::seed_from_u64(11);
    let dataset = Dataset::synthetic(2000, &truth, &mut rng).unwrap();

    let mut model = MultipleLinearRegression::new(2, LinkFn::logit());
    let mut trainer = Trainer::new(&mut model, &dataset, CholeskySolver).unwrap();
    let report = fit(&mut trainer, NonZeroUsize::new(25).unwrap(), 1e-8).unwrap();

    assert!(report.converged, "{report:?}");
    assert!(report.iterations <= 10, "{report:?}");
    for (b, t) in model.params().iter().zip(&truth) {
        assert!((b - t).abs() < 0.4, "estimated {b}, expected {t}");
    }
}

#[test]
fn default_spec_fits() {
    let spec = FitSpec::default();
    let dataset = spec.dataset.load().unwrap();
    let mut model = MultipleLinearRegression::new(dataset.x_size(), spec.link.into());
    let mut trainer = Trainer::new(&mut model, &dataset, LuSolver).unwrap();

    let report = fit(&mut trainer, spec.max_iterations, spec.tolerance).unwrap();
    assert!(report.converged, "{report:?}");
}

#[test]
fn demo_spec_fits() {
    let spec = FitSpec::from_json_file("demos/overlapping.json").unwrap();
    let dataset = spec.dataset.load().unwrap();
    assert_eq!(dataset.len(), 10);

    let mut model = MultipleLinearRegression::new(dataset.x_size(), spec.link.into());
    let mut trainer = Trainer::new(&mut model, &dataset, CholeskySolver).unwrap();

    let report = fit(&mut trainer, spec.max_iterations, spec.tolerance).unwrap();
    assert!(report.converged, "{report:?}");
    assert!((model.params()[1] - 1.3534115217109624).abs() < 1e-9);
}
