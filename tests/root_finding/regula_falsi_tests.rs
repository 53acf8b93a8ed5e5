//! tests for the regula falsi root finding algorithm
use approx::assert_abs_diff_eq;
use rootstream::root_finding::bisection::{bisection, BisectionCfg};
use rootstream::root_finding::controller::ErrorMode;
use rootstream::root_finding::errors::{ErrorKind, RootFindingError};
use rootstream::root_finding::regula_falsi::{regula_falsi, RegulaFalsiCfg, RegulaFalsiError};
use rootstream::root_finding::report::ToleranceSatisfied;

type TestResult = Result<(), RegulaFalsiError>;

#[test]
fn agrees_with_bisection() -> TestResult {
    let f   = |x: f64| x * x.sin() - 1.0;
    let res = regula_falsi(f, 0.0, 2.0, RegulaFalsiCfg::new())?.solve()?;
    let bis = bisection(f, 0.0, 2.0, BisectionCfg::new())
        .and_then(|b| b.solve())
        .expect("bisection converges");

    assert_abs_diff_eq!(res.root, 1.114157141, epsilon = 1e-6);
    assert_abs_diff_eq!(res.root, bis.root, epsilon = 1e-6);
    assert!(res.iterations < bis.iterations);
    assert_eq!(res.tolerance_satisfied, ToleranceSatisfied::StepAndFunction);
    assert_eq!(res.algorithm_name, "regula_falsi");
    Ok(())
}

#[test]
fn finds_cube_root_of_2() -> TestResult {
    let f   = |x: f64| x.powi(3) - 2.0;
    let res = regula_falsi(f, 0.0, 2.0, RegulaFalsiCfg::new())?.solve()?;

    assert_abs_diff_eq!(res.root, 2.0_f64.cbrt(), epsilon = 1e-6);
    assert!(f(res.root).abs() < 1e-6);
    Ok(())
}

#[test]
fn bracket_shrinks_around_root() -> TestResult {
    let f      = |x: f64| x * x - 3.0;
    let mut it = regula_falsi(f, 0.0, 3.0, RegulaFalsiCfg::new())?;

    for _ in 0..3 {
        it.next().expect("pending step")?;
        let [a, b] = it.bracket();
        assert!(a <= 3.0_f64.sqrt() && 3.0_f64.sqrt() <= b);
    }
    Ok(())
}

#[test]
fn pole_inside_bracket_is_reported() -> TestResult {
    let f     = |x: f64| 1.0 / (x - 2.0);
    let items = regula_falsi(f, 1.0, 7.0, RegulaFalsiCfg::new())?.collect::<Vec<_>>();

    let last = items.last().expect("non-empty stream");
    assert!(matches!(
        last,
        Err(RegulaFalsiError::RootFinding(RootFindingError::NonFiniteEvaluation { .. }))
    ));
    assert!(items[..items.len() - 1].iter().all(|r| matches!(r, Ok(s) if !s.converged)));
    Ok(())
}

#[test]
fn no_sign_change() -> TestResult {
    let f   = |x: f64| x * x + 1.0;
    let err = regula_falsi(f, -1.0, 1.0, RegulaFalsiCfg::new()).unwrap_err();

    assert!(matches!(err, RegulaFalsiError::NoSignChange { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    Ok(())
}

#[test]
fn detects_invalid_bounds() -> TestResult {
    let f   = |x: f64| x;
    let err = regula_falsi(f, 3.0, -3.0, RegulaFalsiCfg::new()).unwrap_err();

    assert!(matches!(err, RegulaFalsiError::InvalidBounds { a, b } if a == 3.0 && b == -3.0));
    Ok(())
}

#[test]
fn endpoint_root_is_accepted() -> TestResult {
    let f   = |x: f64| x - 4.0;
    let res = regula_falsi(f, 0.0, 4.0, RegulaFalsiCfg::new())?.solve()?;

    assert_eq!(res.root, 4.0);
    assert_eq!(res.iterations, 0);
    assert_eq!(res.tolerance_satisfied, ToleranceSatisfied::ExactRoot);
    Ok(())
}

#[test]
fn relative_mode_converges() -> TestResult {
    let f   = |x: f64| x * x - 10.0;
    let cfg = RegulaFalsiCfg::new().set_error_mode(ErrorMode::Relative);
    let res = regula_falsi(f, 0.0, 5.0, cfg)?.solve()?;

    assert_abs_diff_eq!(res.root, 10.0_f64.sqrt(), epsilon = 1e-6);
    Ok(())
}

#[test]
fn max_iter_limits_steps() -> TestResult {
    let f   = |x: f64| x * x.sin() - 1.0;
    let cfg = RegulaFalsiCfg::new().set_max_iter(2)?;
    let err = regula_falsi(f, 0.0, 2.0, cfg)?.solve().unwrap_err();

    assert!(matches!(
        err,
        RegulaFalsiError::RootFinding(RootFindingError::NonConvergence { iterations: 2, .. })
    ));
    Ok(())
}

#[test]
fn exact_first_iterate_is_accepted() -> TestResult {
    let f   = |x: f64| x - 0.5;
    let cfg = RegulaFalsiCfg::new().set_max_iter(1)?;
    let res = regula_falsi(f, 0.0, 1.0, cfg)?.solve()?;

    assert_eq!(res.root, 0.5);
    assert_eq!(res.iterations, 1);
    assert_eq!(res.tolerance_satisfied, ToleranceSatisfied::ExactRoot);
    Ok(())
}

#[test]
fn first_step_measured_against_replaced_bound() -> TestResult {
    // the chord lands at 5e-10, short of the root, and replaces the lower bound
    let f   = |x: f64| x + x * x - 1e-9;
    let cfg = RegulaFalsiCfg::new().set_max_iter(1)?.set_function_residual(1e-6)?;
    let mut it = regula_falsi(f, 0.0, 1.0, cfg)?;

    let first = it.next().expect("first step")?;
    assert!(first.converged);
    assert_abs_diff_eq!(first.value, 5e-10, epsilon = 1e-12);
    assert_eq!(it.bracket(), [0.0, 1.0]);
    Ok(())
}

#[test]
fn bracket_wider_than_f64_max() -> TestResult {
    let mut it = regula_falsi(|x: f64| x - 1.0, -1e308, 1e308, RegulaFalsiCfg::new())?;
    let first  = it.next().expect("first step")?;
    assert!(first.value.is_finite());
    let [a, b] = it.bracket();
    assert!(a <= 1.0 && 1.0 <= b);

    let res = regula_falsi(|x: f64| x, -1e308, 1e308, RegulaFalsiCfg::new())?.solve()?;
    assert_eq!(res.root, 0.0);
    assert_eq!(res.tolerance_satisfied, ToleranceSatisfied::ExactRoot);
    Ok(())
}
