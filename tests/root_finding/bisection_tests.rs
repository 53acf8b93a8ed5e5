//! tests for the bisection root finding algorithm
use approx::assert_abs_diff_eq;
use rootstream::root_finding::bisection::{bisection, theoretical_iter, BisectionCfg, BisectionError};
use rootstream::root_finding::controller::ErrorMode;
use rootstream::root_finding::errors::{ErrorKind, RootFindingError};
use rootstream::root_finding::report::{IterationResult, Stencil, ToleranceSatisfied};

type TestResult = Result<(), BisectionError>;

#[test]
fn finds_root_of_x_sin_x_minus_1() -> TestResult {
    let f   = |x: f64| x * x.sin() - 1.0;
    let res = bisection(f, 0.0, 2.0, BisectionCfg::new())?.solve()?;

    assert_abs_diff_eq!(res.root, 1.114157141, epsilon = 1e-6);
    assert!(res.iterations <= theoretical_iter(0.0, 2.0, 1e-6));
    assert_eq!(res.evaluations, res.iterations + 2);
    assert_eq!(res.tolerance_satisfied, ToleranceSatisfied::FunctionResidual);
    assert_eq!(res.algorithm_name, "bisection");
    Ok(())
}

#[test]
fn theoretical_budget_matches_halvings() {
    assert_eq!(theoretical_iter(0.0, 2.0, 1e-6), 21);
    assert_eq!(theoretical_iter(0.0, 1.0, 0.5), 1);
    assert_eq!(theoretical_iter(0.0, 1e-9, 1e-6), 1);
}

#[test]
fn stream_ends_with_single_converged_item() -> TestResult {
    let f     = |x: f64| x * x - 2.0;
    let items = bisection(f, 0.0, 2.0, BisectionCfg::new())?
        .collect::<Result<Vec<IterationResult>, _>>()?;

    let (last, rest) = items.split_last().expect("at least one step");
    assert!(last.converged);
    assert!(rest.iter().all(|r| !r.converged));
    assert_abs_diff_eq!(last.value, 2.0_f64.sqrt(), epsilon = 1e-6);
    Ok(())
}

#[test]
fn bracket_keeps_sign_change() -> TestResult {
    let f      = |x: f64| x.powi(3) - x - 2.0;
    let mut it = bisection(f, 1.0, 2.0, BisectionCfg::new())?;

    for _ in 0..5 {
        it.next().expect("pending step")?;
        let [a, b] = it.bracket();
        assert!(f(a) * f(b) < 0.0);
    }
    Ok(())
}

#[test]
fn no_sign_change() -> TestResult {
    let f   = |x: f64| x * x + 1.0;
    let err = bisection(f, -1.0, 1.0, BisectionCfg::new()).unwrap_err();

    assert!(matches!(err, BisectionError::NoSignChange { a, b } if a == -1.0 && b == 1.0));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    Ok(())
}

#[test]
fn detects_invalid_bounds() -> TestResult {
    let f = |x: f64| x;

    let err = bisection(f, 2.0, 0.0, BisectionCfg::new()).unwrap_err();
    assert!(matches!(err, BisectionError::InvalidBounds { .. }));

    let err = bisection(f, 1.0, 1.0, BisectionCfg::new()).unwrap_err();
    assert!(matches!(err, BisectionError::InvalidBounds { a, b } if a == 1.0 && b == 1.0));

    let err = bisection(f, f64::NAN, 1.0, BisectionCfg::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    Ok(())
}

#[test]
fn non_finite_endpoint() -> TestResult {
    let f   = |x: f64| x.sqrt() - 2.0;
    let err = bisection(f, -1.0, 5.0, BisectionCfg::new()).unwrap_err();

    assert!(matches!(
        err,
        BisectionError::RootFinding(RootFindingError::NonFiniteEvaluation { x, fx })
        if x == -1.0 && fx.is_nan()));
    assert_eq!(err.kind(), ErrorKind::DivisionByZero);
    Ok(())
}

#[test]
fn pole_at_midpoint_is_yielded() -> TestResult {
    let f      = |x: f64| 1.0 / x;
    let mut it = bisection(f, -1.0, 1.0, BisectionCfg::new())?;

    let err = it.next().expect("one item").unwrap_err();
    assert!(matches!(
        err,
        BisectionError::RootFinding(RootFindingError::NonFiniteEvaluation { x, fx })
        if x == 0.0 && fx.is_infinite()));
    assert!(it.next().is_none());
    Ok(())
}

#[test]
fn endpoint_root_is_accepted_without_iterating() -> TestResult {
    let f   = |x: f64| x;
    let res = bisection(f, 0.0, 5.0, BisectionCfg::new())?.solve()?;

    assert_eq!(res.root, 0.0);
    assert_eq!(res.iterations, 0);
    assert_eq!(res.evaluations, 2);
    assert_eq!(res.tolerance_satisfied, ToleranceSatisfied::ExactRoot);

    let res = bisection(f, -5.0, 0.0, BisectionCfg::new())?.solve()?;
    assert_eq!(res.root, 0.0);
    assert_eq!(res.iterations, 0);
    Ok(())
}

#[test]
fn both_endpoints_are_roots_picks_first() -> TestResult {
    let f   = |_x: f64| 0.0;
    let res = bisection(f, 1.0, 2.0, BisectionCfg::new())?.solve()?;

    assert_eq!(res.root, 1.0);
    assert_eq!(res.iterations, 0);
    Ok(())
}

#[test]
fn max_iter_1_hits_limit() -> TestResult {
    let f   = |x: f64| x;
    let cfg = BisectionCfg::new().set_max_iter(1)?;
    let mut it = bisection(f, -5.0, 1.0, cfg)?;

    let first = it.next().expect("first step")?;
    assert_eq!(first, IterationResult { value: -2.0, converged: false });

    let err = it.next().expect("budget error").unwrap_err();
    assert!(matches!(
        err,
        BisectionError::RootFinding(RootFindingError::NonConvergence { iterations: 1, .. })
    ));
    assert_eq!(err.kind(), ErrorKind::NonConvergence);
    assert!(it.next().is_none());
    Ok(())
}

#[test]
fn loose_residual_stops_quickly() -> TestResult {
    let f   = |x: f64| x;
    let cfg = BisectionCfg::new().set_residual(2.5)?;
    let res = bisection(f, -5.0, 1.0, cfg)?.solve()?;

    assert_eq!(res.root, -2.0);
    assert_eq!(res.iterations, 1);
    assert!(matches!(res.stencil, Stencil::Bracket { bounds } if bounds == [-5.0, 1.0]));
    Ok(())
}

#[test]
fn relative_mode_is_unsupported() -> TestResult {
    let f   = |x: f64| x - 1.0;
    let cfg = BisectionCfg::new().set_error_mode(ErrorMode::Relative);
    let err = bisection(f, 0.0, 2.0, cfg).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedMode);
    Ok(())
}

#[test]
fn invalid_residual_is_rejected() {
    let err = BisectionCfg::new().set_residual(0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = BisectionCfg::new().set_max_iter(0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn bracket_wider_than_f64_max() -> TestResult {
    let mut it = bisection(|x: f64| x, -1e308, 1e308, BisectionCfg::new())?;

    let first = it.next().expect("first step")?;
    assert_eq!(first, IterationResult { value: 0.0, converged: true });
    assert!(it.next().is_none());

    let mut it = bisection(|x: f64| x - 1e307, -1e308, 1e308, BisectionCfg::new())?;
    let first = it.next().expect("first step")?;
    assert!(first.value.is_finite());
    assert!(!first.converged);

    let budget = theoretical_iter(-1e308, 1e308, 1e-6);
    assert!(budget > 1000 && budget < 1100);
    Ok(())
}

#[test]
fn search_debug_skips_the_closure() -> TestResult {
    let offset = 1.5;
    let it     = bisection(move |x: f64| x - offset, 0.0, 2.0, BisectionCfg::new())?;
    let shown  = format!("{it:?}");

    assert!(shown.starts_with("Bisection"));
    assert!(shown.contains("bracket: [0.0, 2.0]"));
    Ok(())
}
