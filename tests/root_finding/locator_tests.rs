use approx::assert_abs_diff_eq;
use rootstream::root_finding::cancel::CancellationToken;
use rootstream::root_finding::errors::{ErrorKind, RootFindingError};
use rootstream::root_finding::locator::{
    locate_roots, CandidateKind, LocatorCfg, LocatorError, RootCandidate, RootLocator,
};

type TestResult = Result<(), LocatorError>;

fn scan<F>(f: F, lower: f64, upper: f64, cells: usize) -> Result<Vec<RootCandidate>, LocatorError>
where F: FnMut(f64) -> f64 {
    let cfg = LocatorCfg::new().set_sub_intervals(cells)?;
    locate_roots(f, lower, upper, cfg)?.collect()
}

#[test]
fn finds_simple_and_double_root() -> TestResult {
    // (x + 1)(x - 1)^2
    let f     = |x: f64| x.powi(3) - x * x - x + 1.0;
    let found = scan(f, -1.2, 2.0, 1000)?;

    assert_eq!(found.len(), 2);

    assert_eq!(found[0].index, 1);
    assert_eq!(found[0].kind, CandidateKind::SignChange);
    assert_abs_diff_eq!(found[0].abscissa, -1.0, epsilon = 1e-2);

    assert_eq!(found[1].index, 2);
    assert_eq!(found[1].kind, CandidateKind::NearTangent);
    assert_abs_diff_eq!(found[1].abscissa, 1.0, epsilon = 1e-2);
    Ok(())
}

#[test]
fn coarse_grid_still_finds_both() -> TestResult {
    let f     = |x: f64| x.powi(3) - x * x - x + 1.0;
    let found = scan(f, -1.2, 2.0, 100)?;

    assert_eq!(found.len(), 2);
    assert!(found.iter().any(|c| (c.abscissa + 1.0).abs() < 0.05));
    assert!(found.iter().any(|c| (c.abscissa - 1.0).abs() < 0.05));
    Ok(())
}

#[test]
fn sign_change_brackets_contain_roots() -> TestResult {
    let f     = |x: f64| x * x - 4.0;
    let found = scan(f, -3.0, 3.0, 100)?;

    assert_eq!(found.len(), 2);
    for (c, root) in found.iter().zip([-2.0, 2.0]) {
        assert_eq!(c.kind, CandidateKind::SignChange);
        assert!(c.bracket[0] < root && root < c.bracket[1]);
        assert_abs_diff_eq!(c.abscissa, root, epsilon = 0.05);
    }
    Ok(())
}

#[test]
fn touching_root_is_near_tangent() -> TestResult {
    let found = scan(|x: f64| x * x, -1.0, 1.1, 100)?;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, CandidateKind::NearTangent);
    assert_abs_diff_eq!(found[0].abscissa, 0.0, epsilon = 1e-2);
    Ok(())
}

#[test]
fn counts_sine_roots() -> TestResult {
    let found = scan(f64::sin, -0.5, 10.0, 100)?;

    assert_eq!(found.len(), 4);
    let indices: Vec<usize> = found.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    Ok(())
}

#[test]
fn no_roots_is_empty() -> TestResult {
    let found = scan(|x: f64| x * x + 1.0, -2.0, 2.0, 50)?;
    assert!(found.is_empty());
    Ok(())
}

#[test]
fn each_grid_point_evaluated_once() -> TestResult {
    let mut it = locate_roots(|x: f64| x * x, -1.0, 1.1, LocatorCfg::new())?;
    while it.next().is_some() {}

    assert_eq!(it.evaluations(), 101);
    Ok(())
}

#[test]
fn builder_scans_supplied_function() -> TestResult {
    let found = RootLocator::new(-3.0, 3.0)
        .with_function(|x: f64| x * x - 4.0)
        .scan()?
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(found.len(), 2);
    Ok(())
}

#[test]
fn builder_without_function_is_invalid() {
    let err = RootLocator::<fn(f64) -> f64>::new(0.0, 1.0).scan().unwrap_err();

    assert!(matches!(err, LocatorError::MissingFunction));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn inverted_interval_is_invalid() {
    let err = locate_roots(|x: f64| x, 1.0, -1.0, LocatorCfg::new()).unwrap_err();

    assert!(matches!(err, LocatorError::InvalidBounds { lower, upper } if lower == 1.0 && upper == -1.0));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn zero_sub_intervals_is_invalid() {
    let err = LocatorCfg::new().set_sub_intervals(0).unwrap_err();

    assert!(matches!(err, LocatorError::InvalidSubIntervals { got: 0 }));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn non_positive_residual_is_invalid() {
    let err = LocatorCfg::new().set_function_residual(0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = LocatorCfg::new().set_function_residual(-1e-3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn pole_on_grid_stops_scan() -> TestResult {
    let cfg    = LocatorCfg::new().set_sub_intervals(2)?;
    let mut it = locate_roots(|x: f64| 1.0 / x, -1.0, 1.0, cfg)?;

    let err = it.next().expect("one item").unwrap_err();
    assert!(matches!(
        err,
        LocatorError::RootFinding(RootFindingError::NonFiniteEvaluation { x, .. }) if x == 0.0
    ));
    assert!(it.next().is_none());
    Ok(())
}

#[test]
fn cancelled_scan_yields_cancelled() -> TestResult {
    let token = CancellationToken::new();
    let cfg   = LocatorCfg::new().with_cancellation(token.clone());
    let mut it = locate_roots(f64::sin, -0.5, 10.0, cfg)?;

    let first = it.next().expect("first candidate")?;
    assert_eq!(first.index, 1);

    token.cancel();
    let err = it.next().expect("cancellation").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(it.next().is_none());
    Ok(())
}

#[test]
fn grid_root_is_reported_once() -> TestResult {
    let found = scan(|x: f64| x, -1.0, 1.0, 2)?;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, CandidateKind::ExactZero);
    assert_eq!(found[0].abscissa, 0.0);
    assert_eq!(found[0].bracket, [-1.0, 1.0]);
    Ok(())
}

#[test]
fn touching_zero_on_grid_is_one_candidate() -> TestResult {
    let found = scan(|x: f64| 0.0 - x * x, -1.0, 1.0, 100)?;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].index, 1);
    assert_eq!(found[0].kind, CandidateKind::ExactZero);
    assert_eq!(found[0].abscissa, 0.0);
    Ok(())
}

#[test]
fn zero_at_either_end() -> TestResult {
    let found = scan(|x: f64| x - 1.0, 1.0, 2.0, 4)?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, CandidateKind::ExactZero);
    assert_eq!(found[0].abscissa, 1.0);
    assert_eq!(found[0].bracket, [1.0, 1.25]);

    let found = scan(|x: f64| x - 2.0, 1.0, 2.0, 4)?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, CandidateKind::ExactZero);
    assert_eq!(found[0].abscissa, 2.0);
    Ok(())
}

#[test]
fn span_wider_than_f64_max() -> TestResult {
    let found = scan(|x: f64| x - 1.0, -1e308, 1e308, 4)?;

    assert_eq!(found.len(), 1);
    let c = found[0];
    assert_eq!(c.kind, CandidateKind::SignChange);
    assert!(c.abscissa.is_finite());
    assert!(c.bracket[0] <= 1.0 && 1.0 <= c.bracket[1]);
    Ok(())
}
