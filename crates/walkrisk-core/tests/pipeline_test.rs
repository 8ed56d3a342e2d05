//! End-to-end pipeline tests: load, index, train and score on small
//! synthetic datasets.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use walkrisk_core::{
    InputShapeError, LatLon, ObstacleDataset, PipelineError, RiskConfig, RiskContext,
    RouteScorer, ScoreError, SeverityScale, EARTH_RADIUS_M,
};

const HEADER: &str = "type,geometry/type,geometry/coordinates/0,geometry/coordinates/1,properties/attribute_id,properties/label_type,properties/neighborhood,properties/severity,properties/is_temporary";

const CLUSTER: LatLon = LatLon {
    lat: 47.6000,
    lon: -122.3300,
};

fn dataset_csv(rows: &[(f64, f64, Option<f64>)]) -> String {
    let mut out = String::from(HEADER);
    for (i, (lat, lon, severity)) in rows.iter().enumerate() {
        let severity = severity.map(|s| s.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "\nFeature,Point,{lon},{lat},{i},SurfaceProblem,Test,{severity},False"
        ));
    }
    out
}

fn test_config() -> RiskConfig {
    let mut config = RiskConfig::default();
    config.boosting.n_estimators = 60;
    config
}

fn build(rows: &[(f64, f64, Option<f64>)]) -> RiskContext {
    let csv = dataset_csv(rows);
    let dataset = ObstacleDataset::from_reader(csv.as_bytes(), SeverityScale::Fixed(5.0))
        .expect("load dataset");
    RiskContext::build(test_config(), dataset).expect("build context")
}

/// Local flat-earth offset; accurate to well under a meter at these scales.
fn offset(origin: LatLon, distance_m: f64, bearing_deg: f64) -> LatLon {
    let bearing = bearing_deg.to_radians();
    let dlat = distance_m * bearing.cos() / EARTH_RADIUS_M;
    let dlon = distance_m * bearing.sin() / (EARTH_RADIUS_M * origin.lat.to_radians().cos());
    LatLon::new(origin.lat + dlat.to_degrees(), origin.lon + dlon.to_degrees())
}

/// A tight high-severity cluster plus widely spaced isolated obstacles.
fn clustered_rows() -> Vec<(f64, f64, Option<f64>)> {
    let mut rng = StdRng::seed_from_u64(99);
    let mut rows = Vec::new();

    for _ in 0..40 {
        let p = offset(
            CLUSTER,
            rng.random_range(0.0..15.0),
            rng.random_range(0.0..360.0),
        );
        rows.push((p.lat, p.lon, Some(rng.random_range(4..=5) as f64)));
    }

    for k in 1..=40 {
        let p = offset(CLUSTER, 400.0 * k as f64, 90.0);
        rows.push((p.lat, p.lon, Some((k % 5 + 1) as f64)));
    }

    // Rows without a rating never reach the index.
    rows.push((CLUSTER.lat, CLUSTER.lon, None));
    rows
}

#[test]
fn single_obstacle_features_and_baseline() {
    let origin = LatLon::new(40.0, -73.0);
    let context = build(&[(origin.lat, origin.lon, Some(5.0))]);

    let here = context.extract(origin.to_radians());
    assert_eq!(here.stats().len(), 3);
    for stats in here.stats() {
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean_severity, 1.0);
        assert_eq!(stats.max_severity, 1.0);
    }

    let away = offset(origin, 1_000.0, 0.0);
    let far = context.extract(away.to_radians());
    assert!(far.is_zero());
    assert!(far.values().iter().all(|v| *v == 0.0));

    let scorer = RouteScorer::new(&context);
    let risk = scorer.score(&[away]).unwrap();
    assert!(risk.is_finite());
    assert_eq!(risk, context.model().baseline());
    // The only training target is 0.0 (no neighbors besides itself).
    assert!(risk.abs() < 1e-12);

    assert!(context.evaluation().is_none());
    assert_eq!(context.local_risk(0), 0.0);
}

#[test]
fn empty_route_scores_zero() {
    let context = build(&clustered_rows());
    assert_eq!(RouteScorer::new(&context).score(&[]), Ok(0.0));
    assert_eq!(
        RouteScorer::new(&context).predict_route_severity_risk(&[]),
        Ok(0.0)
    );
}

#[test]
fn isolated_query_point_is_finite_and_all_zero() {
    let context = build(&clustered_rows());
    let nowhere = offset(CLUSTER, 2_000.0, 200.0);

    assert!(context.extract(nowhere.to_radians()).is_zero());
    let risk = RouteScorer::new(&context).score(&[nowhere]).unwrap();
    assert!(risk.is_finite());
    assert_eq!(risk, context.model().baseline());
}

#[test]
fn scoring_is_deterministic_across_builds() {
    let rows = clustered_rows();
    let route = vec![
        CLUSTER,
        offset(CLUSTER, 8.0, 45.0),
        offset(CLUSTER, 400.0, 90.0),
        offset(CLUSTER, 900.0, 10.0),
    ];

    let first = build(&rows);
    let second = build(&rows);
    let a = RouteScorer::new(&first).score(&route).unwrap();
    let b = RouteScorer::new(&second).score(&route).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());
    let again = RouteScorer::new(&first).score(&route).unwrap();
    assert_eq!(a.to_bits(), again.to_bits());
}

#[test]
fn two_point_route_is_the_mean_of_its_points() {
    let context = build(&clustered_rows());
    let scorer = RouteScorer::new(&context);
    let hot = CLUSTER;
    let empty = offset(CLUSTER, 1_500.0, 180.0);

    let route_score = scorer.score(&[hot, empty]).unwrap();
    let expected = (scorer.score_point(hot).unwrap() + scorer.score_point(empty).unwrap()) / 2.0;
    assert!((route_score - expected).abs() < 1e-12);
}

#[test]
fn cluster_scores_above_the_zero_neighbor_baseline() {
    let context = build(&clustered_rows());
    let scorer = RouteScorer::new(&context);

    let baseline = context.model().baseline();
    let hot = scorer.score_point(CLUSTER).unwrap();
    assert!(
        hot > baseline + 1.0,
        "cluster risk {hot} should clearly exceed baseline {baseline}"
    );

    // The lowest-severity isolated obstacle (k = 5, severity 1) sits at the
    // minimum of every feature column, so it follows the same branch as the
    // all-zero vector in every tree.
    let isolated = scorer.score_point(offset(CLUSTER, 400.0 * 5.0, 90.0)).unwrap();
    assert_eq!(isolated, baseline);
}

#[test]
fn local_risk_is_non_negative_and_zero_when_isolated() {
    let context = build(&clustered_rows());
    let n = context.dataset().len();
    assert_eq!(n, 80);
    assert_eq!(context.dataset().dropped_without_severity(), 1);

    for idx in 0..n {
        assert!(context.local_risk(idx) >= 0.0);
    }
    // Rows 40.. are the isolated obstacles, 400 m apart.
    for idx in 40..n {
        assert_eq!(context.local_risk(idx), 0.0);
    }
    assert!(context.local_risk(0) > 0.0);
}

#[test]
fn holds_out_a_fifth_for_evaluation() {
    let context = build(&clustered_rows());
    let eval = context.evaluation().expect("evaluation on held-out rows");
    assert_eq!(eval.test_rows, 16);
    assert_eq!(eval.train_rows, 64);
    assert!(eval.mse.is_finite() && eval.mae.is_finite());

    let summary = context.summary();
    assert_eq!(summary.obstacles, 80);
    assert_eq!(summary.feature_len, 9);
    assert_eq!(summary.n_trees, 60);
    assert_eq!(summary.feature_radii_m, vec![10.0, 25.0, 50.0]);
}

#[test]
fn malformed_route_point_is_rejected() {
    let context = build(&clustered_rows());
    let scorer = RouteScorer::new(&context);

    let err = scorer
        .predict_route_severity_risk(&[vec![47.6, -122.33], vec![47.6]])
        .unwrap_err();
    assert_eq!(
        err,
        ScoreError::Shape(InputShapeError::WrongArity { index: 1, len: 1 })
    );

    let ok = scorer
        .predict_route_severity_risk(&[vec![CLUSTER.lat, CLUSTER.lon]])
        .unwrap();
    assert_eq!(ok, scorer.score_point(CLUSTER).unwrap());
}

#[test]
fn dataset_without_ratings_cannot_build() {
    let csv = dataset_csv(&[(47.6, -122.3, None), (47.7, -122.4, None)]);
    let dataset =
        ObstacleDataset::from_reader(csv.as_bytes(), SeverityScale::Fixed(5.0)).unwrap();
    let err = RiskContext::build(test_config(), dataset).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyDataset));
}

#[test]
fn missing_file_is_a_load_error() {
    let err = RiskContext::from_csv_path(test_config(), "/nonexistent/obstacles.csv").unwrap_err();
    assert!(matches!(err, PipelineError::Load(_)));
}
