//! End-to-end scenarios through `PredictionCoordinator`
use approx::assert_relative_eq;
use fire_predict_core::core_types::{Degrees, Hours, KilometersPerHour};
use fire_predict_core::{
    AnalysisRequest, ConfidenceTier, CriticalPoint, DisasterType, FirePerimeter, GeometryBackend,
    PredictionConfig, PredictionCoordinator, PredictionOutcome, WeatherObservation,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn perimeter_json() -> serde_json::Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[-79.8, 43.7], [-79.79, 43.7], [-79.79, 43.71], [-79.8, 43.71], [-79.8, 43.7]]]
    })
}

fn scenario_request() -> AnalysisRequest {
    serde_json::from_value(json!({
        "type": "wildfire",
        "location": {"lat": 43.7, "lon": -79.8},
        "weather": {"wind": {"speed": 5, "deg": 90}, "main": {"temp": 25, "humidity": 40}},
        "fire_perimeter": perimeter_json(),
        "critical_points": [
            {"name": "Hospital", "lat": 43.72, "lon": -79.795},
            {"name": "Rail Yard", "lat": 43.69, "lon": -79.81},
            {"name": "School", "lat": 43.705, "lon": -79.77}
        ]
    }))
    .unwrap()
}

#[test]
fn test_hot_windy_scenario() {
    let outcome = PredictionCoordinator::default().analyze_request(&scenario_request());
    let analysis = outcome.as_wildfire().expect("wildfire analysis");

    let rate = *analysis.current_spread_rate_kmh;
    assert!(rate > 2.0 && rate < 6.0, "spread rate {rate}");
    assert_relative_eq!(rate, 3.37, epsilon = 1e-9);

    let arrivals = &analysis.critical_arrival_times;
    assert_eq!(arrivals.len(), 3);
    assert!(arrivals
        .windows(2)
        .all(|w| w[0].hours_until_arrival <= w[1].hours_until_arrival));
    assert!(arrivals.iter().all(|a| a.confidence == ConfidenceTier::High));

    assert_eq!(analysis.factors.wind_speed_kmh, KilometersPerHour::new(18.0));
    assert_eq!(analysis.factors.wind_direction_deg, Degrees::new(90.0));
}

#[test]
fn test_empty_weather_default_rate() {
    let request: AnalysisRequest =
        serde_json::from_value(json!({"type": "wildfire", "weather": {}})).unwrap();
    let outcome = PredictionCoordinator::default().analyze_request(&request);
    let analysis = outcome.as_wildfire().unwrap();
    assert_relative_eq!(*analysis.current_spread_rate_kmh, 3.44, epsilon = 1e-9);

    // No perimeter: confidences still populated, no boundary, no arrivals
    let confidences: Vec<f64> = analysis
        .predictions
        .horizons()
        .map(|(_, p)| *p.confidence)
        .collect();
    assert_eq!(confidences, vec![0.7, 0.6, 0.45]);
    assert!(analysis.predictions.horizons().all(|(_, p)| p.boundary.is_none()));
    assert!(analysis.critical_arrival_times.is_empty());
}

#[test]
fn test_flood_and_unknown_types_return_placeholder() {
    let coordinator = PredictionCoordinator::default();
    for kind in ["flood", "earthquake", ""] {
        let outcome = coordinator.analyze(
            &DisasterType::from(kind),
            None,
            &WeatherObservation::empty(),
            None,
            None,
        );
        let PredictionOutcome::NotImplemented(placeholder) = outcome else {
            panic!("{kind} should not be modeled");
        };
        assert_eq!(placeholder.status, "not_implemented");
        assert_eq!(placeholder.disaster_type, kind);
    }
}

#[test]
fn test_areas_grow_across_horizons() {
    for backend in [GeometryBackend::Geodesic, GeometryBackend::Planar] {
        let mut config = PredictionConfig::default();
        config.geometry.backend = backend;
        let coordinator = PredictionCoordinator::new(&config).unwrap();

        let outcome = coordinator.analyze_request(&scenario_request());
        let predictions = &outcome.as_wildfire().unwrap().predictions;
        let areas: Vec<f64> = predictions.horizons().map(|(_, p)| *p.area_km2).collect();
        assert!(
            areas.windows(2).all(|w| w[0] < w[1]),
            "{backend}: areas not increasing {areas:?}"
        );
    }
}

#[test]
fn test_output_is_deterministic() {
    let coordinator = PredictionCoordinator::default();
    let first = serde_json::to_string(&coordinator.analyze_request(&scenario_request())).unwrap();
    let second = serde_json::to_string(&coordinator.analyze_request(&scenario_request())).unwrap();
    assert_eq!(first, second);

    let fresh = PredictionCoordinator::default();
    let third = serde_json::to_string(&fresh.analyze_request(&scenario_request())).unwrap();
    assert_eq!(first, third);
}

#[test]
fn test_output_shape() {
    let outcome = PredictionCoordinator::default().analyze_request(&scenario_request());
    let json = serde_json::to_value(&outcome).unwrap();

    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    for key in ["current_spread_rate_kmh", "predictions", "critical_arrival_times", "factors"] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(json["predictions"]["hour_1"]["boundary"]["type"], "Polygon");
    assert_eq!(json["predictions"]["hour_6"]["confidence"], 0.45);
    assert_eq!(json["factors"]["wind_speed_kmh"], 18.0);
    assert!(json["critical_arrival_times"][0]["hours_until_arrival"].is_number());
}

#[test]
fn test_unreachable_point_sorts_last() {
    let coordinator = PredictionCoordinator::default();
    let perimeter = FirePerimeter::from_geojson_value(&perimeter_json()).unwrap();
    let points = vec![
        CriticalPoint::new("Nowhere", f64::NAN, f64::NAN),
        CriticalPoint::new("Close", 43.72, -79.795),
    ];
    let outcome = coordinator.analyze(
        &DisasterType::Wildfire,
        None,
        &WeatherObservation::empty(),
        Some(&perimeter),
        Some(&points),
    );
    let arrivals = &outcome.as_wildfire().unwrap().critical_arrival_times;
    assert_eq!(arrivals[0].location, "Close");
    assert_eq!(arrivals[1].location, "Nowhere");
    assert_eq!(arrivals[1].hours_until_arrival, Hours::INFINITY);
    assert_eq!(arrivals[1].confidence, ConfidenceTier::Medium);

    // Infinite arrival times have no JSON number representation
    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["critical_arrival_times"][1]["hours_until_arrival"].is_null());
}

#[test]
fn test_overflowing_wind_speed_degrades_to_default() {
    let request: AnalysisRequest = serde_json::from_value(json!({
        "type": "wildfire",
        "weather": {"wind": {"speed": 1e308, "deg": 90}},
        "fire_perimeter": perimeter_json()
    }))
    .unwrap();
    let outcome = std::panic::catch_unwind(|| {
        PredictionCoordinator::default().analyze_request(&request)
    })
    .expect("analysis must not panic on extreme weather");
    let analysis = outcome.as_wildfire().unwrap();

    assert_relative_eq!(*analysis.current_spread_rate_kmh, 3.44, epsilon = 1e-9);
    assert_eq!(analysis.factors.wind_speed_kmh, KilometersPerHour::new(36.0));
    assert!(analysis.predictions.horizons().all(|(_, p)| p.boundary.is_some()));
}

#[test]
fn test_huge_temperature_keeps_a_numeric_rate() {
    let request: AnalysisRequest = serde_json::from_value(json!({
        "type": "wildfire",
        "weather": {"main": {"temp": 1e308, "humidity": 50}}
    }))
    .unwrap();
    let outcome = PredictionCoordinator::default().analyze_request(&request);
    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["current_spread_rate_kmh"].is_number());
}

#[test]
fn test_empty_multipolygon_is_no_perimeter() {
    let request: AnalysisRequest = serde_json::from_value(json!({
        "type": "wildfire",
        "weather": {},
        "fire_perimeter": {"type": "MultiPolygon", "coordinates": []}
    }))
    .unwrap();
    assert!(request.perimeter().is_none());

    let outcome = PredictionCoordinator::default().analyze_request(&request);
    let analysis = outcome.as_wildfire().unwrap();
    assert!(analysis.predictions.horizons().all(|(_, p)| p.boundary.is_none()));
    assert!(analysis.critical_arrival_times.is_empty());
}

#[test]
fn test_blank_type_placeholder_message() {
    let coordinator = PredictionCoordinator::default();
    for kind in ["", "   "] {
        let outcome = coordinator.analyze(
            &DisasterType::from(kind),
            None,
            &WeatherObservation::empty(),
            None,
            None,
        );
        let PredictionOutcome::NotImplemented(placeholder) = outcome else {
            panic!("blank type should not be modeled");
        };
        assert_eq!(
            placeholder.message,
            "Unknown spread modeling will be added in future iterations"
        );
        assert_eq!(placeholder.disaster_type, kind);
    }
}
