use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use cardiosense::application::acquisition::SharedReadingStore;
use cardiosense::application::analysis::RiskAnalyzer;
use cardiosense::application::ml::{ModelSource, RiskModel};
use cardiosense::application::system::ServiceContext;
use cardiosense::domain::errors::ModelError;
use cardiosense::domain::health::features::FeatureVector;
use cardiosense::domain::ports::{Prediction, RiskClassifier};
use cardiosense::domain::types::{Reading, ReadingSource};
use cardiosense::interfaces::http::router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

// Classifier with a fixed answer
struct FixedClassifier {
    label: u8,
    p1: f64,
}

impl RiskClassifier for FixedClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<Prediction, ModelError> {
        Ok(Prediction {
            label: self.label,
            probabilities: [1.0 - self.p1, self.p1],
        })
    }

    fn name(&self) -> &str {
        "Fixed"
    }
}

fn context_with(classifier: Arc<dyn RiskClassifier>) -> ServiceContext {
    ServiceContext {
        store: Arc::new(SharedReadingStore::new()),
        analyzer: Arc::new(RiskAnalyzer::new(classifier)),
        model_source: ModelSource::Trained,
    }
}

fn healthy_context() -> ServiceContext {
    context_with(Arc::new(FixedClassifier { label: 0, p1: 0.2 }))
}

async fn send(context: ServiceContext, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(context).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_analyze(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_data_before_first_cycle_is_zero_reading() {
    let request = Request::get("/data").body(Body::empty()).unwrap();
    let (status, body) = send(healthy_context(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["temperature"], 0.0);
    assert_eq!(body["humidity"], 0.0);
    assert_eq!(body["heart_rate"], 0);
    assert_eq!(body["ecg"], 0);
}

#[tokio::test]
async fn test_data_returns_latest_published_reading() {
    let context = healthy_context();
    context
        .store
        .publish(
            Reading {
                temperature: 36.6,
                humidity: 21.0,
                heart_rate: 72,
                ecg: 512,
            },
            ReadingSource::Live,
        )
        .await;

    let request = Request::get("/data").body(Body::empty()).unwrap();
    let (status, body) = send(context, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["temperature"], 36.6);
    assert_eq!(body["heart_rate"], 72);
    assert_eq!(body["ecg"], 512);
}

#[tokio::test]
async fn test_analyze_with_age_scores_snapshot() {
    let context = healthy_context();
    context
        .store
        .publish(
            Reading {
                temperature: 36.0,
                humidity: 20.0,
                heart_rate: 150,
                ecg: 400,
            },
            ReadingSource::Live,
        )
        .await;

    let (status, body) = send(context, post_analyze(r#"{"age": 30}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let analysis = &body["analysis"];
    assert_eq!(analysis["risk_score"], 1);
    assert_eq!(analysis["category"], "Low Risk");
    assert_eq!(analysis["max_hr"], 190);
    assert_eq!(analysis["heart_rate"], 150);
    assert_eq!(analysis["prediction"], 0);
    assert!((analysis["confidence"].as_f64().unwrap() - 0.8).abs() < 1e-9);
}

#[tokio::test]
async fn test_analyze_without_body_uses_default_age() {
    let request = Request::post("/analyze").body(Body::empty()).unwrap();
    let (status, body) = send(healthy_context(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    // 220 - 30
    assert_eq!(body["analysis"]["max_hr"], 190);
    // 0.0 °C reads as hypothermia
    assert_eq!(body["analysis"]["risk_score"], 1);
    assert_eq!(body["analysis"]["category"], "Low Risk");
}

#[tokio::test]
async fn test_analyze_high_risk() {
    let context = context_with(Arc::new(FixedClassifier { label: 1, p1: 0.9 }));
    context
        .store
        .publish(
            Reading {
                temperature: 38.0,
                humidity: 20.0,
                heart_rate: 180,
                ecg: 400,
            },
            ReadingSource::Synthetic,
        )
        .await;

    let (status, body) = send(context, post_analyze(r#"{"age": 30}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["risk_score"], 7);
    assert_eq!(body["analysis"]["category"], "High Risk");
    assert_eq!(body["analysis"]["prediction"], 1);
}

#[tokio::test]
async fn test_analyze_malformed_body_returns_degraded_analysis() {
    let (status, body) = send(healthy_context(), post_analyze("{age: thirty")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Invalid request body"));
    let analysis = &body["analysis"];
    assert_eq!(analysis["category"], "Analysis Error");
    assert_eq!(analysis["risk_score"], 0);
    assert_eq!(analysis["confidence"], 0.0);
    assert_eq!(analysis["max_hr"], 0);
}

#[tokio::test]
async fn test_analyze_with_fallback_model_is_well_formed() {
    let model = RiskModel::fallback(42).unwrap();
    let context = context_with(Arc::new(model));

    let (status, body) = send(context, post_analyze(r#"{"age": 55}"#)).await;

    assert_eq!(status, StatusCode::OK);
    let analysis = &body["analysis"];
    let confidence = analysis["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert!(analysis["risk_score"].as_u64().unwrap() <= 7);
    assert_eq!(analysis["max_hr"], 165);
}

#[tokio::test]
async fn test_health_reports_provenance() {
    let context = healthy_context();

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(context.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["model_source"], "trained");
    assert!(body["reading_source"].is_null());
    assert!(body["last_updated"].is_null());

    context
        .store
        .publish(Reading::default(), ReadingSource::Synthetic)
        .await;

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (_, body) = send(context, request).await;
    assert_eq!(body["reading_source"], "synthetic");
    assert!(body["last_updated"].is_string());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::get("/data")
        .header(header::ORIGIN, "http://dashboard.local")
        .body(Body::empty())
        .unwrap();
    let response = router(healthy_context()).oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
