mod support;

use std::sync::Arc;

use cultivar::dataset::parse_csv;
use cultivar::ml::naive_bayes::{save_json, train};
use cultivar::serving::ModelSource;
use support::server::{get_text, post_json, post_raw, spawn_server};
use support::wine::{WINE_SAMPLE_CSV, class_one_request, class_two_form_request};
use tempfile::tempdir;

fn trained_source() -> Arc<ModelSource> {
    let model = train(&parse_csv(WINE_SAMPLE_CSV).unwrap()).unwrap();
    Arc::new(ModelSource::from_model(model))
}

#[test]
fn predict_returns_label_and_confidence() {
    let base = spawn_server(trained_source());
    let (status, body) = post_json(&format!("{base}/predict"), &class_one_request());
    assert_eq!(status, 200);
    assert_eq!(body["prediction"], "Cultivar 1 (e.g. Barolo)");
    let confidence = body["confidence"].as_str().unwrap();
    assert!(confidence.ends_with('%'));
    let (_, decimals) = confidence.trim_end_matches('%').split_once('.').unwrap();
    assert_eq!(decimals.len(), 2);
}

#[test]
fn predict_accepts_string_values_from_form() {
    let base = spawn_server(trained_source());
    let (status, body) = post_json(&format!("{base}/predict"), &class_two_form_request());
    assert_eq!(status, 200);
    assert_eq!(body["prediction"], "Cultivar 2 (e.g. Grignolino)");
}

#[test]
fn bad_requests_are_400_with_reason() {
    let base = spawn_server(trained_source());
    let url = format!("{base}/predict");

    let mut missing = class_one_request();
    missing.as_object_mut().unwrap().remove("proline");
    let (status, body) = post_json(&url, &missing);
    assert_eq!(status, 400);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Prediction failed: "), "{error}");
    assert!(error.contains("proline"), "{error}");

    let mut non_numeric = class_one_request();
    non_numeric["hue"] = serde_json::json!("purple");
    let (status, _) = post_json(&url, &non_numeric);
    assert_eq!(status, 400);

    let (status, body) = post_raw(&url, "{not json");
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().starts_with("Prediction failed: "));
}

#[test]
fn missing_model_is_500_until_trained() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    let base = spawn_server(Arc::new(ModelSource::new(&path)));
    let url = format!("{base}/predict");

    let (status, body) = post_json(&url, &class_one_request());
    assert_eq!(status, 500);
    assert_eq!(
        body["error"],
        "Model not loaded. Please contact administrator."
    );

    let model = train(&parse_csv(WINE_SAMPLE_CSV).unwrap()).unwrap();
    save_json(&path, &model).unwrap();
    let (status, body) = post_json(&url, &class_one_request());
    assert_eq!(status, 200);
    assert_eq!(body["prediction"], "Cultivar 1 (e.g. Barolo)");
}

#[test]
fn health_reports_model_state() {
    let dir = tempdir().unwrap();
    let base = spawn_server(Arc::new(ModelSource::new(dir.path().join("model.json"))));
    let response: serde_json::Value = ureq::get(&format!("{base}/health"))
        .call()
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(response["status"], "ok");
    assert_eq!(response["model_loaded"], false);

    let loaded = spawn_server(trained_source());
    let response: serde_json::Value = ureq::get(&format!("{loaded}/health"))
        .call()
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(response["model_loaded"], true);
}

#[test]
fn form_page_and_script_are_served() {
    let base = spawn_server(trained_source());
    let (status, html) = get_text(&format!("{base}/"));
    assert_eq!(status, 200);
    assert!(html.contains("Wine Cultivar Prediction System"));
    assert!(html.contains("name=\"od280\""));

    let (status, script) = get_text(&format!("{base}/static/script.js"));
    assert_eq!(status, 200);
    assert!(script.contains("fetch('/predict'"));
}
