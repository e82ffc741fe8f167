//! HTTP integration tests against a locally bound router.

#![allow(clippy::unwrap_used)]

mod common;

use amd_service::server::{self, AppState};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::net::SocketAddr;
use tokio::net::TcpListener;

const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

async fn spawn(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = server::router(state, MAX_UPLOAD_BYTES);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn wav_form(bytes: Vec<u8>) -> Form {
    Form::new().part(
        "file",
        Part::bytes(bytes)
            .file_name("call.wav")
            .mime_str("audio/wav")
            .unwrap(),
    )
}

#[tokio::test]
async fn test_health_without_model() {
    let addr = spawn(AppState::unloaded()).await;
    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
    assert!(body["device"].is_null());
}

#[tokio::test]
async fn test_model_dependent_endpoints_unavailable_without_model() {
    let addr = spawn(AppState::unloaded()).await;
    let client = reqwest::Client::new();

    let info = client
        .get(format!("http://{addr}/model-info"))
        .send()
        .await
        .unwrap();
    assert_eq!(info.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = info.json().await.unwrap();
    assert_eq!(body["detail"], "Model not loaded");

    let predict = client
        .post(format!("http://{addr}/predict"))
        .multipart(wav_form(common::sine_wav(1.0, 16_000)))
        .send()
        .await
        .unwrap();
    assert_eq!(predict.status(), StatusCode::SERVICE_UNAVAILABLE);

    let stream = client
        .post(format!("http://{addr}/predict-stream"))
        .header("content-type", "application/octet-stream")
        .body(common::sine_wav(1.0, 16_000))
        .send()
        .await
        .unwrap();
    assert_eq!(stream.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = stream.json().await.unwrap();
    assert_eq!(body["detail"], "Model not loaded");
}

#[tokio::test]
async fn test_forward_failure_is_internal_error() {
    let addr = spawn(AppState::loaded(common::broken_model())).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/predict"))
        .multipart(wav_form(common::sine_wav(2.5, 16_000)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Prediction failed"), "{detail}");
    assert!(detail.contains("CUDA out of memory"), "{detail}");
}

#[tokio::test]
async fn test_predict_returns_label_and_confidence() {
    let addr = spawn(AppState::loaded(common::stub_model())).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/predict"))
        .multipart(wav_form(common::sine_wav(3.0, 8_000)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["label"], "voicemail");
    let confidence = body["confidence"].as_f64().unwrap();
    assert!(confidence > 0.5 && confidence <= 1.0);
    assert!(body["processing_time_ms"].as_f64().unwrap() > 0.0);
    assert_eq!(body["model_info"]["model_name"], "acme/amd-test");
    assert_eq!(body["model_info"]["device"], "cpu");
    assert_eq!(body["model_info"]["id2label"]["1"], "VOICEMAIL");
    let length = body["model_info"]["audio_length_seconds"].as_f64().unwrap();
    assert!((2.0..=5.0).contains(&length));
}

#[tokio::test]
async fn test_predict_rejects_undecodable_audio() {
    let addr = spawn(AppState::loaded(common::stub_model())).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/predict"))
        .multipart(wav_form(common::garbage(4096)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Audio preprocessing failed")
    );
}

#[tokio::test]
async fn test_predict_stream_accepts_raw_body() {
    let addr = spawn(AppState::loaded(common::stub_model())).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/predict-stream"))
        .header("content-type", "application/octet-stream")
        .body(common::sine_wav(1.0, 16_000))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["label"], "voicemail");
    assert_eq!(body["model_info"]["audio_length_seconds"], 2.0);
}

#[tokio::test]
async fn test_empty_upload_is_bad_request() {
    let addr = spawn(AppState::loaded(common::stub_model())).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/predict"))
        .header("content-type", "application/octet-stream")
        .body(Vec::<u8>::new())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_model_info_reports_estimate() {
    let addr = spawn(AppState::loaded(common::stub_model())).await;
    let response = reqwest::get(format!("http://{addr}/model-info"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["model_name"], "acme/amd-test");
    assert_eq!(body["parameters"], 1_000_000);
    assert_eq!(body["size_mb"], 3.81);
    assert_eq!(body["id2label"]["0"], "Human");
}

#[tokio::test]
async fn test_cors_is_open() {
    let addr = spawn(AppState::unloaded()).await;
    let response = reqwest::Client::new()
        .get(format!("http://{addr}/health"))
        .header("origin", "https://dialer.example")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
