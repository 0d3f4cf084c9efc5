use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::data;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::model;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let ui_dir = state.serving.ui_dir.clone();
    let ui = ServeDir::new(&ui_dir).fallback(ServeFile::new(ui_dir.join("index.html")));

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Model endpoints
        .route("/", get(model::root))
        .route("/model-info", get(model::model_info))
        .route("/predict", post(model::predict))
        .route("/retrain", post(model::retrain))
        .route("/upload-data", post(data::upload_data))
        // Prediction form
        .nest_service("/ui", ui)
        // Add state and middleware
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api::state::ServingSettings;
    use crate::domain::BlobStore;
    use crate::infrastructure::ml::FitOptions;
    use crate::infrastructure::services::ModelLifecycleManager;
    use crate::infrastructure::storage::InMemoryBlobStore;

    const DATA_KEY: &str = "iris_data.csv";
    const BOUNDARY: &str = "iris-boundary";

    struct TestApp {
        state: AppState,
        store: Arc<InMemoryBlobStore>,
        _dir: tempfile::TempDir,
    }

    fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryBlobStore::new());
        let blob_store: Arc<dyn BlobStore> = store.clone();

        let state = AppState {
            lifecycle: Arc::new(ModelLifecycleManager::new(
                Arc::clone(&blob_store),
                FitOptions::default(),
            )),
            blob_store,
            trigger: None,
            serving: Arc::new(ServingSettings {
                data_key: DATA_KEY.to_string(),
                bucket: "iris-bucket".to_string(),
                model_dir: dir.path().to_path_buf(),
                ui_dir: dir.path().join("public"),
            }),
        };

        TestApp {
            state,
            store,
            _dir: dir,
        }
    }

    async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router_with_state(app.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn predict_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(parts: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload-data")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(parts.to_string()))
            .unwrap()
    }

    fn file_part(filename: &str, content: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = filename,
            c = content
        )
    }

    fn setosa_measurements() -> Value {
        json!({
            "sepal_length": 5.4,
            "sepal_width": 3.4,
            "petal_length": 1.3,
            "petal_width": 0.2
        })
    }

    #[tokio::test]
    async fn test_root() {
        let app = test_app();
        let (status, body) = send(&app, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"msg": "Iris classifier is up and running!"}));
    }

    #[tokio::test]
    async fn test_model_info_without_model() {
        let app = test_app();
        let (status, body) = send(&app, get_request("/model-info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "No model loaded"}));
    }

    #[tokio::test]
    async fn test_predict_without_model_is_server_error() {
        let app = test_app();
        let (status, body) = send(&app, predict_request(setosa_measurements())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "No model loaded");
        assert_eq!(body["type"], "model_not_loaded_error");
    }

    #[tokio::test]
    async fn test_retrain_then_predict() {
        let app = test_app();

        let (status, body) = send(&app, post_request("/retrain?model_type=svm")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "Model retrained successfully with svm"})
        );

        let (_, body) = send(&app, get_request("/model-info")).await;
        assert_eq!(body, json!({"status": "Model loaded", "type": "svm"}));

        let (status, body) = send(&app, predict_request(setosa_measurements())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"prediction": "setosa"}));

        assert!(app.state.serving.artifact_path(crate::domain::ModelKind::Svm).exists());
    }

    #[tokio::test]
    async fn test_retrain_defaults_to_random_forest() {
        let app = test_app();
        let (status, body) = send(&app, post_request("/retrain")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["status"],
            "Model retrained successfully with random_forest"
        );

        let (status, body) = send(&app, predict_request(setosa_measurements())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"prediction": "setosa"}));
    }

    #[tokio::test]
    async fn test_retrain_unsupported_kind_keeps_current_model() {
        let app = test_app();
        send(&app, post_request("/retrain?model_type=knn")).await;

        let (status, body) = send(&app, post_request("/retrain?model_type=xgboost")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"],
            "Unsupported model type 'xgboost'. Choose from: random_forest, svm, knn"
        );

        let (_, body) = send(&app, get_request("/model-info")).await;
        assert_eq!(body, json!({"status": "Model loaded", "type": "knn"}));
    }

    #[tokio::test]
    async fn test_svm_retrain_on_tiny_upload_keeps_serving() {
        let app = test_app();
        send(&app, post_request("/retrain?model_type=random_forest")).await;

        let csv = "5.1,3.5,1.4,0.2,setosa\n4.9,3.0,1.4,0.2,setosa\n6.3,3.3,6.0,2.5,virginica";
        let (status, _) = send(&app, multipart_request(&file_part("tiny.csv", csv))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, post_request("/retrain?model_type=svm")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["type"], "training_error");

        let (_, body) = send(&app, get_request("/model-info")).await;
        assert_eq!(body, json!({"status": "Model loaded", "type": "random_forest"}));

        let (status, body) = send(&app, predict_request(setosa_measurements())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"prediction": "setosa"}));
    }

    #[tokio::test]
    async fn test_predict_rejects_missing_field() {
        let app = test_app();
        send(&app, post_request("/retrain")).await;

        let (status, body) = send(
            &app,
            predict_request(json!({"sepal_length": 5.4, "sepal_width": 3.4})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_upload_data_stores_file() {
        let app = test_app();
        let csv = "sepal_length,sepal_width,petal_length,petal_width,species\n5.1,3.5,1.4,0.2,setosa";

        let (status, body) = send(&app, multipart_request(&file_part("mine.csv", csv))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "filename": "mine.csv"}));

        let stored = app.store.get(DATA_KEY).await.unwrap();
        assert_eq!(stored.as_ref(), csv.as_bytes());
    }

    #[tokio::test]
    async fn test_upload_data_without_file() {
        let app = test_app();
        let parts = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}--\r\n",
            b = BOUNDARY
        );

        let (status, body) = send(&app, multipart_request(&parts)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No file uploaded");
        assert!(app.store.get(DATA_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_upload_empty_file_rejected() {
        let app = test_app();
        let (status, _) = send(&app, multipart_request(&file_part("empty.csv", ""))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ready_reflects_model_state() {
        let app = test_app();

        let response = create_router_with_state(app.state.clone())
            .oneshot(get_request("/ready"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        send(&app, post_request("/retrain?model_type=knn")).await;

        let (status, body) = send(&app, get_request("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"][0]["message"], "knn (nearest-neighbor) loaded");
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let app = test_app();
        let request = Request::builder()
            .uri("/live")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = create_router_with_state(app.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
