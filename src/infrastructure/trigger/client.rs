use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use super::{TriggerError, UploadEvent};
use crate::config::TriggerConfig;
use crate::domain::ModelKind;

/// Successful retrain request
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerOutcome {
    pub bucket: String,
    pub key: String,
    pub model_type: String,
    /// JSON body returned by the serving API
    pub response: serde_json::Value,
}

/// Calls the serving API's retrain endpoint for uploaded objects
#[derive(Debug, Clone)]
pub struct RetrainTrigger {
    client: Client,
    retrain_url: String,
    model_type: ModelKind,
    timeout: Duration,
}

impl RetrainTrigger {
    pub fn new(config: &TriggerConfig) -> Result<Self, TriggerError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                TriggerError::Configuration("trigger.endpoint (API_ENDPOINT) is required".into())
            })?;

        let model_type: ModelKind = config
            .model_type
            .parse()
            .map_err(|e: crate::domain::DomainError| TriggerError::Configuration(e.to_string()))?;

        if config.timeout_secs == 0 {
            return Err(TriggerError::Configuration(
                "trigger.timeout_secs must be greater than zero".into(),
            ));
        }
        let timeout = Duration::from_secs(config.timeout_secs);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TriggerError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retrain_url: format!(
                "{}/retrain?model_type={}",
                endpoint.trim_end_matches('/'),
                model_type.as_str()
            ),
            model_type,
            timeout,
        })
    }

    pub fn retrain_url(&self) -> &str {
        &self.retrain_url
    }

    pub async fn handle(&self, event: &UploadEvent) -> Result<TriggerOutcome, TriggerError> {
        let object = event.uploaded_object()?;
        info!(
            bucket = %object.bucket,
            key = %object.key,
            model_type = %self.model_type,
            "Upload detected, requesting retrain"
        );

        let response = self
            .client
            .post(&self.retrain_url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Retrain request rejected");
            return Err(TriggerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(status = status.as_u16(), "Retrain request accepted");

        Ok(TriggerOutcome {
            bucket: object.bucket,
            key: object.key,
            model_type: self.model_type.as_str().to_string(),
            response: serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)),
        })
    }

    fn request_error(&self, e: reqwest::Error) -> TriggerError {
        if e.is_timeout() {
            TriggerError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            TriggerError::Transport(format!("Connection failed: {}", e))
        } else {
            TriggerError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: &str, model_type: &str) -> TriggerConfig {
        TriggerConfig {
            enabled: true,
            endpoint: Some(endpoint.to_string()),
            model_type: model_type.to_string(),
            timeout_secs: 5,
        }
    }

    fn event() -> UploadEvent {
        UploadEvent::for_object("iris-bucket", "iris_data.csv")
    }

    #[test]
    fn test_requires_endpoint() {
        let mut cfg = config("http://localhost:8000", "svm");
        cfg.endpoint = None;
        assert!(matches!(
            RetrainTrigger::new(&cfg),
            Err(TriggerError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_model_type() {
        let error = RetrainTrigger::new(&config("http://localhost:8000", "xgboost")).unwrap_err();
        assert!(error.to_string().contains("xgboost"));
    }

    #[test]
    fn test_retrain_url() {
        let trigger = RetrainTrigger::new(&config("http://api.internal:8000/", "knn")).unwrap();
        assert_eq!(
            trigger.retrain_url(),
            "http://api.internal:8000/retrain?model_type=knn"
        );
    }

    #[tokio::test]
    async fn test_successful_trigger() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/retrain"))
            .and(query_param("model_type", "svm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "Model retrained successfully with svm"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let trigger = RetrainTrigger::new(&config(&server.uri(), "svm")).unwrap();
        let outcome = trigger.handle(&event()).await.unwrap();

        assert_eq!(outcome.bucket, "iris-bucket");
        assert_eq!(outcome.key, "iris_data.csv");
        assert_eq!(outcome.model_type, "svm");
        assert_eq!(
            outcome.response["status"],
            "Model retrained successfully with svm"
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/retrain"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let trigger = RetrainTrigger::new(&config(&server.uri(), "random_forest")).unwrap();
        let error = trigger.handle(&event()).await.unwrap_err();

        assert!(matches!(
            error,
            TriggerError::Rejected { status: 500, ref body } if body == "boom"
        ));
    }

    #[tokio::test]
    async fn test_event_without_records_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let trigger = RetrainTrigger::new(&config(&server.uri(), "knn")).unwrap();
        let error = trigger.handle(&UploadEvent::default()).await.unwrap_err();
        assert!(matches!(error, TriggerError::InvalidEvent(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let trigger = RetrainTrigger::new(&config("http://127.0.0.1:1", "knn")).unwrap();
        let error = trigger.handle(&event()).await.unwrap_err();
        assert!(matches!(error, TriggerError::Transport(_)));
    }
}
