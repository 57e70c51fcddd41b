//! HTTP client for the submission API
//!
//! The network half of the presentation layer: posts the assembled payload
//! and fetches the stored list for the results view. A 400 response is
//! decoded back into the [`VigilError::Validation`] it came from; anything
//! else outside 2xx is an opaque server failure.

use serde::Deserialize;

use crate::error::VigilError;
use crate::http::SUBMISSIONS_PATH;
use crate::submission::{NewSubmission, Submission};

/// Shape of the 400 body: `{message, field}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    field: Option<String>,
}

/// Client for a running submission API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base_url` without a trailing slash, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn submissions_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SUBMISSIONS_PATH)
    }

    /// POST the payload; returns the stored record on 201.
    pub async fn create(&self, payload: &NewSubmission) -> Result<Submission, VigilError> {
        let response = self
            .http
            .post(self.submissions_url())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Submission>().await?);
        }

        if status.as_u16() == 400 {
            let body: ApiErrorBody = response.json().await?;
            return Err(VigilError::Validation {
                field: body.field.unwrap_or_default(),
                message: body.message,
            });
        }

        Err(VigilError::Server {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }

    /// GET all submissions, ascending by creation time.
    pub async fn list(&self) -> Result<Vec<Submission>, VigilError> {
        let response = self.http.get(self.submissions_url()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VigilError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json::<Vec<Submission>>().await?)
    }

    /// The most recently created submission, if any. The list is ascending,
    /// so the latest entry is the last one.
    pub async fn latest(&self) -> Result<Option<Submission>, VigilError> {
        Ok(self.list().await?.into_iter().last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> NewSubmission {
        NewSubmission {
            answer: "O(log n)".into(),
            time_spent_seconds: 40,
            mouse_moves: 150,
            hover_count: 9,
            risk_score: 0.0,
        }
    }

    fn stored_json(id: i64, answer: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "answer": answer,
            "timeSpentSeconds": 40,
            "mouseMoves": 150,
            "hoverCount": 9,
            "riskScore": 0.0,
            "createdAt": "2024-01-15T14:30:00Z"
        })
    }

    #[tokio::test]
    async fn test_create_posts_camel_case_and_parses_stored_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUBMISSIONS_PATH))
            .and(body_partial_json(serde_json::json!({
                "answer": "O(log n)",
                "timeSpentSeconds": 40
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(stored_json(1, "O(log n)")))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let stored = client.create(&payload()).await.unwrap();
        assert_eq!(stored.id, 1);
        assert_eq!(stored.answer, "O(log n)");
    }

    #[tokio::test]
    async fn test_create_maps_400_to_validation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUBMISSIONS_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "must not be empty",
                "field": "answer"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.create(&payload()).await.unwrap_err();
        assert!(matches!(err, VigilError::Validation { ref field, .. } if field == "answer"));
    }

    #[tokio::test]
    async fn test_create_maps_500_to_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUBMISSIONS_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.create(&payload()).await.unwrap_err();
        assert!(matches!(err, VigilError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_latest_returns_last_of_ascending_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUBMISSIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                stored_json(1, "first"),
                stored_json(2, "second"),
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let latest = client.latest().await.unwrap().unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(latest.answer, "second");
    }

    #[tokio::test]
    async fn test_latest_on_empty_list_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUBMISSIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        assert!(client.latest().await.unwrap().is_none());
    }
}
