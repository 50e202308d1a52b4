//! Client for the formation listing endpoint.

use super::{ApiError, ApiFuture, ApiResult, FormationApi, ensure_success, normalize_base_url, outcome_label};
use crate::types::Formation;
use reqwest::Client;

/// Client for `GET {base}/formations/all`
#[derive(Clone, Debug)]
pub struct FormationClient {
    http: Client,
    base_url: String,
}

impl FormationClient {
    /// Create a client for the service rooted at `base_url`
    #[must_use]
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// Full URL of the listing endpoint
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/formations/all", self.base_url)
    }

    /// Fetch every formation
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-2xx statuses, or bodies that
    /// do not decode as a list of formations.
    #[tracing::instrument(skip(self), fields(url = %self.endpoint()))]
    pub async fn fetch_all(&self) -> ApiResult<Vec<Formation>> {
        let result = self.request().await;
        metrics::counter!(
            "formation_service.requests",
            "endpoint" => "formations_all",
            "outcome" => outcome_label(&result)
        )
        .increment(1);

        match &result {
            Ok(formations) => tracing::debug!(count = formations.len(), "Formations fetched"),
            Err(error) => tracing::debug!(%error, "Formation fetch failed"),
        }
        result
    }

    async fn request(&self) -> ApiResult<Vec<Formation>> {
        let response = self
            .http
            .get(self.endpoint())
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        ensure_success(response)
            .await?
            .json::<Vec<Formation>>()
            .await
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }
}

impl FormationApi for FormationClient {
    fn all_formations(&self) -> ApiFuture<Vec<Formation>> {
        let client = self.clone();
        Box::pin(async move { client.fetch_all().await })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::FormationId;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn formation_json(id: i64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "titre": title,
            "description": "desc",
            "imageUrl": "http://img",
            "enLigne": false,
            "lieu": "Tunis",
            "dateDebut": "2025-07-01",
            "dateFin": "2025-07-02"
        })
    }

    fn client(server: &MockServer) -> FormationClient {
        FormationClient::new(Client::new(), format!("{}/formation-service/", server.uri()))
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/formation-service/formations/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                formation_json(2, "Second"),
                formation_json(1, "First"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let formations = client(&server).all_formations().await.unwrap();

        let ids: Vec<_> = formations.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![FormationId::new(2), FormationId::new(1)]);
    }

    #[tokio::test]
    async fn test_future_is_lazy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let pending = client(&server).all_formations();
        drop(pending);

        server.verify().await;
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let error = client(&server).all_formations().await.unwrap_err();

        assert_eq!(
            error,
            ApiError::Status {
                status: 503,
                message: "maintenance".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not": "a list" })))
            .mount(&server)
            .await;

        let error = client(&server).all_formations().await.unwrap_err();

        assert!(matches!(error, ApiError::ResponseParseFailed(_)));
    }

    #[tokio::test]
    async fn test_transport_error_fails() {
        let client = FormationClient::new(Client::new(), "http://127.0.0.1:9");

        let error = client.all_formations().await.unwrap_err();

        assert!(matches!(error, ApiError::RequestFailed(_)));
    }
}
