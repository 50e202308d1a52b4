//! Client for the reservation endpoint.

use super::{ApiError, ApiFuture, ApiResult, ReservationApi, ensure_success, normalize_base_url, outcome_label};
use crate::types::ReservationRequest;
use reqwest::Client;

/// Client for `POST {base}/reservations`
#[derive(Clone, Debug)]
pub struct ReservationClient {
    http: Client,
    base_url: String,
}

impl ReservationClient {
    /// Create a client for the service rooted at `base_url`
    #[must_use]
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// Full URL of the reservation endpoint
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/reservations", self.base_url)
    }

    /// Submit a reservation
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or non-2xx statuses.
    #[tracing::instrument(
        skip(self, request),
        fields(
            formation_id = %request.formation_id,
            participant_id = %request.participant_id,
        )
    )]
    pub async fn submit(&self, request: ReservationRequest) -> ApiResult<()> {
        let result = self.request(&request).await;
        metrics::counter!(
            "formation_service.requests",
            "endpoint" => "reservations_create",
            "outcome" => outcome_label(&result)
        )
        .increment(1);

        if let Err(error) = &result {
            tracing::debug!(%error, "Reservation submission failed");
        }
        result
    }

    async fn request(&self, request: &ReservationRequest) -> ApiResult<()> {
        let response = self
            .http
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        ensure_success(response).await.map(|_| ())
    }
}

impl ReservationApi for ReservationClient {
    fn create_reservation(&self, request: ReservationRequest) -> ApiFuture<()> {
        let client = self.clone();
        Box::pin(async move { client.submit(request).await })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{FormationId, ParticipantId};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ReservationRequest {
        ReservationRequest {
            formation_id: FormationId::new(1),
            participant_id: ParticipantId::new(7),
        }
    }

    #[tokio::test]
    async fn test_submit_posts_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/formation-service/reservations"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "formationId": 1, "participantId": 7 })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 99 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReservationClient::new(Client::new(), format!("{}/formation-service", server.uri()));

        client.create_reservation(request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_success_body_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ReservationClient::new(Client::new(), server.uri());

        assert!(client.create_reservation(request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ReservationClient::new(Client::new(), server.uri());

        let error = client.create_reservation(request()).await.unwrap_err();
        assert!(matches!(error, ApiError::Status { status: 500, .. }));
    }
}
