use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::{ApiError, Operation};
use crate::models::{
    actions::{ErrorBody, SpinOutcome, WithdrawalReceipt, WithdrawalRequest},
    users::UserData,
};

/// The three endpoints of the mini-app backend.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    async fn fetch_user(&self, user_id: i64) -> Result<UserData, ApiError>;

    async fn perform_spin(&self, user_id: i64) -> Result<SpinOutcome, ApiError>;

    async fn request_withdrawal(
        &self,
        user_id: i64,
        upi_details: &str,
    ) -> Result<WithdrawalReceipt, ApiError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Failure(ErrorBody),
    Success(T),
}

#[derive(Clone)]
pub struct ApiClient {
    url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: Operation,
    ) -> Result<T, ApiError> {
        let transport = ApiError::Transport { operation };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{:?}: request failed: {}", operation, e);
                return Err(transport);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("{:?}: could not read body ({}): {}", operation, status, e);
                return Err(transport);
            }
        };

        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(Envelope::Failure(ErrorBody { error })) => {
                log::warn!("{:?}: backend rejected ({}): {}", operation, status, error);
                Err(ApiError::Rejected(error))
            }
            Ok(Envelope::Success(value)) if status.is_success() => Ok(value),
            Ok(Envelope::Success(_)) => {
                log::warn!("{:?}: unexpected status {}", operation, status);
                Err(transport)
            }
            Err(e) => {
                log::warn!("{:?}: bad response format ({}): {}", operation, status, e);
                Err(transport)
            }
        }
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn fetch_user(&self, user_id: i64) -> Result<UserData, ApiError> {
        log::info!("Fetching user data for {}.", user_id);
        let request = self.client.get(format!("{}/api/user/{}", self.url, user_id));

        self.execute(request, Operation::FetchUser).await
    }

    async fn perform_spin(&self, user_id: i64) -> Result<SpinOutcome, ApiError> {
        log::info!("Requesting spin for {}.", user_id);
        let request = self.client.post(format!("{}/api/spin/{}", self.url, user_id));

        self.execute(request, Operation::PerformSpin).await
    }

    async fn request_withdrawal(
        &self,
        user_id: i64,
        upi_details: &str,
    ) -> Result<WithdrawalReceipt, ApiError> {
        log::info!("Requesting withdrawal for {}.", user_id);
        let payload = WithdrawalRequest {
            upi_details: upi_details.to_string(),
        };
        let request = self
            .client
            .post(format!("{}/api/withdraw/{}", self.url, user_id))
            .json(&payload);

        self.execute(request, Operation::RequestWithdrawal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn get_user(Path(user_id): Path<i64>) -> impl IntoResponse {
        if user_id != 42 {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "User not found"})),
            );
        }

        (
            StatusCode::OK,
            Json(json!({
                "user_id": 42,
                "username": "alice",
                "balance": 100,
                "spins_left": 3,
                "referrals": [],
                "referral_code": "abcd1234",
                "referral_earnings": 0,
                "last_spin_date": null
            })),
        )
    }

    async fn spin(Path(_user_id): Path<i64>) -> impl IntoResponse {
        (StatusCode::BAD_REQUEST, Json(json!({"error": "No spins left"})))
    }

    async fn withdraw(Path(_user_id): Path<i64>, Json(body): Json<Value>) -> impl IntoResponse {
        match body.get("upi_details").and_then(Value::as_str) {
            Some("alice@upi") => (
                StatusCode::OK,
                Json(json!({"message": "Withdrawal request sent"})),
            ),
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "UPI details required"})),
            ),
        }
    }

    async fn start_backend() -> String {
        let app = Router::new()
            .route("/api/user/{id}", get(get_user))
            .route("/api/spin/{id}", post(spin))
            .route("/api/withdraw/{id}", post(withdraw))
            .route("/broken/api/user/{id}", get(|| async { "<html>oops</html>" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_user_decodes_payload() {
        let url = start_backend().await;
        let client = ApiClient::new(&url);

        let user = client.fetch_user(42).await.unwrap();
        assert_eq!(user.balance, 100.0);
        assert_eq!(user.spins_left, 3);
        assert_eq!(user.referral_code, "abcd1234");
    }

    #[tokio::test]
    async fn test_error_bodies_are_surfaced_verbatim() {
        let url = start_backend().await;
        let client = ApiClient::new(&format!("{}/", url));

        let err = client.fetch_user(7).await.unwrap_err();
        assert_eq!(err, ApiError::Rejected("User not found".to_string()));

        let err = client.perform_spin(42).await.unwrap_err();
        assert_eq!(err.to_string(), "No spins left");
    }

    #[tokio::test]
    async fn test_withdrawal_sends_upi_details() {
        let url = start_backend().await;
        let client = ApiClient::new(&url);

        let receipt = client.request_withdrawal(42, "alice@upi").await.unwrap();
        assert_eq!(receipt.message, "Withdrawal request sent");

        let err = client.request_withdrawal(42, "").await.unwrap_err();
        assert_eq!(err.to_string(), "UPI details required");
    }

    #[tokio::test]
    async fn test_unparsable_body_collapses_to_fallback() {
        let url = start_backend().await;
        let client = ApiClient::new(&format!("{}/broken", url));

        let err = client.fetch_user(42).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch user data");
    }

    #[tokio::test]
    async fn test_unreachable_backend_collapses_to_fallback() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = ApiClient::new(&format!("http://{}", addr));

        let err = client.perform_spin(42).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Transport {
                operation: Operation::PerformSpin
            }
        );
        let err = client.request_withdrawal(42, "alice@upi").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to request withdrawal");
    }
}
