//! API Client Module
//!
//! Handles HTTP communication with the RouteGenius backend. Every call
//! funnels through one request helper so callers see a single error shape
//! regardless of how the backend failed.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, debug};

use crate::models::{
    AuthResponse, LoginRequest, Notification, Parcel, ParcelRequest, ParcelStatus,
    RegisterRequest, User,
};

/// API client for the RouteGenius backend
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client. No internal timeout and no retries: a
    /// failure surfaces immediately and maps 1:1 to the transport or HTTP
    /// result.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Perform a JSON request against the backend.
    ///
    /// A 2xx response with a JSON body resolves to that body; a 2xx with an
    /// empty or non-JSON body resolves to an empty object. A non-2xx
    /// response fails with one message, taken from the JSON `message` field
    /// when present, the raw body text otherwise, or a generic status line
    /// when the body is empty.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        debug!("Making {} request to {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!("Received response for {}. Status: {}", path, status);

        if status.is_success() {
            // A 204 or any non-JSON success body still counts as success
            Ok(serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(serde_json::Map::new())))
        } else {
            let message = match serde_json::from_str::<Value>(&text) {
                Ok(body) => body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                Err(_) if !text.is_empty() => Some(text),
                Err(_) => None,
            }
            .unwrap_or_else(|| {
                format!(
                    "API Error: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown Status")
                )
            });
            Err(ApiError::Server(message))
        }
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }

    // --- Authentication ---

    /// Log in with email and password
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let body = serde_json::to_value(credentials).map_err(|e| ApiError::Parse(e.to_string()))?;
        let value = self
            .request("/auth/login", Method::POST, Some(&body), None)
            .await?;

        let auth: AuthResponse = Self::decode(value)?;
        info!("Logged in as: {}", auth.email);
        Ok(auth)
    }

    /// Register a new account
    pub async fn register(&self, user: &RegisterRequest) -> Result<(), ApiError> {
        let body = serde_json::to_value(user).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.request("/auth/register", Method::POST, Some(&body), None)
            .await?;
        Ok(())
    }

    // --- Admin user management ---

    pub async fn get_all_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        let value = self
            .request("/admin/users", Method::GET, None, Some(token))
            .await?;
        Self::decode(value)
    }

    pub async fn create_user(
        &self,
        user: &RegisterRequest,
        token: &str,
    ) -> Result<User, ApiError> {
        let body = serde_json::to_value(user).map_err(|e| ApiError::Parse(e.to_string()))?;
        let value = self
            .request("/admin/users", Method::POST, Some(&body), Some(token))
            .await?;
        Self::decode(value)
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        user: &RegisterRequest,
        token: &str,
    ) -> Result<User, ApiError> {
        let body = serde_json::to_value(user).map_err(|e| ApiError::Parse(e.to_string()))?;
        let value = self
            .request(
                &format!("/admin/users/{}", user_id),
                Method::PUT,
                Some(&body),
                Some(token),
            )
            .await?;
        Self::decode(value)
    }

    pub async fn delete_user(&self, user_id: i64, token: &str) -> Result<(), ApiError> {
        self.request(
            &format!("/admin/users/{}", user_id),
            Method::DELETE,
            None,
            Some(token),
        )
        .await?;
        Ok(())
    }

    // --- Parcel management and tracking ---

    pub async fn get_all_parcels(&self, token: &str) -> Result<Vec<Parcel>, ApiError> {
        let value = self
            .request("/parcels", Method::GET, None, Some(token))
            .await?;
        Self::decode(value)
    }

    pub async fn add_parcel(
        &self,
        parcel: &ParcelRequest,
        token: &str,
    ) -> Result<Parcel, ApiError> {
        let body = serde_json::to_value(parcel).map_err(|e| ApiError::Parse(e.to_string()))?;
        let value = self
            .request("/parcels", Method::POST, Some(&body), Some(token))
            .await?;
        Self::decode(value)
    }

    pub async fn update_parcel(
        &self,
        parcel_id: i64,
        parcel: &ParcelRequest,
        token: &str,
    ) -> Result<Parcel, ApiError> {
        let body = serde_json::to_value(parcel).map_err(|e| ApiError::Parse(e.to_string()))?;
        let value = self
            .request(
                &format!("/parcels/{}", parcel_id),
                Method::PUT,
                Some(&body),
                Some(token),
            )
            .await?;
        Self::decode(value)
    }

    pub async fn delete_parcel(&self, parcel_id: i64, token: &str) -> Result<(), ApiError> {
        self.request(
            &format!("/parcels/{}", parcel_id),
            Method::DELETE,
            None,
            Some(token),
        )
        .await?;
        Ok(())
    }

    /// Public tracking lookup; needs no token
    pub async fn track_parcel(&self, tracking_id: &str) -> Result<Parcel, ApiError> {
        let value = self
            .request(
                &format!("/parcels/track/{}", tracking_id),
                Method::GET,
                None,
                None,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn get_user_parcels(
        &self,
        user_id: i64,
        token: &str,
    ) -> Result<Vec<Parcel>, ApiError> {
        let value = self
            .request(
                &format!("/parcels/my-parcels/{}", user_id),
                Method::GET,
                None,
                Some(token),
            )
            .await?;
        Self::decode(value)
    }

    // --- Notifications ---

    pub async fn get_notifications(&self, token: &str) -> Result<Vec<Notification>, ApiError> {
        let value = self
            .request("/notifications", Method::GET, None, Some(token))
            .await?;
        Self::decode(value)
    }

    pub async fn get_unread_notifications(
        &self,
        token: &str,
    ) -> Result<Vec<Notification>, ApiError> {
        let value = self
            .request("/notifications/unread", Method::GET, None, Some(token))
            .await?;
        Self::decode(value)
    }

    pub async fn mark_notification_read(
        &self,
        notification_id: i64,
        token: &str,
    ) -> Result<Notification, ApiError> {
        let value = self
            .request(
                &format!("/notifications/{}/read", notification_id),
                Method::PUT,
                None,
                Some(token),
            )
            .await?;
        Self::decode(value)
    }

    pub async fn delete_notification(
        &self,
        notification_id: i64,
        token: &str,
    ) -> Result<(), ApiError> {
        self.request(
            &format!("/notifications/{}", notification_id),
            Method::DELETE,
            None,
            Some(token),
        )
        .await?;
        Ok(())
    }

    pub async fn generate_notification_draft(
        &self,
        parcel_id: i64,
        status: ParcelStatus,
        token: &str,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "parcelId": parcel_id, "status": status });
        self.request(
            "/notifications/generate-draft",
            Method::POST,
            Some(&body),
            Some(token),
        )
        .await?;
        Ok(())
    }
}

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    /// Message already normalized by the request helper
    #[error("{0}")]
    Server(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_empty_success_body_resolves_to_empty_object() {
        let router = Router::new().route("/ping", get(|| async { StatusCode::NO_CONTENT }));
        let base = serve(router).await;

        let client = ApiClient::new(&base);
        let value = client.request("/ping", Method::GET, None, None).await.unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn test_error_message_comes_from_json_body() {
        let router = Router::new().route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "message": "not found" }))) }),
        );
        let base = serve(router).await;

        let client = ApiClient::new(&base);
        let err = client
            .request("/missing", Method::GET, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Server(ref m) if m == "not found"));
        assert_eq!(err.to_string(), "not found");
    }

    #[tokio::test]
    async fn test_error_message_falls_back_to_raw_text() {
        let router = Router::new().route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database exploded") }),
        );
        let base = serve(router).await;

        let client = ApiClient::new(&base);
        let err = client
            .request("/broken", Method::GET, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Server(ref m) if m == "database exploded"));
    }

    #[tokio::test]
    async fn test_error_message_falls_back_to_status_line() {
        let router = Router::new().route("/empty", get(|| async { StatusCode::BAD_GATEWAY }));
        let base = serve(router).await;

        let client = ApiClient::new(&base);
        let err = client
            .request("/empty", Method::GET, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Server(ref m) if m == "API Error: 502 Bad Gateway"));
    }

    #[tokio::test]
    async fn test_json_error_without_message_field_uses_status_line() {
        let router = Router::new().route(
            "/odd",
            get(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "detail": "nope" }))) }),
        );
        let base = serve(router).await;

        let client = ApiClient::new(&base);
        let err = client.request("/odd", Method::GET, None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Server(ref m) if m == "API Error: 400 Bad Request"));
    }

    #[tokio::test]
    async fn test_bearer_header_sent_only_with_token() {
        async fn echo_auth(headers: HeaderMap) -> Json<Value> {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            Json(json!({ "auth": auth }))
        }
        let router = Router::new().route("/echo", get(echo_auth));
        let base = serve(router).await;

        let client = ApiClient::new(&base);
        let with = client
            .request("/echo", Method::GET, None, Some("jwt-abc"))
            .await
            .unwrap();
        assert_eq!(with["auth"], json!("Bearer jwt-abc"));

        let without = client.request("/echo", Method::GET, None, None).await.unwrap();
        assert_eq!(without["auth"], json!(null));
    }

    #[tokio::test]
    async fn test_network_failure_is_immediate() {
        // Nothing listens on this port
        let client = ApiClient::new("http://127.0.0.1:1");
        let err = client.request("/auth/login", Method::GET, None, None).await;
        assert!(matches!(err, Err(ApiError::Network(_))));
    }

    #[tokio::test]
    async fn test_login_decodes_auth_response() {
        let router = Router::new().route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["email"], json!("amina@example.com"));
                Json(json!({
                    "id": 7,
                    "firstName": "Amina",
                    "email": "amina@example.com",
                    "roles": ["USER"],
                    "token": "jwt-abc"
                }))
            }),
        );
        let base = serve(router).await;

        let client = ApiClient::new(&base);
        let auth = client
            .login(&LoginRequest {
                email: "amina@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(auth.id, 7);
        assert_eq!(auth.token, "jwt-abc");
        assert_eq!(auth.roles, vec!["USER"]);
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_tolerated() {
        let router = Router::new().route("/ping", get(|| async { Json(json!({ "ok": true })) }));
        let base = serve(router).await;

        let client = ApiClient::new(&format!("{}/", base));
        let value = client.request("/ping", Method::GET, None, None).await.unwrap();
        assert_eq!(value["ok"], json!(true));
    }
}
