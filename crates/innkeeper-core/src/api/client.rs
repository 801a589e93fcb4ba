//! API client for communicating with the hotel REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! API requests against the back-office service.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{
    ActiveReservation, AvailableEmployee, CustomerSummary, LoginForm, LoginResponse, RoomAnalytics,
    RoomSummary, Validate,
};

use super::resource::Resource;
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the hotel service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client. `base_url` must end with `/`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Exchange credentials for a session token.
    pub async fn authenticate(&self, form: &LoginForm) -> Result<String> {
        form.validate()?;

        let url = self.url("auth/login");
        let response = self
            .client
            .post(&url)
            .json(form)
            .send()
            .await
            .context("Failed to send authentication request")?;

        let response = Self::check_response(response).await?;
        let auth: LoginResponse = response
            .json()
            .await
            .context("Failed to parse auth response")?;

        if auth.token.is_empty() {
            return Err(ApiError::InvalidResponse("empty token in auth response".to_string()).into());
        }
        debug!(username = %form.username, "Authenticated");
        Ok(auth.token)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::NotAuthenticated)?;

        let mut headers = header::HeaderMap::new();
        let mut value = header::HeaderValue::from_str(token)
            .context("Token is not a valid header value")?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = self.url(path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(self.auth_headers()?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to {}", method, url))?;
        debug!(%method, url = %url, status = %response.status(), "API response");

        Self::check_response(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    // ===== Collections =====

    /// Fetch every item of a collection
    pub async fn list<R: Resource>(&self) -> Result<Vec<R::Item>> {
        self.get(R::PATH).await
    }

    /// Create an item, returning the id the server assigned
    pub async fn create<R: Resource>(&self, form: &R::Form) -> Result<String> {
        form.validate()?;
        let response = self.send(Method::POST, R::PATH, Some(form)).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} create response", R::NAME))?;
        Ok(parse_created_id(&text))
    }

    /// Replace an existing item; the form must carry its id
    pub async fn update<R: Resource>(&self, form: &R::Form) -> Result<()> {
        form.validate()?;
        self.send(Method::PUT, R::PATH, Some(form)).await?;
        Ok(())
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> Result<()> {
        let body = serde_json::json!({ "id": id });
        self.send(Method::DELETE, R::PATH, Some(&body)).await?;
        Ok(())
    }

    // ===== Lookups and dashboard =====

    pub async fn fetch_room_summaries(&self) -> Result<Vec<RoomSummary>> {
        self.get("room/summary").await
    }

    pub async fn fetch_customer_summaries(&self) -> Result<Vec<CustomerSummary>> {
        self.get("customer/summary").await
    }

    pub async fn fetch_room_analytics(&self) -> Result<RoomAnalytics> {
        self.get("room/analytics").await
    }

    pub async fn fetch_available_employees(&self) -> Result<Vec<AvailableEmployee>> {
        self.get("employee/available").await
    }

    pub async fn fetch_active_reservations(&self) -> Result<Vec<ActiveReservation>> {
        self.get("reservation/active").await
    }
}

/// The create endpoints answer with the new id, either as a JSON string or bare.
fn parse_created_id(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(id)) => id,
        Ok(serde_json::Value::Object(map)) => match map.get("id") {
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => body.trim().to_string(),
        },
        Ok(other) => other.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Rooms;
    use crate::models::RoomForm;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("https://hotel.example/api/").unwrap();
        assert_eq!(client.url("room"), "https://hotel.example/api/room");
        assert_eq!(client.url("/room/summary"), "https://hotel.example/api/room/summary");
    }

    #[test]
    fn test_auth_header_carries_raw_token() {
        let client = ApiClient::new("https://hotel.example/api/")
            .unwrap()
            .with_token("abc123".to_string());
        let headers = client.auth_headers().unwrap();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "abc123");
        assert!(headers.get(header::AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_auth_headers_require_token() {
        let client = ApiClient::new("https://hotel.example/api/").unwrap();
        let err = client.auth_headers().unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NotAuthenticated)));

        assert!(client.with_token("abc123".to_string()).auth_headers().is_ok());
        assert!(client.with_token(String::new()).auth_headers().is_err());
    }

    #[test]
    fn test_parse_created_id() {
        assert_eq!(parse_created_id("\"3fa85f64\""), "3fa85f64");
        assert_eq!(parse_created_id("42"), "42");
        assert_eq!(parse_created_id(r#"{"id":"r9"}"#), "r9");
        assert_eq!(parse_created_id("3fa85f64-5717\n"), "3fa85f64-5717");
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected_before_sending() {
        // Unroutable base URL: reaching the network would fail differently
        let client = ApiClient::new("http://127.0.0.1:9/")
            .unwrap()
            .with_token("abc123".to_string());
        let err = client.create::<Rooms>(&RoomForm::default()).await.unwrap_err();
        assert!(err.downcast_ref::<crate::models::ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_invalid_login_is_rejected_before_sending() {
        let client = ApiClient::new("http://127.0.0.1:9/").unwrap();
        let err = client.authenticate(&LoginForm::default()).await.unwrap_err();
        assert!(err.to_string().contains("Username is required."));
    }
}
