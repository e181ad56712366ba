//! Generic JSON request path shared by all resource clients.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode, cookie::Jar};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::error::{AppError, Result};

/// HTTP client bound to the API base URL.
///
/// Sends JSON, keeps cookies between requests, and maps failures to
/// [`AppError`]. It never retries and never notifies the user; callers decide
/// how to present errors. Cloning is cheap and shares the connection pool and
/// cookie jar.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .cookie_provider(Arc::new(Jar::default()))
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(http, &config.base_url))
    }

    /// Wrap an already configured `reqwest` client.
    pub fn with_http_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the body.
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        decode(response).await
    }

    /// POST `body` as JSON to `path` and decode the reply.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    /// PUT `body` as JSON to `path` and decode the reply.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        decode(response).await
    }

    /// DELETE `path`. The response body is never read.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{method} {url}");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body
            && (method == Method::POST || method == Method::PUT)
        {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("API request failed: {method} {url}: {e}");
                return Err(AppError::Network(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            error!("API request failed: {method} {url}: {message}");
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

async fn decode<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Network(e.to_string()))?;
    decode_body(&bytes)
}

/// Decode a success body.
///
/// Empty, `null` or unparseable bodies give `T::default()`. Well-formed JSON
/// that does not fit `T` is an [`AppError::Decode`].
pub(crate) fn decode_body<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let value = match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(serde_json::Value::Null) => return Ok(T::default()),
        Ok(value) => value,
        Err(e) => {
            warn!("Malformed response body, using empty value: {e}");
            return Ok(T::default());
        }
    };
    serde_json::from_value(value).map_err(|e| {
        error!("Unexpected response shape: {e}");
        AppError::decode(format!("Unexpected response from server: {e}"))
    })
}

/// Message for a non-2xx response.
///
/// Prefers a JSON `message` field, then `title` (problem details), else
/// `"Error: <status> <reason>"`.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "title"]
                .iter()
                .find_map(|key| value.get(key).and_then(|m| m.as_str()).map(str::to_string))
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!("Error: {} {}", status.as_u16(), status.canonical_reason().unwrap_or(""))
                .trim_end()
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Department;

    #[test]
    fn test_error_message_field() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"message":"Name is required"}"#);
        assert_eq!(msg, "Name is required");
    }

    #[test]
    fn test_error_problem_details_title() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"type":"about:blank","title":"One or more validation errors occurred.","status":400}"#,
        );
        assert_eq!(msg, "One or more validation errors occurred.");
    }

    #[test]
    fn test_error_fallback_to_status() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Error: 404 Not Found");
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Error: 500 Internal Server Error"
        );
        assert_eq!(error_message(StatusCode::CONFLICT, r#"{"message":""}"#), "Error: 409 Conflict");
    }

    #[test]
    fn test_decode_empty_body_is_default() {
        let list: Vec<Department> = decode_body(b"").unwrap();
        assert!(list.is_empty());
        let dept: Department = decode_body(b"  \n").unwrap();
        assert_eq!(dept, Department::default());
        let list: Vec<Department> = decode_body(b"null").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_decode_malformed_body_is_default() {
        let list: Vec<Department> = decode_body(b"{not json").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_decode_shape_mismatch_is_error() {
        let body = br#"[{"id":1,"name":"Finance"},{"id":2,"name":null}]"#;
        let err = decode_body::<Vec<Department>>(body).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
        assert!(err.user_message().starts_with("Decode error: Unexpected response from server"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::with_http_client(Client::new(), " http://localhost:5000/api/ ");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }
}
