//! HTTP transport layer for the Coolify client.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use reqwest::{header, Client};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// All Coolify API paths are relative to this root under the base URL.
pub const API_PREFIX: &str = "/api/v1";

/// HTTP method of an API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport capable of performing one authenticated API call.
///
/// The dispatcher depends on this trait rather than on a concrete HTTP
/// client, so tests can substitute a fake and assert on the calls made.
#[async_trait::async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send one request and return the response body as JSON.
    ///
    /// `path` is relative to `{base_url}/api/v1`. `body` is only sent for
    /// POST requests. A failure status from the upstream maps to
    /// [`ClientError::Api`]; anything else surfaces as its own variant.
    async fn send(&self, method: Method, path: &str, body: Option<&Value>)
        -> ClientResult<Value>;
}

/// HTTP transport for making Coolify API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    ///
    /// The bearer token and JSON content type are attached as default
    /// headers so every request carries them.
    pub fn new(config: Arc<ClientConfig>) -> ClientResult<Self> {
        let mut headers = header::HeaderMap::new();

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|_| ClientError::Config("Invalid API token format".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the full URL for an API path.
    fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        format!("{}{}{}", base, API_PREFIX, path)
    }
}

#[async_trait::async_trait]
impl ApiTransport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let url = self.build_url(path);
        debug!(method = %method, url = %url, "API request");

        let request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => {
                let builder = self.client.post(&url);
                match body {
                    Some(body) => builder.json(body),
                    None => builder,
                }
            }
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        let payload = response.json().await?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_config(base_url: &str, token: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            base_url: Url::parse(base_url).unwrap(),
            api_token: token.to_string(),
            timeout: Duration::from_secs(30),
        })
    }

    #[tokio::test]
    async fn test_get_request_under_api_prefix() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("4.0.0-beta.420")))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), "tok")).unwrap();

        let result = transport.send(Method::Get, "/version", None).await.unwrap();
        assert_eq!(result, json!("4.0.0-beta.420"));
    }

    #[tokio::test]
    async fn test_bearer_and_content_type_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams"))
            .and(header("Authorization", "Bearer sk-test-token"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let transport =
            HttpTransport::new(create_config(&server.uri(), "sk-test-token")).unwrap();

        let result = transport.send(Method::Get, "/teams", None).await.unwrap();
        assert_eq!(result, json!([]));
    }

    #[tokio::test]
    async fn test_post_request_sends_body() {
        let server = MockServer::start().await;

        let body = json!({"name": "key-1", "private_key": "-----BEGIN..."});
        Mock::given(method("POST"))
            .and(path("/api/v1/security/keys"))
            .and(body_json(&body))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"uuid": "k-1"})))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), "tok")).unwrap();

        let result = transport
            .send(Method::Post, "/security/keys", Some(&body))
            .await
            .unwrap();
        assert_eq!(result, json!({"uuid": "k-1"}));
    }

    #[tokio::test]
    async fn test_error_status_maps_remote_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/servers"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({"message": "quota exceeded"})),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), "tok")).unwrap();

        let err = transport.send(Method::Get, "/servers", None).await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_message_is_generic() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/servers"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), "tok")).unwrap();

        let err = transport.send(Method::Get, "/servers", None).await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "request failed with status 500");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_unclassified() {
        // Nothing listens on this port.
        let config = create_config("http://127.0.0.1:9", "tok");
        let transport = HttpTransport::new(config).unwrap();

        let err = transport.send(Method::Get, "/version", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }

    #[test]
    fn test_build_url() {
        let transport = HttpTransport::new(create_config("http://localhost:8000", "tok")).unwrap();
        assert_eq!(
            transport.build_url("/servers/abc/validate"),
            "http://localhost:8000/api/v1/servers/abc/validate"
        );
    }

    #[test]
    fn test_build_url_with_trailing_slash() {
        let transport =
            HttpTransport::new(create_config("http://localhost:8000/", "tok")).unwrap();
        assert_eq!(transport.build_url("/version"), "http://localhost:8000/api/v1/version");
    }
}
