//! HTTP plumbing shared by every endpoint.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};
use url::Url;
use uuid::Uuid;

use super::token::{self, TokenSource};
use super::types::ErrorBody;
use super::ApiError;
use crate::config::ApiConfig;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the remote admin API.
///
/// Cheap to clone; clones share the connection pool and cookie store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    deck_url: Url,
    tokens: Arc<dyn TokenSource>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("deck_url", &self.inner.deck_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client using the token source named in `config`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::with_token_source(config, token::from_config(&config.token))
    }

    /// Create a client with an explicit token source.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn with_token_source(
        config: &ApiConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                deck_url: config.deck_url.clone(),
                tokens,
            }),
        })
    }

    /// Base URL endpoint paths are appended to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub(super) fn deck_url(&self) -> &Url {
        &self.inner.deck_url
    }

    /// Resolve an endpoint path against the base URL, keeping any path
    /// prefix the base URL carries.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the result is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status or an
    /// unexpected body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let request = self.request(Method::GET, url)?;
        self.send(request).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status or an
    /// unexpected body.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let request = self.request(Method::POST, url)?.json(body);
        self.send(request).await
    }

    /// `POST` a multipart form.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status or an
    /// unexpected body.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let request = self.request(Method::POST, url)?.multipart(form);
        self.send(request).await
    }

    /// `PUT` a multipart form.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status or an
    /// unexpected body.
    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let request = self.request(Method::PUT, url)?.multipart(form);
        self.send(request).await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status or an
    /// unexpected body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let request = self.request(Method::DELETE, url)?;
        self.send(request).await
    }

    /// `POST` a JSON body to an absolute URL and return the raw response bytes.
    pub(super) async fn post_json_for_bytes<B>(&self, url: Url, body: &B) -> Result<Vec<u8>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, url)?.json(body);
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Start a request with the shared headers: request id, accept and,
    /// when a token is available, bearer authorization.
    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ApiError> {
        let request_id = Uuid::new_v4();
        debug!(%method, %url, %request_id, "Sending API request");

        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(token) = self.inner.tokens.token()? {
            builder = builder.bearer_auth(token.expose_secret());
        }

        Ok(builder)
    }

    #[instrument(skip(self, request))]
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "API request failed before a response");
            ApiError::Http(e)
        })?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(handle_error_status(status, response).await)
        }
    }
}

/// Turn a non-2xx response into `ApiError::Status`, keeping the server's
/// `message` when the body carries one.
async fn handle_error_status(status: StatusCode, response: Response) -> ApiError {
    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message),
        Err(e) => {
            debug!(error = %e, "Failed to read error body");
            None
        }
    };

    error!(status = status.as_u16(), message = ?message, "API returned an error status");

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::StaticToken;

    fn client(base: &str) -> ApiClient {
        let config = ApiConfig::new(base).unwrap();
        ApiClient::with_token_source(&config, Arc::new(StaticToken::anonymous())).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let api = client("https://shop.test/backend/");
        assert_eq!(
            api.endpoint("/api/v1/admin/brands").unwrap().as_str(),
            "https://shop.test/backend/api/v1/admin/brands"
        );
    }

    #[test]
    fn test_endpoint_without_prefix() {
        let api = client("http://localhost:4000");
        assert_eq!(
            api.endpoint("api/v1/brand/abc").unwrap().as_str(),
            "http://localhost:4000/api/v1/brand/abc"
        );
    }

    #[test]
    fn test_debug_hides_token_source() {
        let debug_output = format!("{:?}", client("http://localhost:4000"));
        assert!(debug_output.contains("localhost:4000"));
        assert!(!debug_output.contains("tokens"));
    }
}
