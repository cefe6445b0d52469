//! HTTP client for the store's REST endpoints

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ClientConfig, ClientError, ClientResult};

/// Thin JSON client that authenticates every request
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            token: config.access_token.clone(),
        })
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build authorization header value
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token.as_deref().unwrap_or(&self.api_key))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request returning the created rows
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self
            .authorize(self.client.post(self.url(path)))
            .header("Prefer", "return=representation")
            .json(body);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request returning the updated rows
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self
            .authorize(self.client.patch(self.url(path)))
            .header("Prefer", "return=representation")
            .json(body);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request returning the removed rows
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self
            .authorize(self.client.delete(self.url(path)))
            .header("Prefer", "return=representation");
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Call a stored procedure, ignoring its result body
    pub async fn rpc<B: Serialize>(&self, function: &str, body: &B) -> ClientResult<()> {
        let path = format!("rest/v1/rpc/{}", function);
        let request = self.authorize(self.client.post(self.url(&path))).json(body);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::status_error(status, text));
        }
        Ok(())
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::status_error(status, text));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }

    fn status_error(status: StatusCode, text: String) -> ClientError {
        tracing::debug!(status = %status, body = %text, "Store request rejected");
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(text),
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(text)
            }
            StatusCode::CONFLICT => ClientError::Conflict(text),
            _ => ClientError::Internal(text),
        }
    }
}
