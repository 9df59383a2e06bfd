//! HTTP transport over reqwest.
//!
//! The client keeps a cookie jar so the server's session cookie rides along on
//! every request, the same way a browser would send it.

use paw_paradise_core::Product;
use paw_paradise_core::api::{
    AuthResponse, LoginRequest, LogoutResponse, OrderRequest, OrderResponse, SessionStatus,
    SignupRequest,
};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::StorefrontApi;
use crate::config::ClientConfig;
use crate::error::ApiError;

/// [`StorefrontApi`] backed by the storefront server.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

/// Failure body returned by the server for refused requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FailureBody {
    message: String,
    #[serde(default)]
    require_login: bool,
}

impl HttpApi {
    /// Create a client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(concat!("paw-paradise-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        decode(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

/// Decode a success body, or turn an error response into [`ApiError`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(serde_json::from_str(&body)?);
    }

    match serde_json::from_str::<FailureBody>(&body) {
        Ok(failure) => Err(ApiError::Rejected {
            status: status.as_u16(),
            message: failure.message,
            require_login: failure.require_login,
        }),
        Err(_) => Err(ApiError::Status {
            status: status.as_u16(),
        }),
    }
}

impl StorefrontApi for HttpApi {
    #[instrument(skip(self))]
    async fn catalog(&self) -> Result<Vec<Product>, ApiError> {
        self.get("api/catalog").await
    }

    #[instrument(skip(self))]
    async fn session(&self) -> Result<SessionStatus, ApiError> {
        self.get("api/session").await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post("api/login", request).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.post("api/signup", request).await
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<LogoutResponse, ApiError> {
        self.get("api/logout").await
    }

    #[instrument(skip(self, request), fields(total = %request.total, method = request.payment_method.as_str()))]
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResponse, ApiError> {
        self.post("api/orders", request).await
    }
}
