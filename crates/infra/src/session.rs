//! Authenticated platform session
//!
//! Exchanges client credentials for a bearer token once, then executes
//! every platform call with that token. The session never refreshes the
//! token; a 401 surfaces as a request error and the caller builds a new
//! session.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tenantform_core::{HttpMethod, PlatformTransport, TransportResponse};
use tenantform_domain::constants::CLIENT_CREDENTIALS_GRANT;
use tenantform_domain::{PlatformConfig, ReconcileError, Result};
use tracing::{debug, info, instrument, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

const TOKEN_PATH: &str = "/token-srv/token";
const USER_AGENT: &str = concat!("tenantform/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Bearer-token session against one platform tenant.
///
/// Immutable after construction; share it through `Arc`.
pub struct AuthenticatedSession {
    http: HttpClient,
    base_url: String,
    access_token: String,
}

impl AuthenticatedSession {
    /// Run the client-credentials exchange.
    ///
    /// # Errors
    /// - [`ReconcileError::Config`] when connection settings are missing
    /// - [`ReconcileError::Auth`] when the token endpoint refuses the
    ///   credentials or answers with something other than a token
    /// - [`ReconcileError::Transport`] when the host cannot be reached
    #[instrument(skip(config), fields(host = %config.base_url()))]
    pub async fn authenticate(config: &PlatformConfig) -> Result<Self> {
        config.validate().map_err(ReconcileError::Config)?;
        let base_url = config.base_url().to_string();
        let token_url = url::Url::parse(&format!("{base_url}{TOKEN_PATH}"))
            .map_err(|err| ReconcileError::from(InfraError::from(err)))?;

        let http = HttpClient::builder().timeout(config.timeout()).user_agent(USER_AGENT).build()?;

        let payload = TokenRequest {
            grant_type: CLIENT_CREDENTIALS_GRANT,
            client_id: &config.client_id,
            client_secret: &config.client_secret,
        };
        let response = http.send(http.request(Method::POST, token_url).json(&payload)).await?;

        let status = response.status();
        let body =
            response.text().await.map_err(|err| ReconcileError::from(InfraError::from(err)))?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "token exchange refused");
            return Err(ReconcileError::Auth(format!("token endpoint returned {status}: {body}")));
        }

        let access_token = serde_json::from_str::<TokenResponse>(&body)
            .map_err(|err| ReconcileError::Auth(format!("undecodable token response: {err}")))?
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ReconcileError::Auth("token response carries no access_token".into()))?;

        info!(client_id = %config.client_id, "platform session established");
        Ok(Self { http, base_url, access_token })
    }

    /// Tenant base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl PlatformTransport for AuthenticatedSession {
    #[instrument(skip_all, fields(method = %method, path = %path))]
    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<TransportResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(to_method(method), url)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token));
        if method.is_mutating() {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        let bytes =
            response.bytes().await.map_err(|err| ReconcileError::from(InfraError::from(err)))?;

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                Ok(TransportResponse { status: status.as_u16(), body: bytes.to_vec() })
            }
            StatusCode::NO_CONTENT => {
                Ok(TransportResponse { status: status.as_u16(), body: Vec::new() })
            }
            other => {
                let body = String::from_utf8_lossy(&bytes).into_owned();
                debug!(status = other.as_u16(), "platform rejected request");
                Err(ReconcileError::Request { status: other.as_u16(), body })
            }
        }
    }
}
