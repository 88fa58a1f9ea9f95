//! Port interface for authenticated platform calls

use std::fmt;

use async_trait::async_trait;
use tenantform_domain::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the request carries a JSON body.
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful platform response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Raw body; empty for 204.
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Executes authenticated requests against the platform.
///
/// Implementations attach credentials and classify the status: 200 and 201
/// return the body, 204 returns an empty body, any other status becomes
/// [`tenantform_domain::ReconcileError::Request`]. Nothing is retried.
#[async_trait]
pub trait PlatformTransport: Send + Sync {
    /// Execute one request. `path` starts with `/` and is relative to the
    /// tenant host; it may carry a query string.
    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<TransportResponse>;
}
