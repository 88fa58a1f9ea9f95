//! Thin request helpers over the transport port

use std::sync::Arc;

use tenantform_domain::Result;
use tracing::debug;

use crate::codec::WireRequest;
use crate::transport_ports::{HttpMethod, PlatformTransport};

/// Shared handle reconcilers use to reach the platform.
#[derive(Clone)]
pub struct Remote {
    transport: Arc<dyn PlatformTransport>,
}

impl Remote {
    pub fn new(transport: Arc<dyn PlatformTransport>) -> Self {
        Self { transport }
    }

    /// Send a request and return the response body.
    pub async fn send(&self, request: WireRequest) -> Result<Vec<u8>> {
        debug!(method = %request.method, path = %request.path, "platform request");
        let response =
            self.transport.execute(request.method, &request.path, request.body).await?;
        Ok(response.body)
    }

    /// `GET` that maps not-found and empty bodies to `None`.
    pub async fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>> {
        match self.transport.execute(HttpMethod::Get, path, None).await {
            Ok(response) if response.is_empty() => Ok(None),
            Ok(response) => Ok(Some(response.body)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// `DELETE` that treats an already missing resource as deleted.
    pub async fn remove(&self, path: &str) -> Result<()> {
        match self.transport.execute(HttpMethod::Delete, path, None).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                debug!(path, "resource already gone");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for Remote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Remote").finish_non_exhaustive()
    }
}
