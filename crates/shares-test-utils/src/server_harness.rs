//! Test server harness for spawning the mock share service.

use std::net::SocketAddr;
use tokio::task::JoinHandle;

use crate::mock_share_service::MockShareService;

/// Running mock share service bound to a random local port.
///
/// # Example
/// ```rust,ignore
/// let server = TestShareServer::spawn(MockShareService::available()).await?;
/// let client = SharesClient::connect(server.url())?;
/// ```
pub struct TestShareServer {
    addr: SocketAddr,
    service: MockShareService,
    _handle: JoinHandle<()>,
}

impl TestShareServer {
    /// Bind `127.0.0.1:0` and serve the mock API in a background task.
    pub async fn spawn(service: MockShareService) -> Result<Self, anyhow::Error> {
        let router = service.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind mock share service: {e}"))?;
        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("failed to get local address: {e}"))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("mock share service error: {e}");
            }
        });

        Ok(Self {
            addr,
            service,
            _handle: handle,
        })
    }

    /// Versioned API endpoint, the base URL a client should use.
    pub fn url(&self) -> String {
        format!("http://{}/v2", self.addr)
    }

    /// Unversioned service root.
    pub fn root_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Handle to the underlying mock for request assertions.
    pub fn service(&self) -> &MockShareService {
        &self.service
    }
}

impl Drop for TestShareServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
