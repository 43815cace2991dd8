//! Bulwark router served from a background task for end-to-end tests

use bulwark_config::Config;
use bulwark_server::{Collaborators, Server};
use tokio_util::sync::CancellationToken;

/// Running server; stops when dropped
pub struct TestServer {
    base_url: String,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Assemble the full pipeline and serve it
    ///
    /// The listener is bound to the configured address, which the
    /// `ConfigBuilder` sets to `127.0.0.1:0`, and the assigned port is
    /// read back before the first request.
    pub async fn start(config: Config, collaborators: Collaborators) -> anyhow::Result<Self> {
        let server = Server::new(&config, collaborators)?;

        let listener = tokio::net::TcpListener::bind(server.listen_address()).await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let shutdown = CancellationToken::new();
        let stopped = shutdown.clone();
        let router = server.into_router();

        tokio::spawn(async move {
            let _ = axum::serve(listener, router)
                .with_graceful_shutdown(async move { stopped.cancelled().await })
                .await;
        });

        Ok(Self {
            base_url,
            shutdown,
            client: reqwest::Client::new(),
        })
    }

    /// Absolute URL for a request path such as `/api/health`
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
