use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use zipd_core::config::ZipdConfig;

/// Process-wide server state: configuration and the shared HTTP client.
///
/// The client holds the connection pool and timeouts only; everything an
/// archive request mutates (name set, payload buffers, the archive itself)
/// is constructed per request.
pub struct AppState {
    pub config: ZipdConfig,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: ZipdConfig) -> Result<Arc<Self>> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        Ok(Arc::new(Self { config, client }))
    }
}
