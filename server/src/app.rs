use std::sync::{Arc, PoisonError, RwLock};

use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::services::assets::AssetCache;

/// Application shared state accessible from axum handlers and blocking workers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: AppConfig,
    /// Cached logo and font files
    assets: AssetCache,
    /// Content id of the most recently written image
    latest_output: RwLock<Option<String>>,
    shutdown_token: CancellationToken,
}

impl SharedState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config,
                assets: AssetCache::new(),
                latest_output: RwLock::new(None),
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn assets(&self) -> &AssetCache {
        &self.inner.assets
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    pub fn latest_output(&self) -> Option<String> {
        self.inner
            .latest_output
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run `write` and, if it succeeds, record `id` as the latest output.
    ///
    /// The lock is held across `write`, so the recorded id always belongs
    /// to the last file put in place. Blocking; call off the async runtime.
    pub fn publish_output<T, E>(
        &self,
        id: &str,
        write: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut latest = self
            .inner
            .latest_output
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let written = write()?;
        *latest = Some(id.to_string());
        Ok(written)
    }
}
