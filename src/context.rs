//! Service context shared by the CLI and HTTP adapters.

use std::sync::Arc;
use std::time::Duration;

use crate::adapters::IconFetcher;
use crate::codegen::ImageCodeGenerator;
use crate::config::Config;
use crate::error::AppError;
use crate::ports::{CodeGenerator, CodeRequest};

/// Bundles the generator port and the icon fetcher. Cheap to clone.
#[derive(Clone)]
pub struct ServiceContext {
    /// Code generator port.
    pub generator: Arc<dyn CodeGenerator>,
    /// Icon downloader, also the holder of the icon size cap.
    pub icons: IconFetcher,
}

impl ServiceContext {
    /// Build a context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the default size is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let generator = ImageCodeGenerator::new(config.defaults.size)?;
        let icons = IconFetcher::new(
            Duration::from_secs(config.server.icon_timeout_secs),
            config.server.max_icon_bytes,
        )?;
        Ok(Self::with_generator(Arc::new(generator), icons))
    }

    /// Build a context around an existing generator.
    #[must_use]
    pub fn with_generator(generator: Arc<dyn CodeGenerator>, icons: IconFetcher) -> Self {
        Self { generator, icons }
    }

    /// Run generation on the blocking pool so the async runtime stays responsive.
    ///
    /// # Errors
    ///
    /// Returns the generator's error, or [`AppError::Server`] if the task panicked.
    pub async fn generate(&self, request: CodeRequest) -> Result<Vec<u8>, AppError> {
        let generator = Arc::clone(&self.generator);
        let png = tokio::task::spawn_blocking(move || generator.generate(&request))
            .await
            .map_err(|e| AppError::Server(format!("generation task failed: {e}")))??;
        Ok(png)
    }
}
