//! Shared application state for the web server.

use std::sync::Arc;

use nupack_common::{About, Envelope, NupackError};
use nupack_config::{AboutConfig, Config};
use nupack_runner::{Forwarder, ProcessRunner, ToolRun};
use tracing::info;

/// Immutable state injected into every Axum handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    /// NUPACK license terms, echoed in every response.
    pub license: Arc<str>,
    pub about: AboutConfig,
}

impl AppState {
    pub fn new(forwarder: Forwarder, license: impl Into<Arc<str>>, about: AboutConfig) -> Self {
        Self {
            forwarder,
            license: license.into(),
            about,
        }
    }

    /// Read the license file and wire the process runner from `config`.
    pub async fn from_config(config: &Config) -> Result<Self, NupackError> {
        let path = &config.license.path;
        let license = tokio::fs::read_to_string(path).await.map_err(|e| {
            NupackError::Config(format!("cannot read NUPACK license at {}: {}", path.display(), e))
        })?;
        info!("Loaded NUPACK license from {}", path.display());

        let runner = Arc::new(ProcessRunner::from_config(config));
        Ok(Self::new(Forwarder::new(runner), license, config.about.clone()))
    }

    pub fn envelope(&self, run: ToolRun) -> Envelope {
        Envelope::assemble(&self.license, run.status, run.result)
    }

    pub fn about(&self) -> About {
        About {
            usage: self.about.usage.clone(),
            homepage: self.about.homepage.clone(),
            license: self.license.to_string(),
        }
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_from_config_reads_license_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Copyright NUPACK").unwrap();
        let mut config = Config::default();
        config.license.path = file.path().to_path_buf();

        let state = AppState::from_config(&config).await.unwrap();
        assert_eq!(&*state.license, "Copyright NUPACK");
        assert_eq!(state.about().license, "Copyright NUPACK");
    }

    #[tokio::test]
    async fn test_missing_license_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.license.path = dir.path().join("LICENSE");

        let err = AppState::from_config(&config).await.err().unwrap();
        assert!(matches!(err, NupackError::Config(_)));
    }
}
