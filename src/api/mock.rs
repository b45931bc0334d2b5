//! Mock config API for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use super::traits::{ApiError, ConfigApi};
use crate::types::{AppInfo, ConsoleConfig};

/// Mock config API backed by an in-memory fixture.
///
/// Each operation returns its configured value, or fails with the
/// configured HTTP status; a failure status takes precedence over a value.
/// Unconfigured values yield `Ok(None)`.
#[derive(Default)]
pub struct MockConfigApi {
    console_config: Option<ConsoleConfig>,
    console_config_status: Option<u16>,
    apps: Option<Vec<String>>,
    apps_status: Option<u16>,
    app_infos: HashMap<String, AppInfo>,
    app_info_status: Option<u16>,
    app_info_calls: AtomicU32,
}

impl MockConfigApi {
    /// Create an empty fixture: every fetch succeeds with no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the console config returned by `get_console_config`.
    pub fn with_console_config(mut self, config: ConsoleConfig) -> Self {
        self.console_config = Some(config);
        self
    }

    /// Fail `get_console_config` with the given HTTP status.
    pub fn with_console_config_status(mut self, status: u16) -> Self {
        self.console_config_status = Some(status);
        self
    }

    /// Set the app list returned by `get_apps`.
    pub fn with_apps(mut self, apps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.apps = Some(apps.into_iter().map(Into::into).collect());
        self
    }

    /// Fail `get_apps` with the given HTTP status.
    pub fn with_apps_status(mut self, status: u16) -> Self {
        self.apps_status = Some(status);
        self
    }

    /// Set the info record returned by `get_app_info` for one app.
    pub fn with_app_info(mut self, app_name: impl Into<String>, info: AppInfo) -> Self {
        self.app_infos.insert(app_name.into(), info);
        self
    }

    /// Fail `get_app_info` with the given HTTP status.
    pub fn with_app_info_status(mut self, status: u16) -> Self {
        self.app_info_status = Some(status);
        self
    }

    /// Number of times `get_app_info` was called.
    pub fn app_info_calls(&self) -> u32 {
        self.app_info_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigApi for MockConfigApi {
    async fn get_console_config(&self) -> Result<Option<ConsoleConfig>, ApiError> {
        if let Some(status) = self.console_config_status {
            return Err(ApiError::Communication(status));
        }
        Ok(self.console_config.clone())
    }

    async fn get_apps(&self) -> Result<Option<Vec<String>>, ApiError> {
        if let Some(status) = self.apps_status {
            return Err(ApiError::Communication(status));
        }
        Ok(self.apps.clone())
    }

    async fn get_app_info(&self, app_name: &str) -> Result<Option<AppInfo>, ApiError> {
        self.app_info_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.app_info_status {
            return Err(ApiError::Communication(status));
        }
        Ok(self.app_infos.get(app_name).cloned())
    }
}
