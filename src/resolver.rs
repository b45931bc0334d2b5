//! The resolution state machine.
//!
//! `ConfigManager` walks a console client through domain, app and realm
//! selection against a partially-failing backend, with multi-level fallback
//! policy. Transitions are atomic: a failed operation leaves the current
//! state untouched so the caller can retry.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::api::traits::{ApiError, ConfigApi, ConfigApiFactory};
use crate::domain::build_base_url;
use crate::types::{AppInfo, ConsoleConfig, ProjectConfig};

/// App loaded when the backend exposes no app list at all.
pub const DEFAULT_APP: &str = "manager";

/// Registry key holding fallback realm info for apps without their own entry.
const FALLBACK_INFO_KEY: &str = "default";

/// Where a resolution session currently stands.
///
/// Candidate lists distinguish "no candidates known" (`None`, free-text
/// entry) from an explicit, possibly empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionState {
    /// Waiting for the user to enter a domain.
    #[default]
    SelectDomain,
    /// Waiting for an app choice.
    SelectApp {
        base_url: String,
        /// Apps to choose from; `None` means free-text entry.
        apps: Option<Vec<String>>,
    },
    /// Waiting for a realm choice.
    SelectRealm {
        base_url: String,
        app: String,
        /// Realms to choose from; `None` means free-text entry or no known list.
        realms: Option<Vec<String>>,
    },
    /// Resolution finished; re-enterable via `set_realm`.
    Complete(ProjectConfig),
}

/// Error types for resolution transitions.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A transition was attempted from a state that does not support it
    #[error("operation not valid in the current resolution state")]
    InvalidState,

    /// The config API client could not be constructed
    #[error("could not reach the backend")]
    Communication,

    /// Domain resolution failed; the underlying error has been logged
    #[error("could not load the app configuration")]
    CouldNotLoadAppConfig,
}

/// Resolution state machine for one console client session.
///
/// Holds exactly one [`ResolutionState`] and two app-info caches. Not
/// internally synchronized: the transitions take `&mut self` and the caller
/// serializes them (one in-flight resolution at a time).
pub struct ConfigManager {
    api_factory: ConfigApiFactory,
    state: ResolutionState,
    /// App infos embedded in the console config.
    global_app_infos: HashMap<String, AppInfo>,
    /// App infos fetched individually during filtering.
    app_infos: HashMap<String, AppInfo>,
}

impl ConfigManager {
    /// Create a machine in the `SelectDomain` state.
    pub fn new(api_factory: ConfigApiFactory) -> Self {
        Self {
            api_factory,
            state: ResolutionState::SelectDomain,
            global_app_infos: HashMap::new(),
            app_infos: HashMap::new(),
        }
    }

    /// Create a machine backed by the HTTP config API.
    pub fn over_http() -> Self {
        Self::new(Box::new(|url| {
            let api = crate::api::HttpConfigApi::new(url)?;
            Ok(Arc::new(api) as Arc<dyn ConfigApi>)
        }))
    }

    /// The current resolution state.
    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    /// App infos taken from the console config's embedded registry.
    pub fn global_app_infos(&self) -> &HashMap<String, AppInfo> {
        &self.global_app_infos
    }

    /// App infos fetched individually during candidate filtering.
    pub fn app_infos(&self) -> &HashMap<String, AppInfo> {
        &self.app_infos
    }

    /// Resolve the given domain and advance past `SelectDomain`.
    ///
    /// Fetches the console config and, depending on its policy, the app
    /// list and per-app infos. On failure the machine stays in
    /// `SelectDomain` so the caller can retry with the same or a different
    /// domain.
    pub async fn set_domain(&mut self, domain: &str) -> Result<ResolutionState, ConfigError> {
        if self.state != ResolutionState::SelectDomain {
            return Err(ConfigError::InvalidState);
        }

        let base_url = build_base_url(domain);
        let api_url = format!("{base_url}/api/master");

        let api = (self.api_factory)(&api_url).map_err(|err| {
            error!(%api_url, %err, "could not construct config API client");
            ConfigError::Communication
        })?;

        match self.resolve_domain(api.as_ref(), &base_url).await {
            Ok(next) => {
                info!(%base_url, state = ?next, "domain resolved");
                self.state = next;
                Ok(self.state.clone())
            }
            Err(err) => {
                error!(%base_url, %err, "domain resolution failed");
                Err(ConfigError::CouldNotLoadAppConfig)
            }
        }
    }

    /// The domain-resolution decision tree. Returns the next state without
    /// committing it.
    async fn resolve_domain(
        &mut self,
        api: &dyn ConfigApi,
        base_url: &str,
    ) -> Result<ResolutionState, ApiError> {
        let config = match api.get_console_config().await {
            Ok(config) => config.unwrap_or_default(),
            // 403 kept for backwards compatibility with older backends.
            Err(ApiError::NotFound) | Err(ApiError::Communication(404 | 403)) => {
                ConsoleConfig::default()
            }
            Err(err) => return Err(err),
        };

        if let Some(registry) = &config.apps {
            self.global_app_infos.extend(registry.clone());
        }

        if let Some(app) = &config.app {
            // Realm candidates are not looked up for a forced app, even
            // when the global registry would know them.
            return Ok(ResolutionState::SelectRealm {
                base_url: base_url.to_string(),
                app: app.clone(),
                realms: None,
            });
        }

        if config.show_app_text_input {
            return Ok(ResolutionState::SelectApp {
                base_url: base_url.to_string(),
                apps: None,
            });
        }

        if config.allowed_apps.as_deref().map_or(true, |apps| apps.is_empty()) {
            match api.get_apps().await {
                Ok(apps) => {
                    let filtered = self.filter_compatible_apps(api, apps).await;
                    Ok(match filtered {
                        Some(apps) if apps.len() == 1 => ResolutionState::SelectRealm {
                            base_url: base_url.to_string(),
                            app: apps.into_iter().next().unwrap_or_default(),
                            realms: None,
                        },
                        Some(apps) if apps.len() > 1 => ResolutionState::SelectApp {
                            base_url: base_url.to_string(),
                            apps: Some(apps),
                        },
                        _ => ResolutionState::SelectRealm {
                            base_url: base_url.to_string(),
                            app: DEFAULT_APP.to_string(),
                            realms: None,
                        },
                    })
                }
                Err(ApiError::NotFound) | Err(ApiError::Communication(404 | 403)) => {
                    Ok(if config.show_realm_text_input {
                        ResolutionState::SelectRealm {
                            base_url: base_url.to_string(),
                            app: DEFAULT_APP.to_string(),
                            realms: None,
                        }
                    } else {
                        ResolutionState::Complete(ProjectConfig::new(
                            base_url,
                            DEFAULT_APP,
                            None,
                        ))
                    })
                }
                Err(err) => Err(err),
            }
        } else {
            let filtered = self
                .filter_compatible_apps(api, config.allowed_apps.clone())
                .await;
            Ok(match filtered {
                Some(apps) if apps.len() == 1 => ResolutionState::SelectRealm {
                    base_url: base_url.to_string(),
                    app: apps.into_iter().next().unwrap_or_default(),
                    realms: None,
                },
                apps => ResolutionState::SelectApp {
                    base_url: base_url.to_string(),
                    apps,
                },
            })
        }
    }

    /// Drop candidates known to be console-incompatible, preserving input
    /// order. Candidates whose info cannot be obtained are kept:
    /// availability is prioritized over strict filtering.
    async fn filter_compatible_apps(
        &mut self,
        api: &dyn ConfigApi,
        candidates: Option<Vec<String>>,
    ) -> Option<Vec<String>> {
        let candidates = candidates?;
        let mut kept = Vec::new();
        for name in candidates {
            if let Some(info) = self.global_app_infos.get(&name) {
                if !info.console_app_incompatible {
                    kept.push(name);
                }
                continue;
            }
            match api.get_app_info(&name).await {
                Ok(Some(info)) => {
                    let compatible = !info.console_app_incompatible;
                    self.app_infos.insert(name.clone(), info);
                    if compatible {
                        kept.push(name);
                    }
                }
                Ok(None) => kept.push(name),
                Err(err) => {
                    debug!(app = %name, %err, "could not fetch app info, keeping candidate");
                    kept.push(name);
                }
            }
        }
        Some(kept)
    }

    /// Choose an app and advance to realm selection.
    ///
    /// Realm candidates come from the global registry, then the per-app
    /// cache, then the registry's `"default"` fallback entry, in that order
    /// of precedence.
    pub fn set_app(&mut self, app: &str) -> Result<ResolutionState, ConfigError> {
        let base_url = match &self.state {
            ResolutionState::SelectApp { base_url, .. } => base_url.clone(),
            _ => return Err(ConfigError::InvalidState),
        };

        let realms = self
            .global_app_infos
            .get(app)
            .or_else(|| self.app_infos.get(app))
            .or_else(|| self.global_app_infos.get(FALLBACK_INFO_KEY))
            .and_then(|info| info.realms.clone());

        self.state = ResolutionState::SelectRealm {
            base_url,
            app: app.to_string(),
            realms,
        };
        info!(%app, "app selected");
        Ok(self.state.clone())
    }

    /// Choose a realm (or none) and complete the resolution.
    ///
    /// May be called again from `Complete` to change the realm without
    /// restarting domain and app selection.
    pub fn set_realm(&mut self, realm: Option<&str>) -> Result<ResolutionState, ConfigError> {
        let (domain, app) = match &self.state {
            ResolutionState::SelectRealm { base_url, app, .. } => (base_url.clone(), app.clone()),
            ResolutionState::Complete(project) => (project.domain.clone(), project.app.clone()),
            _ => return Err(ConfigError::InvalidState),
        };

        self.state =
            ResolutionState::Complete(ProjectConfig::new(domain, app, realm.map(String::from)));
        info!(realm = realm.unwrap_or("<none>"), "realm selected");
        Ok(self.state.clone())
    }
}
