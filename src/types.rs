//! Wire models for the console config API and the resolved project.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Console providers handed to the web app when none are configured.
pub const DEFAULT_PROVIDERS: &str = "geofence push storage";

/// Backend-provided policy describing how domain resolution should proceed.
///
/// Fetched once per domain from `apps/consoleConfig`. Every field is
/// optional on the wire; a missing config is equivalent to the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Force this single app, skipping app selection entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    /// Restrict selection to these apps. Unset or empty means "ask the
    /// server for the full app list".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_apps: Option<Vec<String>>,
    /// Let the user type a free-text app name.
    #[serde(default)]
    pub show_app_text_input: bool,
    /// Let the user type a free-text realm name.
    #[serde(default)]
    pub show_realm_text_input: bool,
    /// Global app registry embedded in the console config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps: Option<HashMap<String, AppInfo>>,
}

/// Per-application metadata, either embedded in the console config or
/// fetched from `apps/{name}/info.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Whether this app cannot be hosted by the console.
    #[serde(default)]
    pub console_app_incompatible: bool,
    /// Realms this app can operate against, in presentation order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realms: Option<Vec<String>>,
}

/// The fully resolved configuration a console client loads.
///
/// Equality is defined over `(domain, app, realm)` only; the generated `id`
/// and the provider list are excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Opaque identifier, stable for the lifetime of this value.
    pub id: String,
    /// Canonical base URL of the backend.
    pub domain: String,
    /// Name of the frontend application to load.
    pub app: String,
    /// Tenant the app operates against, when one was chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    /// Console provider names passed to the web app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<String>>,
}

impl ProjectConfig {
    /// Create a config with a freshly generated id and no provider list.
    pub fn new(
        domain: impl Into<String>,
        app: impl Into<String>,
        realm: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            domain: domain.into(),
            app: app.into(),
            realm,
            providers: None,
        }
    }

    /// Set the console provider list.
    pub fn with_providers(mut self, providers: Vec<String>) -> Self {
        self.providers = Some(providers);
        self
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &str {
        &self.domain
    }

    /// The fully assembled URL the console loads for this project.
    pub fn target_url(&self) -> String {
        let providers = self
            .providers
            .as_ref()
            .map(|p| p.join(" "))
            .unwrap_or_else(|| DEFAULT_PROVIDERS.to_string());
        match &self.realm {
            Some(realm) => format!(
                "{}/{}/?realm={}&consoleProviders={}&consoleAutoEnable=true#!geofences",
                self.domain, self.app, realm, providers
            ),
            None => format!(
                "{}/{}/?consoleProviders={}&consoleAutoEnable=true#!geofences",
                self.domain, self.app, providers
            ),
        }
    }
}

impl PartialEq for ProjectConfig {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain && self.app == other.app && self.realm == other.realm
    }
}

impl Eq for ProjectConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_id_and_providers() {
        let a = ProjectConfig::new("https://demo.console.cloud", "manager", Some("master".into()));
        let b = ProjectConfig::new("https://demo.console.cloud", "manager", Some("master".into()))
            .with_providers(vec!["push".into()]);

        assert_ne!(a.id, b.id);
        assert_eq!(a, b);

        let c = ProjectConfig::new("https://demo.console.cloud", "manager", None);
        assert_ne!(a, c);
    }

    #[test]
    fn test_target_url_with_realm() {
        let config = ProjectConfig::new("https://demo.console.cloud", "manager", Some("master".into()));
        assert_eq!(
            config.target_url(),
            "https://demo.console.cloud/manager/?realm=master&consoleProviders=geofence push storage&consoleAutoEnable=true#!geofences"
        );
    }

    #[test]
    fn test_target_url_without_realm() {
        let config = ProjectConfig::new("https://demo.console.cloud", "console1", None)
            .with_providers(vec!["push".into(), "storage".into()]);
        assert_eq!(
            config.target_url(),
            "https://demo.console.cloud/console1/?consoleProviders=push storage&consoleAutoEnable=true#!geofences"
        );
    }

    #[test]
    fn test_console_config_decodes_with_missing_fields() {
        let config: ConsoleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConsoleConfig::default());

        let config: ConsoleConfig = serde_json::from_str(
            r#"{
                "allowed_apps": ["console1"],
                "show_realm_text_input": true,
                "apps": {
                    "console1": { "console_app_incompatible": false, "realms": ["master"] }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.allowed_apps.as_deref(), Some(&["console1".to_string()][..]));
        assert!(config.show_realm_text_input);
        assert!(!config.show_app_text_input);
        let registry = config.apps.unwrap();
        assert_eq!(
            registry["console1"].realms.as_deref(),
            Some(&["master".to_string()][..])
        );
    }
}
