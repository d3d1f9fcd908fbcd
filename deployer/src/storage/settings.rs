//! Settings file management

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::deploy::DeploymentMethod;
use crate::errors::DeployError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Deployer settings, as read from an optional JSON file.
///
/// Every field has a default, so `{}` is a valid settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Sling instance and HTTP settings
    #[serde(default)]
    pub sling: SlingSettings,

    /// Install parameters
    #[serde(default)]
    pub install: InstallSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            sling: SlingSettings::default(),
            install: InstallSettings::default(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(file: &File) -> Result<Self, DeployError> {
        file.read_json().await.map_err(|e| {
            DeployError::ConfigError(format!(
                "Unable to read settings file {}: {}",
                file.path().display(),
                e
            ))
        })
    }
}

/// Sling instance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlingSettings {
    /// URL of the running Sling instance
    #[serde(default = "default_sling_url")]
    pub url: Url,

    /// Suffix resolved against `url` to get the real target
    #[serde(default)]
    pub url_suffix: Option<String>,

    /// User name for basic authentication
    #[serde(default = "default_user")]
    pub user: String,

    /// Password for basic authentication
    #[serde(default = "default_password", skip_serializing)]
    pub password: SecretString,

    /// Fail the command when the server rejects a request
    #[serde(default = "default_true")]
    pub fail_on_error: bool,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub http_connect_timeout_sec: u64,

    /// Response timeout in seconds
    #[serde(default = "default_response_timeout")]
    pub http_response_timeout_sec: u64,
}

fn default_true() -> bool {
    true
}

fn default_sling_url() -> Url {
    Url::parse("http://localhost:8080/system/console").expect("valid default URL")
}

fn default_user() -> String {
    "admin".to_string()
}

fn default_password() -> SecretString {
    SecretString::from("admin")
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_response_timeout() -> u64 {
    60
}

impl Default for SlingSettings {
    fn default() -> Self {
        Self {
            url: default_sling_url(),
            url_suffix: None,
            user: default_user(),
            password: default_password(),
            fail_on_error: true,
            http_connect_timeout_sec: default_connect_timeout(),
            http_response_timeout_sec: default_response_timeout(),
        }
    }
}

/// Install parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallSettings {
    /// Deployment method, `WebConsole` when absent
    #[serde(default)]
    pub deploy_method: Option<DeploymentMethod>,

    /// Deprecated switch selecting WebDAV
    #[serde(default)]
    pub use_put: bool,

    /// MIME type of the uploaded artifact
    #[serde(default)]
    pub mime_type: Option<String>,

    /// Start level of installed bundles
    #[serde(default)]
    pub bundle_start_level: Option<String>,

    /// Start bundles after installing
    #[serde(default)]
    pub bundle_start: Option<bool>,

    /// Refresh packages after installing
    #[serde(default)]
    pub refresh_packages: Option<bool>,
}
