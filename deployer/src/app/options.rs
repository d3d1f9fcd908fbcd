//! Command options

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::deploy::context::{DEFAULT_BUNDLE_MIME_TYPE, DEFAULT_BUNDLE_START_LEVEL};
use crate::deploy::paths::add_trailing_slash;
use crate::deploy::DeploymentMethod;
use crate::errors::DeployError;
use crate::http::client::HttpClientOptions;
use crate::storage::settings::{InstallSettings, SlingSettings};

/// Default MIME type of non-bundle content
pub const DEFAULT_CONTENT_MIME_TYPE: &str = "application/octet-stream";

/// Where and how to connect
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// URL of the running Sling instance
    pub sling_url: Url,

    /// Optional suffix resolved against `sling_url`
    pub url_suffix: Option<String>,

    /// Credentials and timeouts
    pub http: HttpClientOptions,

    /// Return errors instead of logging them
    pub fail_on_error: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self::from(&SlingSettings::default())
    }
}

impl From<&SlingSettings> for ConnectionOptions {
    fn from(settings: &SlingSettings) -> Self {
        Self {
            sling_url: settings.url.clone(),
            url_suffix: settings.url_suffix.clone(),
            http: HttpClientOptions {
                user: settings.user.clone(),
                password: settings.password.clone(),
                connect_timeout: Duration::from_secs(settings.http_connect_timeout_sec),
                response_timeout: Duration::from_secs(settings.http_response_timeout_sec),
            },
            fail_on_error: settings.fail_on_error,
        }
    }
}

impl ConnectionOptions {
    /// The URL deploy methods work against, always ending with a slash
    pub fn target_url(&self) -> Result<Url, DeployError> {
        let target = match &self.url_suffix {
            Some(suffix) => self.sling_url.join(suffix)?,
            None => self.sling_url.clone(),
        };
        Ok(add_trailing_slash(&target))
    }
}

/// Deployment method selection
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodOptions {
    /// Explicitly configured method
    pub deploy_method: Option<DeploymentMethod>,

    /// Deprecated, selects WebDAV when no method is configured
    pub use_put: bool,
}

impl From<&InstallSettings> for MethodOptions {
    fn from(settings: &InstallSettings) -> Self {
        Self {
            deploy_method: settings.deploy_method,
            use_put: settings.use_put,
        }
    }
}

impl MethodOptions {
    pub fn resolve(&self) -> DeploymentMethod {
        match self.deploy_method {
            Some(method) => method,
            None if self.use_put => {
                warn!("Using deprecated configuration parameter 'usePut=true', please instead use the new parameter 'deployMethod=WebDAV'!");
                DeploymentMethod::WebDAV
            }
            None => DeploymentMethod::WebConsole,
        }
    }
}

/// Options of the bundle install command
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub connection: ConnectionOptions,
    pub method: MethodOptions,
    pub mime_type: String,
    pub bundle_start_level: String,
    pub bundle_start: bool,
    pub refresh_packages: bool,
    pub bundle_file: PathBuf,
}

impl InstallOptions {
    /// Options for `bundle_file` with every other value taken from settings
    pub fn from_settings(
        sling: &SlingSettings,
        install: &InstallSettings,
        bundle_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            connection: ConnectionOptions::from(sling),
            method: MethodOptions::from(install),
            mime_type: install
                .mime_type
                .clone()
                .unwrap_or_else(|| DEFAULT_BUNDLE_MIME_TYPE.to_string()),
            bundle_start_level: install
                .bundle_start_level
                .clone()
                .unwrap_or_else(|| DEFAULT_BUNDLE_START_LEVEL.to_string()),
            bundle_start: install.bundle_start.unwrap_or(true),
            refresh_packages: install.refresh_packages.unwrap_or(true),
            bundle_file: bundle_file.into(),
        }
    }
}

/// Options of the bundle uninstall command
#[derive(Debug, Clone)]
pub struct UninstallOptions {
    pub connection: ConnectionOptions,
    pub method: MethodOptions,

    /// Bundle to derive the name from when `bundle_name` is absent
    pub bundle_file: Option<PathBuf>,

    /// Symbolic name (web console) or file name (other methods)
    pub bundle_name: Option<String>,
}

/// Options of the content (non-bundle) install command
#[derive(Debug, Clone)]
pub struct ContentInstallOptions {
    pub connection: ConnectionOptions,
    pub method: MethodOptions,
    pub mime_type: String,
    pub artifact_file: PathBuf,
}
