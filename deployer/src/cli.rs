//! Command-line interface
//!
//! Every connection and install parameter can come from (highest precedence
//! first) a flag, its `SLING_*` environment variable, the JSON settings file,
//! or the built-in default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use url::Url;

use crate::app::options::{
    ConnectionOptions, ContentInstallOptions, InstallOptions, MethodOptions, UninstallOptions,
    DEFAULT_CONTENT_MIME_TYPE,
};
use crate::app::run;
use crate::deploy::DeploymentMethod;
use crate::filesys::file::File;
use crate::logs::{init_logging, LogLevel, LogOptions};
use crate::storage::settings::Settings;
use crate::utils::version_info;

/// Deploy OSGi bundles and content to a running Sling instance
#[derive(Parser, Debug)]
#[command(name = "sling-deploy", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON settings file providing defaults for every option
    #[arg(long, global = true, env = "SLING_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install an OSGi bundle
    Install {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        bundle: BundleArgs,

        /// Bundle JAR to install
        #[arg(long = "file", env = "SLING_FILE")]
        file: PathBuf,
    },

    /// Uninstall an OSGi bundle
    Uninstall {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Bundle JAR whose name is uninstalled when no bundle name is given
        #[arg(long = "file", env = "SLING_FILE")]
        file: Option<PathBuf>,

        /// Symbolic name (WebConsole) or file name (WebDAV, SlingPostServlet)
        #[arg(long, env = "SLING_BUNDLE_NAME")]
        bundle_name: Option<String>,
    },

    /// Install a content artifact that is not an OSGi bundle
    JcrInstall {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// MIME type of the artifact
        #[arg(long, env = "SLING_MIME_TYPE")]
        mime_type: Option<String>,

        /// Artifact to install
        #[arg(long = "file", env = "SLING_FILE")]
        file: PathBuf,
    },

    /// Print version information as JSON
    Version,
}

/// Connection and deployment method flags
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// URL of the running Sling instance
    #[arg(long, env = "SLING_URL")]
    pub sling_url: Option<Url>,

    /// Suffix resolved against the Sling URL to get the target URL
    #[arg(long, env = "SLING_URL_SUFFIX")]
    pub url_suffix: Option<String>,

    /// User name for basic authentication
    #[arg(long, env = "SLING_USER")]
    pub user: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "SLING_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Fail when the server rejects a request; otherwise only log the error
    #[arg(long, env = "SLING_FAIL_ON_ERROR")]
    pub fail_on_error: Option<bool>,

    /// HTTP connect timeout in seconds
    #[arg(long, env = "SLING_HTTP_CONNECT_TIMEOUT_SEC")]
    pub http_connect_timeout_sec: Option<u64>,

    /// HTTP response timeout in seconds
    #[arg(long, env = "SLING_HTTP_RESPONSE_TIMEOUT_SEC")]
    pub http_response_timeout_sec: Option<u64>,

    /// Deployment method: WebConsole, WebDAV or SlingPostServlet
    #[arg(long, env = "SLING_DEPLOY_METHOD")]
    pub deploy_method: Option<DeploymentMethod>,

    /// Deprecated, use --deploy-method WebDAV
    #[arg(long, env = "SLING_USE_PUT")]
    pub use_put: Option<bool>,
}

/// Bundle install flags
#[derive(Args, Debug, Clone, Default)]
pub struct BundleArgs {
    /// MIME type of the bundle
    #[arg(long, env = "SLING_MIME_TYPE")]
    pub mime_type: Option<String>,

    /// Start level of the installed bundle
    #[arg(long, env = "SLING_BUNDLE_STARTLEVEL")]
    pub bundle_start_level: Option<String>,

    /// Start the bundle after installing it
    #[arg(long, env = "SLING_BUNDLE_START")]
    pub bundle_start: Option<bool>,

    /// Refresh packages after installing
    #[arg(long, env = "SLING_REFRESH_PACKAGES")]
    pub refresh_packages: Option<bool>,
}

impl ConnectionArgs {
    /// Overlay these flags on the settings file values
    pub fn apply(&self, settings: &Settings) -> (ConnectionOptions, MethodOptions) {
        let mut connection = ConnectionOptions::from(&settings.sling);
        if let Some(url) = &self.sling_url {
            connection.sling_url = url.clone();
        }
        if let Some(suffix) = &self.url_suffix {
            connection.url_suffix = Some(suffix.clone());
        }
        if let Some(user) = &self.user {
            connection.http.user = user.clone();
        }
        if let Some(password) = &self.password {
            connection.http.password = SecretString::from(password.clone());
        }
        if let Some(fail_on_error) = self.fail_on_error {
            connection.fail_on_error = fail_on_error;
        }
        if let Some(secs) = self.http_connect_timeout_sec {
            connection.http.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.http_response_timeout_sec {
            connection.http.response_timeout = Duration::from_secs(secs);
        }

        let mut method = MethodOptions::from(&settings.install);
        if self.deploy_method.is_some() {
            method.deploy_method = self.deploy_method;
        }
        if let Some(use_put) = self.use_put {
            method.use_put = use_put;
        }

        (connection, method)
    }
}

impl Cli {
    /// Run the selected command
    pub async fn execute(self) -> Result<()> {
        if let Command::Version = self.command {
            println!("{}", serde_json::to_string_pretty(&version_info())?);
            return Ok(());
        }

        let settings = match &self.settings {
            Some(path) => Settings::load(&File::new(path)).await?,
            None => Settings::default(),
        };

        let log_options = LogOptions {
            log_level: self.log_level.unwrap_or(settings.log_level),
            json_format: self.json_logs,
        };
        if let Err(e) = init_logging(log_options) {
            eprintln!("Failed to initialize logging: {e}");
        }

        match self.command {
            Command::Install {
                connection,
                bundle,
                file,
            } => {
                let options = install_options(&settings, &connection, &bundle, file);
                run::install(&options).await.context("Installation failed")
            }
            Command::Uninstall {
                connection,
                file,
                bundle_name,
            } => {
                let (connection, method) = connection.apply(&settings);
                let options = UninstallOptions {
                    connection,
                    method,
                    bundle_file: file,
                    bundle_name,
                };
                run::uninstall(&options).await.context("Uninstall failed")
            }
            Command::JcrInstall {
                connection,
                mime_type,
                file,
            } => {
                let (connection, method) = connection.apply(&settings);
                let options = ContentInstallOptions {
                    connection,
                    method,
                    mime_type: mime_type.unwrap_or_else(|| DEFAULT_CONTENT_MIME_TYPE.to_string()),
                    artifact_file: file,
                };
                run::install_content(&options).await.context("Installation failed")
            }
            Command::Version => Ok(()),
        }
    }
}

fn install_options(
    settings: &Settings,
    connection: &ConnectionArgs,
    bundle: &BundleArgs,
    file: PathBuf,
) -> InstallOptions {
    let mut options = InstallOptions::from_settings(&settings.sling, &settings.install, file);
    (options.connection, options.method) = connection.apply(settings);

    if let Some(mime_type) = &bundle.mime_type {
        options.mime_type = mime_type.clone();
    }
    if let Some(level) = &bundle.bundle_start_level {
        options.bundle_start_level = level.clone();
    }
    if let Some(start) = bundle.bundle_start {
        options.bundle_start = start;
    }
    if let Some(refresh) = bundle.refresh_packages {
        options.refresh_packages = refresh;
    }
    options
}
