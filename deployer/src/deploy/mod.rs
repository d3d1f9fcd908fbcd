//! Deployment module
//!
//! A [`DeploymentMethod`] chosen by configuration is turned once into a
//! [`DeployMethod`], which then speaks the wire dialect of that method for
//! `deploy` and `undeploy`.

pub mod console;
pub mod context;
pub mod paths;
pub mod response;
pub mod sling_post;
pub mod webdav;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use reqwest::multipart::Part;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::deploy::console::ConsoleDeployMethod;
use crate::deploy::context::DeployContext;
use crate::deploy::sling_post::SlingPostDeployMethod;
use crate::deploy::webdav::WebDavDeployMethod;
use crate::errors::DeployError;
use crate::filesys::file::File;

/// Configurable deployment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentMethod {
    /// Felix Web Console bundles servlet
    WebConsole,

    /// WebDAV `PUT`/`DELETE`, creating missing parent collections
    #[allow(clippy::upper_case_acronyms)]
    WebDAV,

    /// Sling POST servlet
    SlingPostServlet,
}

impl fmt::Display for DeploymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeploymentMethod::WebConsole => "WebConsole",
            DeploymentMethod::WebDAV => "WebDAV",
            DeploymentMethod::SlingPostServlet => "SlingPostServlet",
        };
        f.write_str(name)
    }
}

impl FromStr for DeploymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webconsole" => Ok(DeploymentMethod::WebConsole),
            "webdav" => Ok(DeploymentMethod::WebDAV),
            "slingpostservlet" => Ok(DeploymentMethod::SlingPostServlet),
            _ => Err(format!(
                "Invalid deployment method: {} (expected WebConsole, WebDAV or SlingPostServlet)",
                s
            )),
        }
    }
}

/// A deployment strategy ready to be invoked
#[derive(Debug, Clone, Copy)]
pub enum DeployMethod {
    Console(ConsoleDeployMethod),
    WebDav(WebDavDeployMethod),
    SlingPost(SlingPostDeployMethod),
}

impl From<DeploymentMethod> for DeployMethod {
    fn from(method: DeploymentMethod) -> Self {
        match method {
            DeploymentMethod::WebConsole => DeployMethod::Console(ConsoleDeployMethod),
            DeploymentMethod::WebDAV => DeployMethod::WebDav(WebDavDeployMethod),
            DeploymentMethod::SlingPostServlet => DeployMethod::SlingPost(SlingPostDeployMethod),
        }
    }
}

impl DeployMethod {
    /// Deploy/install `file` below `target_url`.
    ///
    /// `target_url` must end with a slash.
    pub async fn deploy(
        &self,
        target_url: &Url,
        file: &Path,
        bundle_symbolic_name: &str,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        match self {
            DeployMethod::Console(method) => {
                method.deploy(target_url, file, bundle_symbolic_name, context).await
            }
            DeployMethod::WebDav(method) => {
                method.deploy(target_url, file, bundle_symbolic_name, context).await
            }
            DeployMethod::SlingPost(method) => {
                method.deploy(target_url, file, bundle_symbolic_name, context).await
            }
        }
    }

    /// Undeploy/uninstall a bundle.
    ///
    /// `bundle_name` is the symbolic name for the web console and the file
    /// name for every other method.
    pub async fn undeploy(
        &self,
        target_url: &Url,
        bundle_name: &str,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        match self {
            DeployMethod::Console(method) => method.undeploy(target_url, bundle_name, context).await,
            DeployMethod::WebDav(method) => method.undeploy(target_url, bundle_name, context).await,
            DeployMethod::SlingPost(method) => method.undeploy(target_url, bundle_name, context).await,
        }
    }
}

/// Multipart part carrying the contents of `file` under its own file name
pub(crate) async fn file_part(file: &File, mime_type: &str) -> Result<Part, DeployError> {
    let file_name = file.file_name()?;
    let bytes = file.read_bytes().await?;

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_type)
        .map_err(|e| DeployError::ConfigError(format!("Invalid MIME type {}: {}", mime_type, e)))
}
