//! Felix Web Console deploy method
//!
//! Installs through the bundles servlet of the web console. The servlet answers
//! an install with an empty body and an uninstall with a JSON status object,
//! which is how a misconfigured URL (e.g. a login page) is told apart from the
//! real endpoint.

use std::path::Path;

use reqwest::header;
use reqwest::multipart::Form;
use tracing::debug;
use url::Url;

use crate::deploy::context::DeployContext;
use crate::deploy::file_part;
use crate::deploy::paths::resolve_with_segments;
use crate::deploy::response::expect_success_body;
use crate::errors::DeployError;
use crate::filesys::file::File;

/// Multipart field carrying the bundle
pub const BUNDLE_FILE_FIELD: &str = "bundlefile";

/// Content type of the bundle part
const BUNDLE_PART_MIME_TYPE: &str = "application/octet-stream";

/// Deploy method talking to `<console>/install` and `<console>/bundles/<name>`
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDeployMethod;

impl ConsoleDeployMethod {
    pub async fn deploy(
        &self,
        target_url: &Url,
        file: &Path,
        _bundle_symbolic_name: &str,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        // a pseudo path below the console root avoids the redirect
        let post_url = resolve_with_segments(target_url, &["install"])?;
        debug!("Installing via POST to {}", post_url);

        let form = install_form(context).part(
            BUNDLE_FILE_FIELD,
            file_part(&File::new(file), BUNDLE_PART_MIME_TYPE).await?,
        );

        let response = context
            .http_client()
            .post(post_url.clone())
            .header(header::REFERER, "about:blank")
            .multipart(form)
            .send()
            .await?;
        let body = expect_success_body(response).await?;

        check_install_response(&post_url, &body)
    }

    pub async fn undeploy(
        &self,
        target_url: &Url,
        bundle_symbolic_name: &str,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        let post_url = resolve_with_segments(target_url, &["bundles", bundle_symbolic_name])?;
        debug!("Uninstalling via POST to {}", post_url);

        let response = context
            .http_client()
            .post(post_url.clone())
            .form(&[("action", "uninstall")])
            .send()
            .await?;
        let body = expect_success_body(response).await?;

        check_uninstall_response(&post_url, &body)?;
        debug!("Received response from {}: {}", post_url, body);
        Ok(())
    }
}

/// Text fields of the install request
fn install_form(context: &DeployContext<'_>) -> Form {
    let mut form = Form::new()
        .text("action", "install")
        .text("_noredir_", "_noredir_")
        .text("bundlestartlevel", context.bundle_start_level().to_string());
    if context.bundle_start() {
        form = form.text("bundlestart", "start");
    }
    if context.refresh_packages() {
        form = form.text("refreshPackages", "true");
    }
    form
}

/// The bundles servlet answers a successful install with an empty body
fn check_install_response(url: &Url, body: &str) -> Result<(), DeployError> {
    if body.is_empty() {
        Ok(())
    } else {
        Err(DeployError::unexpected_content(url, "Must be empty but was", body))
    }
}

/// The bundles servlet answers an uninstall with a JSON object carrying a boolean `fragment`
fn check_uninstall_response(url: &Url, body: &str) -> Result<(), DeployError> {
    let has_fragment_flag = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(|value| value.as_object())
        .and_then(|object| object.get("fragment"))
        .is_some_and(serde_json::Value::is_boolean);

    if has_fragment_flag {
        Ok(())
    } else {
        Err(DeployError::unexpected_content(url, "Must be valid JSON but was", body))
    }
}
