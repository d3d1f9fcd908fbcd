//! Sling POST servlet deploy method

use std::path::Path;

use reqwest::header;
use reqwest::multipart::Form;
use tracing::debug;
use url::Url;

use crate::deploy::context::DeployContext;
use crate::deploy::file_part;
use crate::deploy::paths::{resolve_with_filename, strip_trailing_slash};
use crate::deploy::response::expect_success_body;
use crate::errors::DeployError;
use crate::filesys::file::File;

const JSON_MIME_TYPE: &str = "application/json";

/// Deploy method posting to the generic Sling POST servlet.
///
/// Only the HTTP status is checked; the servlet's JSON answer is logged but
/// not validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlingPostDeployMethod;

impl SlingPostDeployMethod {
    pub async fn deploy(
        &self,
        target_url: &Url,
        file: &Path,
        _bundle_symbolic_name: &str,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        // a trailing slash changes how the servlet names the created node
        let post_url = strip_trailing_slash(target_url);
        let file = File::new(file);
        debug!("Installing via POST to {}", post_url);

        let form = Form::new()
            .text("*@TypeHint", "nt:file")
            .part("*", file_part(&file, context.mime_type()).await?);

        let response = context
            .http_client()
            .post(post_url)
            .header(header::ACCEPT, JSON_MIME_TYPE)
            .multipart(form)
            .send()
            .await?;

        let body = expect_success_body(response).await?;
        debug!("Received response: {}", body);
        Ok(())
    }

    pub async fn undeploy(
        &self,
        target_url: &Url,
        bundle_name: &str,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        let post_url = resolve_with_filename(target_url, bundle_name)?;
        debug!("Deleting via POST to {}", post_url);

        let response = context
            .http_client()
            .post(post_url)
            .header(header::ACCEPT, JSON_MIME_TYPE)
            .form(&[(":operation", "delete")])
            .send()
            .await?;

        let body = expect_success_body(response).await?;
        debug!("Received response: {}", body);
        Ok(())
    }
}
