//! WebDAV deploy method
//!
//! Artifacts are written with `PUT <target>/<filename>` and removed with
//! `DELETE`. Most WebDAV servers refuse a `PUT` into a collection that does not
//! exist (409 Conflict). In that case the missing collections between the
//! deepest existing ancestor and the target are created with `MKCOL` and the
//! `PUT` is attempted exactly once more.

use std::path::Path;

use reqwest::{header, Method, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::deploy::context::DeployContext;
use crate::deploy::paths::{extract_intermediate_uris, resolve_with_filename};
use crate::deploy::response::{unexpected_status, validate, ResponseExpectation};
use crate::errors::DeployError;
use crate::filesys::file::File;

/// Outcome of probing an intermediate URL with `HEAD`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The collection is there (2xx, or 403 when listings are suppressed)
    Exists,

    /// 404, keep walking towards the root
    Missing,
}

impl ProbeOutcome {
    /// Interpret a `HEAD` status, `None` for anything that should abort the walk
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() || status == StatusCode::FORBIDDEN {
            Some(ProbeOutcome::Exists)
        } else if status == StatusCode::NOT_FOUND {
            Some(ProbeOutcome::Missing)
        } else {
            None
        }
    }
}

/// Deploy method using WebDAV `PUT`/`DELETE`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDavDeployMethod;

impl WebDavDeployMethod {
    pub async fn deploy(
        &self,
        target_url: &Url,
        file: &Path,
        _bundle_symbolic_name: &str,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        let file = File::new(file);

        match self.put(target_url, &file, context).await {
            Err(e) if e.status() == Some(StatusCode::CONFLICT) => {
                debug!("Bundle not installed due missing parent folders. Attempting to create parent structure.");
                self.create_intermediate_paths(target_url, context).await?;

                debug!("Re-attempting bundle install after creating parent folders.");
                self.put(target_url, &file, context).await
            }
            result => result,
        }
    }

    pub async fn undeploy(
        &self,
        target_url: &Url,
        bundle_name: &str,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        let delete_url = resolve_with_filename(target_url, bundle_name)?;
        let response = context.http_client().delete(delete_url).send().await?;

        // a WebDAV DELETE answers 204 (no content)
        let status = validate(response, &ResponseExpectation::status([StatusCode::NO_CONTENT])).await?;
        debug!("Received status code {}", status.as_u16());
        Ok(())
    }

    async fn put(
        &self,
        target_url: &Url,
        file: &File,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        let put_url = resolve_with_filename(target_url, &file.file_name()?)?;
        let body = file.read_bytes().await?;

        let response = context
            .http_client()
            .put(put_url)
            .header(header::CONTENT_TYPE, context.mime_type())
            .body(body)
            .send()
            .await?;

        // 201 (created) for new resources, 204 (no content) for updated ones
        let expectation = ResponseExpectation::status([StatusCode::NO_CONTENT, StatusCode::CREATED]);
        let status = validate(response, &expectation).await?;
        debug!("Received status code {}", status.as_u16());
        Ok(())
    }

    /// Probe `url`, mapping any abort condition to an error
    async fn probe(&self, url: &Url, context: &DeployContext<'_>) -> Result<ProbeOutcome, DeployError> {
        let response = context.http_client().head(url.clone()).send().await?;
        let status = response.status();
        // HEAD never carries a body, draining is a no-op
        response.bytes().await?;

        ProbeOutcome::from_status(status).ok_or_else(|| unexpected_status(url, status))
    }

    async fn mkcol(&self, url: &Url, context: &DeployContext<'_>) -> Result<(), DeployError> {
        let method = Method::from_bytes(b"MKCOL").map_err(|e| DeployError::ConfigError(e.to_string()))?;
        let response = context.http_client().request(method, url.clone()).send().await?;

        let status = validate(response, &ResponseExpectation::status([StatusCode::CREATED])).await?;
        info!("Received status code {} for MKCOL {}", status.as_u16(), url);
        Ok(())
    }

    async fn create_intermediate_paths(
        &self,
        target_url: &Url,
        context: &DeployContext<'_>,
    ) -> Result<(), DeployError> {
        // longest first
        let intermediate_uris = extract_intermediate_uris(target_url);

        // 1. walk towards the root until a collection exists
        let mut existing = None;
        for (index, uri) in intermediate_uris.iter().enumerate() {
            let outcome = self.probe(uri, context).await.map_err(|e| {
                DeployError::IntermediatePathProbe {
                    url: uri.clone(),
                    source: Box::new(e),
                }
            })?;
            if outcome == ProbeOutcome::Exists {
                existing = Some(index);
                break;
            }
        }

        let Some(existing) = existing else {
            return Err(DeployError::NoExistingAncestor {
                url: target_url.clone(),
            });
        };

        // 2. create every missing collection below it, shallowest first
        for uri in intermediate_uris[..existing].iter().rev() {
            self.mkcol(uri, context).await.map_err(|e| DeployError::IntermediatePathCreation {
                url: uri.clone(),
                source: Box::new(e),
            })?;
            debug!("Intermediate path at {} successfully created", uri);
        }

        Ok(())
    }
}
