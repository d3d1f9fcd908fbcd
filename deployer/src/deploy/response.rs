//! HTTP response validation
//!
//! Every response is drained exactly once by the functions here, whatever the
//! outcome, so the connection can go back to the pool.

use reqwest::{header, Response, StatusCode};
use tracing::debug;
use url::Url;

use crate::errors::DeployError;

type BodyPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// What a response must look like to be accepted
pub struct ResponseExpectation {
    allowed: Vec<StatusCode>,
    content_type: Option<String>,
    body_predicate: Option<BodyPredicate>,
}

impl ResponseExpectation {
    /// Accept exactly the given status codes
    pub fn status(allowed: impl IntoIterator<Item = StatusCode>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            content_type: None,
            body_predicate: None,
        }
    }

    /// Require a content type (any `;charset=...` suffix of the response is ignored)
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Require the body text to satisfy `predicate`
    pub fn with_body(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.body_predicate = Some(Box::new(predicate));
        self
    }

    /// Check an already drained response.
    ///
    /// The body predicate runs first and short-circuits the status check.
    pub fn check(
        &self,
        url: &Url,
        status: StatusCode,
        content_type: Option<&str>,
        body: &str,
    ) -> Result<StatusCode, DeployError> {
        if let Some(predicate) = &self.body_predicate {
            if !predicate(body) {
                return Err(DeployError::unexpected_content(
                    url,
                    "Unexpected response content returned",
                    body,
                ));
            }
        }

        if !self.allowed.contains(&status) {
            return Err(unexpected_status(url, status));
        }

        if let Some(expected) = &self.content_type {
            let actual = content_type.map(media_type);
            if actual != Some(expected.as_str()) {
                return Err(DeployError::UnexpectedContentType {
                    url: url.clone(),
                    expected: expected.clone(),
                    actual: actual.map(str::to_string),
                });
            }
        }

        Ok(status)
    }
}

/// Drain `response` and check it against `expectation`, returning the status received
pub async fn validate(
    response: Response,
    expectation: &ResponseExpectation,
) -> Result<StatusCode, DeployError> {
    let url = response.url().clone();
    let status = response.status();
    let content_type = header_string(&response, header::CONTENT_TYPE);
    let body = response.text().await?;

    expectation.check(&url, status, content_type.as_deref(), &body)
}

/// Drain `response` and return its body if the status is below 300
pub async fn expect_success_body(response: Response) -> Result<String, DeployError> {
    let url = response.url().clone();
    let status = response.status();
    let body = response.text().await?;

    if status.as_u16() >= 300 {
        debug!("Error response body from {}: {}", url, crate::errors::excerpt(&body));
        return Err(unexpected_status(&url, status));
    }
    Ok(body)
}

/// Build the error for a status outside the allowed set
pub fn unexpected_status(url: &Url, status: StatusCode) -> DeployError {
    DeployError::UnexpectedStatus {
        url: url.clone(),
        status,
        reason: status.canonical_reason().unwrap_or("<unknown status code>").to_string(),
    }
}

fn header_string(response: &Response, name: header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Media type of a content-type header value, without parameters
fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}
