//! Parameters handed to every deploy method call

use crate::http::client::HttpClient;

/// Default MIME type of a bundle
pub const DEFAULT_BUNDLE_MIME_TYPE: &str = "application/java-archive";

/// Default start level of an installed bundle
pub const DEFAULT_BUNDLE_START_LEVEL: &str = "20";

/// Deploy context parameters.
///
/// Built by the command layer for a single `deploy`/`undeploy` call. The HTTP
/// client is borrowed; it is owned and dropped by the caller.
#[derive(Clone, Copy)]
pub struct DeployContext<'a> {
    http_client: &'a HttpClient,
    mime_type: &'a str,
    bundle_start_level: &'a str,
    bundle_start: bool,
    refresh_packages: bool,
    fail_on_error: bool,
}

impl<'a> DeployContext<'a> {
    pub fn new(http_client: &'a HttpClient) -> Self {
        Self {
            http_client,
            mime_type: DEFAULT_BUNDLE_MIME_TYPE,
            bundle_start_level: DEFAULT_BUNDLE_START_LEVEL,
            bundle_start: true,
            refresh_packages: true,
            fail_on_error: true,
        }
    }

    pub fn with_mime_type(mut self, mime_type: &'a str) -> Self {
        self.mime_type = mime_type;
        self
    }

    pub fn with_bundle_start_level(mut self, bundle_start_level: &'a str) -> Self {
        self.bundle_start_level = bundle_start_level;
        self
    }

    pub fn with_bundle_start(mut self, bundle_start: bool) -> Self {
        self.bundle_start = bundle_start;
        self
    }

    pub fn with_refresh_packages(mut self, refresh_packages: bool) -> Self {
        self.refresh_packages = refresh_packages;
        self
    }

    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }

    pub fn http_client(&self) -> &'a HttpClient {
        self.http_client
    }

    /// Content type of the artifact body
    pub fn mime_type(&self) -> &str {
        self.mime_type
    }

    pub fn bundle_start_level(&self) -> &str {
        self.bundle_start_level
    }

    /// Start the bundle after installing it
    pub fn bundle_start(&self) -> bool {
        self.bundle_start
    }

    /// Refresh packages after installing
    pub fn refresh_packages(&self) -> bool {
        self.refresh_packages
    }

    /// Informational only, the disposition of errors is up to the caller
    pub fn fail_on_error(&self) -> bool {
        self.fail_on_error
    }
}
