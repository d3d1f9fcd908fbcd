//! HTTP client implementation

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::{Origin, Url};

use crate::errors::DeployError;
use crate::utils::user_agent;

/// Connection settings for the shared client
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    /// User name for basic authentication
    pub user: String,

    /// Password for basic authentication
    pub password: SecretString,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Longest wait for the next bytes from the server; uploads of any size may take longer
    pub response_timeout: Duration,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            user: "admin".to_string(),
            password: SecretString::from("admin"),
            connect_timeout: Duration::from_secs(10),
            response_timeout: Duration::from_secs(60),
        }
    }
}

/// HTTP client shared by all requests of one command.
///
/// Credentials are sent preemptively, but only to the origin
/// (scheme, host, port) of the target URL the client was built for.
pub struct HttpClient {
    client: Client,
    auth_origin: Origin,
    user: String,
    password: SecretString,
}

impl HttpClient {
    /// Create a client that authenticates against the origin of `target_url`
    pub fn new(target_url: &Url, options: &HttpClientOptions) -> Result<Self, DeployError> {
        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .read_timeout(options.response_timeout)
            .user_agent(user_agent())
            // status codes are checked per request, a redirect is never followed
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            auth_origin: target_url.origin(),
            user: options.user.clone(),
            password: options.password.clone(),
        })
    }

    /// Start a request, adding basic authentication for the target origin
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let authenticate = url.origin() == self.auth_origin;
        debug!("{} {}", method, url);

        let request = self.client.request(method, url);
        if authenticate {
            request.basic_auth(&self.user, Some(self.password.expose_secret()))
        } else {
            request
        }
    }

    /// Make a POST request
    pub fn post(&self, url: Url) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Make a PUT request
    pub fn put(&self, url: Url) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    /// Make a DELETE request
    pub fn delete(&self, url: Url) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    /// Make a HEAD request
    pub fn head(&self, url: Url) -> RequestBuilder {
        self.request(Method::HEAD, url)
    }
}
