//! Target URL helpers
//!
//! All deploy methods receive a target URL that ends with `/`. Sub-paths
//! (`install`, `bundles/<name>`, `<filename>`) are appended as encoded path
//! segments, never resolved as relative references.

use url::Url;

use crate::errors::DeployError;

/// Ensure the path of `url` ends with a slash.
///
/// User info, query and fragment are kept.
pub fn add_trailing_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        return url.clone();
    }
    let mut normalized = url.clone();
    let path = format!("{}/", url.path());
    normalized.set_path(&path);
    normalized
}

/// Remove a single trailing slash from the path of `url`.
///
/// The root path of a hierarchical URL cannot be empty, so `http://host/`
/// comes back unchanged (it is the same URL as `http://host`).
pub fn strip_trailing_slash(url: &Url) -> Url {
    let path = url.path();
    if path.len() <= 1 || !path.ends_with('/') {
        return url.clone();
    }
    let mut stripped = url.clone();
    let trimmed = path[..path.len() - 1].to_string();
    stripped.set_path(&trimmed);
    stripped
}

/// Append `file_name` as a single path segment of `target_url`.
///
/// The name is percent-encoded, so `#`, `?`, `/` or a scheme-like prefix can
/// never leave the target directory.
pub fn resolve_with_filename(target_url: &Url, file_name: &str) -> Result<Url, DeployError> {
    resolve_with_segments(target_url, &[file_name])
}

/// Append `segments` below the directory `target_url` points to
pub fn resolve_with_segments(target_url: &Url, segments: &[&str]) -> Result<Url, DeployError> {
    let mut resolved = target_url.clone();
    resolved
        .path_segments_mut()
        .map_err(|_| DeployError::ConfigError(format!("{} cannot be used as a base URL", target_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(resolved)
}

/// Extract the intermediate URLs of `url`, deepest first.
///
/// `http://localhost:8080/apps/slingshot/install` yields
/// `.../apps/slingshot/install`, `.../apps/slingshot`, `.../apps`.
/// The root is never part of the result and a trailing slash on the input
/// makes no difference.
pub fn extract_intermediate_uris(url: &Url) -> Vec<Url> {
    let mut uris = Vec::new();
    let mut accu = String::new();

    for segment in url.path().split('/').filter(|s| !s.is_empty()) {
        accu.push('/');
        accu.push_str(segment);

        let mut intermediate = url.clone();
        intermediate.set_path(&accu);
        intermediate.set_query(None);
        intermediate.set_fragment(None);
        uris.push(intermediate);
    }

    uris.reverse();
    uris
}
