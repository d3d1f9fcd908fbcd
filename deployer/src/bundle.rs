//! OSGi bundle inspection

use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::errors::DeployError;

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
const BUNDLE_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";

/// Read the `Bundle-SymbolicName` of a JAR.
///
/// Returns `None` if the file does not exist or is not an OSGi bundle.
pub async fn bundle_symbolic_name(jar: &Path) -> Option<String> {
    let path = jar.to_path_buf();
    let result = tokio::task::spawn_blocking(move || read_symbolic_name(&path)).await;

    match result {
        Ok(Ok(name)) => name,
        Ok(Err(e)) => {
            warn!("Problem checking {} for a bundle manifest: {}", jar.display(), e);
            None
        }
        Err(e) => {
            warn!("Problem checking {} for a bundle manifest: {}", jar.display(), e);
            None
        }
    }
}

fn read_symbolic_name(jar: &Path) -> Result<Option<String>, DeployError> {
    if !jar.is_file() {
        return Ok(None);
    }

    let file = std::fs::File::open(jar)?;
    let mut archive = match zip::ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(e) => {
            debug!("{} is not a JAR: {}", jar.display(), e);
            return Ok(None);
        }
    };

    let mut manifest = String::new();
    match archive.by_name(MANIFEST_PATH) {
        Ok(mut entry) => {
            entry.read_to_string(&mut manifest)?;
        }
        Err(zip::result::ZipError::FileNotFound) => {
            debug!("Missing manifest in {}", jar.display());
            return Ok(None);
        }
        Err(e) => return Err(DeployError::BundleError(e.to_string())),
    }

    let name = main_attribute(&manifest, BUNDLE_SYMBOLIC_NAME).map(|value| strip_directives(&value));
    if name.is_none() {
        debug!("No {} in {}", BUNDLE_SYMBOLIC_NAME, jar.display());
    }
    Ok(name)
}

/// Look up an attribute of the main section of a JAR manifest.
///
/// Lines starting with a single space continue the previous line; the main
/// section ends at the first empty line.
pub fn main_attribute(manifest: &str, name: &str) -> Option<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in manifest.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            break;
        }
        if let Some(continuation) = line.strip_prefix(' ') {
            if let Some(last) = entries.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        entries.push(line.to_string());
    }

    entries.iter().find_map(|entry| {
        let (key, value) = entry.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().to_string())
    })
}

/// `com.example.bundle;singleton:=true` becomes `com.example.bundle`
fn strip_directives(value: &str) -> String {
    value.split(';').next().unwrap_or_default().trim().to_string()
}
