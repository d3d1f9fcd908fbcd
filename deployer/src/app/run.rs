//! Install and uninstall commands

use tracing::{debug, error, info};

use crate::app::options::{ContentInstallOptions, InstallOptions, UninstallOptions};
use crate::bundle::bundle_symbolic_name;
use crate::deploy::context::DeployContext;
use crate::deploy::{DeployMethod, DeploymentMethod};
use crate::errors::DeployError;
use crate::filesys::file::File;
use crate::http::client::HttpClient;

/// Install an OSGi bundle
pub async fn install(options: &InstallOptions) -> Result<(), DeployError> {
    let bundle_file = File::new(&options.bundle_file);
    if !bundle_file.exists().await {
        return Err(DeployError::ConfigError(format!(
            "The given bundle file {} does not exist!",
            bundle_file.path().display()
        )));
    }

    let Some(bundle_name) = bundle_symbolic_name(bundle_file.path()).await else {
        return Err(DeployError::BundleError(format!(
            "The given file {} is no OSGi bundle",
            bundle_file.path().display()
        )));
    };

    let target_url = options.connection.target_url()?;
    let method = options.method.resolve();
    info!(
        "Installing Bundle {}({}) to {} via {}...",
        bundle_name,
        bundle_file.path().display(),
        target_url,
        method
    );

    let result = async {
        let http_client = HttpClient::new(&target_url, &options.connection.http)?;
        let context = DeployContext::new(&http_client)
            .with_fail_on_error(options.connection.fail_on_error)
            .with_bundle_start_level(&options.bundle_start_level)
            .with_bundle_start(options.bundle_start)
            .with_mime_type(&options.mime_type)
            .with_refresh_packages(options.refresh_packages);

        DeployMethod::from(method)
            .deploy(&target_url, bundle_file.path(), &bundle_name, &context)
            .await
    }
    .await;

    match result {
        Ok(()) => {
            info!("Bundle installed successfully");
            Ok(())
        }
        Err(e) => dispose(e, options.connection.fail_on_error, "Installation failed, cause: ".to_string()),
    }
}

/// Uninstall an OSGi bundle
pub async fn uninstall(options: &UninstallOptions) -> Result<(), DeployError> {
    let method = options.method.resolve();

    let bundle_name = match (&options.bundle_name, &options.bundle_file) {
        (Some(name), _) => name.clone(),
        (None, Some(path)) => {
            let bundle_file = File::new(path);
            let Some(symbolic_name) = bundle_symbolic_name(bundle_file.path()).await else {
                info!("{} is not an OSGi Bundle, not uninstalling", bundle_file.path().display());
                return Ok(());
            };
            if method == DeploymentMethod::WebConsole {
                symbolic_name
            } else {
                bundle_file.file_name()?
            }
        }
        (None, None) => {
            return Err(DeployError::ConfigError(
                "Must provide either a bundle name or a bundle file".to_string(),
            ))
        }
    };

    let target_url = options.connection.target_url()?;
    info!("Uninstalling Bundle {} from {} via {}...", bundle_name, target_url, method);

    let result = async {
        let http_client = HttpClient::new(&target_url, &options.connection.http)?;
        let context = DeployContext::new(&http_client).with_fail_on_error(options.connection.fail_on_error);

        DeployMethod::from(method)
            .undeploy(&target_url, &bundle_name, &context)
            .await
    }
    .await;

    match result {
        Ok(()) => {
            info!("Bundle uninstalled successfully!");
            Ok(())
        }
        Err(e) => dispose(
            e,
            options.connection.fail_on_error,
            format!("Uninstall from {} failed, cause: ", target_url),
        ),
    }
}

/// Install a content artifact that is not an OSGi bundle.
///
/// The web console only accepts bundles, so it is skipped for that method.
pub async fn install_content(options: &ContentInstallOptions) -> Result<(), DeployError> {
    let artifact = File::new(&options.artifact_file);
    if !artifact.exists().await {
        info!("{} does not exist, no uploading", artifact.path().display());
        return Ok(());
    }
    if artifact.is_dir().await {
        debug!("{} is directory, no uploading", artifact.path().display());
        return Ok(());
    }
    if is_bundle_file(&artifact).await {
        info!(
            "{} is an OSGi Bundle, not uploading. Please use the install command instead.",
            artifact.path().display()
        );
        return Ok(());
    }

    let method = options.method.resolve();
    if method == DeploymentMethod::WebConsole {
        debug!("Skipping content installation because deploy method is WebConsole");
        return Ok(());
    }

    let target_url = options.connection.target_url()?;
    let artifact_name = artifact.file_name()?;
    info!(
        "Installing Artifact file {}({}) to {} via {}",
        artifact_name,
        artifact.path().display(),
        target_url,
        method
    );

    let result = async {
        let http_client = HttpClient::new(&target_url, &options.connection.http)?;
        let context = DeployContext::new(&http_client)
            .with_fail_on_error(options.connection.fail_on_error)
            .with_mime_type(&options.mime_type);

        DeployMethod::from(method)
            .deploy(&target_url, artifact.path(), &artifact_name, &context)
            .await
    }
    .await;

    match result {
        Ok(()) => {
            info!("Artifact installed successfully");
            Ok(())
        }
        Err(e) => dispose(e, options.connection.fail_on_error, "Installation failed, cause: ".to_string()),
    }
}

async fn is_bundle_file(file: &File) -> bool {
    file.path().extension().is_some_and(|ext| ext == "jar")
        && bundle_symbolic_name(file.path()).await.is_some()
}

/// Return the error when failing on errors, otherwise log it and carry on
fn dispose(err: DeployError, fail_on_error: bool, message: String) -> Result<(), DeployError> {
    if fail_on_error {
        Err(err)
    } else {
        error!("{}{}", message, err);
        Ok(())
    }
}
