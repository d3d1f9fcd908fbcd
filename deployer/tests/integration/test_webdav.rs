//! WebDAV deploy method and parent collection recovery

use sling_deploy::deploy::context::DeployContext;
use sling_deploy::deploy::{DeployMethod, DeploymentMethod};
use sling_deploy::errors::{DeployError, ErrorKind};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_for, received, target_url, unreachable_target, write_jar, SYMBOLIC_NAME};

const JAR: &str = "bundle-1.0.jar";

fn webdav() -> DeployMethod {
    DeployMethod::from(DeploymentMethod::WebDAV)
}

#[tokio::test]
async fn test_put_created() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/apps/slingshot/install/bundle-1.0.jar"))
        .and(header("content-type", "application/java-archive"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), JAR, Some(SYMBOLIC_NAME));
    let target = target_url(&server, "apps/slingshot/install/");
    let client = client_for(&target);

    webdav()
        .deploy(&target, &jar, SYMBOLIC_NAME, &DeployContext::new(&client))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, std::fs::read(&jar).unwrap());
}

#[tokio::test]
async fn test_put_rejects_ok() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), JAR, Some(SYMBOLIC_NAME));
    let target = target_url(&server, "apps/slingshot/install/");
    let client = client_for(&target);

    let err = webdav()
        .deploy(&target, &jar, SYMBOLIC_NAME, &DeployContext::new(&client))
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(200));
}

#[tokio::test]
async fn test_conflict_creates_missing_collections() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/apps/slingshot/install/bundle-1.0.jar"))
        .respond_with(ResponseTemplate::new(409))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/apps/slingshot/install/bundle-1.0.jar"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/apps"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("MKCOL"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), JAR, Some(SYMBOLIC_NAME));
    let target = target_url(&server, "apps/slingshot/install/");
    let client = client_for(&target);

    webdav()
        .deploy(&target, &jar, SYMBOLIC_NAME, &DeployContext::new(&client))
        .await
        .unwrap();

    let expected = [
        ("PUT", "/apps/slingshot/install/bundle-1.0.jar"),
        ("HEAD", "/apps/slingshot/install"),
        ("HEAD", "/apps/slingshot"),
        ("HEAD", "/apps"),
        ("MKCOL", "/apps/slingshot"),
        ("MKCOL", "/apps/slingshot/install"),
        ("PUT", "/apps/slingshot/install/bundle-1.0.jar"),
    ];
    let expected: Vec<(String, String)> = expected
        .iter()
        .map(|(m, p)| (m.to_string(), p.to_string()))
        .collect();
    assert_eq!(received(&server).await, expected);
}

#[tokio::test]
async fn test_forbidden_probe_counts_as_existing() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/dav/default"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("MKCOL"))
        .and(path("/dav/default/install"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), JAR, Some(SYMBOLIC_NAME));
    let target = target_url(&server, "dav/default/install/");
    let client = client_for(&target);

    webdav()
        .deploy(&target, &jar, SYMBOLIC_NAME, &DeployContext::new(&client))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_existing_ancestor() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("MKCOL"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), JAR, Some(SYMBOLIC_NAME));
    let target = target_url(&server, "apps/slingshot/install/");
    let client = client_for(&target);

    let err = webdav()
        .deploy(&target, &jar, SYMBOLIC_NAME, &DeployContext::new(&client))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::NoExistingAncestor { .. }));
    assert_eq!(err.kind(), ErrorKind::Recovery);
}

#[tokio::test]
async fn test_probe_failure_aborts_recovery() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), JAR, Some(SYMBOLIC_NAME));
    let target = target_url(&server, "apps/slingshot/install/");
    let client = client_for(&target);

    let err = webdav()
        .deploy(&target, &jar, SYMBOLIC_NAME, &DeployContext::new(&client))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::IntermediatePathProbe { .. }));
    assert!(err.to_string().contains("/apps/slingshot/install"));
}

#[tokio::test]
async fn test_failed_mkcol_aborts_recovery() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/apps"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("MKCOL"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), JAR, Some(SYMBOLIC_NAME));
    let target = target_url(&server, "apps/slingshot/install/");
    let client = client_for(&target);

    let err = webdav()
        .deploy(&target, &jar, SYMBOLIC_NAME, &DeployContext::new(&client))
        .await
        .unwrap_err();

    let DeployError::IntermediatePathCreation { url, .. } = &err else {
        panic!("unexpected error {err}");
    };
    assert_eq!(url.path(), "/apps/slingshot");
}

#[tokio::test]
async fn test_retry_happens_once() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), JAR, Some(SYMBOLIC_NAME));
    let target = target_url(&server, "apps/slingshot/install/");
    let client = client_for(&target);

    let err = webdav()
        .deploy(&target, &jar, SYMBOLIC_NAME, &DeployContext::new(&client))
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(409));
}

#[tokio::test]
async fn test_delete_requires_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/apps/slingshot/install/bundle-1.0.jar"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/apps/slingshot/install/other-1.0.jar"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let target = target_url(&server, "apps/slingshot/install/");
    let client = client_for(&target);
    let context = DeployContext::new(&client);

    webdav().undeploy(&target, JAR, &context).await.unwrap();

    let err = webdav().undeploy(&target, "other-1.0.jar", &context).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(200));
}

#[tokio::test]
async fn test_connection_failure_skips_recovery() {
    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), JAR, Some(SYMBOLIC_NAME));
    let target = unreachable_target("apps/slingshot/install/");
    let client = client_for(&target);

    let err = webdav()
        .deploy(&target, &jar, SYMBOLIC_NAME, &DeployContext::new(&client))
        .await
        .unwrap_err();

    // the PUT error itself, not a HEAD/MKCOL failure
    assert!(matches!(err, DeployError::HttpError(_)), "unexpected error {err}");
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), None);
}
