//! Bundle manifest unit tests

use std::io::Write;

use sling_deploy::bundle::{bundle_symbolic_name, main_attribute};
use zip::write::SimpleFileOptions;

fn jar_with_manifest(manifest: &str) -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new().suffix(".jar").tempfile().unwrap();
    let mut jar = zip::ZipWriter::new(file.reopen().unwrap());
    jar.start_file("META-INF/MANIFEST.MF", SimpleFileOptions::default()).unwrap();
    jar.write_all(manifest.as_bytes()).unwrap();
    jar.finish().unwrap();
    file
}

#[tokio::test]
async fn test_symbolic_name_without_directives() {
    let jar = jar_with_manifest(
        "Manifest-Version: 1.0\r\nBundle-SymbolicName: org.apache.sling.api;singleton:=true\r\n\r\n",
    );
    assert_eq!(
        bundle_symbolic_name(jar.path()).await.as_deref(),
        Some("org.apache.sling.api")
    );
}

#[tokio::test]
async fn test_symbolic_name_spanning_lines() {
    let jar = jar_with_manifest(
        "Manifest-Version: 1.0\nBundle-SymbolicName: org.apache.sling.commons.\n json\n\n",
    );
    assert_eq!(
        bundle_symbolic_name(jar.path()).await.as_deref(),
        Some("org.apache.sling.commons.json")
    );
}

#[tokio::test]
async fn test_plain_jar_has_no_symbolic_name() {
    let jar = jar_with_manifest("Manifest-Version: 1.0\r\nCreated-By: test\r\n\r\n");
    assert_eq!(bundle_symbolic_name(jar.path()).await, None);
}

#[test]
fn test_attributes_after_main_section_are_ignored() {
    let manifest = "Manifest-Version: 1.0\n\nName: com/example/\nBundle-SymbolicName: nested\n";
    assert_eq!(main_attribute(manifest, "Bundle-SymbolicName"), None);
    assert_eq!(main_attribute(manifest, "Manifest-Version").as_deref(), Some("1.0"));
}
