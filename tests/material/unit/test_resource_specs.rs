use std::path::{Path, PathBuf};

use serde_json::json;
use tls_material::config::{Platform, ResourceSettings};
use tls_material::{ArtifactKind, ArtifactSpec, ItemLocator, MaterialError};

#[test]
fn namespace_sections_pick_sources_per_artifact() {
    let node = json!({
        "fqdn": "web01.example.test",
        "platform": "centos",
        "web": {
            "ssl_key": { "source": "chef-vault", "bag": "tls", "item": "web", "item_key": "key" },
            "ssl_cert": { "source": "file" }
        }
    });

    let settings = ResourceSettings::new("web")
        .resolve(&node, Platform::from_attributes(&node), None)
        .unwrap();

    assert!(settings.depends_on_vault());
    assert_eq!(
        settings.key.to_spec(ArtifactKind::Key).unwrap(),
        ArtifactSpec::vault(ItemLocator::new("tls", "web", "key"))
    );
    assert_eq!(
        settings.cert.to_spec(ArtifactKind::Certificate).unwrap(),
        ArtifactSpec::file("/etc/pki/tls/certs/web.pem")
    );
}

#[test]
fn secret_file_cascade() {
    let node = json!({
        "fqdn": "h",
        "web": {
            "source": "data-bag", "bag": "ssl", "item": "web", "encrypted": true,
            "secret_file": "/etc/shared_secret",
            "ssl_key": { "item_key": "key", "secret_file": "/etc/key_secret" },
            "ssl_cert": { "item_key": "cert" }
        }
    });

    let settings = ResourceSettings::new("web")
        .resolve(&node, Platform::Debian, Some(Path::new("/etc/default_secret")))
        .unwrap();
    assert_eq!(settings.key.secret_file, Some(PathBuf::from("/etc/key_secret")));
    assert_eq!(settings.cert.secret_file, Some(PathBuf::from("/etc/shared_secret")));

    let explicit = ResourceSettings::new("web")
        .secret_file("/run/secret")
        .resolve(&node, Platform::Debian, None)
        .unwrap();
    assert_eq!(explicit.key.secret_file, Some(PathBuf::from("/run/secret")));
    assert_eq!(explicit.cert.secret_file, Some(PathBuf::from("/run/secret")));
}

#[test]
fn unencrypted_items_ignore_secret_file() {
    let node = json!({
        "fqdn": "h",
        "web": {
            "source": "data-bag",
            "bag": "ssl",
            "item": "web",
            "ssl_key": { "item_key": "key" }
        }
    });
    let settings = ResourceSettings::new("web")
        .resolve(&node, Platform::Debian, Some(Path::new("/etc/default_secret")))
        .unwrap();
    assert_eq!(
        settings.key.to_spec(ArtifactKind::Key).unwrap(),
        ArtifactSpec::secret_store(ItemLocator::new("ssl", "web", "key"))
    );
}

#[test]
fn unknown_source_names_the_artifact() {
    let settings = ResourceSettings::new("web")
        .server_name("example.test")
        .source("attribute")
        .resolve(&json!({}), Platform::Other, None)
        .unwrap();

    match settings.cert.to_spec(ArtifactKind::Certificate).unwrap_err() {
        MaterialError::UnknownSource { artifact, value } => {
            assert_eq!(artifact, ArtifactKind::Certificate);
            assert_eq!(value, "attribute");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
