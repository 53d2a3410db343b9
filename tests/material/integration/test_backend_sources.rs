use std::sync::Arc;

use serde_json::json;
use tls_material::config::{Platform, ResourceSettings};
use tls_material::material::verify;
use tls_material::secrets::{encrypt_item_fields, InMemoryItemStore, LocalSecretStore};
use tls_material::{
    ArtifactKind, ArtifactSpec, EngineConfig, ItemLocator, MaterialEngine, MaterialError,
    SourceKind,
};

use crate::support::{item_fields, server_name, write_store_item, TestMaterialDir, SHARED_KEY};

#[test]
fn encrypted_secret_store_items_resolve_end_to_end() {
    let dir = TestMaterialDir::new().unwrap();
    let store_root = dir.path().join("data_bags");
    let secret_path = dir.path().join("secret");
    std::fs::write(&secret_path, "correct horse battery staple\n").unwrap();

    let key = String::from_utf8(SHARED_KEY.clone()).unwrap();
    let encrypted = encrypt_item_fields(
        &item_fields(&[("id", "web"), ("key", &key), ("cert", "CERT PEM")]),
        b"correct horse battery staple",
    )
    .unwrap();
    write_store_item(&store_root, "ssl", "web", &encrypted).unwrap();

    let config = EngineConfig {
        default_secret_file: Some(secret_path),
        data_bag_path: store_root,
        vault: None,
    };
    let engine = MaterialEngine::from_config(&config).unwrap();

    let node = json!({
        "fqdn": "web01.example.test",
        "web": {
            "source": "data-bag",
            "bag": "ssl",
            "item": "web",
            "encrypted": "true",
            "ssl_key": { "item_key": "key" },
            "ssl_cert": { "item_key": "cert" }
        }
    });
    let settings = ResourceSettings::new("web")
        .resolve(&node, Platform::Debian, config.default_secret_file.as_deref())
        .unwrap();

    let material = engine.resolve_resource(&settings).unwrap();
    assert_eq!(material.key_bytes(), SHARED_KEY.as_slice());
    assert_eq!(material.cert_bytes(), b"CERT PEM");
}

#[test]
fn undecryptable_item_is_missing_source() {
    let dir = TestMaterialDir::new().unwrap();
    let store_root = dir.path().join("data_bags");
    let secret_path = dir.path().join("secret");
    std::fs::write(&secret_path, "wrong secret").unwrap();

    let encrypted =
        encrypt_item_fields(&item_fields(&[("key", "KEY PEM")]), b"right secret").unwrap();
    write_store_item(&store_root, "ssl", "web", &encrypted).unwrap();

    let engine = MaterialEngine::builder()
        .secret_store(Arc::new(LocalSecretStore::new(&store_root)))
        .build();

    let err = engine
        .resolve_material(
            &ArtifactSpec::encrypted_secret_store(
                ItemLocator::new("ssl", "web", "key"),
                Some(secret_path),
            ),
            &ArtifactSpec::self_signed(&dir.cert_path),
            &server_name("example.test"),
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "Cannot read SSL key from secret_store: ssl.web->key");
}

#[test]
fn plain_secret_store_key_with_self_signed_certificate() {
    let dir = TestMaterialDir::new().unwrap();
    let store_root = dir.path().join("data_bags");
    let key = String::from_utf8(SHARED_KEY.clone()).unwrap();
    write_store_item(&store_root, "ssl", "web", &item_fields(&[("key", &key)])).unwrap();

    let engine = MaterialEngine::builder()
        .secret_store(Arc::new(LocalSecretStore::new(&store_root)))
        .build();
    let identity = server_name("example.test");

    let material = engine
        .resolve_material(
            &ArtifactSpec::secret_store(ItemLocator::new("ssl", "web", "key")),
            &ArtifactSpec::self_signed(&dir.cert_path),
            &identity,
        )
        .unwrap();

    assert!(verify(&SHARED_KEY, material.cert_bytes(), &identity).unwrap());
}

#[test]
fn vault_items_resolve_through_the_vault_client() {
    let vault = Arc::new(
        InMemoryItemStore::new()
            .with_item("tls", "api", item_fields(&[("key", "KEY PEM"), ("cert", "CERT PEM")])),
    );
    let engine = MaterialEngine::builder().vault(vault).build();

    let material = engine
        .resolve_material(
            &ArtifactSpec::vault(ItemLocator::new("tls", "api", "key")),
            &ArtifactSpec::vault(ItemLocator::new("tls", "api", "cert")),
            &server_name("api.example.test"),
        )
        .unwrap();

    assert_eq!(material.key_bytes(), b"KEY PEM");
    assert_eq!(material.cert_bytes(), b"CERT PEM");
}

#[test]
fn vault_without_client_is_missing_source() {
    let engine = MaterialEngine::builder().build();

    let err = engine
        .resolve_material(
            &ArtifactSpec::vault(ItemLocator::new("tls", "api", "key")),
            &ArtifactSpec::vault(ItemLocator::new("tls", "api", "cert")),
            &server_name("api.example.test"),
        )
        .unwrap_err();

    match err {
        MaterialError::MissingSource { artifact, source_kind, location } => {
            assert_eq!(artifact, ArtifactKind::Key);
            assert_eq!(source_kind, SourceKind::Vault);
            assert_eq!(location, "tls.api->key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_item_field_is_missing_source() {
    let vault = Arc::new(
        InMemoryItemStore::new().with_item(
            "tls",
            "api",
            item_fields(&[("key", ""), ("cert", "C")]),
        ),
    );
    let engine = MaterialEngine::builder().vault(vault).build();

    let err = engine
        .resolve_material(
            &ArtifactSpec::vault(ItemLocator::new("tls", "api", "key")),
            &ArtifactSpec::vault(ItemLocator::new("tls", "api", "cert")),
            &server_name("api.example.test"),
        )
        .unwrap_err();
    assert!(matches!(err, MaterialError::MissingSource { artifact: ArtifactKind::Key, .. }));
}
