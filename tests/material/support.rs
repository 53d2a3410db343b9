use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use tempfile::TempDir;
use tls_material::material::{generate_key, generate_self_signed, FileSystem, LocalFileSystem};
use tls_material::secrets::ItemFields;
use tls_material::ServerName;

/// One generated key shared by tests that only need "some valid key".
pub static SHARED_KEY: Lazy<Vec<u8>> =
    Lazy::new(|| generate_key().expect("generate shared key").into_inner());

/// A second key, distinct from [`SHARED_KEY`].
pub static OTHER_KEY: Lazy<Vec<u8>> =
    Lazy::new(|| generate_key().expect("generate other key").into_inner());

pub fn server_name(name: &str) -> ServerName {
    ServerName::new(name).expect("valid server name")
}

/// Temporary directory with conventional key and certificate paths.
pub struct TestMaterialDir {
    pub temp_dir: TempDir,
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
}

impl TestMaterialDir {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let key_path = temp_dir.path().join("web.key");
        let cert_path = temp_dir.path().join("web.pem");
        Ok(Self { temp_dir, key_path, cert_path })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_key(&self, key: &[u8]) -> anyhow::Result<()> {
        std::fs::write(&self.key_path, key)?;
        Ok(())
    }

    /// Write a self-signed certificate issued by `key` for `hostname`.
    pub fn write_self_signed_cert(&self, key: &[u8], hostname: &str) -> anyhow::Result<Vec<u8>> {
        let cert = generate_self_signed(key, &server_name(hostname))?;
        std::fs::write(&self.cert_path, &cert)?;
        Ok(cert)
    }
}

/// Lay out a secret store item as `<root>/<container>/<item>.json`.
pub fn write_store_item(
    root: &Path,
    container: &str,
    item: &str,
    fields: &ItemFields,
) -> anyhow::Result<()> {
    let dir = root.join(container);
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join(format!("{}.json", item)), serde_json::to_vec_pretty(fields)?)?;
    Ok(())
}

pub fn item_fields(pairs: &[(&str, &str)]) -> ItemFields {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), serde_json::Value::String(value.to_string())))
        .collect()
}

/// Local filesystem that records every path it is asked about.
#[derive(Default)]
pub struct RecordingFileSystem {
    touched: Mutex<HashMap<PathBuf, usize>>,
}

impl RecordingFileSystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn touches(&self, path: &Path) -> usize {
        self.touched.lock().expect("lock").get(path).copied().unwrap_or(0)
    }

    fn record(&self, path: &Path) {
        *self.touched.lock().expect("lock").entry(path.to_path_buf()).or_default() += 1;
    }
}

impl FileSystem for RecordingFileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        self.record(path);
        LocalFileSystem.exists(path)
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.record(path);
        LocalFileSystem.read_all(path)
    }
}
