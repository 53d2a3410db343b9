//! RSA private key generation and parsing.

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;

use crate::errors::{MaterialError, Result};
use crate::secrets::SecretBytes;

/// Modulus size of generated keys.
pub const KEY_BITS: usize = 2048;

/// Generate a fresh RSA-2048 key as PKCS#1 PEM (`BEGIN RSA PRIVATE KEY`).
pub fn generate_key() -> Result<SecretBytes> {
    let mut rng = rand::thread_rng();
    let key = RsaPrivateKey::new(&mut rng, KEY_BITS)
        .map_err(|e| MaterialError::generation(format!("RSA key generation failed: {}", e)))?;

    let pem = key
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| MaterialError::generation(format!("RSA key encoding failed: {}", e)))?;

    Ok(SecretBytes::from(pem.as_str()))
}

/// Parse an RSA private key from PKCS#1 or PKCS#8 PEM.
pub fn parse_private_key(pem: &[u8]) -> Result<RsaPrivateKey> {
    let text = std::str::from_utf8(pem)
        .map_err(|_| MaterialError::key_parse("private key is not PEM text"))?;

    RsaPrivateKey::from_pkcs1_pem(text)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(text))
        .map_err(|e| MaterialError::key_parse(format!("not an RSA private key: {}", e)))
}
