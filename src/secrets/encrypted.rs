//! Encrypted item envelopes.
//!
//! Each field of an encrypted item (except `id`) is stored as an envelope:
//!
//! ```json
//! {
//!   "encrypted_data": "<base64 ciphertext>",
//!   "iv": "<base64 96-bit nonce>",
//!   "auth_tag": "<base64 128-bit GCM tag>",
//!   "version": 3,
//!   "cipher": "aes-256-gcm"
//! }
//! ```
//!
//! The AES key is the SHA-256 digest of the secret (the trimmed contents of
//! the secret file). The plaintext is the JSON document
//! `{"json_wrapper": <field value>}` so any JSON value can be stored.

use base64::{engine::general_purpose::STANDARD, Engine};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use super::client::ItemFields;
use super::error::{Result, SecretsError};
use super::types::SecretBytes;

/// The only envelope format understood by this crate.
pub const ENVELOPE_VERSION: u64 = 3;

/// Cipher name recorded in version 3 envelopes.
pub const ENVELOPE_CIPHER: &str = "aes-256-gcm";

const TAG_LEN: usize = 16;

/// Field that is never encrypted.
const ID_FIELD: &str = "id";

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    encrypted_data: String,
    iv: String,
    auth_tag: String,
    version: u64,
    cipher: String,
}

#[derive(Serialize, Deserialize)]
struct Wrapper {
    json_wrapper: serde_json::Value,
}

/// Read a secret file, trimming surrounding whitespace.
pub fn load_secret(path: &Path) -> Result<SecretBytes> {
    let raw = SecretBytes::new(std::fs::read(path)?);
    let trimmed = raw.expose_secret().trim_ascii();
    if trimmed.is_empty() {
        return Err(SecretsError::config_error(format!(
            "Secret file {} is empty",
            path.display()
        )));
    }
    Ok(SecretBytes::new(trimmed))
}

/// Decrypt every field of an item except `id`.
///
/// `key` names the item in error messages.
pub fn decrypt_item_fields(key: &str, fields: ItemFields, secret: &[u8]) -> Result<ItemFields> {
    let cipher_key = cipher_key(secret)?;
    fields
        .into_iter()
        .map(|(name, value)| {
            if name == ID_FIELD {
                Ok((name, value))
            } else {
                let plain = decrypt_value(key, &cipher_key, value)?;
                Ok((name, plain))
            }
        })
        .collect()
}

/// Encrypt every field of an item except `id`, producing version 3 envelopes.
pub fn encrypt_item_fields(fields: &ItemFields, secret: &[u8]) -> Result<ItemFields> {
    let cipher_key = cipher_key(secret)?;
    let rng = SystemRandom::new();
    fields
        .iter()
        .map(|(name, value)| {
            if name == ID_FIELD {
                return Ok((name.clone(), value.clone()));
            }
            let envelope = encrypt_value(&cipher_key, &rng, value)?;
            Ok((name.clone(), serde_json::to_value(envelope)?))
        })
        .collect()
}

fn cipher_key(secret: &[u8]) -> Result<LessSafeKey> {
    let digest = Sha256::digest(secret);
    let unbound = UnboundKey::new(&AES_256_GCM, digest.as_slice())
        .map_err(|_| SecretsError::config_error("Unable to derive item encryption key"))?;
    Ok(LessSafeKey::new(unbound))
}

fn decrypt_value(
    key: &str,
    cipher_key: &LessSafeKey,
    value: serde_json::Value,
) -> Result<serde_json::Value> {
    let envelope: Envelope = serde_json::from_value(value)
        .map_err(|e| SecretsError::decryption(key, format!("field is not an envelope: {}", e)))?;

    if envelope.version != ENVELOPE_VERSION || envelope.cipher != ENVELOPE_CIPHER {
        return Err(SecretsError::decryption(
            key,
            format!(
                "unsupported envelope version {} ({})",
                envelope.version, envelope.cipher
            ),
        ));
    }

    let iv = decode_base64(key, "iv", &envelope.iv)?;
    let tag = decode_base64(key, "auth_tag", &envelope.auth_tag)?;
    let mut in_out = decode_base64(key, "encrypted_data", &envelope.encrypted_data)?;

    if iv.len() != NONCE_LEN || tag.len() != TAG_LEN {
        return Err(SecretsError::decryption(key, "invalid iv or auth_tag length"));
    }

    let nonce = Nonce::try_assume_unique_for_key(&iv)
        .map_err(|_| SecretsError::decryption(key, "invalid iv"))?;
    in_out.extend_from_slice(&tag);

    let plaintext = cipher_key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| SecretsError::decryption(key, "authentication failed"))?;

    let wrapper: Wrapper = serde_json::from_slice(plaintext)
        .map_err(|e| SecretsError::decryption(key, format!("invalid plaintext: {}", e)))?;
    Ok(wrapper.json_wrapper)
}

fn encrypt_value(
    cipher_key: &LessSafeKey,
    rng: &SystemRandom,
    value: &serde_json::Value,
) -> Result<Envelope> {
    let mut iv = [0u8; NONCE_LEN];
    rng.fill(&mut iv).map_err(|_| SecretsError::config_error("Random source unavailable"))?;

    let mut in_out = serde_json::to_vec(&Wrapper { json_wrapper: value.clone() })?;
    let tag = cipher_key
        .seal_in_place_separate_tag(Nonce::assume_unique_for_key(iv), Aad::empty(), &mut in_out)
        .map_err(|_| SecretsError::config_error("Item encryption failed"))?;

    Ok(Envelope {
        encrypted_data: STANDARD.encode(&in_out),
        iv: STANDARD.encode(iv),
        auth_tag: STANDARD.encode(tag.as_ref()),
        version: ENVELOPE_VERSION,
        cipher: ENVELOPE_CIPHER.to_string(),
    })
}

// Envelopes written by other tools wrap base64 at 60 columns.
fn decode_base64(key: &str, field: &str, encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| SecretsError::decryption(key, format!("{} is not base64: {}", field, e)))
}
