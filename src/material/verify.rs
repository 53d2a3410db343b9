//! Checks whether an existing certificate may be reused.

use rsa::traits::PublicKeyParts;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

use super::keygen::parse_private_key;
use super::spec::ServerName;
use crate::errors::{MaterialError, Result};

/// True when `cert_pem` is bound to `key_pem` and names exactly `hostname`.
///
/// A certificate is reusable only if all of the following hold:
///
/// - its public key is RSA with the same modulus as the private key
/// - its subject is a single `CN` equal to `hostname`, ignoring ASCII case
/// - its issuer is a single `CN` equal to `hostname`, ignoring ASCII case
///
/// Validity dates, signature and extensions are not checked. A malformed
/// key is a [`MaterialError::KeyParse`], a malformed certificate a
/// [`MaterialError::CertParse`].
pub fn verify(key_pem: &[u8], cert_pem: &[u8], hostname: &ServerName) -> Result<bool> {
    let key = parse_private_key(key_pem)?;

    let (_, pem) = x509_parser::pem::parse_x509_pem(cert_pem)
        .map_err(|e| MaterialError::cert_parse(format!("invalid PEM: {}", e)))?;
    let (_, cert) = X509Certificate::from_der(&pem.contents)
        .map_err(|e| MaterialError::cert_parse(format!("invalid X.509: {}", e)))?;

    let key_modulus = key.n().to_bytes_be();
    let cert_modulus = match cert.public_key().parsed() {
        Ok(PublicKey::RSA(rsa)) => rsa.modulus,
        _ => return Ok(false),
    };

    if strip_leading_zeros(cert_modulus) != strip_leading_zeros(&key_modulus) {
        return Ok(false);
    }

    Ok(is_sole_common_name(cert.subject(), hostname)
        && is_sole_common_name(cert.issuer(), hostname))
}

// Names compare like canonical X.509 names: ASCII case is folded.
fn is_sole_common_name(name: &X509Name<'_>, hostname: &ServerName) -> bool {
    if name.iter_attributes().count() != 1 {
        return false;
    }

    let mut common_names = name.iter_common_name();
    match (common_names.next(), common_names.next()) {
        (Some(cn), None) => {
            cn.as_str().map(|cn| cn.eq_ignore_ascii_case(hostname.as_str())).unwrap_or(false)
        }
        _ => false,
    }
}

// DER integers carry a leading zero when the high bit is set.
fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}
