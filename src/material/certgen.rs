//! Self-signed certificate generation.
//!
//! Issues a single X.509 v3 leaf for one common name:
//!
//! - subject = issuer = `CN=<hostname>`
//! - random positive serial of at most 20 octets
//! - valid from now for [`VALIDITY_DAYS`] days
//! - basicConstraints `CA:TRUE` (critical)
//! - subjectKeyIdentifier, and an authorityKeyIdentifier carrying the key
//!   identifier, the issuer name and the serial
//! - signed with SHA-256 by the given RSA key

use rand::RngCore;
use rcgen::{
    BasicConstraints, CertificateParams, CustomExtension, DistinguishedName, DnType, IsCa,
    KeyIdMethod, KeyPair, SerialNumber, PKCS_RSA_SHA256,
};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use sha2::{Digest, Sha256};
use simple_asn1::{oid, to_der, ASN1Block, ASN1Class, BigInt, BigUint};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::keygen::parse_private_key;
use super::spec::ServerName;
use crate::errors::{MaterialError, Result};

/// Ten years of 365 days.
pub const VALIDITY_DAYS: i64 = 3650;

const SERIAL_BYTES: usize = 20;

const KEY_ID_BYTES: usize = 20;

const AUTHORITY_KEY_IDENTIFIER_OID: &[u64] = &[2, 5, 29, 35];

/// Generate a self-signed certificate for `hostname`, returned as PEM.
///
/// Fails with [`MaterialError::KeyParse`] if `key_pem` is not an RSA private key.
pub fn generate_self_signed(key_pem: &[u8], hostname: &ServerName) -> Result<Vec<u8>> {
    let key_pair = signing_key_pair(key_pem)?;
    let key_id = key_identifier(&key_pair);
    let serial = random_serial();

    let mut params = CertificateParams::default();
    params.distinguished_name = common_name(hostname);
    params.serial_number = Some(SerialNumber::from_slice(&serial));
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_identifier_method = KeyIdMethod::PreSpecified(key_id.clone());
    params.custom_extensions.push(authority_key_identifier(&key_id, hostname, &serial)?);

    let not_before = OffsetDateTime::now_utc();
    let not_after = not_before + Duration::days(VALIDITY_DAYS);
    params.not_before = not_before;
    params.not_after = not_after;

    let cert = params
        .self_signed(&key_pair)
        .map_err(|e| MaterialError::generation(format!("certificate signing failed: {}", e)))?;

    debug!(server_name = %hostname, not_after = %not_after, "Generated self-signed certificate");

    Ok(cert.pem().into_bytes())
}

// rcgen's ring backend only loads RSA keys from PKCS#8.
fn signing_key_pair(key_pem: &[u8]) -> Result<KeyPair> {
    let key = parse_private_key(key_pem)?;
    let pkcs8 = key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| MaterialError::key_parse(format!("cannot re-encode key: {}", e)))?;

    KeyPair::from_pem_and_sign_algo(&pkcs8, &PKCS_RSA_SHA256)
        .map_err(|e| MaterialError::key_parse(format!("key unusable for signing: {}", e)))
}

fn common_name(hostname: &ServerName) -> DistinguishedName {
    let mut name = DistinguishedName::new();
    name.push(DnType::CommonName, hostname.as_str());
    name
}

// Same value rcgen's `KeyIdMethod::Sha256` derives, computed up front so the
// authority key identifier can repeat it.
fn key_identifier(key_pair: &KeyPair) -> Vec<u8> {
    Sha256::digest(key_pair.public_key_der())[..KEY_ID_BYTES].to_vec()
}

// Top bit cleared keeps the DER INTEGER positive within 20 octets.
fn random_serial() -> [u8; SERIAL_BYTES] {
    let mut bytes = [0u8; SERIAL_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes[0] &= 0x7f;
    bytes
}

/// `authorityKeyIdentifier = keyid:always,issuer:always` for a self-signed
/// certificate: the issuer is the subject and the serial is the certificate's own.
///
/// The context tags are IMPLICIT, except `directoryName`, which wraps a
/// CHOICE and is therefore explicit.
fn authority_key_identifier(
    key_id: &[u8],
    hostname: &ServerName,
    serial: &[u8],
) -> Result<CustomExtension> {
    let issuer = ASN1Block::Sequence(
        0,
        vec![ASN1Block::Set(
            0,
            vec![ASN1Block::Sequence(
                0,
                vec![
                    ASN1Block::ObjectIdentifier(0, oid!(2, 5, 4, 3)),
                    ASN1Block::UTF8String(0, hostname.as_str().to_string()),
                ],
            )],
        )],
    );
    let directory_name =
        ASN1Block::Explicit(ASN1Class::ContextSpecific, 0, BigUint::from(4u8), Box::new(issuer));
    let general_names = to_der(&directory_name).map_err(encode_error)?;
    let serial = BigInt::from(BigUint::from_bytes_be(serial)).to_signed_bytes_be();

    let aki = ASN1Block::Sequence(
        0,
        vec![
            context_tagged(false, 0, key_id.to_vec()),
            context_tagged(true, 1, general_names),
            context_tagged(false, 2, serial),
        ],
    );
    let content = to_der(&aki).map_err(encode_error)?;

    Ok(CustomExtension::from_oid_content(AUTHORITY_KEY_IDENTIFIER_OID, content))
}

fn context_tagged(constructed: bool, tag: u8, body: Vec<u8>) -> ASN1Block {
    ASN1Block::Unknown(ASN1Class::ContextSpecific, constructed, 0, BigUint::from(tag), body)
}

fn encode_error(e: simple_asn1::ASN1EncodeErr) -> MaterialError {
    MaterialError::generation(format!("authority key identifier encoding failed: {:?}", e))
}
