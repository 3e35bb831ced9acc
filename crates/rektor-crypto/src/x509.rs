//! X.509 certificate utilities
//!
//! Certificates arrive either PEM-armoured (as embedded in hashedrekord
//! entries) or as raw DER. Both forms are accepted everywhere.

use crate::error::{Error, Result};
use crate::verification::PublicKey;
use x509_cert::der::{Decode, Encode};
use x509_cert::Certificate;

/// Information extracted from a signing certificate
#[derive(Debug, Clone)]
pub struct CertificateInfo {
    /// Identity from the SAN extension (email or URI)
    pub identity: Option<String>,
    /// Not valid before (Unix timestamp)
    pub not_before: i64,
    /// Not valid after (Unix timestamp)
    pub not_after: i64,
    /// Subject public key
    pub public_key: PublicKey,
}

/// Extract the subject public key from a PEM or DER certificate
pub fn extract_public_key(certificate: &[u8]) -> Result<PublicKey> {
    let cert = parse_certificate(certificate)?;
    subject_public_key(&cert)
}

/// Parse identity, validity and key from a PEM or DER certificate
pub fn parse_certificate_info(certificate: &[u8]) -> Result<CertificateInfo> {
    let cert = parse_certificate(certificate)?;
    let validity = &cert.tbs_certificate.validity;

    Ok(CertificateInfo {
        identity: extract_san_identity(&cert)?,
        not_before: validity.not_before.to_unix_duration().as_secs() as i64,
        not_after: validity.not_after.to_unix_duration().as_secs() as i64,
        public_key: subject_public_key(&cert)?,
    })
}

fn parse_certificate(certificate: &[u8]) -> Result<Certificate> {
    let der = if certificate.trim_ascii_start().starts_with(b"-----BEGIN") {
        let block = pem::parse(certificate)
            .map_err(|e| Error::InvalidCertificate(format!("invalid PEM: {}", e)))?;
        if block.tag() != "CERTIFICATE" {
            return Err(Error::InvalidCertificate(format!(
                "expected CERTIFICATE block, found {}",
                block.tag()
            )));
        }
        block.into_contents()
    } else {
        certificate.to_vec()
    };

    Certificate::from_der(&der)
        .map_err(|e| Error::InvalidCertificate(format!("failed to parse certificate: {}", e)))
}

fn subject_public_key(cert: &Certificate) -> Result<PublicKey> {
    let spki_der = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| Error::InvalidCertificate(format!("failed to encode SPKI: {}", e)))?;
    PublicKey::from_spki_der(&spki_der)
}

/// Extract the email address or URI from the Subject Alternative Name extension
pub fn extract_san_identity(cert: &Certificate) -> Result<Option<String>> {
    use x509_cert::ext::pkix::name::GeneralName;
    use x509_cert::ext::pkix::SubjectAltName;

    let san: Option<(bool, SubjectAltName)> = cert
        .tbs_certificate
        .get()
        .map_err(|e| Error::InvalidCertificate(format!("failed to get SAN extension: {}", e)))?;

    let Some((_critical, san)) = san else {
        return Ok(None);
    };

    Ok(san.0.iter().find_map(|name| match name {
        GeneralName::Rfc822Name(email) => Some(email.to_string()),
        GeneralName::UniformResourceIdentifier(uri) => Some(uri.to_string()),
        _ => None,
    }))
}
