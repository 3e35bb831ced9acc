//! Signature verification using aws-lc-rs

use crate::error::{Error, Result};
use aws_lc_rs::signature::{
    UnparsedPublicKey, VerificationAlgorithm, ECDSA_P256_SHA256_ASN1, ECDSA_P384_SHA384_ASN1,
    ED25519, RSA_PKCS1_2048_8192_SHA256,
};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1};
use const_oid::db::rfc8410::ID_ED_25519;
use const_oid::ObjectIdentifier;
use spki::{AlgorithmIdentifierRef, SubjectPublicKeyInfoRef};

/// Signature algorithms a [`PublicKey`] can verify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningScheme {
    /// ECDSA P-256 with SHA-256
    EcdsaP256Sha256,
    /// ECDSA P-384 with SHA-384
    EcdsaP384Sha384,
    Ed25519,
    /// RSA PKCS#1 v1.5 with SHA-256
    RsaPkcs1Sha256,
}

impl SigningScheme {
    pub fn name(&self) -> &'static str {
        match self {
            SigningScheme::EcdsaP256Sha256 => "ECDSA_P256_SHA256",
            SigningScheme::EcdsaP384Sha384 => "ECDSA_P384_SHA384",
            SigningScheme::Ed25519 => "ED25519",
            SigningScheme::RsaPkcs1Sha256 => "RSA_PKCS1_SHA256",
        }
    }
}

impl std::fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A public key ready for verification
///
/// Holds the DER-encoded SubjectPublicKeyInfo (needed for checkpoint key
/// hints) alongside the raw key bytes aws-lc-rs consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    spki_der: Vec<u8>,
    key_bytes: Vec<u8>,
    scheme: SigningScheme,
}

impl PublicKey {
    /// Parse a DER-encoded SubjectPublicKeyInfo
    ///
    /// Fails with [`Error::UnsupportedAlgorithm`] for key types other than
    /// EC P-256/P-384, Ed25519 and RSA, and with [`Error::InvalidKey`] when the
    /// key bytes cannot belong to the declared algorithm.
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let spki = SubjectPublicKeyInfoRef::try_from(der)
            .map_err(|e| Error::InvalidKey(format!("failed to parse SPKI: {}", e)))?;
        let scheme = signing_scheme_for(&spki.algorithm)?;
        let key_bytes = spki.subject_public_key.raw_bytes().to_vec();
        check_key_material(scheme, &key_bytes)?;

        Ok(Self {
            spki_der: der.to_vec(),
            key_bytes,
            scheme,
        })
    }

    /// Parse a PEM `PUBLIC KEY` block
    pub fn from_pem(text: &str) -> Result<Self> {
        let block = pem::parse(text)?;
        if block.tag() != "PUBLIC KEY" {
            return Err(Error::Pem(format!(
                "expected PUBLIC KEY block, found {}",
                block.tag()
            )));
        }
        Self::from_spki_der(block.contents())
    }

    pub fn spki_der(&self) -> &[u8] {
        &self.spki_der
    }

    pub fn key_bytes(&self) -> &[u8] {
        &self.key_bytes
    }

    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }

    /// Verify a signature over `data`, hashing it as the scheme requires
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        if signature.is_empty() {
            return Err(Error::Verification("signature is empty".to_string()));
        }

        let algorithm: &'static dyn VerificationAlgorithm = match self.scheme {
            SigningScheme::EcdsaP256Sha256 => &ECDSA_P256_SHA256_ASN1,
            SigningScheme::EcdsaP384Sha384 => &ECDSA_P384_SHA384_ASN1,
            SigningScheme::Ed25519 => &ED25519,
            SigningScheme::RsaPkcs1Sha256 => &RSA_PKCS1_2048_8192_SHA256,
        };

        UnparsedPublicKey::new(algorithm, &self.key_bytes)
            .verify(data, signature)
            .map_err(|_| Error::SignatureInvalid(format!("{} signature invalid", self.scheme)))
    }
}

/// Verify `signature` over `data` with `public_key`
pub fn verify_signature(signature: &[u8], public_key: &PublicKey, data: &[u8]) -> Result<()> {
    let result = public_key.verify(data, signature);
    tracing::debug!(
        scheme = %public_key.scheme(),
        valid = result.is_ok(),
        "verified signature"
    );
    result
}

/// Determine the signing scheme from the SPKI algorithm identifier
fn signing_scheme_for(algorithm: &AlgorithmIdentifierRef<'_>) -> Result<SigningScheme> {
    let oid = algorithm.oid;

    if oid == ID_EC_PUBLIC_KEY {
        let params = algorithm.parameters.as_ref().ok_or_else(|| {
            Error::UnsupportedAlgorithm("EC key missing curve parameters".to_string())
        })?;
        let curve = ObjectIdentifier::from_bytes(params.value())
            .map_err(|e| Error::InvalidKey(format!("failed to parse EC curve OID: {}", e)))?;

        if curve == SECP_256_R_1 {
            Ok(SigningScheme::EcdsaP256Sha256)
        } else if curve == SECP_384_R_1 {
            Ok(SigningScheme::EcdsaP384Sha384)
        } else {
            tracing::warn!(%curve, "rejecting key on unsupported EC curve");
            Err(Error::UnsupportedAlgorithm(format!("EC curve {}", curve)))
        }
    } else if oid == ID_ED_25519 {
        Ok(SigningScheme::Ed25519)
    } else if oid == RSA_ENCRYPTION {
        // PKCS#1 v1.5 is the only RSA padding Rekor entries use
        Ok(SigningScheme::RsaPkcs1Sha256)
    } else {
        tracing::warn!(%oid, "rejecting key with unsupported algorithm");
        Err(Error::UnsupportedAlgorithm(format!("public key algorithm {}", oid)))
    }
}

fn check_key_material(scheme: SigningScheme, key: &[u8]) -> Result<()> {
    let ok = match scheme {
        SigningScheme::EcdsaP256Sha256 => is_ec_point(key, 32),
        SigningScheme::EcdsaP384Sha384 => is_ec_point(key, 48),
        SigningScheme::Ed25519 => key.len() == 32,
        // RSAPublicKey is a DER SEQUENCE
        SigningScheme::RsaPkcs1Sha256 => key.first() == Some(&0x30),
    };

    if ok {
        Ok(())
    } else {
        Err(Error::InvalidKey(format!(
            "{}-byte key does not match {}",
            key.len(),
            scheme
        )))
    }
}

/// SEC1 uncompressed (0x04 || X || Y) or compressed (0x02/0x03 || X) point
fn is_ec_point(key: &[u8], field_len: usize) -> bool {
    match key.first() {
        Some(0x04) => key.len() == 1 + 2 * field_len,
        Some(0x02) | Some(0x03) => key.len() == 1 + field_len,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::KeyPair;

    fn public_key(kp: &KeyPair) -> PublicKey {
        PublicKey::from_spki_der(&kp.public_key_to_der().unwrap()).unwrap()
    }

    #[test]
    fn test_verify_ecdsa_p256() {
        let kp = KeyPair::generate_ecdsa_p256().unwrap();
        let sig = kp.sign(b"test data").unwrap();
        let key = public_key(&kp);
        assert_eq!(key.scheme(), SigningScheme::EcdsaP256Sha256);
        assert!(verify_signature(&sig, &key, b"test data").is_ok());
    }

    #[test]
    fn test_verify_ed25519() {
        let kp = KeyPair::generate_ed25519().unwrap();
        let sig = kp.sign(b"test data").unwrap();
        let key = public_key(&kp);
        assert_eq!(key.scheme(), SigningScheme::Ed25519);
        assert!(verify_signature(&sig, &key, b"test data").is_ok());
    }

    #[test]
    fn test_verify_wrong_data() {
        let kp = KeyPair::generate_ecdsa_p384().unwrap();
        let sig = kp.sign(b"test data").unwrap();
        let result = verify_signature(&sig, &public_key(&kp), b"wrong data");
        assert!(matches!(result, Err(Error::SignatureInvalid(_))));
    }

    #[test]
    fn test_verify_empty_signature() {
        let kp = KeyPair::generate_ecdsa_p256().unwrap();
        let result = verify_signature(&[], &public_key(&kp), b"test data");
        assert!(matches!(result, Err(Error::Verification(_))));
    }

    #[test]
    fn test_verify_garbage_signature() {
        let kp = KeyPair::generate_ed25519().unwrap();
        let result = verify_signature(&[0u8; 64], &public_key(&kp), b"test data");
        assert!(matches!(result, Err(Error::SignatureInvalid(_))));
    }

    #[test]
    fn test_key_material_must_match_curve() {
        // A P-384 point labelled as P-256
        let p384 = KeyPair::generate_ecdsa_p384().unwrap();
        let mut der = KeyPair::generate_ecdsa_p256()
            .unwrap()
            .public_key_to_der()
            .unwrap();
        // Re-encode the P-256 SPKI with the P-384 point
        let spki = SubjectPublicKeyInfoRef::try_from(der.as_slice()).unwrap();
        let forged = spki::SubjectPublicKeyInfoOwned {
            algorithm: spki::AlgorithmIdentifierOwned {
                oid: spki.algorithm.oid,
                parameters: spki.algorithm.parameters.map(Into::into),
            },
            subject_public_key: der::asn1::BitString::from_bytes(p384.public_key_bytes()).unwrap(),
        };
        der = der::Encode::to_der(&forged).unwrap();

        assert!(matches!(
            PublicKey::from_spki_der(&der),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_from_pem_roundtrip() {
        let kp = KeyPair::generate_ecdsa_p256().unwrap();
        let der = kp.public_key_to_der().unwrap();
        let block = pem::encode(&pem::Pem::new("PUBLIC KEY", der.clone()));
        let key = PublicKey::from_pem(&block).unwrap();
        assert_eq!(key.spki_der(), der.as_slice());
        assert_eq!(key.key_bytes(), kp.public_key_bytes());
    }

    #[test]
    fn test_from_pem_wrong_tag() {
        let block = pem::encode(&pem::Pem::new("PRIVATE KEY", vec![1, 2, 3]));
        assert!(matches!(PublicKey::from_pem(&block), Err(Error::Pem(_))));
    }
}
