//! Key pairs for producing signatures and checkpoint notes
//!
//! Only compiled for tests and the `test-support` feature; verification
//! never needs a private key.

use crate::error::{Error, Result};
use crate::verification::SigningScheme;
use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, Ed25519KeyPair, KeyPair as AwsKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
        ECDSA_P384_SHA384_ASN1_SIGNING,
    },
};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1};
use const_oid::db::rfc8410::ID_ED_25519;
use der::asn1::BitString;
use der::Encode;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

/// An ECDSA or Ed25519 signing key
pub enum KeyPair {
    EcdsaP256(EcdsaKeyPair),
    EcdsaP384(EcdsaKeyPair),
    Ed25519(Ed25519KeyPair),
}

impl KeyPair {
    pub fn generate_ecdsa_p256() -> Result<Self> {
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &SystemRandom::new())?;
        Self::from_pkcs8(SigningScheme::EcdsaP256Sha256, pkcs8.as_ref())
    }

    pub fn generate_ecdsa_p384() -> Result<Self> {
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, &SystemRandom::new())?;
        Self::from_pkcs8(SigningScheme::EcdsaP384Sha384, pkcs8.as_ref())
    }

    pub fn generate_ed25519() -> Result<Self> {
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&SystemRandom::new())?;
        Self::from_pkcs8(SigningScheme::Ed25519, pkcs8.as_ref())
    }

    /// Load a key pair from an unencrypted PKCS#8 document
    pub fn from_pkcs8(scheme: SigningScheme, pkcs8: &[u8]) -> Result<Self> {
        Ok(match scheme {
            SigningScheme::EcdsaP256Sha256 => KeyPair::EcdsaP256(EcdsaKeyPair::from_pkcs8(
                &ECDSA_P256_SHA256_ASN1_SIGNING,
                pkcs8,
            )?),
            SigningScheme::EcdsaP384Sha384 => KeyPair::EcdsaP384(EcdsaKeyPair::from_pkcs8(
                &ECDSA_P384_SHA384_ASN1_SIGNING,
                pkcs8,
            )?),
            SigningScheme::Ed25519 => KeyPair::Ed25519(Ed25519KeyPair::from_pkcs8(pkcs8)?),
            SigningScheme::RsaPkcs1Sha256 => {
                return Err(Error::UnsupportedAlgorithm(
                    "RSA signing keys are not supported".to_string(),
                ))
            }
        })
    }

    /// Uncompressed EC point or 32-byte Ed25519 key
    pub fn public_key_bytes(&self) -> &[u8] {
        match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => kp.public_key().as_ref(),
            KeyPair::Ed25519(kp) => kp.public_key().as_ref(),
        }
    }

    /// Sign `data`; ECDSA signatures are ASN.1 DER
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => {
                Ok(kp.sign(&SystemRandom::new(), data)?.as_ref().to_vec())
            }
            KeyPair::Ed25519(kp) => Ok(kp.sign(data).as_ref().to_vec()),
        }
    }

    /// Public key as DER-encoded SubjectPublicKeyInfo
    pub fn public_key_to_der(&self) -> Result<Vec<u8>> {
        let algorithm = match self {
            KeyPair::EcdsaP256(_) => AlgorithmIdentifierOwned {
                oid: ID_EC_PUBLIC_KEY,
                parameters: Some(der::Any::encode_from(&SECP_256_R_1)?),
            },
            KeyPair::EcdsaP384(_) => AlgorithmIdentifierOwned {
                oid: ID_EC_PUBLIC_KEY,
                parameters: Some(der::Any::encode_from(&SECP_384_R_1)?),
            },
            KeyPair::Ed25519(_) => AlgorithmIdentifierOwned {
                oid: ID_ED_25519,
                parameters: None,
            },
        };

        SubjectPublicKeyInfoOwned {
            algorithm,
            subject_public_key: BitString::from_bytes(self.public_key_bytes())?,
        }
        .to_der()
        .map_err(Into::into)
    }
}
