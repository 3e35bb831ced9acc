//! Signature verification against certificates minted with rcgen

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    EcdsaKeyPair, EcdsaSigningAlgorithm, KeyPair as _, ECDSA_P256_SHA256_ASN1_SIGNING,
    ECDSA_P384_SHA384_ASN1_SIGNING,
};
use rektor_crypto::{
    extract_public_key, parse_certificate_info, verify_signature, Error, SigningScheme,
};
use rstest::rstest;

struct Signer {
    cert_pem: String,
    cert_der: Vec<u8>,
    key: EcdsaKeyPair,
}

impl Signer {
    fn sign(&self, data: &[u8]) -> Vec<u8> {
        self.key
            .sign(&SystemRandom::new(), data)
            .unwrap()
            .as_ref()
            .to_vec()
    }
}

fn signing_algorithm(scheme: SigningScheme) -> &'static EcdsaSigningAlgorithm {
    match scheme {
        SigningScheme::EcdsaP256Sha256 => &ECDSA_P256_SHA256_ASN1_SIGNING,
        SigningScheme::EcdsaP384Sha384 => &ECDSA_P384_SHA384_ASN1_SIGNING,
        other => panic!("no ECDSA signer for {}", other),
    }
}

fn signer(algorithm: &'static rcgen::SignatureAlgorithm, scheme: SigningScheme) -> Signer {
    let key_pair = rcgen::KeyPair::generate_for(algorithm).unwrap();
    let mut params = rcgen::CertificateParams::new(vec!["signer.example".to_string()]).unwrap();
    params
        .subject_alt_names
        .push(rcgen::SanType::Rfc822Name("signer@example.com".try_into().unwrap()));
    let cert = params.self_signed(&key_pair).unwrap();

    Signer {
        cert_pem: cert.pem(),
        cert_der: cert.der().to_vec(),
        key: EcdsaKeyPair::from_pkcs8(signing_algorithm(scheme), &key_pair.serialize_der())
            .unwrap(),
    }
}

fn p256_signer() -> Signer {
    signer(&rcgen::PKCS_ECDSA_P256_SHA256, SigningScheme::EcdsaP256Sha256)
}

#[rstest]
#[case(&rcgen::PKCS_ECDSA_P256_SHA256, SigningScheme::EcdsaP256Sha256)]
#[case(&rcgen::PKCS_ECDSA_P384_SHA384, SigningScheme::EcdsaP384Sha384)]
fn test_signature_verifies_under_certificate(
    #[case] algorithm: &'static rcgen::SignatureAlgorithm,
    #[case] scheme: SigningScheme,
) {
    let signer = signer(algorithm, scheme);
    let artifact = b"hello, transparency log";
    let signature = signer.sign(artifact);

    let from_pem = extract_public_key(signer.cert_pem.as_bytes()).unwrap();
    let from_der = extract_public_key(&signer.cert_der).unwrap();
    assert_eq!(from_pem, from_der);
    assert_eq!(from_pem.scheme(), scheme);

    assert!(verify_signature(&signature, &from_pem, artifact).is_ok());
}

#[test]
fn test_any_signature_bit_flip_is_rejected() {
    let signer = p256_signer();
    let artifact = b"artifact contents";
    let signature = signer.sign(artifact);
    let key = extract_public_key(signer.cert_pem.as_bytes()).unwrap();

    for byte in 0..signature.len() {
        for bit in 0..8 {
            let mut flipped = signature.clone();
            flipped[byte] ^= 1 << bit;
            let result = verify_signature(&flipped, &key, artifact);
            assert!(
                matches!(result, Err(Error::SignatureInvalid(_))),
                "flipping bit {} of byte {} was accepted",
                bit,
                byte
            );
        }
    }
}

#[test]
fn test_modified_artifact_is_rejected() {
    let signer = p256_signer();
    let signature = signer.sign(b"artifact contents");
    let key = extract_public_key(&signer.cert_der).unwrap();

    let result = verify_signature(&signature, &key, b"artifact contentz");
    assert!(matches!(result, Err(Error::SignatureInvalid(_))));
}

#[test]
fn test_signature_from_other_key_is_rejected() {
    let signer = p256_signer();
    let other = p256_signer();
    let signature = other.sign(b"artifact");
    let key = extract_public_key(&signer.cert_der).unwrap();

    let result = verify_signature(&signature, &key, b"artifact");
    assert!(matches!(result, Err(Error::SignatureInvalid(_))));
}

#[test]
fn test_empty_signature_is_a_verification_error() {
    let signer = p256_signer();
    let key = extract_public_key(&signer.cert_der).unwrap();
    let result = verify_signature(&[], &key, b"artifact");
    assert!(matches!(result, Err(Error::Verification(_))));
}

#[test]
fn test_corrupted_certificate_is_rejected() {
    let signer = p256_signer();
    let mut der = signer.cert_der.clone();
    der.truncate(der.len() / 2);
    assert!(matches!(
        extract_public_key(&der),
        Err(Error::InvalidCertificate(_))
    ));
}

#[test]
fn test_certificate_info() {
    let signer = p256_signer();
    let info = parse_certificate_info(signer.cert_pem.as_bytes()).unwrap();

    assert_eq!(info.identity.as_deref(), Some("signer@example.com"));
    assert!(info.not_before < info.not_after);
    assert_eq!(info.public_key.scheme(), SigningScheme::EcdsaP256Sha256);
    let expected: &[u8] = signer.key.public_key().as_ref();
    assert_eq!(info.public_key.key_bytes(), expected);
}
