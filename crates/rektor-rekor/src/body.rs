//! Typed hashedrekord entry body
//!
//! The canonicalized body of a `hashedrekord` v0.0.1 entry records the
//! artifact digest, the signature and the signer's certificate:
//!
//! ```json
//! {
//!   "apiVersion": "0.0.1",
//!   "kind": "hashedrekord",
//!   "spec": {
//!     "data": { "hash": { "algorithm": "sha256", "value": "<hex>" } },
//!     "signature": {
//!       "content": "<base64 signature>",
//!       "publicKey": { "content": "<base64 PEM certificate>" }
//!     }
//!   }
//! }
//! ```

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use rektor_types::Sha256Hash;
use serde::{Deserialize, Serialize};

pub const HASHEDREKORD_KIND: &str = "hashedrekord";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedRekordBody {
    pub api_version: String,
    pub kind: String,
    pub spec: HashedRekordSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashedRekordSpec {
    pub data: HashedRekordData,
    pub signature: HashedRekordSignature,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashedRekordData {
    pub hash: HashValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashValue {
    pub algorithm: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedRekordSignature {
    pub content: String,
    pub public_key: PublicKeyContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyContent {
    pub content: String,
}

impl HashedRekordBody {
    /// Parse a decoded entry body, rejecting other entry kinds
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let parsed: Self = serde_json::from_slice(body)?;
        if parsed.kind != HASHEDREKORD_KIND {
            return Err(Error::InvalidResponse(format!(
                "expected {} entry, got {}",
                HASHEDREKORD_KIND, parsed.kind
            )));
        }
        Ok(parsed)
    }

    /// The logged SHA-256 digest of the artifact
    pub fn digest(&self) -> Result<Sha256Hash> {
        let hash = &self.spec.data.hash;
        if !hash.algorithm.eq_ignore_ascii_case("sha256") {
            return Err(Error::InvalidResponse(format!(
                "unsupported digest algorithm {}",
                hash.algorithm
            )));
        }
        Ok(Sha256Hash::from_hex(&hash.value)?)
    }

    /// Raw signature bytes
    pub fn signature(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.spec.signature.content)
            .map_err(|e| Error::InvalidResponse(format!("signature is not base64: {}", e)))
    }

    /// The signer's certificate (PEM text as bytes)
    pub fn certificate(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.spec.signature.public_key.content)
            .map_err(|e| Error::InvalidResponse(format!("certificate is not base64: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(kind: &str, algorithm: &str) -> String {
        format!(
            r#"{{"apiVersion":"0.0.1","kind":"{}","spec":{{"data":{{"hash":{{"algorithm":"{}","value":"2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"}}}},"signature":{{"content":"MEUCIQ==","publicKey":{{"content":"LS0tLS1CRUdJTiBDRVJUSUZJQ0FURS0tLS0t"}}}}}}}}"#,
            kind, algorithm
        )
    }

    #[test]
    fn test_parse_hashedrekord() {
        let body = HashedRekordBody::from_slice(body_json("hashedrekord", "sha256").as_bytes())
            .unwrap();
        assert_eq!(
            body.digest().unwrap().to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(body.signature().unwrap(), vec![0x30, 0x45, 0x02, 0x21]);
        assert_eq!(body.certificate().unwrap(), b"-----BEGIN CERTIFICATE-----");
    }

    #[test]
    fn test_rejects_other_kinds() {
        let result = HashedRekordBody::from_slice(body_json("intoto", "sha256").as_bytes());
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_rejects_other_digests() {
        let body =
            HashedRekordBody::from_slice(body_json("hashedrekord", "sha512").as_bytes()).unwrap();
        assert!(matches!(body.digest(), Err(Error::InvalidResponse(_))));
    }
}
