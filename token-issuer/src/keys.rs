//! RS256 keystore and JWKS publication.

use crate::error::IssuerError;
use crate::token::TokenDraft;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::debug;
use rsa::pkcs8::EncodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde::Serialize;
use std::sync::RwLock;
use uuid::Uuid;

const RSA_BITS: usize = 2048;

/// Public half of a signing key, in JWK form (RFC 7517).
#[derive(Debug, Clone, Serialize)]
pub struct Jwk {
    pub kty: String,
    pub alg: String,
    #[serde(rename = "use")]
    pub use_: String,
    pub kid: String,
    pub n: String,
    pub e: String,
}

/// JWK set served at the issuer's `/jwks` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

struct SigningKey {
    kid: String,
    encoding_key: EncodingKey,
    jwk: Jwk,
}

/// In-memory RS256 keystore.
///
/// Keys live for the lifetime of the issuer instance; nothing is persisted.
/// The newest key signs; all keys stay published in the JWKS so previously
/// issued tokens remain verifiable.
#[derive(Default)]
pub struct Keystore {
    keys: RwLock<Vec<SigningKey>>,
}

impl Keystore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().expect("keystore lock poisoned").is_empty()
    }

    /// Generate an RS256 key only if the keystore is empty. Idempotent.
    pub fn ensure_rs256(&self) -> Result<(), IssuerError> {
        if self.is_empty() {
            self.generate_rs256()?;
        }
        Ok(())
    }

    /// Generate and store a fresh 2048-bit RS256 signing key.
    pub fn generate_rs256(&self) -> Result<(), IssuerError> {
        let private = RsaPrivateKey::new(&mut rsa::rand_core::OsRng, RSA_BITS)
            .map_err(|e| IssuerError::KeyGeneration(e.to_string()))?;
        let pem = private
            .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
            .map_err(|e| IssuerError::KeyGeneration(e.to_string()))?;
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| IssuerError::KeyGeneration(e.to_string()))?;

        let public = private.to_public_key();
        let kid = Uuid::new_v4().to_string();
        let jwk = Jwk {
            kty: "RSA".to_string(),
            alg: "RS256".to_string(),
            use_: "sig".to_string(),
            kid: kid.clone(),
            n: URL_SAFE_NO_PAD.encode(public.n().to_bytes_be()),
            e: URL_SAFE_NO_PAD.encode(public.e().to_bytes_be()),
        };

        debug!("Generated RS256 signing key kid={}", kid);
        self.keys
            .write()
            .expect("keystore lock poisoned")
            .push(SigningKey {
                kid,
                encoding_key,
                jwk,
            });
        Ok(())
    }

    /// Public keys of the keystore as a JWK set.
    pub fn jwks(&self) -> Jwks {
        Jwks {
            keys: self
                .keys
                .read()
                .expect("keystore lock poisoned")
                .iter()
                .map(|key| key.jwk.clone())
                .collect(),
        }
    }

    /// Sign a draft's payload as a compact JWT with the newest key.
    pub fn sign(&self, draft: &TokenDraft) -> Result<String, IssuerError> {
        let keys = self.keys.read().expect("keystore lock poisoned");
        let key = keys.last().ok_or(IssuerError::NoSigningKey)?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(key.kid.clone());
        jsonwebtoken::encode(&header, &draft.payload, &key.encoding_key)
            .map_err(|e| IssuerError::Signing(e.to_string()))
    }
}
