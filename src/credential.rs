//! Participant secrets: one-way hashing, verification, and server-issued secrets.
use crate::config::CredentialConfig;
use crate::error::CredentialError;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::RngCore;
use std::fmt;

pub trait CredentialService: Send + Sync {
    fn hash_secret(&self, secret: &str) -> Result<String, CredentialError>;
    fn verify_secret(&self, secret: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// A plaintext secret generated by the server. Handed to the caller once and
/// never stored; `Debug` does not print it.
pub struct IssuedSecret(String);

impl IssuedSecret {
    pub fn generate(bytes: usize) -> Self {
        let mut buf = vec![0u8; bytes];
        rand::thread_rng().fill_bytes(&mut buf);
        Self(hex::encode(buf))
    }
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IssuedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IssuedSecret(..)")
    }
}

/// Argon2id hashes in PHC string format, with an optional server-side pepper
/// prepended to every secret.
pub struct Argon2Credentials {
    argon2: Argon2<'static>,
    pepper: Option<String>,
}

impl Argon2Credentials {
    pub fn new(config: &CredentialConfig) -> Result<Self, CredentialError> {
        let params = argon2::Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| CredentialError::Params(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
            pepper: config.pepper.clone(),
        })
    }

    fn peppered(&self, secret: &str) -> Vec<u8> {
        match &self.pepper {
            Some(p) => format!("{p}{secret}").into_bytes(),
            None => secret.as_bytes().to_vec(),
        }
    }
}

impl CredentialService for Argon2Credentials {
    fn hash_secret(&self, secret: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(&self.peppered(secret), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn verify_secret(&self, secret: &str, hash: &str) -> Result<bool, CredentialError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;

        match self.argon2.verify_password(&self.peppered(secret), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::MalformedHash(e.to_string())),
        }
    }
}
