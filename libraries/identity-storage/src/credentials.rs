//! Credential schemes deciding how passwords are persisted and compared

use identity_core::{CredentialScheme, IdentityError, Result};

/// Stores passwords verbatim and compares by equality.
///
/// Matches rows written by the legacy service. Not for new deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextScheme;

impl CredentialScheme for PlaintextScheme {
    fn name(&self) -> &'static str {
        "plaintext"
    }

    fn seal(&self, password: &str) -> Result<String> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool> {
        Ok(password == stored)
    }
}

/// Stores bcrypt hashes
#[derive(Debug, Clone, Copy)]
pub struct BcryptScheme {
    cost: u32,
}

impl BcryptScheme {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptScheme {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl CredentialScheme for BcryptScheme {
    fn name(&self) -> &'static str {
        "bcrypt"
    }

    fn seal(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.cost).map_err(|e| IdentityError::internal(e.to_string()))
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool> {
        match bcrypt::verify(password, stored) {
            Ok(matches) => Ok(matches),
            // A row written before hashing was enabled cannot match
            Err(e) => {
                tracing::warn!("Stored credential is not a bcrypt hash: {}", e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_round_trip() {
        let scheme = PlaintextScheme;
        let stored = scheme.seal("test").unwrap();
        assert_eq!(stored, "test");
        assert!(scheme.verify("test", &stored).unwrap());
        assert!(!scheme.verify("Test", &stored).unwrap());
    }

    #[test]
    fn test_bcrypt_hashes_and_verifies() {
        let scheme = BcryptScheme::new(4);
        let stored = scheme.seal("my_secure_password").unwrap();

        assert_ne!(stored, "my_secure_password");
        assert!(scheme.verify("my_secure_password", &stored).unwrap());
        assert!(!scheme.verify("wrong_password", &stored).unwrap());
    }

    #[test]
    fn test_bcrypt_rejects_legacy_plaintext_rows() {
        let scheme = BcryptScheme::new(4);
        assert!(!scheme.verify("test", "test").unwrap());
    }
}
