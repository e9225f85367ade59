use argon2::{
    password_hash::SaltString,
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand_core::OsRng;
use validator::ValidationError;

/// Plaintext password. `new` enforces strength rules for account creation;
/// `for_verification` skips them so login and destructive-action
/// re-confirmation can check legacy passwords against the stored hash.
#[derive(Debug, Clone)]
pub struct Password(String);

impl Password {
    pub fn for_verification(plaintext: String) -> Self {
        Self(plaintext)
    }

    pub fn new(password: String) -> Result<Self, ValidationError> {
        if password.len() < 8 || password.len() > 128 {
            let mut error = ValidationError::new("password_length");
            error.message = Some("Password must be 8-128 characters".into());
            return Err(error);
        }
        Ok(Self(password))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Argon2id hash wrapper, stored as its PHC string.
#[derive(Debug, Clone)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn from_password(password: &Password) -> Result<Self, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(Self(hash.to_string()))
    }

    pub fn verify(&self, password: &Password) -> Result<(), argon2::password_hash::Error> {
        let parsed = PasswordHash::new(&self.0)?;
        Argon2::default().verify_password(password.as_bytes(), &parsed)
    }

    /// Wrap a hash loaded from the database.
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_rejected() {
        assert!(Password::new("short".to_string()).is_err());
    }

    #[test]
    fn hash_and_verify() {
        let password = Password::new("Confirm123".to_string()).unwrap();
        let hash = HashedPassword::from_password(&password).unwrap();
        assert!(hash.verify(&password).is_ok());
        assert!(hash
            .verify(&Password::for_verification("wrong".to_string()))
            .is_err());
    }
}
