//! Password storage and comparison.
//!
//! KNOWN WEAKNESS: the default scheme stores and compares passwords in clear
//! text. Every write goes through [`PasswordScheme::prepare`] and every check
//! through [`verify`], so switching the configured scheme to `argon2` is the
//! only change needed to stop storing plaintext.

use std::str::FromStr;

use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// How newly registered passwords are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    #[default]
    Plaintext,
    Argon2,
}

impl PasswordScheme {
    /// Value written to the `users.password` column.
    pub fn prepare(self, password: &str) -> Result<String> {
        match self {
            PasswordScheme::Plaintext => Ok(password.to_string()),
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| anyhow!("Password hashing failed: {}", e))?;
                Ok(hash.to_string())
            }
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(PasswordScheme::Plaintext),
            "argon2" | "argon2id" => Ok(PasswordScheme::Argon2),
            other => Err(anyhow!("Unknown password scheme: {}", other)),
        }
    }
}

/// Check a submitted password against the stored column value.
///
/// Argon2 PHC strings are verified as hashes; anything else is compared for
/// exact equality, which keeps rows written under the plaintext scheme valid.
pub fn verify(stored: &str, submitted: &str) -> bool {
    if stored.starts_with("$argon2") {
        return match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(submitted.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        };
    }

    stored == submitted
}
