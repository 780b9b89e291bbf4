//! Password hashing filter

use crate::config::{Config, PasswordAlgorithm};
use crate::core::value::to_text;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde_json::Value;

/// Filter: derive a salted password hash with the configured algorithm
///
/// The algorithm and cost are captured from `config` when the filter is
/// built, so a later reconfiguration only affects filters built afterwards.
pub fn password_hash(
    config: &Config,
) -> impl Fn(Value) -> Result<Value, String> + Send + Sync + Clone + 'static {
    let algorithm = config.password_algorithm;
    let cost = config.password_cost;
    move |value: Value| {
        let password = to_text(&value);
        let hash = match algorithm {
            PasswordAlgorithm::Bcrypt => hash_bcrypt(&password, cost)?,
            PasswordAlgorithm::Argon2id => hash_argon2id(&password, cost)?,
        };
        Ok(Value::String(hash))
    }
}

fn hash_bcrypt(password: &str, cost: u32) -> Result<String, String> {
    let parts = bcrypt::hash_with_result(password, cost).map_err(|e| e.to_string())?;
    Ok(parts.format_for_version(bcrypt::Version::TwoY))
}

fn hash_argon2id(password: &str, cost: u32) -> Result<String, String> {
    let params = Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)
        .map_err(|e| e.to_string())?;
    let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| e.to_string())?;

    hasher
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::PasswordVerifier;
    use argon2::password_hash::PasswordHash;
    use serde_json::json;

    fn config(algorithm: PasswordAlgorithm, cost: u32) -> Config {
        Config {
            password_algorithm: algorithm,
            password_cost: cost,
            ..Config::default()
        }
    }

    #[test]
    fn test_bcrypt_hash_verifies() {
        let f = password_hash(&config(PasswordAlgorithm::Bcrypt, 4));
        let hash = f(json!("hunter22")).unwrap();
        let hash = hash.as_str().unwrap();

        assert!(hash.starts_with("$2y$04$"));
        assert!(bcrypt::verify("hunter22", hash).unwrap());
        assert!(!bcrypt::verify("hunter23", hash).unwrap());
    }

    #[test]
    fn test_bcrypt_hashes_are_salted() {
        let f = password_hash(&config(PasswordAlgorithm::Bcrypt, 4));
        assert_ne!(f(json!("same")).unwrap(), f(json!("same")).unwrap());
    }

    #[test]
    fn test_bcrypt_invalid_cost_is_an_error() {
        let f = password_hash(&config(PasswordAlgorithm::Bcrypt, 2));
        assert!(f(json!("pw")).is_err());
    }

    #[test]
    fn test_argon2id_hash_verifies() {
        let f = password_hash(&config(PasswordAlgorithm::Argon2id, 1));
        let hash = f(json!("correct horse")).unwrap();
        let hash = hash.as_str().unwrap();

        assert!(hash.starts_with("$argon2id$"));
        let parsed = PasswordHash::new(hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse", &parsed)
                .is_ok()
        );
    }
}
