use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::AuthConfig;

fn hasher(config: &AuthConfig) -> Result<Argon2<'static>, argon2::Error> {
    let params = Params::new(
        config.argon2_memory_kib,
        config.argon2_iterations,
        Params::DEFAULT_P_COST,
        None,
    )?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password into a PHC string.
pub fn hash_password(password: &str, config: &AuthConfig) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = hasher(config).map_err(|e| anyhow::anyhow!(e))?;
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string. The parameters embedded in
/// the hash win over the configured ones.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!(e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
