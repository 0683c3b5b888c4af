use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier as _, Version,
};

pub use argon2::password_hash::Error as PasswordHashError;

pub const DEFAULT_PASSWORD_ITERATIONS: u32 = Params::DEFAULT_T_COST;
pub const DEFAULT_PASSWORD_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;

/// Argon2id password hashes stored as PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`).
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_ITERATIONS)
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self::with_cost(DEFAULT_PASSWORD_MEMORY_KIB, iterations)
    }

    /// Out-of-range costs fall back to the argon2 defaults.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Self {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .unwrap_or_default();
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Checks `password` against a stored PHC string; the cost recorded in the hash wins.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(encoded) else {
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_are_salted() {
        let hasher = PasswordHasher::with_cost(64, 1);
        let first = hasher.hash("Password123!").expect("hash");
        let second = hasher.hash("Password123!").expect("hash");

        assert!(first.starts_with("$argon2id$v=19$m=64,t=1,p=1$"));
        assert_ne!(first, second);
        assert!(hasher.verify("Password123!", &first));
        assert!(!hasher.verify("password123!", &first));
    }

    #[test]
    fn verify_uses_the_cost_from_the_stored_hash() {
        let stored = PasswordHasher::with_cost(64, 2)
            .hash("kata-sandi-desa")
            .expect("hash");
        assert!(PasswordHasher::with_cost(128, 3).verify("kata-sandi-desa", &stored));
    }

    #[test]
    fn invalid_costs_fall_back_to_defaults() {
        let hasher = PasswordHasher::with_cost(0, 0);
        assert_eq!(hasher.params.t_cost(), DEFAULT_PASSWORD_ITERATIONS);
        assert_eq!(hasher.params.m_cost(), DEFAULT_PASSWORD_MEMORY_KIB);
    }

    #[test]
    fn malformed_hashes_never_verify() {
        let hasher = PasswordHasher::with_cost(64, 1);
        assert!(!hasher.verify("x", ""));
        assert!(!hasher.verify("x", "sha256$1$00$00"));
        assert!(!hasher.verify("x", "$argon2id$v=19$not-a-hash"));
    }
}
