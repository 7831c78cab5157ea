//! Authentication configuration.

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session lifetime in seconds (default: 86_400 = 1 day).
    pub session_lifetime_secs: u64,
    /// Session lifetime with remember-me in seconds
    /// (default: 2_592_000 = 30 days).
    pub remember_me_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_lifetime_secs: 86_400,
            remember_me_lifetime_secs: 2_592_000,
            pepper: None,
            min_password_length: 8,
        }
    }
}
