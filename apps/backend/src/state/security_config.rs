use std::time::Duration;

use argon2::Params;
use jsonwebtoken::Algorithm;

/// Default lifetime of an access token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Configuration for JWT security settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
    /// How long minted access tokens stay valid
    pub token_ttl: Duration,
    /// Argon2id cost for newly hashed passwords
    pub password_params: Params,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: DEFAULT_TOKEN_TTL,
            password_params: Params::default(),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_password_params(mut self, params: Params) -> Self {
        self.password_params = params;
        self
    }
}

impl Default for SecurityConfig {
    /// Test settings: a fixed secret and the cheapest valid Argon2 cost.
    fn default() -> Self {
        let cheap = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None)
            .unwrap_or_default();
        Self::new(b"default_secret_for_tests_only".to_vec()).with_password_params(cheap)
    }
}
