//! Identity token verification.
//!
//! The API never issues credentials. Clients present a bearer token minted
//! by the external identity provider; verifying it yields an
//! [`IdentityAssertion`] that the reconciliation layer maps to a local user.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use limacentro_core::error::CoreError;
use limacentro_core::identity::IdentityAssertion;
use serde::Deserialize;

/// Verifies an opaque bearer token into an identity assertion.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<IdentityAssertion, CoreError>;
}

/// Claims carried by the provider's HS256-signed tokens.
#[derive(Debug, Deserialize)]
struct ProviderClaims {
    /// Provider-side subject (stable per account).
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    #[allow(dead_code)]
    exp: usize,
}

/// Production verifier: validates HS256 signature and expiry.
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> Result<IdentityAssertion, CoreError> {
        let data = decode::<ProviderClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;
        let claims = data.claims;
        Ok(IdentityAssertion {
            external_id: claims.sub,
            email: claims.email.map(|e| e.trim().to_lowercase()),
            display_name: claims.name.unwrap_or_else(|| "Usuario".into()),
            avatar_url: claims.picture,
        })
    }
}

/// Test verifier: treats the token as a key into a fixed assertion table.
pub struct StaticIdentityProvider {
    assertions: std::collections::HashMap<String, IdentityAssertion>,
}

impl StaticIdentityProvider {
    pub fn new(assertions: Vec<(String, IdentityAssertion)>) -> Self {
        Self {
            assertions: assertions.into_iter().collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify(&self, token: &str) -> Result<IdentityAssertion, CoreError> {
        self.assertions
            .get(token)
            .cloned()
            .ok_or_else(|| CoreError::Unauthorized("Invalid or expired token".into()))
    }
}
