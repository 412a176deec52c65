//! Federated identity assertion.
//!
//! A verified claim set handed to the identity reconciler by whichever
//! identity provider is configured. The provider integration itself lives in
//! the API crate; the assertion shape is domain vocabulary.

use crate::error::CoreError;

/// A verified external identity.
#[derive(Debug, Clone)]
pub struct IdentityAssertion {
    /// The provider-issued stable subject identifier.
    pub external_id: String,
    /// Primary email, if the provider released one. Reconciliation is
    /// impossible without it.
    pub email: Option<String>,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl IdentityAssertion {
    /// The assertion's email, required for reconciliation.
    ///
    /// Deduplication across providers keys on email, so an assertion
    /// without one cannot be attributed to a local user.
    pub fn required_email(&self) -> Result<&str, CoreError> {
        match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => Ok(email),
            _ => Err(CoreError::Unauthorized(
                "identity assertion is missing an email".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn assertion(email: Option<&str>) -> IdentityAssertion {
        IdentityAssertion {
            external_id: "ext-1".into(),
            email: email.map(str::to_string),
            display_name: "Test".into(),
            avatar_url: None,
        }
    }

    #[test]
    fn present_email_is_returned() {
        assert_eq!(
            assertion(Some("a@x.com")).required_email().unwrap(),
            "a@x.com"
        );
    }

    #[test]
    fn missing_or_blank_email_is_unauthorized() {
        assert_matches!(
            assertion(None).required_email(),
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            assertion(Some("   ")).required_email(),
            Err(CoreError::Unauthorized(_))
        );
    }
}
