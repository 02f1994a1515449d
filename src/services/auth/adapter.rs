//! Verified token → authenticated identity.

use std::collections::BTreeSet;

use super::authority::{AuthorityError, GrantedAuthority, ScopeAuthorities, listed_authorities};
use super::token::DecodedToken;

/// Signature of the function the security middleware uses to turn a verified
/// token into an identity. [`adapt`] is the default.
pub type TokenAdapter = fn(DecodedToken) -> Result<AuthenticatedIdentity, AuthorityError>;

/// The identity attached to an authenticated request.
///
/// Lives in request extensions for the lifetime of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedIdentity {
    token: DecodedToken,
    authorities: BTreeSet<GrantedAuthority>,
}

impl AuthenticatedIdentity {
    pub fn new(token: DecodedToken, authorities: BTreeSet<GrantedAuthority>) -> Self {
        Self { token, authorities }
    }

    /// The token subject. Never the token itself, never an authority.
    pub fn principal(&self) -> &str {
        self.token.subject()
    }

    pub fn token(&self) -> &DecodedToken {
        &self.token
    }

    pub fn authorities(&self) -> impl Iterator<Item = &GrantedAuthority> {
        self.authorities.iter()
    }

    pub fn authority_set(&self) -> &BTreeSet<GrantedAuthority> {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn has_any_authority(&self, authorities: &[&str]) -> bool {
        authorities.iter().any(|a| self.has_authority(a))
    }
}

/// Default adapter: `SCOPE_`-prefixed scopes unioned with the verbatim
/// `authorities` claim.
pub fn adapt(token: DecodedToken) -> Result<AuthenticatedIdentity, AuthorityError> {
    adapt_with(&ScopeAuthorities::default(), token)
}

pub fn adapt_with(
    scopes: &ScopeAuthorities,
    token: DecodedToken,
) -> Result<AuthenticatedIdentity, AuthorityError> {
    let mut authorities = scopes.convert(&token)?;
    authorities.extend(listed_authorities(&token)?);

    Ok(AuthenticatedIdentity::new(token, authorities))
}
