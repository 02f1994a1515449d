//! Granted authorities and the claim → authority conversions.
//!
//! Two sources feed an identity's authorities:
//! - scope claims (`scope`, then `scp`), each value prefixed with `SCOPE_`
//! - a custom `authorities` claim, each entry used verbatim
//!
//! The `authorities` claim is decoded with an explicit shape check: a value
//! that is not a list of strings is rejected with
//! [`AuthorityError::InvalidClaimShape`] instead of being coerced. Scope
//! claims follow the usual resource-server convention, where a scalar of any
//! other type yields no scopes. A scope list holding a non-string element
//! is still rejected.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::token::DecodedToken;

pub const DEFAULT_AUTHORITY_PREFIX: &str = "SCOPE_";
pub const DEFAULT_SCOPE_CLAIMS: [&str; 2] = ["scope", "scp"];
pub const AUTHORITIES_CLAIM: &str = "authorities";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error("claim '{claim}' has an unexpected shape (expected {expected})")]
    InvalidClaimShape {
        claim: String,
        expected: &'static str,
    },
}

impl AuthorityError {
    fn shape(claim: &str, expected: &'static str) -> Self {
        Self::InvalidClaimShape {
            claim: claim.to_string(),
            expected,
        }
    }
}

/// An opaque permission identifier such as `SCOPE_read` or `ROLE_ADMIN`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GrantedAuthority(String);

impl GrantedAuthority {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GrantedAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GrantedAuthority {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// Lets a `BTreeSet<GrantedAuthority>` be queried with a plain `&str`.
impl Borrow<str> for GrantedAuthority {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GrantedAuthority {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Scope claim → authority mapping.
///
/// The first configured claim that is present (and not `null`) wins, even
/// when it yields no scopes; the rest are not consulted.
#[derive(Debug, Clone)]
pub struct ScopeAuthorities {
    prefix: String,
    claim_names: Vec<String>,
}

impl Default for ScopeAuthorities {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_AUTHORITY_PREFIX.to_string(),
            claim_names: DEFAULT_SCOPE_CLAIMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScopeAuthorities {
    pub fn new(prefix: impl Into<String>, claim_names: &[&str]) -> Self {
        Self {
            prefix: prefix.into(),
            claim_names: claim_names.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn convert(
        &self,
        token: &DecodedToken,
    ) -> Result<BTreeSet<GrantedAuthority>, AuthorityError> {
        for name in &self.claim_names {
            let value = match token.claim(name) {
                None | Some(Value::Null) => continue,
                Some(value) => value,
            };

            return Ok(scope_values(name, value)?
                .into_iter()
                .map(|scope| GrantedAuthority::new(format!("{}{}", self.prefix, scope)))
                .collect());
        }

        Ok(BTreeSet::new())
    }
}

/// Scope values from a claim: a whitespace-delimited string or a list of strings.
///
/// Any other scalar (number, bool, object) yields no scopes.
fn scope_values<'a>(claim: &str, value: &'a Value) -> Result<Vec<&'a str>, AuthorityError> {
    match value {
        Value::String(s) => Ok(s.split_whitespace().collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.as_str()),
                _ => Err(AuthorityError::shape(claim, "a list of strings")),
            })
            .filter(|r| !matches!(r, Ok(s) if s.trim().is_empty()))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Authorities listed verbatim in the `authorities` claim.
///
/// An absent (or `null`) claim yields an empty set.
pub fn listed_authorities(
    token: &DecodedToken,
) -> Result<BTreeSet<GrantedAuthority>, AuthorityError> {
    match token.claim(AUTHORITIES_CLAIM) {
        None | Some(Value::Null) => Ok(BTreeSet::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(GrantedAuthority::new)
                    .ok_or_else(|| AuthorityError::shape(AUTHORITIES_CLAIM, "a list of strings"))
            })
            .collect(),
        Some(_) => Err(AuthorityError::shape(AUTHORITIES_CLAIM, "a list of strings")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(v: Value) -> DecodedToken {
        let Value::Object(map) = v else {
            unreachable!("test claims must be an object")
        };
        DecodedToken::from_claims(map).unwrap()
    }

    fn names(set: &BTreeSet<GrantedAuthority>) -> Vec<&str> {
        set.iter().map(GrantedAuthority::as_str).collect()
    }

    #[test]
    fn space_delimited_scope_string() {
        let t = token(json!({"sub": "c", "scope": "read  write\tadmin"}));
        let set = ScopeAuthorities::default().convert(&t).unwrap();
        assert_eq!(names(&set), vec!["SCOPE_admin", "SCOPE_read", "SCOPE_write"]);
    }

    #[test]
    fn scope_list_and_scp_fallback() {
        let t = token(json!({"sub": "c", "scp": ["read", "write", "read"]}));
        let set = ScopeAuthorities::default().convert(&t).unwrap();
        assert_eq!(names(&set), vec!["SCOPE_read", "SCOPE_write"]);
    }

    #[test]
    fn blank_scope_claim_still_wins_over_scp() {
        let t = token(json!({"sub": "c", "scope": "", "scp": "read"}));
        let set = ScopeAuthorities::default().convert(&t).unwrap();
        assert!(set.is_empty());

        let t = token(json!({"sub": "c", "scope": "   ", "scp": ["read"]}));
        assert!(ScopeAuthorities::default().convert(&t).unwrap().is_empty());
    }

    #[test]
    fn null_scope_claim_counts_as_absent() {
        let t = token(json!({"sub": "c", "scope": null, "scp": "read"}));
        let set = ScopeAuthorities::default().convert(&t).unwrap();
        assert_eq!(names(&set), vec!["SCOPE_read"]);
    }

    #[test]
    fn first_present_scope_claim_wins() {
        let t = token(json!({"sub": "c", "scope": "read", "scp": "write"}));
        let set = ScopeAuthorities::default().convert(&t).unwrap();
        assert_eq!(names(&set), vec!["SCOPE_read"]);
    }

    #[test]
    fn custom_prefix_and_claim() {
        let t = token(json!({"sub": "c", "roles": "admin"}));
        let set = ScopeAuthorities::new("ROLE_", &["roles"]).convert(&t).unwrap();
        assert_eq!(names(&set), vec!["ROLE_admin"]);
    }

    #[test]
    fn non_string_scope_scalar_yields_nothing() {
        for odd in [json!(7), json!(true), json!({"read": true})] {
            let t = token(json!({"sub": "c", "scope": odd, "scp": "read"}));
            assert!(ScopeAuthorities::default().convert(&t).unwrap().is_empty());
        }
    }

    #[test]
    fn scope_list_with_non_string_element_is_rejected() {
        let t = token(json!({"sub": "c", "scope": ["read", 1]}));
        let err = ScopeAuthorities::default().convert(&t).unwrap_err();
        assert!(matches!(err, AuthorityError::InvalidClaimShape { ref claim, .. } if claim == "scope"));
    }

    #[test]
    fn listed_authorities_verbatim() {
        let t = token(json!({"sub": "c", "authorities": ["ROLE_ADMIN", "SCOPE_read", "ROLE_ADMIN"]}));
        let set = listed_authorities(&t).unwrap();
        assert_eq!(names(&set), vec!["ROLE_ADMIN", "SCOPE_read"]);
    }

    #[test]
    fn absent_or_null_authorities_claim_is_empty() {
        assert!(listed_authorities(&token(json!({"sub": "c"}))).unwrap().is_empty());
        assert!(
            listed_authorities(&token(json!({"sub": "c", "authorities": null})))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn borrowed_str_lookup() {
        let set: BTreeSet<GrantedAuthority> =
            ["ROLE_ADMIN", "SCOPE_read"].into_iter().map(GrantedAuthority::from).collect();
        assert!(set.contains("SCOPE_read"));
        assert!(!set.contains("SCOPE_write"));
    }

    #[test]
    fn malformed_authorities_claim_is_rejected() {
        for bad in [json!("ROLE_ADMIN"), json!({"a": 1}), json!(["ROLE_ADMIN", 3]), json!(true)] {
            let t = token(json!({"sub": "c", "authorities": bad}));
            let err = listed_authorities(&t).unwrap_err();
            assert_eq!(
                err,
                AuthorityError::InvalidClaimShape {
                    claim: "authorities".to_string(),
                    expected: "a list of strings",
                }
            );
        }
    }
}
