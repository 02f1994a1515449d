/*
 * Responsibility
 * - 検証済み JWT の claim 集合 (DecodedToken)
 * - 署名/exp の検証は AuthService 側の責務。ここは「検証後の値」として不変に保持するだけ
 */
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("missing '{0}' claim")]
    MissingClaim(&'static str),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
}

/// An already-verified token: the raw claim map plus typed accessors for the
/// registered claims.
///
/// There is no mutating API; once built the claims are fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    subject: String,
    claims: Map<String, Value>,
}

impl DecodedToken {
    /// Build from a claim map. `sub` must be a non-empty string since it
    /// becomes the principal.
    pub fn from_claims(claims: Map<String, Value>) -> Result<Self, TokenError> {
        let subject = match claims.get("sub") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) => return Err(TokenError::EmptyClaim("sub")),
            _ => return Err(TokenError::MissingClaim("sub")),
        };

        Ok(Self { subject, claims })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issuer(&self) -> Option<&str> {
        self.claims.get("iss").and_then(Value::as_str)
    }

    pub fn jti(&self) -> Option<&str> {
        self.claims.get("jti").and_then(Value::as_str)
    }

    /// `aud` may be a single string or an array of strings.
    pub fn audience(&self) -> Vec<&str> {
        match self.claims.get("aud") {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(arr)) => arr.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("exp")
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("iat")
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.timestamp("nbf")
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    pub fn has_claim(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        let secs = self.claims.get(name).and_then(Value::as_i64)?;
        Utc.timestamp_opt(secs, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            _ => unreachable!("test claims must be an object"),
        }
    }

    #[test]
    fn subject_is_required() {
        let err = DecodedToken::from_claims(claims(json!({"scope": "read"}))).unwrap_err();
        assert_eq!(err, TokenError::MissingClaim("sub"));

        let err = DecodedToken::from_claims(claims(json!({"sub": 42}))).unwrap_err();
        assert_eq!(err, TokenError::MissingClaim("sub"));

        let err = DecodedToken::from_claims(claims(json!({"sub": "  "}))).unwrap_err();
        assert_eq!(err, TokenError::EmptyClaim("sub"));
    }

    #[test]
    fn registered_claim_accessors() {
        let token = DecodedToken::from_claims(claims(json!({
            "sub": "client-1",
            "iss": "https://auth.example",
            "aud": ["api", "other"],
            "exp": 1_700_000_000,
            "jti": "abc",
        })))
        .unwrap();

        assert_eq!(token.subject(), "client-1");
        assert_eq!(token.issuer(), Some("https://auth.example"));
        assert_eq!(token.audience(), vec!["api", "other"]);
        assert_eq!(token.jti(), Some("abc"));
        assert_eq!(token.expires_at().unwrap().timestamp(), 1_700_000_000);
        assert!(token.issued_at().is_none());
        assert!(token.has_claim("aud"));
        assert!(!token.has_claim("authorities"));
    }

    #[test]
    fn single_string_audience() {
        let token =
            DecodedToken::from_claims(claims(json!({"sub": "s", "aud": "api"}))).unwrap();
        assert_eq!(token.audience(), vec!["api"]);
    }
}
