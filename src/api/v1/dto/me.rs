use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::auth::AuthenticatedIdentity;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal: String,
    // BTreeSet 由来なので常にソート済み
    pub authorities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&AuthenticatedIdentity> for MeResponse {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self {
            principal: identity.principal().to_string(),
            authorities: identity.authorities().map(|a| a.to_string()).collect(),
            expires_at: identity.token().expires_at(),
        }
    }
}
