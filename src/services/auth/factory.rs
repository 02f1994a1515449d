/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::AuthService;
use crate::services::auth::access_jwt::{AccessJwtError, VerifierSettings};

pub fn build_auth_service(config: &Config) -> Result<Arc<AuthService>, AccessJwtError> {
    let auth = AuthService::new(VerifierSettings {
        public_key_pem: config.access_jwt_public_key_pem.clone(),
        algorithm: config.access_jwt_algorithm,
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        leeway_seconds: config.access_token_leeway_seconds,
    })
    .inspect_err(|err| tracing::error!(error = %err, "failed to build access token verifier"))?;

    Ok(Arc::new(auth))
}
