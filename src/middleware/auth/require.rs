//! Route-level authority checks.
//!
//! Applied with `route_layer`, so only matched routes are guarded and an
//! unknown path still falls through to the fallback.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::AuthenticatedIdentity;

/// Require `authority` on every route of `router`.
pub fn authority<S>(router: Router<S>, authority: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    any_authority(router, &[authority])
}

/// Require at least one of `authorities` on every route of `router`.
pub fn any_authority<S>(router: Router<S>, authorities: &[&'static str]) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let required: Arc<[&'static str]> = authorities.into();

    router.route_layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
        let required = required.clone();
        async move { check(&required, req, next).await }
    }))
}

async fn check(
    required: &[&'static str],
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = req
        .extensions()
        .get::<AuthenticatedIdentity>()
        .ok_or(AppError::Unauthorized)?;

    if !identity.has_any_authority(required) {
        tracing::warn!(
            principal = %identity.principal(),
            required = ?required,
            "missing required authority"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
