//! access token (JWT) 検証 → AuthenticatedIdentity を extensions に入れる
//!
//! - Bearer トークンがあれば、公開パスでも必ず検証する (不正なら 401)
//! - Bearer トークンが無ければ (Basic など他 scheme も含む)、公開パスのみ匿名で通す
//! - `SessionPolicy::Stateless` ではレスポンスの `Set-Cookie` を落とす

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::SessionPolicy;
use crate::state::AppState;

/// Router 全体に bearer 認証を掛ける。
///
/// 例：
/// ```ignore
/// let app = api::routes();
/// let app = middleware::auth::access::apply(app, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = original_uri.path();

    match bearer_token(req.headers())? {
        Some(token) => {
            let decoded = state.auth.verify(token).map_err(|err| {
                tracing::warn!(error = %err, path = %path, "access token verification failed");
                AppError::from(err)
            })?;

            let identity = (state.security.adapter)(decoded).map_err(|err| {
                tracing::warn!(error = %err, path = %path, "authority extraction failed");
                AppError::from(err)
            })?;

            tracing::debug!(
                principal = %identity.principal(),
                authorities = identity.authority_set().len(),
                "request authenticated"
            );

            // middleware → extractor への受け渡し
            req.extensions_mut().insert(identity);
        }
        None if state.security.is_public(path) => {}
        None => {
            tracing::debug!(path = %path, "missing bearer token");
            return Err(AppError::Unauthorized);
        }
    }

    let mut res = next.run(req).await;

    if state.security.session_policy == SessionPolicy::Stateless
        && res.headers().contains_key(header::SET_COOKIE)
    {
        tracing::debug!("dropping set-cookie under stateless session policy");
        res.headers_mut().remove(header::SET_COOKIE);
    }

    Ok(res)
}

/// `Authorization: Bearer <token>` (scheme は大文字小文字を区別しない)
///
/// - ヘッダ無し、または Bearer 以外の scheme (Basic など) → `Ok(None)`
/// - Bearer scheme だが値が読めない・空 → `InvalidRequest`
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let bytes = value.as_bytes();
    let is_bearer = bytes.len() >= 6
        && bytes[..6].eq_ignore_ascii_case(b"bearer")
        && bytes.get(6).is_none_or(|b| *b == b' ');
    if !is_bearer {
        return Ok(None);
    }

    let value = value.to_str().map_err(|_| AppError::InvalidRequest)?;
    let token = value[6..].trim();
    if token.is_empty() {
        return Err(AppError::InvalidRequest);
    }

    Ok(Some(token))
}
