/*!
 * Bearer-token security layer
 *
 * Responsibility:
 * - `SecurityConfig`: 公開パス allowlist / session policy / token adapter を明示的に束ねる
 * - `access`: Authorization ヘッダ → 検証 → AuthenticatedIdentity を extensions に入れる
 * - `require`: route 単位の authority チェック (403)
 */
pub mod access;
pub mod path_pattern;
pub mod require;

use crate::config::Config;
use crate::services::auth::{TokenAdapter, adapt};

use self::path_pattern::PathPattern;

/// Whether the server may keep per-client session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPolicy {
    /// No session: every request authenticates from its own token, and any
    /// `Set-Cookie` a handler emits is dropped.
    Stateless,
    /// Responses are left untouched.
    Passthrough,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub public_paths: Vec<PathPattern>,
    pub session_policy: SessionPolicy,
    pub adapter: TokenAdapter,
}

impl SecurityConfig {
    pub fn new(public_paths: Vec<PathPattern>) -> Self {
        Self {
            public_paths,
            session_policy: SessionPolicy::Stateless,
            adapter: adapt,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.public_paths.clone())
    }

    pub fn with_session_policy(mut self, session_policy: SessionPolicy) -> Self {
        self.session_policy = session_policy;
        self
    }

    pub fn with_adapter(mut self, adapter: TokenAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p.matches(path))
    }
}
