/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: token 検証 (AuthService)、security: allowlist / session policy / adapter
 * - Clone 前提で持つ (内部は Arc で read-only 共有)
 */
use std::sync::Arc;

use crate::middleware::auth::SecurityConfig;
use crate::services::auth::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, security: SecurityConfig) -> Self {
        Self {
            auth,
            security: Arc::new(security),
        }
    }
}
