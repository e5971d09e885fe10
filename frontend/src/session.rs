//! 会话上下文
//!
//! 认证状态的唯一持有者：API 客户端从这里读取 token，
//! 并通过 [`SessionContext::invalidate`] 驱逐会话；
//! 路由器依据 [`SessionContext::state_signal`] 做导航守卫。
//! 其他模块不直接读写存储键。

use crate::web::SessionStorage;
use fieldserve_shared::{Role, STORAGE_PROFILE_KEY, STORAGE_TOKEN_KEY, UserProfile};
use leptos::prelude::*;
use std::sync::Arc;

/// 会话状态快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Bearer token（为空表示未登录）
    pub token: Option<String>,
    /// 缓存的用户资料，角色由此推导
    pub user: Option<UserProfile>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// 已认证用户的角色；有 token 但无资料时视为客户
    pub fn role(&self) -> Option<Role> {
        self.token.as_ref()?;
        Some(self.user.as_ref().map(UserProfile::role).unwrap_or_default())
    }
}

/// 会话上下文（Copy 句柄，可自由传入闭包）
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// 持久化后端（localStorage 或内存）
    storage: StoredValue<Arc<dyn SessionStorage>>,
    /// 响应式会话状态
    state: RwSignal<SessionState>,
}

impl SessionContext {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage: StoredValue::new(storage),
            state: RwSignal::new(SessionState::default()),
        }
    }

    fn storage(&self) -> Arc<dyn SessionStorage> {
        self.storage.get_value()
    }

    /// 从存储恢复上一次页面加载留下的会话
    pub fn restore(&self) {
        let storage = self.storage();
        let token = storage.get(STORAGE_TOKEN_KEY).filter(|t| !t.is_empty());
        let user = storage
            .get(STORAGE_PROFILE_KEY)
            .and_then(|raw| match serde_json::from_str::<UserProfile>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("dropping unreadable cached profile: {e}");
                    storage.delete(STORAGE_PROFILE_KEY);
                    None
                }
            });

        if token.is_some() {
            log::info!("restored cached session");
        }
        self.state.set(SessionState { token, user });
    }

    /// 持久化新的登录/注册结果并发布
    pub fn establish(&self, token: String, user: UserProfile) {
        let storage = self.storage();
        if !storage.set(STORAGE_TOKEN_KEY, &token) {
            log::warn!("could not persist auth token");
        }
        match serde_json::to_string(&user) {
            Ok(raw) => {
                if !storage.set(STORAGE_PROFILE_KEY, &raw) {
                    log::warn!("could not persist user profile");
                }
            }
            Err(e) => log::warn!("could not serialize user profile: {e}"),
        }

        log::info!("session established for user {} as {}", user.id, user.role());
        self.state.set(SessionState {
            token: Some(token),
            user: Some(user),
        });
    }

    /// 从内存与存储中清除会话（唯一的失效入口）
    pub fn invalidate(&self) {
        let storage = self.storage();
        storage.delete(STORAGE_TOKEN_KEY);
        storage.delete(STORAGE_PROFILE_KEY);

        if self.state.with_untracked(SessionState::is_authenticated) {
            log::info!("session invalidated");
        }
        self.state.set(SessionState::default());
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    pub fn token(&self) -> Option<String> {
        self.state.with_untracked(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.state.with_untracked(SessionState::role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with_untracked(SessionState::is_authenticated)
    }

    #[cfg(test)]
    pub fn user(&self) -> Option<UserProfile> {
        self.state.with_untracked(|s| s.user.clone())
    }

    /// 供路由器与视图使用的响应式会话信号
    pub fn state_signal(&self) -> Signal<SessionState> {
        let state = self.state;
        Signal::derive(move || state.get())
    }
}
