//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，所有对 window.history 的操作都集中在此。
//! 导航流程："请求 -> 守卫 -> 写入历史 -> 渲染"。
//! 守卫的输入是构造时注入的会话信号，路由器本身从不读取存储。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, guard};
use crate::session::SessionState;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（新条目）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（原地改写，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 一次导航如何写入 History
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryUpdate {
    /// 用户导航：新增条目
    Push,
    /// 前进/后退：条目已存在，重定向时原地改写
    Replace,
}

/// 计算 `target` 实际展示的路由以及历史写入方式（纯函数）
fn plan_navigation(
    target: AppRoute,
    session: &SessionState,
    use_push: bool,
) -> (AppRoute, HistoryUpdate) {
    let shown = guard(target, session).resolve(target);
    let update = if use_push {
        HistoryUpdate::Push
    } else {
        HistoryUpdate::Replace
    };
    (shown, update)
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；会话以信号形式注入，与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话快照（注入的信号，守卫的唯一输入）
    session: Signal<SessionState>,
}

impl RouterService {
    /// 创建服务；初始路径同样经过守卫，被拒绝时替换当前历史条目
    fn new(session: Signal<SessionState>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let initial = guard(requested, &session.get_untracked()).resolve(requested);
        if initial != requested {
            replace_history_state(initial.to_path());
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 按路径导航（经过守卫）
    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path));
    }

    pub fn navigate_to(&self, target: AppRoute) {
        self.apply(target, true);
    }

    /// 守卫 `target` 并提交结果
    fn apply(&self, target: AppRoute, use_push: bool) {
        let (shown, update) = self
            .session
            .with_untracked(|session| plan_navigation(target, session, use_push));

        if shown != target {
            log::info!("[Router] {target} not permitted, redirecting to {shown}");
        }

        match update {
            HistoryUpdate::Push => push_history_state(shown.to_path()),
            HistoryUpdate::Replace => replace_history_state(shown.to_path()),
        }
        self.set_route.set(shown);
    }

    /// 监听浏览器前进/后退
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            router.apply(target, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与页面同生命周期
        closure.forget();
    }

    /// 会话变化时重新守卫当前路由：
    /// 登录后访客页跳到角色首页，登出或被驱逐后受保护页跳到入口页。
    fn setup_session_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;

        Effect::new(move |_| {
            let route = current_route.get_untracked();
            let shown = session.with(|s| guard(route, s)).resolve(route);
            if shown != route {
                log::info!("[Router] session changed, moving from {route} to {shown}");
                push_history_state(shown.to_path());
                set_route.set(shown);
            }
        });
    }
}

/// 创建路由服务并注入 Context
fn provide_router(session: Signal<SessionState>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 获取路由服务
pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

// ============================================================================
// UI 组件 (UI Components)
// ============================================================================

/// 路由器组件：提供路由 Context，在应用根部挂载一次
#[component]
pub fn Router(session: Signal<SessionState>, children: Children) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口：渲染当前路由对应的视图
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_navigation_pushes() {
        let (shown, update) = plan_navigation(AppRoute::Auth, &SessionState::default(), true);
        assert_eq!(shown, AppRoute::Auth);
        assert_eq!(update, HistoryUpdate::Push);
    }

    #[test]
    fn test_redirected_back_navigation_replaces_entry() {
        let (shown, update) =
            plan_navigation(AppRoute::Dashboard, &SessionState::default(), false);
        assert_eq!(shown, AppRoute::Auth);
        assert_eq!(update, HistoryUpdate::Replace);
    }

    #[test]
    fn test_redirected_link_navigation_still_pushes() {
        let (shown, update) =
            plan_navigation(AppRoute::AdminDashboard, &SessionState::default(), true);
        assert_eq!(shown, AppRoute::Auth);
        assert_eq!(update, HistoryUpdate::Push);
    }
}
