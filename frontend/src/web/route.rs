//! 路由定义与导航守卫（领域模型）
//!
//! 纯领域逻辑：不依赖 DOM，不依赖 `web_sys`。
//! 守卫只依赖目标路由和会话快照，从不访问网络。
//! 它只是路由便利，不是访问控制边界；角色由 API 端强制校验。

use crate::session::SessionState;
use fieldserve_shared::Role;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 公开首页
    #[default]
    Landing,
    /// 登录 / 注册（未认证入口页）
    Auth,
    /// 客户：发起服务请求
    Dashboard,
    /// 客户：跟踪、取消与评价请求
    ServicesStatus,
    /// 技师：分配的工单
    TechnicianDashboard,
    /// 管理员：报表、用户与服务目录
    AdminDashboard,
    /// 404 页面
    NotFound,
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(AppRoute),
}

impl GuardDecision {
    /// `target` 实际应展示的路由
    pub fn resolve(self, target: AppRoute) -> AppRoute {
        match self {
            GuardDecision::Allow => target,
            GuardDecision::Redirect(route) => route,
        }
    }
}

impl AppRoute {
    /// 从 URL 路径解析路由（忽略末尾 `/`）
    pub fn from_path(path: &str) -> Self {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" => Self::Landing,
            "/auth" | "/login" => Self::Auth,
            "/dashboard" => Self::Dashboard,
            "/services-status" => Self::ServicesStatus,
            "/technician-dashboard" => Self::TechnicianDashboard,
            "/admin" => Self::AdminDashboard,
            _ => Self::NotFound,
        }
    }

    /// 转换为 URL 路径
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Auth => "/auth",
            Self::Dashboard => "/dashboard",
            Self::ServicesStatus => "/services-status",
            Self::TechnicianDashboard => "/technician-dashboard",
            Self::AdminDashboard => "/admin",
            Self::NotFound => "/404",
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.required_role().is_some()
    }

    /// 仅对未登录访客有意义的页面
    pub fn is_guest_only(&self) -> bool {
        matches!(self, Self::Landing | Self::Auth)
    }

    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Dashboard | Self::ServicesStatus => Some(Role::Client),
            Self::TechnicianDashboard => Some(Role::Technician),
            Self::AdminDashboard => Some(Role::Admin),
            Self::Landing | Self::Auth | Self::NotFound => None,
        }
    }

    /// 未认证访客被送往的入口页
    pub fn entry() -> Self {
        Self::Auth
    }

    /// 各角色的首页
    pub fn landing_for(role: Role) -> Self {
        match role {
            Role::Client => Self::Dashboard,
            Role::Technician => Self::TechnicianDashboard,
            Role::Admin => Self::AdminDashboard,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 判定 `session` 能否展示 `target`
///
/// 规则按顺序匹配，先命中者生效：
/// 1. 需要认证但无 token：入口页
/// 2. 仅访客页但已有 token：角色首页
/// 3. 角色不匹配：调用者自己的首页
/// 4. 放行
pub fn guard(target: AppRoute, session: &SessionState) -> GuardDecision {
    let role = match session.role() {
        Some(role) => role,
        None if target.requires_auth() => return GuardDecision::Redirect(AppRoute::entry()),
        None => return GuardDecision::Allow,
    };

    if target.is_guest_only() {
        return GuardDecision::Redirect(AppRoute::landing_for(role));
    }

    match target.required_role() {
        Some(required) if required != role => GuardDecision::Redirect(AppRoute::landing_for(role)),
        _ => GuardDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldserve_shared::{RoleEntry, TechnicianProfile, UserProfile};

    const ALL_ROUTES: [AppRoute; 7] = [
        AppRoute::Landing,
        AppRoute::Auth,
        AppRoute::Dashboard,
        AppRoute::ServicesStatus,
        AppRoute::TechnicianDashboard,
        AppRoute::AdminDashboard,
        AppRoute::NotFound,
    ];

    fn session_as(role: Role) -> SessionState {
        let user = UserProfile {
            id: 1,
            name: "U".to_string(),
            email: "u@example.com".to_string(),
            is_admin: false,
            roles: if role == Role::Admin {
                vec![RoleEntry::new("admin")]
            } else {
                Vec::new()
            },
            technician: (role == Role::Technician).then(TechnicianProfile::default),
        };
        SessionState {
            token: Some("tok".to_string()),
            user: Some(user),
        }
    }

    #[test]
    fn test_paths_round_trip() {
        for route in ALL_ROUTES.into_iter().filter(|r| *r != AppRoute::NotFound) {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/auth/"), AppRoute::Auth);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_guarded_routes_redirect_to_entry_without_token() {
        let anonymous = SessionState::default();
        for route in ALL_ROUTES.into_iter().filter(AppRoute::requires_auth) {
            assert_eq!(
                guard(route, &anonymous),
                GuardDecision::Redirect(AppRoute::Auth),
                "{route}"
            );
        }
    }

    #[test]
    fn test_public_routes_allowed_without_token() {
        let anonymous = SessionState::default();
        for route in [AppRoute::Landing, AppRoute::Auth, AppRoute::NotFound] {
            assert_eq!(guard(route, &anonymous), GuardDecision::Allow);
        }
    }

    #[test]
    fn test_guest_only_routes_send_users_home() {
        for role in [Role::Client, Role::Technician, Role::Admin] {
            let session = session_as(role);
            for route in [AppRoute::Landing, AppRoute::Auth] {
                assert_eq!(
                    guard(route, &session),
                    GuardDecision::Redirect(AppRoute::landing_for(role))
                );
            }
        }
    }

    #[test]
    fn test_technician_on_client_route_goes_to_technician_dashboard() {
        let session = session_as(Role::Technician);
        assert_eq!(
            guard(AppRoute::Dashboard, &session),
            GuardDecision::Redirect(AppRoute::TechnicianDashboard)
        );
        assert_eq!(
            guard(AppRoute::ServicesStatus, &session),
            GuardDecision::Redirect(AppRoute::TechnicianDashboard)
        );
    }

    #[test]
    fn test_role_mismatch_matrix() {
        for role in [Role::Client, Role::Technician, Role::Admin] {
            let session = session_as(role);
            for route in ALL_ROUTES.into_iter().filter(AppRoute::requires_auth) {
                let expected = if route.required_role() == Some(role) {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Redirect(AppRoute::landing_for(role))
                };
                assert_eq!(guard(route, &session), expected, "{role:?} -> {route}");
            }
        }
    }

    #[test]
    fn test_token_without_profile_is_client() {
        let session = SessionState {
            token: Some("tok".to_string()),
            user: None,
        };
        assert_eq!(guard(AppRoute::Dashboard, &session), GuardDecision::Allow);
        assert_eq!(
            guard(AppRoute::AdminDashboard, &session),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
    }

    #[test]
    fn test_not_found_always_allowed() {
        assert_eq!(guard(AppRoute::NotFound, &session_as(Role::Admin)), GuardDecision::Allow);
    }
}
