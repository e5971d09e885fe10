//! FieldServe 前端应用
//!
//! 采用 Context-Driven 架构：
//! - `session`: 认证 token 与用户资料的唯一持有者
//! - `api`: 类型化 REST 客户端，注入凭据，401/403 时驱逐会话
//! - `stores`: 各业务区域的状态与异步动作
//! - `web::route` / `web::router`: 路由表、守卫与历史记录
//! - `components`: UI 组件层

mod api;
mod config;
mod error;
mod session;
mod stores;
mod components {
    pub mod admin;
    pub mod auth;
    pub mod client;
    pub mod landing;
    mod nav;
    mod notice;
    pub mod technician;
}

use std::sync::Arc;

use crate::api::ApiClient;
use crate::components::admin::AdminDashboard;
use crate::components::auth::AuthPage;
use crate::components::client::{ClientDashboard, ServicesStatusPage};
use crate::components::landing::{LandingPage, NotFoundPage};
use crate::components::technician::TechnicianDashboard;
use crate::config::AppConfig;
use crate::session::SessionContext;
use crate::stores::admin::AdminStore;
use crate::stores::service::ServiceStore;
use crate::stores::session::SessionStore;

use leptos::prelude::*;

// 原生 Web API 封装模块
pub(crate) mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    #[cfg(test)]
    pub use storage::MemoryStorage;
    pub use storage::{LocalStorage, SessionStorage};
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Auth => view! { <AuthPage /> }.into_any(),
        AppRoute::Dashboard => view! { <ClientDashboard /> }.into_any(),
        AppRoute::ServicesStatus => view! { <ServicesStatusPage /> }.into_any(),
        AppRoute::TechnicianDashboard => view! { <TechnicianDashboard /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboard /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_env();
    log::info!(
        "api {} ({:?} auth)",
        config.api_base_url,
        config.auth_mode
    );

    // 1. 创建会话上下文，并在首次守卫前从 LocalStorage 恢复
    let session = SessionContext::new(web::LocalStorage::open());
    session.restore();
    provide_context(session);

    // 2. 所有仓库共享同一个 API 客户端
    let api = ApiClient::new(&config, Arc::new(web::FetchHttpClient), session);
    provide_context(SessionStore::new(api));
    provide_context(ServiceStore::new(api, config.search_radius_km));
    provide_context(AdminStore::new(api));

    // 3. 路由器只接收会话信号（解耦！）
    view! {
        <Router session=session.state_signal()>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
