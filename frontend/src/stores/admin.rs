//! Administrator views: reports, users and the service catalog.

use super::{ActionState, track};
use crate::api::ApiClient;
use crate::error::ClientResult;
use fieldserve_shared::protocol::{
    AdminReportsRequest, AdminUsersRequest, CreateServiceEntryRequest, ListServicesRequest,
    UpdateServiceEntryRequest,
};
use fieldserve_shared::{AdminReport, AdminUser, Service};
use leptos::prelude::*;

const MSG_LOAD_DASHBOARD: &str = "Could not load the admin dashboard.";
const MSG_CREATE_SERVICE: &str = "Could not create the service.";
const MSG_UPDATE_SERVICE: &str = "Could not update the service.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    /// 统计数据与最近请求
    pub report: AdminReport,
    /// 用户列表
    pub users: Vec<AdminUser>,
    /// 服务目录（可增改）
    pub services: Vec<Service>,
    pub loading: bool,
    pub error_message: Option<String>,
}

impl ActionState for AdminState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, message: Option<String>) {
        self.error_message = message;
    }
}

struct DashboardData {
    report: AdminReport,
    users: Vec<AdminUser>,
    services: Vec<Service>,
}

#[derive(Clone, Copy)]
pub struct AdminStore {
    api: ApiClient,
    pub state: RwSignal<AdminState>,
}

impl AdminStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwSignal::new(AdminState::default()),
        }
    }

    async fn load_dashboard(&self) -> ClientResult<DashboardData> {
        let report = self.api.send(&AdminReportsRequest).await?;
        let users = self.api.send(&AdminUsersRequest).await?;
        let services = self.api.send(&ListServicesRequest).await?;
        Ok(DashboardData {
            report,
            users,
            services,
        })
    }

    /// Reports, users and catalog in one batch. Nothing is committed unless
    /// all three reads succeed.
    pub async fn fetch_dashboard_data(&self) {
        let Some(data) = track(self.state, self.load_dashboard(), |_| {
            MSG_LOAD_DASHBOARD.to_string()
        })
        .await
        else {
            return;
        };

        self.state.update(|s| {
            s.report = data.report;
            s.users = data.users;
            s.services = data.services;
        });
    }

    /// Add a catalog entry. When the response carries no entry the catalog
    /// is reloaded instead.
    pub async fn create_new_service(&self, name: &str, description: &str) -> bool {
        let req = CreateServiceEntryRequest {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        };
        let Some(response) = track(self.state, self.api.send(&req), |e| {
            e.server_message_or(MSG_CREATE_SERVICE)
        })
        .await
        else {
            return false;
        };

        match response.into_service() {
            Some(created) => {
                log::info!("service {} added to the catalog", created.id);
                self.state.update(|s| s.services.push(created));
            }
            None => self.reload_services().await,
        }
        true
    }

    async fn reload_services(&self) {
        match self.api.send(&ListServicesRequest).await {
            Ok(services) => self.state.update(|s| s.services = services),
            Err(e) => log::warn!("service created but the catalog could not be reloaded: {e}"),
        }
    }

    /// Edit a catalog entry. Without an entry in the response the submitted
    /// fields are applied locally.
    pub async fn update_service(&self, id: u64, name: &str, description: &str) -> bool {
        let req = UpdateServiceEntryRequest {
            id,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        };
        let Some(response) = track(self.state, self.api.send(&req), |e| {
            e.server_message_or(MSG_UPDATE_SERVICE)
        })
        .await
        else {
            return false;
        };

        let updated = response.into_service().unwrap_or_else(|| Service {
            id,
            description: Some(req.description.clone()).filter(|d| !d.is_empty()),
            name: req.name,
        });
        self.state.update(|s| {
            match s.services.iter_mut().find(|svc| svc.id == id) {
                Some(slot) => *slot = updated,
                None => s.services.push(updated),
            }
        });
        true
    }
}
