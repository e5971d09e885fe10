//! Shared fixtures for store tests.

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::session::SessionContext;
use crate::web::MemoryStorage;
use crate::web::http::MockHttpClient;
use fieldserve_shared::{RoleEntry, TechnicianProfile, UserProfile};
use std::sync::Arc;

pub const BASE: &str = "http://api.test/api";

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

pub struct Harness {
    pub api: ApiClient,
    pub http: Arc<MockHttpClient>,
    pub storage: Arc<MemoryStorage>,
}

impl Harness {
    pub fn new() -> Self {
        let http = Arc::new(MockHttpClient::new());
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionContext::new(storage.clone());
        let api = ApiClient::new(&AppConfig::new(BASE), http.clone(), session);
        Self { api, http, storage }
    }

    pub fn session(&self) -> SessionContext {
        self.api.session()
    }

    pub fn signed_in_as(self, user: UserProfile) -> Self {
        self.session().establish("tok-test".to_string(), user);
        self
    }
}

pub fn client_user() -> UserProfile {
    UserProfile {
        id: 10,
        name: "Carla Cliente".to_string(),
        email: "carla@example.com".to_string(),
        is_admin: false,
        roles: vec![RoleEntry::new("cliente")],
        technician: None,
    }
}

pub fn technician_user() -> UserProfile {
    UserProfile {
        id: 20,
        name: "Tito Técnico".to_string(),
        email: "tito@example.com".to_string(),
        is_admin: false,
        roles: vec![RoleEntry::new("tecnico")],
        technician: Some(TechnicianProfile::default()),
    }
}

pub fn admin_user() -> UserProfile {
    UserProfile {
        id: 1,
        name: "Root".to_string(),
        email: "root@example.com".to_string(),
        is_admin: true,
        roles: Vec::new(),
        technician: None,
    }
}
