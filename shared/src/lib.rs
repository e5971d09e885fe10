use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod role;

pub use role::{Role, RoleEntry, derive_role};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const STORAGE_TOKEN_KEY: &str = "auth_token";
pub const STORAGE_PROFILE_KEY: &str = "user_data";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_XSRF_TOKEN: &str = "X-XSRF-TOKEN";
pub const COOKIE_XSRF_TOKEN: &str = "XSRF-TOKEN";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// Technician details attached to a profile when the account can take jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TechnicianProfile {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Authenticated user as returned by `/login` and `/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub roles: Vec<RoleEntry>,
    #[serde(default)]
    pub technician: Option<TechnicianProfile>,
}

impl UserProfile {
    pub fn role(&self) -> Role {
        derive_role(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Client location picked on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One row of a proximity search. Never persisted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianMatch {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub id: Option<u64>,
    pub service_request_id: u64,
    pub score: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A unit of work tracked through an opaque status lifecycle.
///
/// `status` is forwarded to and from the API as-is; the client never
/// interprets it beyond display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: u64,
    pub service_id: u64,
    #[serde(default)]
    pub client_latitude: Option<f64>,
    #[serde(default)]
    pub client_longitude: Option<f64>,
    pub status: String,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub service: Option<Service>,
    #[serde(default)]
    pub technician: Option<TechnicianMatch>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ServiceRequest {
    pub fn client_location(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.client_latitude?, self.client_longitude?))
    }

    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub roles: Vec<RoleEntry>,
}

impl AdminUser {
    /// Same precedence as [`derive_role`]; admin listings carry no
    /// technician profile, so only the flags and role names count.
    pub fn role(&self) -> Role {
        role::role_from_flags(self.is_admin, &self.roles, false)
    }
}

/// Aggregate figures for the admin dashboard. The stat names are chosen by
/// the server and keep the order it sent them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AdminReport {
    #[serde(default)]
    pub stats: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub recent_requests: Vec<ServiceRequest>,
}

// =========================================================
// 错误响应体 (Error Bodies)
// =========================================================

/// Field-keyed validation failures (`422` body).
///
/// Fields keep the order the server sent them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ValidationErrors {
    #[serde(default)]
    pub message: Option<String>,
    pub errors: serde_json::Map<String, serde_json::Value>,
}

impl ValidationErrors {
    /// Every message of every field, in order.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .values()
            .flat_map(|v| match v {
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|m| match m {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>(),
                serde_json::Value::String(s) => vec![s.clone()],
                other => vec![other.to_string()],
            })
            .collect()
    }

    /// Single display string: all field messages joined with a space.
    pub fn flatten(&self) -> String {
        let messages = self.messages();
        if messages.is_empty() {
            return self.message.clone().unwrap_or_default();
        }
        messages.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Generic `{ "message": "..." }` error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_errors_flatten_keeps_field_order() {
        let body: ValidationErrors = serde_json::from_value(json!({
            "message": "The given data was invalid.",
            "errors": {
                "password": ["too short", "needs a digit"],
                "email": ["required"]
            }
        }))
        .unwrap();

        assert_eq!(body.flatten(), "too short needs a digit required");
    }

    #[test]
    fn test_validation_errors_flatten_falls_back_to_message() {
        let body: ValidationErrors = serde_json::from_value(json!({
            "message": "Invalid",
            "errors": {}
        }))
        .unwrap();

        assert_eq!(body.flatten(), "Invalid");
        assert!(body.is_empty());
    }

    #[test]
    fn test_validation_errors_accepts_bare_string_field() {
        let body: ValidationErrors =
            serde_json::from_value(json!({ "errors": { "email": "taken" } })).unwrap();
        assert_eq!(body.messages(), vec!["taken".to_string()]);
    }

    #[test]
    fn test_admin_report_keeps_stat_order() {
        let report: AdminReport = serde_json::from_value(json!({
            "stats": { "users": 12, "active_technicians": 4, "completed": 30 }
        }))
        .unwrap();

        let names: Vec<&str> = report.stats.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["users", "active_technicians", "completed"]);
        assert!(report.recent_requests.is_empty());
    }

    #[test]
    fn test_admin_user_role_from_listing() {
        let users: Vec<AdminUser> = serde_json::from_value(json!([
            { "id": 1, "name": "A", "email": "a@x", "is_admin": true },
            { "id": 2, "name": "B", "email": "b@x", "roles": [{ "name": "tecnico" }] },
            { "id": 3, "name": "C", "email": "c@x" }
        ]))
        .unwrap();

        let roles: Vec<Role> = users.iter().map(AdminUser::role).collect();
        assert_eq!(roles, vec![Role::Admin, Role::Technician, Role::Client]);
    }

    #[test]
    fn test_service_request_tolerates_missing_optionals() {
        let req: ServiceRequest = serde_json::from_value(json!({
            "id": 3,
            "service_id": 1,
            "status": "pending",
            "created_at": "2024-05-01T10:00:00.000000Z"
        }))
        .unwrap();

        assert_eq!(req.status, "pending");
        assert!(req.client_location().is_none());
        assert!(req.created_at.is_some());
        assert!(!req.is_rated());
    }

    #[test]
    fn test_profile_ignores_unknown_fields() {
        let user: UserProfile = serde_json::from_value(json!({
            "id": 9,
            "name": "Ana",
            "email": "ana@example.com",
            "email_verified_at": null
        }))
        .unwrap();

        assert!(!user.is_admin);
        assert!(user.roles.is_empty());
        assert_eq!(user.role(), Role::Client);
    }
}
