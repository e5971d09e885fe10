use crate::{
    AdminReport, AdminUser, AuthResponse, Rating, Role, Service, ServiceRequest, TechnicianMatch,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the server may change state in response.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or suffix), relative to the API base.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// Concrete path for this request. Override when the path embeds an id.
    fn path(&self) -> String {
        Self::PATH.to_string()
    }

    /// Query parameters, in order.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Whether `self` is sent as a JSON body.
    fn has_body(&self) -> bool {
        Self::METHOD.is_mutation()
    }
}

// =========================================================
// 认证 (Authentication)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: Role,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Bootstrap call that makes the server set the anti-forgery cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfCookieRequest;

impl ApiRequest for CsrfCookieRequest {
    type Response = ();
    const PATH: &'static str = "/sanctum/csrf-cookie";
    const METHOD: HttpMethod = HttpMethod::Get;
}

// =========================================================
// 目录与搜索 (Catalog & Search)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListServicesRequest;

impl ApiRequest for ListServicesRequest {
    type Response = Vec<Service>;
    const PATH: &'static str = "/services";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Proximity search for technicians offering a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTechniciansRequest {
    pub service_id: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: u32,
}

impl ApiRequest for SearchTechniciansRequest {
    type Response = Vec<TechnicianMatch>;
    const PATH: &'static str = "/technicians";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("service_id", self.service_id.to_string()),
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("radius", self.radius.to_string()),
        ]
    }
}

// =========================================================
// 服务请求 (Service Requests)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub service_id: u64,
    pub client_latitude: f64,
    pub client_longitude: f64,
    /// Free-text address typed by the client.
    pub comments: String,
}

impl ApiRequest for CreateServiceRequest {
    type Response = ServiceRequest;
    const PATH: &'static str = "/service-requests";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Requests visible to the caller (own requests for a client, assigned
/// jobs for a technician).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListServiceRequestsRequest;

impl ApiRequest for ListServiceRequestsRequest {
    type Response = Vec<ServiceRequest>;
    const PATH: &'static str = "/service-requests";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(skip)]
    pub id: u64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    #[serde(rename = "serviceRequest")]
    pub service_request: ServiceRequest,
}

impl ApiRequest for UpdateStatusRequest {
    type Response = UpdateStatusResponse;
    const PATH: &'static str = "/service-requests/{id}/status";
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/service-requests/{}/status", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRatingRequest {
    pub service_request_id: u64,
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ApiRequest for CreateRatingRequest {
    type Response = Rating;
    const PATH: &'static str = "/ratings";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// 管理后台 (Administration)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminReportsRequest;

impl ApiRequest for AdminReportsRequest {
    type Response = AdminReport;
    const PATH: &'static str = "/admin/reports";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUsersRequest;

impl ApiRequest for AdminUsersRequest {
    type Response = Vec<AdminUser>;
    const PATH: &'static str = "/admin/users";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Body of a catalog create/update. The entry may come bare, wrapped as
/// `{ message, service }`, or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceEntryResponse {
    Wrapped { service: Service },
    Bare(Service),
    Acknowledged(serde_json::Value),
}

impl ServiceEntryResponse {
    pub fn into_service(self) -> Option<Service> {
        match self {
            ServiceEntryResponse::Wrapped { service } | ServiceEntryResponse::Bare(service) => {
                Some(service)
            }
            ServiceEntryResponse::Acknowledged(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceEntryRequest {
    pub name: String,
    pub description: String,
}

impl ApiRequest for CreateServiceEntryRequest {
    type Response = ServiceEntryResponse;
    const PATH: &'static str = "/admin/services";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateServiceEntryRequest {
    #[serde(skip)]
    pub id: u64,
    pub name: String,
    pub description: String,
}

impl ApiRequest for UpdateServiceEntryRequest {
    type Response = ServiceEntryResponse;
    const PATH: &'static str = "/admin/services/{id}";
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/admin/services/{}", self.id)
    }
}
