//! Catalog, technician search and the caller's service requests.

use super::{ActionState, reject, track};
use crate::api::ApiClient;
use fieldserve_shared::protocol::{
    CreateRatingRequest, CreateServiceRequest, ListServiceRequestsRequest, ListServicesRequest,
    SearchTechniciansRequest, UpdateStatusRequest,
};
use fieldserve_shared::{GeoPoint, Service, ServiceRequest, TechnicianMatch};
use leptos::prelude::*;

pub const MSG_SELECT_SERVICE_AND_LOCATION: &str = "Please select a service and a location.";
pub const MSG_COMPLETE_ALL_FIELDS: &str = "Please complete all fields.";
const MSG_LOAD_SERVICES: &str = "Could not load services.";
const MSG_SEARCH_TECHNICIANS: &str = "Could not search for technicians.";
const MSG_CREATE_REQUEST: &str = "Could not create the request.";
const MSG_LOAD_REQUESTS: &str = "Could not load your requests.";
const MSG_UPDATE_STATUS: &str = "Could not update the status.";
const MSG_SUBMIT_RATING: &str = "Could not submit the rating.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceState {
    /// 服务目录
    pub services: Vec<Service>,
    /// 表单中选中的服务
    pub selected_service_id: Option<u64>,
    /// 客户位置
    pub client_location: Option<GeoPoint>,
    /// 客户填写的地址，作为 `comments` 发送
    pub address: String,
    /// 最近一次附近技师搜索结果
    pub technicians: Vec<TechnicianMatch>,
    /// 当前用户（客户或技师）可见的请求
    pub my_requests: Vec<ServiceRequest>,
    pub loading: bool,
    pub error_message: Option<String>,
}

impl ServiceState {
    pub fn selected_service(&self) -> Option<&Service> {
        let id = self.selected_service_id?;
        self.services.iter().find(|s| s.id == id)
    }

    fn search_input(&self) -> Option<(u64, GeoPoint)> {
        Some((self.selected_service_id?, self.client_location?))
    }

    fn request_input(&self) -> Option<(u64, GeoPoint, String)> {
        let (service_id, location) = self.search_input()?;
        let address = self.address.trim();
        if address.is_empty() {
            return None;
        }
        Some((service_id, location, address.to_string()))
    }

    fn request_mut(&mut self, id: u64) -> Option<&mut ServiceRequest> {
        self.my_requests.iter_mut().find(|r| r.id == id)
    }
}

impl ActionState for ServiceState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, message: Option<String>) {
        self.error_message = message;
    }
}

#[derive(Clone, Copy)]
pub struct ServiceStore {
    api: ApiClient,
    search_radius_km: u32,
    pub state: RwSignal<ServiceState>,
}

impl ServiceStore {
    pub fn new(api: ApiClient, search_radius_km: u32) -> Self {
        Self {
            api,
            search_radius_km,
            state: RwSignal::new(ServiceState::default()),
        }
    }

    pub async fn fetch_services(&self) {
        let services = track(self.state, self.api.send(&ListServicesRequest), |e| {
            e.user_message(MSG_LOAD_SERVICES)
        })
        .await;
        if let Some(services) = services {
            self.state.update(|s| s.services = services);
        }
    }

    pub fn set_location(&self, lat: f64, lng: f64) {
        self.state
            .update(|s| s.client_location = Some(GeoPoint::new(lat, lng)));
    }

    pub fn set_address(&self, address: impl Into<String>) {
        let address = address.into();
        self.state.update(|s| s.address = address);
    }

    pub fn set_selected_service(&self, id: Option<u64>) {
        self.state.update(|s| s.selected_service_id = id);
    }

    /// Technicians near the client offering the selected service.
    pub async fn find_technicians(&self) {
        let Some((service_id, location)) = self.state.with_untracked(ServiceState::search_input)
        else {
            reject(self.state, MSG_SELECT_SERVICE_AND_LOCATION);
            return;
        };

        let req = SearchTechniciansRequest {
            service_id,
            latitude: location.lat,
            longitude: location.lng,
            radius: self.search_radius_km,
        };
        let found = track(self.state, self.api.send(&req), |e| {
            e.user_message(MSG_SEARCH_TECHNICIANS)
        })
        .await;
        if let Some(technicians) = found {
            log::info!("{} technicians within {} km", technicians.len(), self.search_radius_km);
            self.state.update(|s| s.technicians = technicians);
        }
    }

    /// Create a request for the selected service at the client location.
    /// The confirmed request is appended to `my_requests`.
    pub async fn create_service_request(&self) -> Option<ServiceRequest> {
        let Some((service_id, location, address)) =
            self.state.with_untracked(ServiceState::request_input)
        else {
            reject(self.state, MSG_COMPLETE_ALL_FIELDS);
            return None;
        };

        let req = CreateServiceRequest {
            service_id,
            client_latitude: location.lat,
            client_longitude: location.lng,
            comments: address,
        };
        let created = track(self.state, self.api.send(&req), |e| {
            e.user_message(MSG_CREATE_REQUEST)
        })
        .await?;

        log::info!("service request {} created", created.id);
        self.state.update(|s| s.my_requests.push(created.clone()));
        Some(created)
    }

    pub async fn fetch_my_requests(&self) {
        let requests = track(self.state, self.api.send(&ListServiceRequestsRequest), |e| {
            e.user_message(MSG_LOAD_REQUESTS)
        })
        .await;
        if let Some(requests) = requests {
            self.state.update(|s| s.my_requests = requests);
        }
    }

    /// Move a request to `status`. Only the matching local entry is replaced,
    /// with the server's copy.
    pub async fn update_request_status(
        &self,
        id: u64,
        status: impl Into<String>,
        comment: Option<String>,
    ) -> bool {
        let req = UpdateStatusRequest {
            id,
            status: status.into(),
            comment: comment.filter(|c| !c.trim().is_empty()),
        };
        let Some(response) = track(self.state, self.api.send(&req), |e| {
            e.user_message(MSG_UPDATE_STATUS)
        })
        .await
        else {
            return false;
        };

        let updated = response.service_request;
        self.state.update(|s| match s.request_mut(id) {
            Some(slot) => *slot = updated,
            None => log::debug!("request {id} updated but not in the local list"),
        });
        true
    }

    /// Rate a request and attach the stored rating to it.
    pub async fn submit_rating(&self, payload: CreateRatingRequest) -> bool {
        let request_id = payload.service_request_id;
        let Some(rating) = track(self.state, self.api.send(&payload), |e| {
            e.user_message(MSG_SUBMIT_RATING)
        })
        .await
        else {
            return false;
        };

        self.state.update(|s| {
            if let Some(req) = s.request_mut(request_id) {
                req.rating = Some(rating);
            }
        });
        true
    }

    /// Reset the request form (selection, location, address, results).
    pub fn clear(&self) {
        self.state.update(|s| {
            s.selected_service_id = None;
            s.client_location = None;
            s.address.clear();
            s.technicians.clear();
            s.error_message = None;
            s.loading = false;
        });
    }
}

#[cfg(test)]
mod tests;
