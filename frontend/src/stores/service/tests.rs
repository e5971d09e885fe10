use super::*;
use crate::stores::test_support::*;
use fieldserve_shared::protocol::HttpMethod;
use serde_json::json;

fn request_json(id: u64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "service_id": 1,
        "client_latitude": 19.43,
        "client_longitude": -99.13,
        "status": status,
        "comments": "Calle 1"
    })
}

fn store_for(h: &Harness) -> ServiceStore {
    ServiceStore::new(h.api, 10)
}

async fn with_requests(h: &Harness, store: &ServiceStore, ids: &[u64]) {
    let list: Vec<_> = ids.iter().map(|id| request_json(*id, "pending")).collect();
    h.http.mock_response(
        HttpMethod::Get,
        &url("/service-requests"),
        200,
        serde_json::Value::Array(list),
    );
    store.fetch_my_requests().await;
}

// =========================================================
// Catalog & form setters
// =========================================================

#[tokio::test]
async fn test_fetch_services_replaces_catalog() {
    let h = Harness::new();
    h.http.mock_response(
        HttpMethod::Get,
        &url("/services"),
        200,
        json!([
            { "id": 1, "name": "Plumbing", "description": "Leaks and pipes" },
            { "id": 2, "name": "Electrical" }
        ]),
    );
    let store = store_for(&h);

    store.fetch_services().await;

    let state = store.state.get_untracked();
    assert_eq!(state.services.len(), 2);
    assert_eq!(state.services[1].description, None);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_fetch_services_failure_keeps_previous_catalog() {
    let h = Harness::new();
    let store = store_for(&h);
    store.state.update(|s| {
        s.services = vec![Service {
            id: 9,
            name: "Cached".to_string(),
            description: None,
        }]
    });
    h.http.mock_failure(HttpMethod::Get, &url("/services"));

    store.fetch_services().await;

    let state = store.state.get_untracked();
    assert_eq!(state.services.len(), 1);
    assert_eq!(state.error_message.as_deref(), Some(MSG_LOAD_SERVICES));
    assert!(!state.loading);
}

#[test]
fn test_setters_and_selected_service() {
    let h = Harness::new();
    let store = store_for(&h);
    store.state.update(|s| {
        s.services = vec![Service {
            id: 3,
            name: "Locksmith".to_string(),
            description: None,
        }]
    });

    store.set_selected_service(Some(3));
    store.set_location(19.4, -99.1);
    store.set_address("Av. Reforma 222");

    let state = store.state.get_untracked();
    assert_eq!(state.selected_service().map(|s| s.name.as_str()), Some("Locksmith"));
    assert_eq!(state.client_location, Some(GeoPoint::new(19.4, -99.1)));
    assert_eq!(state.address, "Av. Reforma 222");
}

// =========================================================
// find_technicians
// =========================================================

#[tokio::test]
async fn test_find_technicians_without_selection_never_hits_network() {
    let h = Harness::new();
    let store = store_for(&h);

    store.find_technicians().await;

    assert_eq!(h.http.sent_count(), 0);
    let state = store.state.get_untracked();
    assert_eq!(state.error_message.as_deref(), Some(MSG_SELECT_SERVICE_AND_LOCATION));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_find_technicians_needs_both_inputs() {
    let h = Harness::new();
    let store = store_for(&h);

    store.set_selected_service(Some(1));
    store.find_technicians().await;
    assert_eq!(h.http.sent_count(), 0);

    store.set_selected_service(None);
    store.set_location(1.0, 2.0);
    store.find_technicians().await;
    assert_eq!(h.http.sent_count(), 0);
}

#[tokio::test]
async fn test_find_technicians_sends_search_and_stores_matches() {
    let h = Harness::new().signed_in_as(client_user());
    h.http.mock_response(
        HttpMethod::Get,
        &url("/technicians?service_id=2&latitude=19.5&longitude=-99.5&radius=10"),
        200,
        json!([{ "id": 20, "name": "Tito", "distance": 1.2 }]),
    );
    let store = store_for(&h);
    store.set_selected_service(Some(2));
    store.set_location(19.5, -99.5);

    store.find_technicians().await;

    let state = store.state.get_untracked();
    assert_eq!(state.technicians.len(), 1);
    assert_eq!(state.technicians[0].distance, Some(1.2));
    assert!(state.error_message.is_none());
}

// =========================================================
// create_service_request
// =========================================================

#[tokio::test]
async fn test_create_request_requires_address() {
    let h = Harness::new();
    let store = store_for(&h);
    store.set_selected_service(Some(1));
    store.set_location(19.43, -99.13);
    store.set_address("   ");

    assert!(store.create_service_request().await.is_none());
    assert_eq!(h.http.sent_count(), 0);
    assert_eq!(
        store.state.get_untracked().error_message.as_deref(),
        Some(MSG_COMPLETE_ALL_FIELDS)
    );
}

#[tokio::test]
async fn test_create_request_posts_and_appends() {
    let h = Harness::new().signed_in_as(client_user());
    h.http.mock_response(
        HttpMethod::Post,
        &url("/service-requests"),
        201,
        request_json(77, "pending"),
    );
    let store = store_for(&h);
    store.set_selected_service(Some(1));
    store.set_location(19.43, -99.13);
    store.set_address("Calle 1");

    let created = store.create_service_request().await.unwrap();

    assert_eq!(created.id, 77);
    let body: serde_json::Value =
        serde_json::from_str(h.http.last().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "service_id": 1,
            "client_latitude": 19.43,
            "client_longitude": -99.13,
            "comments": "Calle 1"
        })
    );
    assert_eq!(store.state.get_untracked().my_requests, vec![created]);
}

// =========================================================
// update_request_status
// =========================================================

#[tokio::test]
async fn test_update_status_replaces_only_matching_entry() {
    let h = Harness::new().signed_in_as(technician_user());
    let store = store_for(&h);
    with_requests(&h, &store, &[1, 2, 3]).await;
    let before = store.state.get_untracked().my_requests;

    let mut updated = request_json(2, "completed");
    updated["comments"] = json!("done, replaced valve");
    h.http.mock_response(
        HttpMethod::Patch,
        &url("/service-requests/2/status"),
        200,
        json!({ "message": "ok", "serviceRequest": updated }),
    );

    assert!(
        store
            .update_request_status(2, "completed", Some("replaced valve".to_string()))
            .await
    );

    let after = store.state.get_untracked().my_requests;
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(after[1].status, "completed");
    assert_eq!(after[1].comments.as_deref(), Some("done, replaced valve"));
}

#[tokio::test]
async fn test_update_status_drops_blank_comment() {
    let h = Harness::new().signed_in_as(technician_user());
    let store = store_for(&h);
    h.http.mock_response(
        HttpMethod::Patch,
        &url("/service-requests/5/status"),
        200,
        json!({ "serviceRequest": request_json(5, "accepted") }),
    );

    assert!(store.update_request_status(5, "accepted", Some("  ".to_string())).await);

    let body: serde_json::Value =
        serde_json::from_str(h.http.last().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "status": "accepted" }));
}

#[tokio::test]
async fn test_update_status_failure_leaves_list_untouched() {
    let h = Harness::new().signed_in_as(technician_user());
    let store = store_for(&h);
    with_requests(&h, &store, &[1, 2]).await;
    let before = store.state.get_untracked().my_requests;
    h.http.mock_response(
        HttpMethod::Patch,
        &url("/service-requests/1/status"),
        500,
        json!({ "message": "boom" }),
    );

    assert!(!store.update_request_status(1, "completed", None).await);

    let state = store.state.get_untracked();
    assert_eq!(state.my_requests, before);
    assert_eq!(state.error_message.as_deref(), Some(MSG_UPDATE_STATUS));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_forbidden_update_evicts_session() {
    let h = Harness::new().signed_in_as(technician_user());
    let store = store_for(&h);
    h.http.mock_response(
        HttpMethod::Patch,
        &url("/service-requests/1/status"),
        403,
        json!({ "message": "This action is unauthorized." }),
    );

    assert!(!store.update_request_status(1, "completed", None).await);
    assert!(!h.session().is_authenticated());
    assert_eq!(
        store.state.get_untracked().error_message.as_deref(),
        Some(MSG_UPDATE_STATUS)
    );
}

// =========================================================
// submit_rating
// =========================================================

#[tokio::test]
async fn test_submit_rating_attaches_to_request() {
    let h = Harness::new().signed_in_as(client_user());
    let store = store_for(&h);
    with_requests(&h, &store, &[8, 9]).await;
    h.http.mock_response(
        HttpMethod::Post,
        &url("/ratings"),
        201,
        json!({ "id": 100, "service_request_id": 9, "score": 5, "comment": "Great" }),
    );

    let ok = store
        .submit_rating(CreateRatingRequest {
            service_request_id: 9,
            score: 5,
            comment: Some("Great".to_string()),
        })
        .await;

    assert!(ok);
    let state = store.state.get_untracked();
    assert!(state.my_requests[0].rating.is_none());
    let rating = state.my_requests[1].rating.as_ref().unwrap();
    assert_eq!(rating.score, 5);
    assert_eq!(rating.id, Some(100));
}

#[tokio::test]
async fn test_submit_rating_failure_reports_error() {
    let h = Harness::new().signed_in_as(client_user());
    let store = store_for(&h);
    h.http.mock_response(
        HttpMethod::Post,
        &url("/ratings"),
        422,
        json!({ "errors": { "score": ["The score must be between 1 and 5."] } }),
    );

    let ok = store
        .submit_rating(CreateRatingRequest {
            service_request_id: 1,
            score: 9,
            comment: None,
        })
        .await;

    assert!(!ok);
    assert_eq!(
        store.state.get_untracked().error_message.as_deref(),
        Some("The score must be between 1 and 5.")
    );
}

// =========================================================
// clear
// =========================================================

#[tokio::test]
async fn test_clear_resets_form_but_keeps_requests() {
    let h = Harness::new().signed_in_as(client_user());
    let store = store_for(&h);
    with_requests(&h, &store, &[1]).await;
    store.set_selected_service(Some(1));
    store.set_location(1.0, 1.0);
    store.set_address("x");

    store.clear();

    let state = store.state.get_untracked();
    assert!(state.selected_service_id.is_none());
    assert!(state.client_location.is_none());
    assert!(state.address.is_empty());
    assert_eq!(state.my_requests.len(), 1);
}
