//! Client views: request a service and follow existing requests.

use super::nav::NavBar;
use super::notice::{ErrorAlert, Notice, Toast};
use crate::stores::service::ServiceStore;
use fieldserve_shared::ServiceRequest;
use fieldserve_shared::protocol::CreateRatingRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub(crate) const STATUS_CANCELLED: &str = "cancelled";

fn status_badge(status: &str) -> &'static str {
    match status {
        "pending" => "badge badge-warning",
        "accepted" | "in_progress" => "badge badge-info",
        "completed" => "badge badge-success",
        STATUS_CANCELLED | "rejected" => "badge badge-error",
        _ => "badge badge-ghost",
    }
}

pub(crate) fn status_label(req: &ServiceRequest) -> impl IntoView + use<> {
    let class = status_badge(&req.status);
    let text = req.status.replace('_', " ");
    view! { <span class=class>{text}</span> }
}

/// Service selection, location, technician search and request creation.
#[component]
pub fn ClientDashboard() -> impl IntoView {
    let store = expect_context::<ServiceStore>();
    let notice = RwSignal::new(None::<Notice>);
    let (lat, set_lat) = signal(String::new());
    let (lng, set_lng) = signal(String::new());

    spawn_local(async move { store.fetch_services().await });

    let loading = move || store.state.with(|s| s.loading);
    let apply_location = move || {
        if let (Ok(lat), Ok(lng)) = (lat.get_untracked().parse(), lng.get_untracked().parse()) {
            store.set_location(lat, lng);
        }
    };

    let on_search = move |_| {
        apply_location();
        spawn_local(async move { store.find_technicians().await });
    };

    let on_create = move |_| {
        apply_location();
        spawn_local(async move {
            if store.create_service_request().await.is_some() {
                notice.set(Some(Notice::success("Request sent")));
                store.clear();
                set_lat.set(String::new());
                set_lng.set(String::new());
            }
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-8">
                <Toast notice=notice />
                <NavBar />
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body space-y-2">
                        <h3 class="card-title">"Request a service"</h3>
                        <ErrorAlert message=Signal::derive(move || store.state.with(|s| s.error_message.clone())) />
                        <select
                            class="select select-bordered w-full"
                            on:change=move |ev| store.set_selected_service(event_target_value(&ev).parse().ok())
                        >
                            <option value="" selected=move || store.state.with(|s| s.selected_service_id.is_none())>
                                "Choose a service"
                            </option>
                            <For
                                each=move || store.state.with(|s| s.services.clone())
                                key=|svc| (svc.id, svc.name.clone())
                                children=move |svc| {
                                    let id = svc.id;
                                    view! {
                                        <option
                                            value=id.to_string()
                                            selected=move || store.state.with(|s| s.selected_service_id == Some(id))
                                        >
                                            {svc.name}
                                        </option>
                                    }
                                }
                            />
                        </select>
                        <p class="text-sm text-base-content/70">
                            {move || store.state.with(|s| {
                                s.selected_service().and_then(|svc| svc.description.clone()).unwrap_or_default()
                            })}
                        </p>
                        <div class="grid grid-cols-2 gap-2">
                            <input
                                type="number"
                                step="any"
                                placeholder="Latitude"
                                class="input input-bordered"
                                prop:value=lat
                                on:input=move |ev| set_lat.set(event_target_value(&ev))
                            />
                            <input
                                type="number"
                                step="any"
                                placeholder="Longitude"
                                class="input input-bordered"
                                prop:value=lng
                                on:input=move |ev| set_lng.set(event_target_value(&ev))
                            />
                        </div>
                        <input
                            type="text"
                            placeholder="Address"
                            class="input input-bordered w-full"
                            prop:value=move || store.state.with(|s| s.address.clone())
                            on:input=move |ev| store.set_address(event_target_value(&ev))
                        />
                        <div class="card-actions justify-end">
                            <button class="btn btn-outline" disabled=loading on:click=on_search>
                                "Find technicians"
                            </button>
                            <button class="btn btn-primary" disabled=loading on:click=on_create>
                                "Send request"
                            </button>
                        </div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"Technicians nearby"</h3>
                        <Show
                            when=move || store.state.with(|s| !s.technicians.is_empty())
                            fallback=|| view! { <p class="text-base-content/50">"No results yet."</p> }
                        >
                            <ul class="menu">
                                <For
                                    each=move || store.state.with(|s| s.technicians.clone())
                                    key=|t| t.id
                                    children=|t| {
                                        let distance = t.distance.map(|d| format!("{d:.1} km")).unwrap_or_default();
                                        view! {
                                            <li>
                                                <span>
                                                    <strong>{t.name}</strong>
                                                    " " {t.phone.unwrap_or_default()}
                                                    " " <span class="badge">{distance}</span>
                                                </span>
                                            </li>
                                        }
                                    }
                                />
                            </ul>
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// The client's requests: cancel pending ones, rate completed ones.
#[component]
pub fn ServicesStatusPage() -> impl IntoView {
    let store = expect_context::<ServiceStore>();
    let notice = RwSignal::new(None::<Notice>);

    spawn_local(async move { store.fetch_my_requests().await });

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-8">
                <Toast notice=notice />
                <NavBar />
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"My requests"</h3>
                        <ErrorAlert message=Signal::derive(move || store.state.with(|s| s.error_message.clone())) />
                        <Show
                            when=move || store.state.with(|s| !s.my_requests.is_empty())
                            fallback=|| view! { <p class="text-base-content/50">"You have no requests yet."</p> }
                        >
                            <For
                                each=move || store.state.with(|s| s.my_requests.clone())
                                key=|r| (r.id, r.status.clone(), r.is_rated())
                                children=move |req| view! { <RequestRow req=req notice=notice /> }
                            />
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn RequestRow(
    /// 要展示的请求
    req: ServiceRequest,
    /// 页面级提示
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let store = expect_context::<ServiceStore>();
    let id = req.id;
    let service_name = req.service.as_ref().map(|s| s.name.clone()).unwrap_or_default();
    let technician = req.technician.as_ref().map(|t| t.name.clone());
    let can_cancel = req.status == "pending";
    let can_rate = req.status == "completed" && !req.is_rated();
    let rating = req.rating.as_ref().map(|r| format!("{} / 5", r.score));

    let (score, set_score) = signal(5u8);
    let (comment, set_comment) = signal(String::new());

    let on_cancel = move |_| {
        spawn_local(async move {
            let ok = store.update_request_status(id, STATUS_CANCELLED, None).await;
            let failure = store.state.with_untracked(|s| s.error_message.clone());
            notice.set(Notice::outcome(ok, "Request cancelled", failure));
        });
    };

    let on_rate = move |_| {
        let payload = CreateRatingRequest {
            service_request_id: id,
            score: score.get_untracked(),
            comment: Some(comment.get_untracked()).filter(|c| !c.trim().is_empty()),
        };
        spawn_local(async move {
            let ok = store.submit_rating(payload).await;
            let failure = store.state.with_untracked(|s| s.error_message.clone());
            notice.set(Notice::outcome(ok, "Thanks for your rating", failure));
        });
    };

    view! {
        <div class="border-b border-base-200 py-3 space-y-2">
            <div class="flex items-center gap-2">
                <span class="font-bold">{format!("#{id}")} " " {service_name}</span>
                {status_label(&req)}
                {technician.map(|name| view! { <span class="text-sm">"Technician: " {name}</span> })}
                {rating.map(|r| view! { <span class="badge badge-outline">{r}</span> })}
            </div>
            <p class="text-sm text-base-content/70">{req.comments.clone().unwrap_or_default()}</p>
            <Show when=move || can_cancel>
                <button class="btn btn-sm btn-outline btn-error" on:click=on_cancel>
                    "Cancel"
                </button>
            </Show>
            <Show when=move || can_rate>
                <div class="flex gap-2 items-center">
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| set_score.set(event_target_value(&ev).parse().unwrap_or(5))
                    >
                        {(1..=5u8)
                            .rev()
                            .map(|n| view! { <option value=n.to_string()>{n}</option> })
                            .collect_view()}
                    </select>
                    <input
                        type="text"
                        placeholder="Comment (optional)"
                        class="input input-bordered input-sm"
                        prop:value=comment
                        on:input=move |ev| set_comment.set(event_target_value(&ev))
                    />
                    <button class="btn btn-sm btn-primary" on:click=on_rate>
                        "Rate"
                    </button>
                </div>
            </Show>
        </div>
    }
}
