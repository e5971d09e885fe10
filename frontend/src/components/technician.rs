use super::client::{STATUS_CANCELLED, status_label};
use super::nav::NavBar;
use super::notice::{ErrorAlert, Notice, Toast};
use crate::stores::service::ServiceStore;
use fieldserve_shared::ServiceRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Statuses a technician can move a job to from `status`.
fn next_statuses(status: &str) -> &'static [(&'static str, &'static str)] {
    match status {
        "pending" => &[("accepted", "Accept"), ("rejected", "Reject")],
        "accepted" => &[("in_progress", "Start"), (STATUS_CANCELLED, "Cancel")],
        "in_progress" => &[("completed", "Complete")],
        _ => &[],
    }
}

#[component]
pub fn TechnicianDashboard() -> impl IntoView {
    let store = expect_context::<ServiceStore>();
    let notice = RwSignal::new(None::<Notice>);

    spawn_local(async move { store.fetch_my_requests().await });

    let refresh = move |_| spawn_local(async move { store.fetch_my_requests().await });

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-8">
                <Toast notice=notice />
                <NavBar />
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <div class="flex items-center justify-between">
                            <h3 class="card-title">"Assigned jobs"</h3>
                            <button
                                class="btn btn-ghost btn-sm"
                                disabled=move || store.state.with(|s| s.loading)
                                on:click=refresh
                            >
                                "Refresh"
                            </button>
                        </div>
                        <ErrorAlert message=Signal::derive(move || store.state.with(|s| s.error_message.clone())) />
                        <Show
                            when=move || store.state.with(|s| !s.my_requests.is_empty())
                            fallback=|| view! { <p class="text-base-content/50">"No jobs assigned."</p> }
                        >
                            <For
                                each=move || store.state.with(|s| s.my_requests.clone())
                                key=|r| (r.id, r.status.clone())
                                children=move |req| view! { <JobRow req=req notice=notice /> }
                            />
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn JobRow(
    /// 分配给技师的请求
    req: ServiceRequest,
    /// 页面级提示
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let store = expect_context::<ServiceStore>();
    let id = req.id;
    let (comment, set_comment) = signal(String::new());
    let location = req
        .client_location()
        .map(|p| format!("{:.5}, {:.5}", p.lat, p.lng))
        .unwrap_or_default();
    let actions = next_statuses(&req.status);

    let move_to = move |status: &'static str| {
        let note = Some(comment.get_untracked());
        spawn_local(async move {
            let ok = store.update_request_status(id, status, note).await;
            let failure = store.state.with_untracked(|s| s.error_message.clone());
            notice.set(Notice::outcome(ok, format!("Job #{id} updated"), failure));
        });
    };

    view! {
        <div class="border-b border-base-200 py-3 space-y-2">
            <div class="flex items-center gap-2">
                <span class="font-bold">
                    {format!("#{id}")} " "
                    {req.service.as_ref().map(|s| s.name.clone()).unwrap_or_default()}
                </span>
                {status_label(&req)}
                <span class="text-sm text-base-content/70">{location}</span>
            </div>
            <p class="text-sm">{req.comments.clone().unwrap_or_default()}</p>
            <Show when=move || !actions.is_empty()>
                <div class="flex gap-2 items-center">
                    <input
                        type="text"
                        placeholder="Comment (optional)"
                        class="input input-bordered input-sm"
                        prop:value=comment
                        on:input=move |ev| set_comment.set(event_target_value(&ev))
                    />
                    {actions
                        .iter()
                        .map(|(status, label)| {
                            let status = *status;
                            view! {
                                <button class="btn btn-sm btn-primary" on:click=move |_| move_to(status)>
                                    {*label}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}
