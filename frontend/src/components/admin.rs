use super::nav::NavBar;
use super::notice::{ErrorAlert, Notice, Toast};
use crate::stores::admin::AdminStore;
use fieldserve_shared::Service;
use leptos::prelude::*;
use leptos::task::spawn_local;

fn stat_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    let store = expect_context::<AdminStore>();
    let notice = RwSignal::new(None::<Notice>);

    spawn_local(async move { store.fetch_dashboard_data().await });

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Toast notice=notice />
                <NavBar />
                <ErrorAlert message=Signal::derive(move || store.state.with(|s| s.error_message.clone())) />

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    {move || {
                        store.state.with(|s| {
                            s.report
                                .stats
                                .iter()
                                .map(|(name, value)| {
                                    let title = name.replace('_', " ");
                                    let value = stat_value(value);
                                    view! {
                                        <div class="stat">
                                            <div class="stat-title">{title}</div>
                                            <div class="stat-value text-primary">{value}</div>
                                        </div>
                                    }
                                })
                                .collect_view()
                        })
                    }}
                </div>

                <ServiceCatalog notice=notice />

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <h3 class="card-title p-6 pb-2">"Users"</h3>
                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Name"</th>
                                        <th>"Email"</th>
                                        <th>"Role"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || store.state.with(|s| s.users.clone())
                                        key=|u| u.id
                                        children=|u| {
                                            let role = u.role().label();
                                            view! {
                                                <tr>
                                                    <td>{u.name}</td>
                                                    <td>{u.email}</td>
                                                    <td><span class="badge badge-ghost">{role}</span></td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"Recent requests"</h3>
                        <ul class="menu">
                            <For
                                each=move || store.state.with(|s| s.report.recent_requests.clone())
                                key=|r| (r.id, r.status.clone())
                                children=|r| {
                                    let service = r.service.map(|s| s.name).unwrap_or_default();
                                    view! {
                                        <li>
                                            <span>{format!("#{} {} · {}", r.id, service, r.status)}</span>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// Catalog table with an add form and inline editing.
#[component]
fn ServiceCatalog(
    /// 页面级提示
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let store = expect_context::<AdminStore>();
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let loading = move || store.state.with(|s| s.loading);

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (n, d) = (name.get_untracked(), description.get_untracked());
        spawn_local(async move {
            if store.create_new_service(&n, &d).await {
                notice.set(Some(Notice::success("Service added")));
                set_name.set(String::new());
                set_description.set(String::new());
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Service catalog"</h3>
                <form class="flex gap-2" on:submit=on_add>
                    <input
                        type="text"
                        placeholder="Name"
                        class="input input-bordered input-sm"
                        prop:value=name
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        placeholder="Description"
                        class="input input-bordered input-sm flex-1"
                        prop:value=description
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    />
                    <button class="btn btn-sm btn-primary" disabled=loading>"Add"</button>
                </form>
                <For
                    each=move || store.state.with(|s| s.services.clone())
                    key=|svc| (svc.id, svc.name.clone(), svc.description.clone())
                    children=move |svc| view! { <ServiceRow svc=svc notice=notice /> }
                />
            </div>
        </div>
    }
}

#[component]
fn ServiceRow(
    /// 目录条目（编辑前的值）
    svc: Service,
    /// 页面级提示
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let store = expect_context::<AdminStore>();
    let id = svc.id;
    let (editing, set_editing) = signal(false);
    let (name, set_name) = signal(svc.name.clone());
    let (description, set_description) = signal(svc.description.clone().unwrap_or_default());

    let on_save = move |_| {
        let (n, d) = (name.get_untracked(), description.get_untracked());
        spawn_local(async move {
            let ok = store.update_service(id, &n, &d).await;
            let failure = store.state.with_untracked(|s| s.error_message.clone());
            notice.set(Notice::outcome(ok, "Service updated", failure));
            if ok {
                set_editing.set(false);
            }
        });
    };

    view! {
        <div class="flex gap-2 items-center border-b border-base-200 py-2">
            <Show
                when=move || editing.get()
                fallback=move || {
                    let svc = svc.clone();
                    view! {
                        <span class="font-bold">{svc.name}</span>
                        <span class="text-sm text-base-content/70 flex-1">{svc.description.unwrap_or_default()}</span>
                        <button class="btn btn-ghost btn-sm" on:click=move |_| set_editing.set(true)>
                            "Edit"
                        </button>
                    }
                }
            >
                <input
                    type="text"
                    class="input input-bordered input-sm"
                    prop:value=name
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    class="input input-bordered input-sm flex-1"
                    prop:value=description
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                />
                <button class="btn btn-sm btn-primary" on:click=on_save>"Save"</button>
                <button class="btn btn-sm btn-ghost" on:click=move |_| set_editing.set(false)>
                    "Cancel"
                </button>
            </Show>
        </div>
    }
}
