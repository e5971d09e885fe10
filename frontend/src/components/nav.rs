use crate::session::SessionContext;
use crate::stores::session::SessionStore;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use fieldserve_shared::Role;
use leptos::prelude::*;

fn links_for(role: Role) -> &'static [(AppRoute, &'static str)] {
    match role {
        Role::Client => &[
            (AppRoute::Dashboard, "Request a service"),
            (AppRoute::ServicesStatus, "My requests"),
        ],
        Role::Technician => &[(AppRoute::TechnicianDashboard, "My jobs")],
        Role::Admin => &[(AppRoute::AdminDashboard, "Administration")],
    }
}

/// Top bar for signed-in pages.
#[component]
pub fn NavBar() -> impl IntoView {
    let session = expect_context::<SessionContext>().state_signal();
    let store = expect_context::<SessionStore>();
    let router = use_router();

    let role = move || session.with(|s| s.role().unwrap_or_default());
    let user_name = move || {
        session.with(|s| s.user.as_ref().map(|u| u.name.clone()).unwrap_or_default())
    };

    let on_logout = move |_| {
        let entry = store.logout();
        router.navigate_to(entry);
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <a class="btn btn-ghost text-xl">"FieldServe"</a>
                {move || {
                    links_for(role())
                        .iter()
                        .map(|(route, label)| {
                            let route = *route;
                            view! {
                                <button
                                    class=move || {
                                        if router.current_route().get() == route {
                                            "btn btn-sm btn-primary"
                                        } else {
                                            "btn btn-sm btn-ghost"
                                        }
                                    }
                                    on:click=move |_| router.navigate_to(route)
                                >
                                    {*label}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <div class="flex-none gap-2">
                <span class="badge badge-neutral hidden md:inline-flex">
                    {user_name} " · " {move || role().label()}
                </span>
                <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                    "Sign out"
                </button>
            </div>
        </div>
    }
}
