use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

#[component]
pub fn LandingPage() -> impl IntoView {
    let router = use_router();

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-md space-y-4">
                    <h1 class="text-5xl font-bold">"FieldServe"</h1>
                    <p class="text-base-content/70">
                        "Find a nearby technician for plumbing, electrical work and more, "
                        "and follow your request until the job is done."
                    </p>
                    <button class="btn btn-primary" on:click=move |_| router.navigate_to(AppRoute::Auth)>
                        "Get started"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    let router = use_router();

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <button class="btn btn-ghost mt-4" on:click=move |_| router.navigate("/")>
                    "Back to start"
                </button>
            </div>
        </div>
    }
}
