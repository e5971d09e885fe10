use super::notice::ErrorAlert;
use crate::stores::session::{LoginForm, RegisterForm, SessionStore};
use crate::web::router::use_router;
use fieldserve_shared::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Sign-in and sign-up on one page.
#[component]
pub fn AuthPage() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let (show_register, set_show_register) = signal(false);

    let switch_to = move |register: bool| {
        store.clear();
        set_show_register.set(register);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"FieldServe"</h1>
                <div role="tablist" class="tabs tabs-boxed">
                    <a
                        role="tab"
                        class=move || if show_register.get() { "tab" } else { "tab tab-active" }
                        on:click=move |_| switch_to(false)
                    >
                        "Sign in"
                    </a>
                    <a
                        role="tab"
                        class=move || if show_register.get() { "tab tab-active" } else { "tab" }
                        on:click=move |_| switch_to(true)
                    >
                        "Create account"
                    </a>
                </div>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <ErrorAlert message=Signal::derive(move || store.state.with(|s| s.error_message.clone())) />
                    <Show when=move || show_register.get() fallback=|| view! { <LoginCard /> }>
                        <RegisterCard />
                    </Show>
                </div>
            </div>
        </div>
    }
}

#[component]
fn LoginCard() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let router = use_router();
    let loading = move || store.state.with(|s| s.loading);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let LoginForm { email, password } = store.state.with_untracked(|s| s.login.clone());
        spawn_local(async move {
            if let Some(landing) = store.login(&email, &password).await {
                if router.current_route().get_untracked() != landing {
                    router.navigate_to(landing);
                }
            }
        });
    };

    view! {
        <form class="card-body" on:submit=on_submit>
            <div class="form-control">
                <label class="label" for="email">
                    <span class="label-text">"Email"</span>
                </label>
                <input
                    id="email"
                    type="email"
                    class="input input-bordered"
                    prop:value=move || store.state.with(|s| s.login.email.clone())
                    on:input=move |ev| store.state.update(|s| s.login.email = event_target_value(&ev))
                />
            </div>
            <div class="form-control">
                <label class="label" for="password">
                    <span class="label-text">"Password"</span>
                </label>
                <input
                    id="password"
                    type="password"
                    class="input input-bordered"
                    prop:value=move || store.state.with(|s| s.login.password.clone())
                    on:input=move |ev| store.state.update(|s| s.login.password = event_target_value(&ev))
                />
            </div>
            <div class="form-control mt-6">
                <button class="btn btn-primary" disabled=loading>
                    {move || if loading() {
                        view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                    } else {
                        "Sign in".into_any()
                    }}
                </button>
            </div>
        </form>
    }
}

#[component]
fn RegisterCard() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let router = use_router();
    let loading = move || store.state.with(|s| s.loading);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form: RegisterForm = store.state.with_untracked(|s| s.register.clone());
        spawn_local(async move {
            if let Some(landing) = store.register(&form).await {
                if router.current_route().get_untracked() != landing {
                    router.navigate_to(landing);
                }
            }
        });
    };

    view! {
        <form class="card-body" on:submit=on_submit>
            {text_field(store, "name", "Name", "text", |f| &f.name, |f, v| f.name = v)}
            {text_field(store, "reg-email", "Email", "email", |f| &f.email, |f, v| f.email = v)}
            {text_field(store, "reg-password", "Password", "password", |f| &f.password, |f, v| f.password = v)}
            {text_field(
                store,
                "reg-password-confirmation",
                "Confirm password",
                "password",
                |f| &f.password_confirmation,
                |f, v| f.password_confirmation = v,
            )}
            <div class="form-control">
                <label class="label" for="role">
                    <span class="label-text">"I am a"</span>
                </label>
                <select
                    id="role"
                    class="select select-bordered"
                    on:change=move |ev| {
                        let role = match event_target_value(&ev).as_str() {
                            "tecnico" => Role::Technician,
                            _ => Role::Client,
                        };
                        store.state.update(|s| s.register.role = role);
                    }
                >
                    <option value="cliente" selected=move || store.state.with(|s| s.register.role == Role::Client)>
                        "Client"
                    </option>
                    <option value="tecnico" selected=move || store.state.with(|s| s.register.role == Role::Technician)>
                        "Technician"
                    </option>
                </select>
            </div>
            <div class="form-control mt-6">
                <button class="btn btn-primary" disabled=loading>
                    {move || if loading() {
                        view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                    } else {
                        "Create account".into_any()
                    }}
                </button>
            </div>
        </form>
    }
}

fn text_field(
    store: SessionStore,
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    get: fn(&RegisterForm) -> &String,
    set: fn(&mut RegisterForm, String),
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                class="input input-bordered"
                prop:value=move || store.state.with(|s| get(&s.register).clone())
                on:input=move |ev| store.state.update(|s| set(&mut s.register, event_target_value(&ev)))
            />
        </div>
    }
}
