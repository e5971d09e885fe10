//! Login / registration forms and the actions behind them.

use super::{ActionState, track};
use crate::api::ApiClient;
use crate::web::route::AppRoute;
use fieldserve_shared::Role;
use fieldserve_shared::protocol::{ApiRequest, LoginRequest, RegisterRequest};
use fieldserve_shared::AuthResponse;
use leptos::prelude::*;

const MSG_LOGIN_FAILED: &str = "Unable to sign in. Check your email and password.";
const MSG_REGISTER_FAILED: &str = "Unable to create the account.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    /// Only client and technician accounts can self-register.
    pub role: Role,
}

impl RegisterForm {
    fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFormState {
    /// 登录表单
    pub login: LoginForm,
    /// 注册表单
    pub register: RegisterForm,
    pub loading: bool,
    pub error_message: Option<String>,
}

impl ActionState for SessionFormState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, message: Option<String>) {
        self.error_message = message;
    }
}

#[derive(Clone, Copy)]
pub struct SessionStore {
    api: ApiClient,
    pub state: RwSignal<SessionFormState>,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwSignal::new(SessionFormState::default()),
        }
    }

    /// Sign in. Returns the landing route of the derived role on success.
    ///
    /// Field checks are left to the API so its messages are shown verbatim.
    pub async fn login(&self, email: &str, password: &str) -> Option<AppRoute> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.authenticate(&req, MSG_LOGIN_FAILED).await
    }

    /// Create an account and sign in with it.
    pub async fn register(&self, form: &RegisterForm) -> Option<AppRoute> {
        let mut req = form.to_request();
        if req.role == Role::Admin {
            log::warn!("admin accounts cannot self-register, registering as client");
            req.role = Role::Client;
        }
        self.authenticate(&req, MSG_REGISTER_FAILED).await
    }

    async fn authenticate<R>(&self, req: &R, fallback: &str) -> Option<AppRoute>
    where
        R: ApiRequest<Response = AuthResponse>,
    {
        let response = track(self.state, self.api.send(req), |e| e.user_message(fallback)).await?;

        let session = self.api.session();
        session.establish(response.access_token, response.user);
        let role = session.role().unwrap_or_default();
        self.state.update(|s| {
            s.login.password.clear();
            s.register.password.clear();
            s.register.password_confirmation.clear();
        });
        Some(AppRoute::landing_for(role))
    }

    /// End the session locally. The API exposes no revocation call, so the
    /// token simply stops being sent.
    pub fn logout(&self) -> AppRoute {
        self.api.session().invalidate();
        self.state.set(SessionFormState::default());
        AppRoute::entry()
    }

    /// Reset the form inputs; the session is untouched.
    pub fn clear(&self) {
        self.state.update(|s| {
            s.login = LoginForm::default();
            s.register = RegisterForm::default();
            s.error_message = None;
        });
    }
}
