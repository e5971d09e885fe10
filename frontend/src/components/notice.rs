//! Auto-dismissing toast.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

const DISMISS_AFTER_MS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// 提示文本
    pub text: String,
    /// 错误样式（红色）还是成功样式（绿色）
    pub is_error: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// Success text when `ok`, otherwise the store's error if it set one.
    pub fn outcome(ok: bool, success: impl Into<String>, failure: Option<String>) -> Option<Self> {
        if ok {
            Some(Self::success(success))
        } else {
            failure.map(Self::error)
        }
    }
}

/// Shows the current notice and clears it after a few seconds. A new notice
/// restarts the countdown.
#[component]
pub fn Toast(
    /// 当前提示，`None` 时隐藏
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let pending = StoredValue::new_local(None::<Timeout>);

    Effect::new(move |_| {
        if notice.with(Option::is_some) {
            let timeout = Timeout::new(DISMISS_AFTER_MS, move || notice.set(None));
            // dropping the previous handle cancels it
            pending.set_value(Some(timeout));
        }
    });

    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if notice.with(|n| n.as_ref().is_some_and(|n| n.is_error)) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notice.with(|n| n.as_ref().map(|n| n.text.clone()).unwrap_or_default())}</span>
                </div>
            </div>
        </Show>
    }
}

/// Inline error banner bound to a store's `error_message`.
#[component]
pub fn ErrorAlert(
    /// 仓库的 `error_message`
    #[prop(into)]
    message: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}
