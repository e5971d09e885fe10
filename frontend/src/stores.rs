//! 状态仓库
//!
//! 每个仓库持有一个 `RwSignal` 状态并暴露异步动作。
//! 网络动作流程统一：置 `loading`，清除旧错误，执行调用，
//! 成功写入结果，失败记录提示；最后总是复位 `loading`。

pub mod admin;
pub mod service;
pub mod session;

use crate::error::{ClientError, ClientResult};
use leptos::prelude::*;
use std::future::Future;

/// 所有仓库状态共有的标记
pub(crate) trait ActionState: Send + Sync + 'static {
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, message: Option<String>);
}

/// 以上述 loading/错误流程执行 `call`
pub(crate) async fn track<S, T>(
    state: RwSignal<S>,
    call: impl Future<Output = ClientResult<T>>,
    describe: impl FnOnce(&ClientError) -> String,
) -> Option<T>
where
    S: ActionState,
{
    state.update(|s| {
        s.set_loading(true);
        s.set_error(None);
    });

    let outcome = match call.await {
        Ok(value) => Some(value),
        Err(err) => {
            if err.is_unauthorized() {
                log::info!("store action rejected, session ended: {err}");
            } else {
                log::warn!("store action failed: {err}");
            }
            let message = describe(&err);
            state.update(|s| s.set_error(Some(message)));
            None
        }
    };

    state.update(|s| s.set_loading(false));
    outcome
}

/// 记录本地校验失败（不访问网络）
pub(crate) fn reject<S: ActionState>(state: RwSignal<S>, message: &str) {
    let err = ClientError::LocalValidation(message.to_string());
    log::debug!("rejected locally: {err}");
    state.update(|s| s.set_error(Some(err.user_message(message))));
}

#[cfg(test)]
mod test_support;
