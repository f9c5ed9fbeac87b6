//! 登录/注册表单控制器
//!
//! 两条注册路径保持独立：表单提交（无本地校验）与显式注册按钮（先做非空校验）。

use crate::api::PortalApi;
use crate::error::ApiError;
use crate::request::HttpClient;
use crate::store::{Session, SessionStore};
use crate::view::{AuthView, Navigator};
use portal_shared::{Credentials, ViewName, messages};
use tracing::{error, info, warn};

/// 触发表单提交的按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitIntent {
    Login,
    Register,
}

/// 一次表单操作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// 会话已写入并跳转到仪表盘
    LoggedIn(Session),
    Registered,
    /// 本地校验失败，未发出请求
    Invalid,
    /// 服务端拒绝；附带显示给用户的文案
    Rejected(String),
    /// 请求未完成或响应不可用；附带诊断信息
    Failed(String),
}

pub struct AuthController<C, S, V, N> {
    api: PortalApi<C>,
    store: S,
    view: V,
    navigator: N,
}

impl<C, S, V, N> AuthController<C, S, V, N>
where
    C: HttpClient,
    S: SessionStore,
    V: AuthView,
    N: Navigator,
{
    pub fn new(api: PortalApi<C>, store: S, view: V, navigator: N) -> Self {
        Self {
            api,
            store,
            view,
            navigator,
        }
    }

    /// 表单默认提交
    pub async fn submit(&self, credentials: Credentials, intent: SubmitIntent) -> AuthOutcome {
        match intent {
            SubmitIntent::Login => self.login(credentials).await,
            SubmitIntent::Register => match self.api.register(&credentials).await {
                Ok(_) => self.registered(&credentials.username),
                Err(e) => self.failed(e, messages::GENERIC_ERROR),
            },
        }
    }

    /// 显式注册按钮
    ///
    /// 用户名或密码为空时直接提示，不发出任何请求。
    pub async fn register(&self, credentials: Credentials) -> AuthOutcome {
        if !credentials.is_complete() {
            self.view.show_error(messages::CREDENTIALS_REQUIRED);
            return AuthOutcome::Invalid;
        }

        match self.api.register(&credentials).await {
            Ok(body) => match body.error.filter(|e| !e.is_empty()) {
                Some(message) => {
                    warn!(username = %credentials.username, "registration rejected");
                    self.view.show_error(&message);
                    AuthOutcome::Rejected(message)
                }
                None => {
                    let outcome = self.registered(&credentials.username);
                    self.view.clear_error();
                    outcome
                }
            },
            Err(e) => self.failed(e, messages::REGISTRATION_ERROR),
        }
    }

    async fn login(&self, credentials: Credentials) -> AuthOutcome {
        let resp = match self.api.login(&credentials).await {
            Ok(resp) => resp,
            Err(e) => return self.failed(e, messages::GENERIC_ERROR),
        };

        let session = Session {
            token: resp.token,
            username: credentials.username,
            is_admin: resp.is_admin,
        };

        // 必须先写入成功再跳转
        if let Err(e) = session.persist(&self.store) {
            error!(error = %e, "failed to persist session");
            self.view.show_error(messages::GENERIC_ERROR);
            return AuthOutcome::Failed(e.to_string());
        }

        info!(username = %session.username, "login succeeded");
        self.navigator.navigate(ViewName::Dashboard);
        AuthOutcome::LoggedIn(session)
    }

    fn registered(&self, username: &str) -> AuthOutcome {
        info!(username = %username, "registration succeeded");
        self.view.acknowledge(messages::REGISTRATION_SUCCESS);
        self.view.reset_form();
        AuthOutcome::Registered
    }

    fn failed(&self, err: ApiError, transport_message: &str) -> AuthOutcome {
        if let ApiError::Status { status, .. } = &err {
            let text = err
                .server_message()
                .unwrap_or(messages::AUTH_FAILED)
                .to_string();
            warn!(status = *status, message = %text, "authentication request rejected");
            self.view.show_error(&text);
            return AuthOutcome::Rejected(text);
        }

        error!(error = %err, "authentication request failed");
        self.view.show_error(transport_message);
        AuthOutcome::Failed(err.to_string())
    }
}
