//! 仪表盘控制器
//!
//! 状态机：
//! - `Unauthenticated → Redirected`：没有 token，跳转登录页，本次激活到此为止
//! - `Unauthenticated → Active`：入口检查通过；每次 tick 与用户列表请求都停留在 `Active`
//! - `Active → Terminated → Redirected`：注销

use crate::api::PortalApi;
use crate::error::ApiError;
use crate::poll::PollHandle;
use crate::request::HttpClient;
use crate::store::{Session, SessionStore, StoredSession};
use crate::view::{DashboardView, Navigator, ServicesPanel, user_lines, welcome_message};
use futures::future::{AbortHandle, Abortable, LocalBoxFuture};
use futures::{FutureExt, Stream, StreamExt};
use portal_shared::{ViewName, messages};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Unauthenticated,
    Active,
    Terminated,
    Redirected,
}

/// 一次服务状态刷新的结果
#[derive(Debug)]
pub enum RefreshOutcome {
    /// 渲染了 n 个服务
    Rendered(usize),
    /// 已显示失败文案
    Failed(ApiError),
    /// 未激活，或上一次刷新仍在进行
    Skipped,
}

/// 离开作用域时清除 in-flight 标记，请求 future 被中途 drop 时同样生效
struct InFlightGuard<'a>(&'a Cell<bool>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct DashboardController<C, S, V, N> {
    api: PortalApi<C>,
    store: S,
    view: V,
    navigator: N,
    state: Cell<DashboardState>,
    session: RefCell<Option<StoredSession>>,
    services_in_flight: Cell<bool>,
    poll: RefCell<Option<AbortHandle>>,
}

impl<C, S, V, N> DashboardController<C, S, V, N>
where
    C: HttpClient,
    S: SessionStore,
    V: DashboardView,
    N: Navigator,
{
    pub fn new(api: PortalApi<C>, store: S, view: V, navigator: N) -> Self {
        Self {
            api,
            store,
            view,
            navigator,
            state: Cell::new(DashboardState::Unauthenticated),
            session: RefCell::new(None),
            services_in_flight: Cell::new(false),
            poll: RefCell::new(None),
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state.get()
    }

    /// 入口检查
    ///
    /// 没有 token 时立即跳转登录页并返回 `None`，不做任何请求或渲染。
    /// 只在第一次调用时生效。
    pub fn activate(&self) -> Option<StoredSession> {
        if self.state.get() != DashboardState::Unauthenticated {
            return self.session.borrow().clone();
        }

        let Some(session) = StoredSession::load(&self.store) else {
            info!("no session token, redirecting to login");
            self.state.set(DashboardState::Redirected);
            self.navigator.navigate(ViewName::Login);
            return None;
        };

        self.view.show_welcome(&welcome_message(&session.username));
        self.state.set(DashboardState::Active);
        *self.session.borrow_mut() = Some(session.clone());
        Some(session)
    }

    /// 清除 `token` 与 `username` 并跳转登录页，不请求服务端
    pub fn logout(&self) {
        if self.state.get() != DashboardState::Active {
            return;
        }

        self.state.set(DashboardState::Terminated);
        if let Some(abort) = self.poll.borrow_mut().take() {
            abort.abort();
        }
        if let Err(e) = Session::clear(&self.store) {
            error!(error = %e, "failed to clear session");
        }
        *self.session.borrow_mut() = None;

        info!("logged out");
        self.navigator.navigate(ViewName::Login);
        self.state.set(DashboardState::Redirected);
    }

    /// 获取并渲染用户列表
    ///
    /// 失败时弹出提示，列表保持原样。
    pub async fn load_users(&self) -> Result<usize, ApiError> {
        let Some(token) = self.active_token() else {
            return Ok(0);
        };

        match self.api.list_users(&token).await {
            Ok(users) => {
                if !self.is_active() {
                    return Ok(0);
                }
                let lines = user_lines(&users);
                self.view.render_users(&lines);
                debug!(count = lines.len(), "rendered user list");
                Ok(lines.len())
            }
            Err(e) => {
                error!(error = %e, "failed to load users");
                if self.is_active() {
                    self.view.alert(messages::USERS_FAILED);
                }
                Err(e)
            }
        }
    }

    /// 获取并整体替换服务状态
    ///
    /// 同一时刻最多一个请求；前一次尚未完成时本次跳过。
    pub async fn refresh_services(&self) -> RefreshOutcome {
        let Some(token) = self.active_token() else {
            return RefreshOutcome::Skipped;
        };
        if self.services_in_flight.replace(true) {
            debug!("services refresh still in flight, skipping tick");
            return RefreshOutcome::Skipped;
        }

        let result = {
            let _in_flight = InFlightGuard(&self.services_in_flight);
            self.api.services_status(&token).await
        };

        // 注销后到达的响应直接丢弃
        if !self.is_active() {
            return RefreshOutcome::Skipped;
        }

        match result {
            Ok(services) => {
                self.view
                    .render_services(&ServicesPanel::from_statuses(&services));
                debug!(count = services.len(), "rendered services status");
                RefreshOutcome::Rendered(services.len())
            }
            Err(e) => {
                warn!(error = %e, "failed to load services status");
                self.view.render_services(&ServicesPanel::Unavailable);
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// 首次加载用户列表与服务状态（并发），之后每个 tick 刷新一次服务状态
    ///
    /// tick 流结束且首次加载完成后返回。
    pub async fn run<T>(&self, ticks: T)
    where
        T: Stream<Item = ()>,
    {
        if !self.is_active() {
            return;
        }

        let initial = async {
            let (_users, _services) = futures::join!(self.load_users(), self.refresh_services());
        };
        let recurring = ticks.for_each_concurrent(None, |()| {
            self.refresh_services().map(|_| ())
        });

        futures::join!(initial, recurring);
    }

    fn active_token(&self) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        self.session.borrow().as_ref().map(|s| s.token.clone())
    }

    fn is_active(&self) -> bool {
        self.state.get() == DashboardState::Active
    }
}

impl<C, S, V, N> DashboardController<C, S, V, N>
where
    C: HttpClient + 'static,
    S: SessionStore + 'static,
    V: DashboardView + 'static,
    N: Navigator + 'static,
{
    /// 启动可取消的 `run`
    ///
    /// 返回的 future 由调用方交给执行器；句柄被 cancel/drop 或用户注销时任务结束。
    pub fn start<T>(self: &Rc<Self>, ticks: T) -> (LocalBoxFuture<'static, ()>, PollHandle)
    where
        T: Stream<Item = ()> + 'static,
    {
        let (abort, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.poll.replace(Some(abort.clone())) {
            previous.abort();
        }

        let this = Rc::clone(self);
        let task = async move {
            if Abortable::new(this.run(ticks), registration).await.is_err() {
                debug!("dashboard poll cancelled");
            }
        }
        .boxed_local();

        (task, PollHandle::new(abort))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MockHttpClient;
    use crate::store::MemoryStore;
    use crate::view::ServiceBlock;
    use crate::view::testing::{RecordingNavigator, RecordingView};
    use serde_json::json;
    use std::time::Duration;

    const USERS_URL: &str = "http://localhost:5000/users";
    const SERVICES_URL: &str = "http://localhost:5000/services";

    type Controller =
        DashboardController<Rc<MockHttpClient>, MemoryStore, RecordingView, RecordingNavigator>;

    struct Fixture {
        client: Rc<MockHttpClient>,
        store: MemoryStore,
        view: RecordingView,
        navigator: RecordingNavigator,
        controller: Rc<Controller>,
    }

    fn fixture(token: Option<&str>) -> Fixture {
        let client = Rc::new(MockHttpClient::new());
        let store = MemoryStore::new();
        if let Some(token) = token {
            Session {
                token: token.into(),
                username: "alice".into(),
                is_admin: false,
            }
            .persist(&store)
            .unwrap();
        }
        let view = RecordingView::default();
        let navigator = RecordingNavigator::default();
        let controller = Rc::new(DashboardController::new(
            PortalApi::new("http://localhost:5000", client.clone()),
            store.clone(),
            view.clone(),
            navigator.clone(),
        ));
        Fixture {
            client,
            store,
            view,
            navigator,
            controller,
        }
    }

    // =========================================================
    // 入口检查
    // =========================================================

    #[tokio::test]
    async fn no_token_redirects_without_fetching() {
        let f = fixture(None);

        assert!(f.controller.activate().is_none());
        assert_eq!(f.controller.state(), DashboardState::Redirected);
        assert_eq!(f.navigator.visits(), vec![ViewName::Login]);

        f.controller.run(futures::stream::iter(vec![(), ()])).await;
        assert!(f.controller.load_users().await.is_ok());
        assert!(matches!(
            f.controller.refresh_services().await,
            RefreshOutcome::Skipped
        ));

        assert!(f.client.requests.borrow().is_empty());
        let log = f.view.log();
        assert!(log.welcome.is_none());
        assert!(log.users.is_none());
        assert!(log.services.is_none());
    }

    #[test]
    fn active_session_renders_welcome() {
        let f = fixture(Some("t1"));

        let session = f.controller.activate().unwrap();
        assert_eq!(session.token, "t1");
        assert_eq!(f.controller.state(), DashboardState::Active);
        assert_eq!(f.view.log().welcome.as_deref(), Some("Welcome, alice!"));
        assert!(f.navigator.visits().is_empty());

        // 再次激活不会重复渲染或跳转
        assert!(f.controller.activate().is_some());
        assert!(f.navigator.visits().is_empty());
    }

    // =========================================================
    // 用户列表
    // =========================================================

    #[tokio::test]
    async fn users_render_in_server_order_with_token() {
        let f = fixture(Some("t1"));
        f.client.mock_response(
            USERS_URL,
            200,
            json!([{"username": "carol"}, {"username": "alice"}, {"username": "bob"}]),
        );
        f.controller.activate();

        assert_eq!(f.controller.load_users().await.unwrap(), 3);
        assert_eq!(
            f.view.log().users.as_deref(),
            Some(&["carol".to_string(), "alice".to_string(), "bob".to_string()][..])
        );

        let reqs = f.client.requests.borrow();
        assert_eq!(
            reqs[0].headers.get("Authorization").map(String::as_str),
            Some("t1")
        );
    }

    #[tokio::test]
    async fn users_401_alerts_and_keeps_list() {
        let f = fixture(Some("t1"));
        f.client
            .mock_response(USERS_URL, 200, json!([{"username": "alice"}]));
        f.client.mock_response(USERS_URL, 401, json!({"error": "expired"}));
        f.controller.activate();

        f.controller.load_users().await.unwrap();
        let err = f.controller.load_users().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));

        let log = f.view.log();
        assert_eq!(log.alerts, vec!["Failed to load users"]);
        assert_eq!(log.users.as_deref(), Some(&["alice".to_string()][..]));
    }

    #[tokio::test]
    async fn users_transport_failure_alerts() {
        let f = fixture(Some("t1"));
        f.client.mock_failure(USERS_URL, "offline");
        f.controller.activate();

        assert!(f.controller.load_users().await.is_err());
        assert_eq!(f.view.log().alerts, vec!["Failed to load users"]);
        assert!(f.view.log().users.is_none());
    }

    // =========================================================
    // 服务状态
    // =========================================================

    #[tokio::test]
    async fn services_missing_instance_shows_na() {
        let f = fixture(Some("t1"));
        f.client
            .mock_response(SERVICES_URL, 200, json!([{"name": "api", "status": "up"}]));
        f.controller.activate();

        assert!(matches!(
            f.controller.refresh_services().await,
            RefreshOutcome::Rendered(1)
        ));
        assert_eq!(
            f.view.log().services,
            Some(ServicesPanel::Services(vec![ServiceBlock {
                name: "api".into(),
                status: "up".into(),
                instance_id: "N/A".into(),
            }]))
        );
    }

    #[tokio::test]
    async fn services_refresh_replaces_content() {
        let f = fixture(Some("t1"));
        f.client.mock_response(
            SERVICES_URL,
            200,
            json!([{"name": "api", "status": "up", "instance_id": "i-1"}, {"name": "db", "status": "up"}]),
        );
        f.client.mock_response(
            SERVICES_URL,
            200,
            json!([{"name": "api", "status": "down", "instance_id": "i-2"}]),
        );
        f.controller.activate();

        f.controller.refresh_services().await;
        f.controller.refresh_services().await;

        let log = f.view.log();
        assert_eq!(log.services_renders, 2);
        assert_eq!(
            log.services,
            Some(ServicesPanel::Services(vec![ServiceBlock {
                name: "api".into(),
                status: "down".into(),
                instance_id: "i-2".into(),
            }]))
        );
    }

    #[tokio::test]
    async fn services_failure_replaces_stale_content() {
        let f = fixture(Some("t1"));
        f.client
            .mock_response(SERVICES_URL, 200, json!([{"name": "api", "status": "up"}]));
        f.client.mock_raw(SERVICES_URL, 500, "boom");
        f.client
            .mock_response(SERVICES_URL, 200, json!([{"name": "api", "status": "up"}]));
        f.controller.activate();

        f.controller.refresh_services().await;
        assert!(matches!(
            f.controller.refresh_services().await,
            RefreshOutcome::Failed(_)
        ));
        assert_eq!(f.view.log().services, Some(ServicesPanel::Unavailable));

        // 失败不影响后续刷新
        assert!(matches!(
            f.controller.refresh_services().await,
            RefreshOutcome::Rendered(1)
        ));
        assert!(f.view.log().alerts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_refresh_is_skipped() {
        let f = fixture(Some("t1"));
        f.client.mock_response(SERVICES_URL, 200, json!([]));
        f.client.mock_delay(SERVICES_URL, Duration::from_secs(45));
        f.controller.activate();

        let (first, second) = futures::join!(
            f.controller.refresh_services(),
            f.controller.refresh_services()
        );

        assert!(matches!(first, RefreshOutcome::Rendered(0)));
        assert!(matches!(second, RefreshOutcome::Skipped));
        assert_eq!(f.client.request_count(SERVICES_URL), 1);
    }

    // =========================================================
    // 周期刷新
    // =========================================================

    #[tokio::test]
    async fn run_loads_both_then_refreshes_per_tick() {
        let f = fixture(Some("t1"));
        f.client
            .mock_response(USERS_URL, 200, json!([{"username": "alice"}]));
        f.client.mock_response(SERVICES_URL, 200, json!([]));
        f.controller.activate();

        f.controller.run(futures::stream::iter(vec![(), ()])).await;

        assert_eq!(f.client.request_count(USERS_URL), 1);
        // 首次加载与两次 tick 可能重叠，至少一次、至多三次
        let services = f.client.request_count(SERVICES_URL);
        assert!((1..=3).contains(&services), "services fetched {services} times");
    }

    #[tokio::test(start_paused = true)]
    async fn run_follows_interval_ticks() {
        let f = fixture(Some("t1"));
        f.client.mock_response(USERS_URL, 200, json!([]));
        f.client.mock_response(SERVICES_URL, 200, json!([]));
        f.controller.activate();

        let ticks = crate::poll::interval_ticks(Duration::from_secs(30));
        let (task, handle) = f.controller.start(ticks.take(3));
        task.await;

        assert!(!handle.is_cancelled());
        assert_eq!(f.client.request_count(USERS_URL), 1);
        assert_eq!(f.client.request_count(SERVICES_URL), 4);
        assert_eq!(f.view.log().services_renders, 4);
    }

    #[tokio::test]
    async fn users_failure_does_not_block_services() {
        let f = fixture(Some("t1"));
        f.client.mock_failure(USERS_URL, "offline");
        f.client
            .mock_response(SERVICES_URL, 200, json!([{"name": "api", "status": "up"}]));
        f.controller.activate();

        f.controller.run(crate::poll::no_ticks()).await;

        let log = f.view.log();
        assert_eq!(log.alerts, vec!["Failed to load users"]);
        assert_eq!(log.services_renders, 1);
    }

    #[tokio::test]
    async fn cancelled_handle_stops_poll() {
        let f = fixture(Some("t1"));
        f.controller.activate();

        let (task, handle) = f.controller.start(futures::stream::pending());
        handle.cancel();
        task.await;

        assert!(f.client.requests.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_fetch_releases_refresh_guard() {
        let f = fixture(Some("t1"));
        f.client.mock_response(USERS_URL, 200, json!([]));
        f.client
            .mock_response(SERVICES_URL, 200, json!([{"name": "api", "status": "up"}]));
        f.client.mock_delay(SERVICES_URL, Duration::from_secs(5));
        f.controller.activate();

        let (task, handle) = f.controller.start(futures::stream::pending());
        let cancel = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.cancel();
        };
        futures::join!(task, cancel);
        assert!(f.view.log().services.is_none());

        // 被中断的请求不能让后续刷新一直跳过
        assert!(matches!(
            f.controller.refresh_services().await,
            RefreshOutcome::Rendered(1)
        ));
        assert_eq!(f.client.request_count(SERVICES_URL), 2);

        // 重新启动的轮询同样可以刷新
        let (task, _handle) = f.controller.start(crate::poll::no_ticks());
        task.await;
        assert_eq!(f.client.request_count(SERVICES_URL), 3);
        assert_eq!(f.view.log().services_renders, 2);
    }

    // =========================================================
    // 注销
    // =========================================================

    #[tokio::test]
    async fn logout_clears_session_and_stops_poll() {
        let f = fixture(Some("t1"));
        f.controller.activate();

        let (task, _handle) = f.controller.start(futures::stream::pending());
        f.controller.logout();
        task.await;

        assert!(f.store.get("token").is_none());
        assert!(f.store.get("username").is_none());
        assert_eq!(f.navigator.visits(), vec![ViewName::Login]);
        assert_eq!(f.controller.state(), DashboardState::Redirected);
        assert!(f.client.requests.borrow().is_empty());

        // 注销后操作均为空操作
        f.controller.logout();
        assert_eq!(f.navigator.visits(), vec![ViewName::Login]);
        assert!(matches!(
            f.controller.refresh_services().await,
            RefreshOutcome::Skipped
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn response_after_logout_is_discarded() {
        let f = fixture(Some("t1"));
        f.client
            .mock_response(SERVICES_URL, 200, json!([{"name": "api", "status": "up"}]));
        f.client.mock_delay(SERVICES_URL, Duration::from_secs(5));
        f.controller.activate();

        let refresh = f.controller.refresh_services();
        let logout = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            f.controller.logout();
        };
        let (outcome, ()) = futures::join!(refresh, logout);

        assert!(matches!(outcome, RefreshOutcome::Skipped));
        assert!(f.view.log().services.is_none());
    }
}
