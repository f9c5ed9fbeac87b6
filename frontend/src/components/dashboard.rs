use crate::web::{BrowserStorage, FetchHttpClient, LocationNavigator, alert, api_url, interval_ticks, log_error};
use leptos::prelude::*;
use leptos::task::spawn_local;
use portal::{DashboardController, DashboardView, PortalApi, SERVICES_POLL_PERIOD, ServicesPanel};
use portal_shared::messages;
use std::rc::Rc;

/// 仪表盘上由控制器驱动的区域
#[derive(Clone, Copy)]
struct DashboardSignals {
    welcome: RwSignal<String>,
    users: RwSignal<Vec<String>>,
    services: RwSignal<Option<ServicesPanel>>,
}

impl DashboardSignals {
    fn new() -> Self {
        Self {
            welcome: RwSignal::new(String::new()),
            users: RwSignal::new(Vec::new()),
            services: RwSignal::new(None),
        }
    }
}

impl DashboardView for DashboardSignals {
    fn show_welcome(&self, greeting: &str) {
        self.welcome.set(greeting.to_string());
    }

    fn render_users(&self, lines: &[String]) {
        self.users.set(lines.to_vec());
    }

    fn render_services(&self, panel: &ServicesPanel) {
        self.services.set(Some(panel.clone()));
    }

    fn alert(&self, message: &str) {
        alert(message);
    }
}

type Controller =
    DashboardController<FetchHttpClient, BrowserStorage, DashboardSignals, LocationNavigator>;

fn render_services(panel: Option<ServicesPanel>) -> AnyView {
    match panel {
        None => ().into_any(),
        Some(ServicesPanel::Unavailable) => messages::SERVICES_FAILED.into_any(),
        Some(ServicesPanel::Services(blocks)) => blocks
            .into_iter()
            .map(|block| {
                view! {
                    <div class="service-item">
                        <h3>{block.name}</h3>
                        <p>"Status: " {block.status}</p>
                        <p>"Instance ID: " {block.instance_id}</p>
                    </div>
                }
            })
            .collect_view()
            .into_any(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let signals = DashboardSignals::new();
    let controller: Rc<Controller> = Rc::new(DashboardController::new(
        PortalApi::new(api_url(), FetchHttpClient),
        BrowserStorage,
        signals,
        LocationNavigator,
    ));

    // 入口检查：没有 token 时已跳转登录页，不渲染任何内容
    if controller.activate().is_none() {
        return ().into_any();
    }

    // 首次加载 + 每 30 秒刷新服务状态；页面卸载时停止
    let (task, handle) = controller.start(interval_ticks(SERVICES_POLL_PERIOD));
    spawn_local(task);
    on_cleanup(move || handle.cancel());

    let controller = StoredValue::new_local(controller);

    let on_logout = move |_| controller.get_value().logout();

    let on_list_users = move |_| {
        let controller = controller.get_value();
        spawn_local(async move {
            if let Err(e) = controller.load_users().await {
                log_error("Error", &e.to_string());
            }
        });
    };

    view! {
        <div class="dashboard">
            <header class="navbar">
                <span id="user-info">{move || signals.welcome.get()}</span>
                <button id="logout-btn" on:click=on_logout>"Logout"</button>
            </header>

            <section class="card">
                <h2>"Users"</h2>
                <button id="list-users-btn" on:click=on_list_users>"List Users"</button>
                <ul id="user-list">
                    {move || {
                        signals
                            .users
                            .get()
                            .into_iter()
                            .map(|name| view! { <li>{name}</li> })
                            .collect_view()
                    }}
                </ul>
            </section>

            <section class="card">
                <h2>"Services Status"</h2>
                <div id="services-list">{move || render_services(signals.services.get())}</div>
            </section>
        </div>
    }
    .into_any()
}
