//! Portal 前端应用
//!
//! 页面只负责渲染与事件绑定，所有会话与请求逻辑都在 `portal` 核心库的控制器中：
//! - `web`: 浏览器能力实现（fetch、localStorage、setInterval、跳转）
//! - `components`: 登录页与仪表盘页

mod components {
    pub mod dashboard;
    pub mod login;
}

pub(crate) mod web;

use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use leptos::prelude::*;
use web::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

#[component]
pub fn App() -> impl IntoView {
    match AppRoute::from_path(&current_path()) {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="not-found">
                <h1>"404"</h1>
                <p>"Page not found"</p>
            </div>
        }
        .into_any(),
    }
}
