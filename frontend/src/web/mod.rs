//! 浏览器能力实现
//!
//! 为核心库的控制器提供 HTTP、存储、定时器、提示框与整页跳转。

mod http;
pub mod route;
mod storage;
mod timer;

pub use http::FetchHttpClient;
pub use storage::BrowserStorage;
pub use timer::interval_ticks;

use portal::Navigator;
use portal_shared::ViewName;

/// 阻塞式提示框
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// 输出到浏览器控制台
pub fn log_error(context: &str, detail: &str) {
    web_sys::console::error_1(&format!("{}: {}", context, detail).into());
}

/// 通过 `location.href` 整页跳转（相对视图名）
#[derive(Clone, Copy, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, view: ViewName) {
        web_sys::console::log_1(&format!("[Navigator] -> {}", view).into());
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(view.as_str());
        }
    }
}

/// 后端地址，构建时可通过 `PORTAL_API_URL` 指定
pub fn api_url() -> &'static str {
    option_env!("PORTAL_API_URL").unwrap_or(portal::DEFAULT_API_URL)
}
