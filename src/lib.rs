//! Portal 客户端核心
//!
//! 两个页面控制器以能力注入的方式编写：
//! - `request::HttpClient`: HTTP 客户端
//! - `store::SessionStore`: 持久化会话存储
//! - `view`: 页面视图与整页跳转
//!
//! 浏览器前端（`frontend/`）与终端前端（`terminal`）分别提供这些能力的实现。

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod poll;
pub mod request;
pub mod store;
pub mod view;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod terminal;

pub use api::PortalApi;
pub use auth::{AuthController, AuthOutcome, SubmitIntent};
pub use dashboard::{DashboardController, DashboardState, RefreshOutcome};
pub use error::{ApiError, StoreError, TransportError};
pub use poll::{PollHandle, SERVICES_POLL_PERIOD};
pub use store::{MemoryStore, Session, SessionStore, StoredSession};
pub use view::{AuthView, DashboardView, Navigator, ServiceBlock, ServicesPanel};

pub use portal_shared as shared;

/// 未配置时使用的后端地址
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
