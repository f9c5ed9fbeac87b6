//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 控制面板 (需要会话 token)
    Dashboard,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 跳转使用相对视图名，因此只看最后一段路径。
    pub fn from_path(path: &str) -> Self {
        let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        match last {
            "" | "login" | "index.html" => Self::Login,
            "dashboard" => Self::Dashboard,
            _ => Self::NotFound,
        }
    }
}
