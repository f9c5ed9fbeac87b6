//! 错误类型
//!
//! 控制器不会把这些错误抛给调用方，而是映射为用户可见的提示文案并记录日志。

use thiserror::Error;

/// 请求未能完成（网络不可达、连接被拒绝、响应体读取失败等）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// 持久化存储读写失败
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store I/O failed")]
    Io(#[from] std::io::Error),

    #[error("session store is corrupted")]
    Json(#[from] serde_json::Error),

    /// 平台存储不可用（如浏览器禁用了 localStorage）
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// 调用后端 API 的错误
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// 非 2xx 响应；`message` 为服务端返回的 `error` 字段
    #[error("server responded with status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),

    /// 2xx 响应体与预期结构不符
    #[error("failed to decode response body")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// 服务端返回的业务错误文案，空字符串视为没有
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}
