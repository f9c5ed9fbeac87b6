use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 持久化存储中的会话键
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USERNAME: &str = "username";
    /// 登录时写入，目前没有任何地方读取
    pub const IS_ADMIN: &str = "isAdmin";
}

/// 面向用户的固定提示文案
pub mod messages {
    pub const AUTH_FAILED: &str = "Authentication failed";
    pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";
    pub const REGISTRATION_ERROR: &str = "An error occurred during registration. Please try again.";
    pub const REGISTRATION_SUCCESS: &str = "Registration successful. Please login.";
    pub const CREDENTIALS_REQUIRED: &str = "Username and password are required";
    pub const USERS_FAILED: &str = "Failed to load users";
    pub const SERVICES_FAILED: &str = "Failed to load services status";
    pub const INSTANCE_ID_MISSING: &str = "N/A";
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 表单提交时读取的凭据，不做持久化
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// 两个字段都非空
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// 失败响应体，`error` 字段可能缺失
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl ServiceStatus {
    /// 缺失或为空时返回 "N/A"
    pub fn instance_label(&self) -> &str {
        match self.instance_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => messages::INSTANCE_ID_MISSING,
        }
    }
}

/// 可导航的视图名称（相对路径，而非完整文档地址）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewName {
    Login,
    Dashboard,
}

impl ViewName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewName::Login => "login",
            ViewName::Dashboard => "dashboard",
        }
    }
}

impl std::fmt::Display for ViewName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_label_falls_back_to_na() {
        let svc: ServiceStatus =
            serde_json::from_str(r#"{"name":"api","status":"up"}"#).unwrap();
        assert_eq!(svc.instance_label(), "N/A");

        let empty = ServiceStatus {
            instance_id: Some(String::new()),
            ..svc.clone()
        };
        assert_eq!(empty.instance_label(), "N/A");

        let set = ServiceStatus {
            instance_id: Some("i-42".into()),
            ..svc
        };
        assert_eq!(set.instance_label(), "i-42");
    }

    #[test]
    fn login_response_defaults_is_admin() {
        let resp: LoginResponse = serde_json::from_str(r#"{"token":"t1"}"#).unwrap();
        assert_eq!(resp.token, "t1");
        assert!(!resp.is_admin);
    }

    #[test]
    fn error_body_tolerates_missing_field() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());
    }

    #[test]
    fn credentials_completeness() {
        assert!(Credentials::new("alice", "pw").is_complete());
        assert!(!Credentials::new("", "pw").is_complete());
        assert!(!Credentials::new("alice", "").is_complete());
    }
}
