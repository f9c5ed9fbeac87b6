//! 视图能力
//!
//! 控制器只通过这些 trait 与具体界面交互：浏览器前端用 signal 实现，
//! 终端前端打印到 stdout，测试中则记录每一次调用。

use portal_shared::{ServiceStatus, User, ViewName, messages};
use std::rc::Rc;

/// 整页跳转到另一个命名视图
pub trait Navigator {
    fn navigate(&self, view: ViewName);
}

impl<T: Navigator + ?Sized> Navigator for Rc<T> {
    fn navigate(&self, view: ViewName) {
        (**self).navigate(view)
    }
}

/// 登录/注册表单
pub trait AuthView {
    /// 覆盖（而不是追加）错误提示
    fn show_error(&self, message: &str);
    fn clear_error(&self);
    /// 阻塞式提示，用户确认后返回
    fn acknowledge(&self, message: &str);
    /// 清空用户名与密码输入框
    fn reset_form(&self);
}

pub trait DashboardView {
    fn show_welcome(&self, greeting: &str);
    /// 每个用户名一行，顺序与服务端一致
    fn render_users(&self, lines: &[String]);
    /// 整体替换服务状态区域
    fn render_services(&self, panel: &ServicesPanel);
    /// 阻塞式提示
    fn alert(&self, message: &str);
}

pub fn welcome_message(username: &str) -> String {
    format!("Welcome, {username}!")
}

pub fn user_lines(users: &[User]) -> Vec<String> {
    users.iter().map(|u| u.username.clone()).collect()
}

/// 单个服务的展示块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBlock {
    pub name: String,
    pub status: String,
    pub instance_id: String,
}

impl From<&ServiceStatus> for ServiceBlock {
    fn from(service: &ServiceStatus) -> Self {
        Self {
            name: service.name.clone(),
            status: service.status.clone(),
            instance_id: service.instance_label().to_string(),
        }
    }
}

/// 服务状态区域的完整内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServicesPanel {
    Services(Vec<ServiceBlock>),
    /// 显示 "Failed to load services status"
    Unavailable,
}

impl ServicesPanel {
    pub fn from_statuses(services: &[ServiceStatus]) -> Self {
        Self::Services(services.iter().map(ServiceBlock::from).collect())
    }
}

impl std::fmt::Display for ServicesPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServicesPanel::Unavailable => f.write_str(messages::SERVICES_FAILED),
            ServicesPanel::Services(blocks) => {
                for block in blocks {
                    writeln!(f, "{}", block.name)?;
                    writeln!(f, "  Status: {}", block.status)?;
                    writeln!(f, "  Instance ID: {}", block.instance_id)?;
                }
                Ok(())
            }
        }
    }
}

// =========================================================
// 测试工具: 记录型视图
// =========================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_instance_renders_na() {
        let panel = ServicesPanel::from_statuses(&[ServiceStatus {
            name: "api".into(),
            status: "up".into(),
            instance_id: None,
        }]);
        assert_eq!(
            panel,
            ServicesPanel::Services(vec![ServiceBlock {
                name: "api".into(),
                status: "up".into(),
                instance_id: "N/A".into(),
            }])
        );
        assert_eq!(panel.to_string(), "api\n  Status: up\n  Instance ID: N/A\n");
    }

    #[test]
    fn unavailable_panel_text() {
        assert_eq!(
            ServicesPanel::Unavailable.to_string(),
            "Failed to load services status"
        );
    }

    #[test]
    fn greeting_and_lines() {
        assert_eq!(welcome_message("alice"), "Welcome, alice!");
        let users = vec![
            User {
                username: "bob".into(),
            },
            User {
                username: "alice".into(),
            },
        ];
        assert_eq!(user_lines(&users), vec!["bob", "alice"]);
    }
}
