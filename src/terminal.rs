//! 终端前端：把视图能力映射到 stdout/stderr

use crate::view::{AuthView, DashboardView, Navigator, ServicesPanel};
use portal_shared::ViewName;
use std::cell::Cell;

#[derive(Debug, Default)]
pub struct TerminalView;

impl AuthView for TerminalView {
    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn clear_error(&self) {}

    fn acknowledge(&self, message: &str) {
        println!("{message}");
    }

    fn reset_form(&self) {
        tracing::debug!("form reset");
    }
}

impl DashboardView for TerminalView {
    fn show_welcome(&self, greeting: &str) {
        println!("{greeting}");
    }

    fn render_users(&self, lines: &[String]) {
        println!("Users:");
        for line in lines {
            println!("  - {line}");
        }
    }

    fn render_services(&self, panel: &ServicesPanel) {
        println!("Services:");
        print!("{panel}");
        if matches!(panel, ServicesPanel::Unavailable) {
            println!();
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

/// 记录最后一次跳转目标，由命令行决定如何处理
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    last: Cell<Option<ViewName>>,
}

impl TerminalNavigator {
    pub fn last(&self) -> Option<ViewName> {
        self.last.get()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, view: ViewName) {
        tracing::info!(target_view = %view, "navigate");
        self.last.set(Some(view));
    }
}
