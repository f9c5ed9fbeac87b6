use crate::web::{BrowserStorage, FetchHttpClient, LocationNavigator, alert, api_url, log_error};
use leptos::prelude::*;
use leptos::task::spawn_local;
use portal::{AuthController, AuthOutcome, AuthView, PortalApi, SubmitIntent};
use portal_shared::Credentials;
use std::rc::Rc;

const REGISTER_BUTTON_ID: &str = "register-btn";

/// 表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，可以直接作为视图能力交给控制器。
#[derive(Clone, Copy)]
struct LoginForm {
    username: RwSignal<String>,
    password: RwSignal<String>,
    error: RwSignal<String>,
}

impl LoginForm {
    fn new() -> Self {
        Self {
            username: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            error: RwSignal::new(String::new()),
        }
    }

    /// 提交时读取当前输入
    fn credentials(&self) -> Credentials {
        Credentials::new(self.username.get_untracked(), self.password.get_untracked())
    }
}

impl AuthView for LoginForm {
    fn show_error(&self, message: &str) {
        self.error.set(message.to_string());
    }

    fn clear_error(&self) {
        self.error.set(String::new());
    }

    fn acknowledge(&self, message: &str) {
        alert(message);
    }

    fn reset_form(&self) {
        self.username.set(String::new());
        self.password.set(String::new());
    }
}

type Controller = AuthController<FetchHttpClient, BrowserStorage, LoginForm, LocationNavigator>;

fn report(outcome: &AuthOutcome) {
    if let AuthOutcome::Failed(detail) = outcome {
        log_error("Error", detail);
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let form = LoginForm::new();
    let controller: Rc<Controller> = Rc::new(AuthController::new(
        PortalApi::new(api_url(), FetchHttpClient),
        BrowserStorage,
        form,
        LocationNavigator,
    ));
    let controller = StoredValue::new_local(controller);

    // 表单默认提交：根据触发按钮决定登录还是注册
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let intent = match ev.submitter() {
            Some(button) if button.id() == REGISTER_BUTTON_ID => SubmitIntent::Register,
            _ => SubmitIntent::Login,
        };

        let controller = controller.get_value();
        let credentials = form.credentials();
        spawn_local(async move {
            let outcome = controller.submit(credentials, intent).await;
            report(&outcome);
        });
    };

    // 注册按钮自带校验，并阻止表单默认提交
    let on_register = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();

        let controller = controller.get_value();
        let credentials = form.credentials();
        spawn_local(async move {
            let outcome = controller.register(credentials).await;
            report(&outcome);
        });
    };

    view! {
        <div class="auth-container">
            <h1>"Portal"</h1>
            <form id="auth-form" on:submit=on_submit>
                <input
                    id="username"
                    type="text"
                    placeholder="Username"
                    prop:value=move || form.username.get()
                    on:input=move |ev| form.username.set(event_target_value(&ev))
                />
                <input
                    id="password"
                    type="password"
                    placeholder="Password"
                    prop:value=move || form.password.get()
                    on:input=move |ev| form.password.set(event_target_value(&ev))
                />
                <button id="login-btn" type="submit">"Login"</button>
                <button id=REGISTER_BUTTON_ID type="submit" on:click=on_register>
                    "Register"
                </button>
            </form>
            <p id="error-message" class="error">{move || form.error.get()}</p>
        </div>
    }
}
