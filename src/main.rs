use clap::{Args, Parser, Subcommand};
use portal::config::{Config, ConfigError, Overrides};
use portal::poll::interval_ticks;
use portal::request::ReqwestHttpClient;
use portal::shared::{Credentials, ViewName};
use portal::store::FileStore;
use portal::terminal::{TerminalNavigator, TerminalView};
use portal::{
    AuthController, AuthOutcome, DashboardController, PortalApi, RefreshOutcome, SubmitIntent,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Portal client: log in, register and watch the dashboard", long_about = None)]
struct Cli {
    /// Backend base URL (overrides PORTAL_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides PORTAL_SESSION_FILE)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Services status refresh period in seconds (overrides PORTAL_POLL_SECS)
    #[arg(long, global = true)]
    poll_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(short, long)]
    username: String,

    #[arg(short, long, env = "PORTAL_PASSWORD", hide_env_values = true)]
    password: String,
}

impl CredentialArgs {
    fn credentials(self) -> Credentials {
        Credentials::new(self.username, self.password)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login(CredentialArgs),

    /// Register a new account
    Register {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Submit through the form path, which skips the required-fields check
        #[arg(long)]
        via_form: bool,
    },

    /// Show the dashboard and refresh services status until Ctrl-C
    Dashboard,

    /// Fetch and print the user list once
    Users,

    /// Fetch and print services status once
    Services,

    /// Clear the stored session
    Logout,
}

impl Cli {
    fn config(&self) -> Result<Config, ConfigError> {
        Config::from_env(Overrides {
            api_url: self.api_url.clone(),
            poll_secs: self.poll_secs,
            session_file: self.session_file.clone(),
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("portal=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    info!(api_url = %config.api_url, session_file = %config.session_file.display(), "starting");

    let api = PortalApi::new(config.api_url.clone(), ReqwestHttpClient::new());
    let store = FileStore::new(&config.session_file);
    let navigator = Rc::new(TerminalNavigator::default());

    let ok = match cli.command {
        Commands::Login(credentials) => {
            let controller = AuthController::new(api, store, TerminalView, navigator.clone());
            let outcome = controller
                .submit(credentials.credentials(), SubmitIntent::Login)
                .await;
            if let AuthOutcome::LoggedIn(session) = &outcome {
                println!("Logged in as {}", session.username);
            }
            matches!(outcome, AuthOutcome::LoggedIn(_))
        }
        Commands::Register {
            credentials,
            via_form,
        } => {
            let controller = AuthController::new(api, store, TerminalView, navigator.clone());
            let outcome = if via_form {
                controller
                    .submit(credentials.credentials(), SubmitIntent::Register)
                    .await
            } else {
                controller.register(credentials.credentials()).await
            };
            outcome == AuthOutcome::Registered
        }
        Commands::Dashboard => {
            let controller = Rc::new(DashboardController::new(
                api,
                store,
                TerminalView,
                navigator.clone(),
            ));
            if controller.activate().is_some() {
                let (task, handle) = controller.start(interval_ticks(config.poll_interval));
                tokio::select! {
                    _ = task => {}
                    res = tokio::signal::ctrl_c() => {
                        res?;
                        info!("interrupted, stopping dashboard");
                    }
                }
                handle.cancel();
                true
            } else {
                false
            }
        }
        Commands::Users => {
            let controller = DashboardController::new(api, store, TerminalView, navigator.clone());
            controller.activate().is_some() && controller.load_users().await.is_ok()
        }
        Commands::Services => {
            let controller = DashboardController::new(api, store, TerminalView, navigator.clone());
            controller.activate().is_some()
                && matches!(
                    controller.refresh_services().await,
                    RefreshOutcome::Rendered(_)
                )
        }
        Commands::Logout => {
            let controller = DashboardController::new(api, store, TerminalView, navigator.clone());
            if controller.activate().is_some() {
                controller.logout();
                println!("Logged out");
            }
            true
        }
    };

    match navigator.last() {
        Some(ViewName::Dashboard) => eprintln!("Next: portal dashboard"),
        Some(ViewName::Login) if !ok => eprintln!("Not logged in. Run: portal login -u <username>"),
        _ => {}
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
