use clap::Parser;
use dietetic_portal::{
    AppState, Navigator,
    config::{AppConfig, Env},
    forms::LoginForm,
    gateways::MealInterval,
    routes::menu::{self, LOGOUT_LABEL},
    screens::ViewOptions,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cli
///
/// Opens one page of the portal as the current (or freshly signed-in)
/// session and prints the resulting view model as JSON.
#[derive(Parser, Debug)]
#[command(name = "dietetic-portal")]
#[command(version)]
#[command(about = "Role-based client for the dietetic follow-up backend", long_about = None)]
struct Cli {
    /// Front-end path to open, e.g. /patients/123
    #[arg(default_value = "/")]
    path: String,

    /// Sign in with these credentials before navigating
    #[arg(short, long, requires = "password")]
    username: Option<String>,

    #[arg(short, long, requires = "username")]
    password: Option<String>,

    /// Meal history window: today, week, month, year or all
    #[arg(long, default_value = "today", value_parser = parse_interval)]
    interval: MealInterval,
}

fn parse_interval(raw: &str) -> Result<MealInterval, String> {
    match raw.to_ascii_lowercase().as_str() {
        "today" => Ok(MealInterval::Today),
        "week" => Ok(MealInterval::Week),
        "month" => Ok(MealInterval::Month),
        "year" => Ok(MealInterval::Year),
        "all" => Ok(MealInterval::All),
        other => Err(format!("unknown interval '{other}'")),
    }
}

/// main
///
/// Initializes Configuration and Logging, restores the backend session,
/// then performs a single navigation.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise debug for this crate and info for the HTTP client.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dietetic_portal=debug,reqwest=info".into());

    // 3. Initialize Logging based on Environment. Logs go to stderr so that
    // stdout carries only the page JSON.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
    }

    tracing::info!("Client starting in {:?} mode against {}", config.env, config.api_base_url);

    // 4. Unified State Assembly
    let state = AppState::new(config).expect("FATAL: Failed to build the HTTP client. Check the TLS settings.");
    let navigator = Navigator::new(state.clone());

    // 5. Session Restore. Nothing gated renders before this settles.
    state.session.restore_session().await;

    if let (Some(username), Some(password)) = (cli.username, cli.password) {
        let form = LoginForm::new(username, password);
        if let Err(e) = form.submit(&state.session).await {
            tracing::error!("sign-in failed: {}", e);
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    // 6. Navigation
    let options = ViewOptions {
        meal_interval: cli.interval,
    };
    let page = navigator.navigate_with(&cli.path, options).await;

    let session = state.session.snapshot();
    let menu = session.identity().map(menu::navigation_menu).unwrap_or_default();

    let output = serde_json::json!({
        "session": session,
        "menu": menu,
        "logout": session.identity().map(|_| LOGOUT_LABEL),
        "page": page,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("failed to serialize page: {}", e);
            std::process::exit(1);
        }
    }
}
