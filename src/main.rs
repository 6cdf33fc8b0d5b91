use std::sync::Arc;

use anyhow::Context;

use supplier_portal::config::PortalConfig;
use supplier_portal::onboarding::{
    HistoryNavigator, HttpStatusSource, OnboardingRouter, OnboardingView, RouterOptions,
    StatusSource, StepValidator, resolve,
};
use supplier_portal::stores::{SessionStores, ThemeMode};

const USAGE: &str = "usage: supplier-portal <status|route> [current-path]\n       supplier-portal validate <pan|otp|email> <value>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "route".to_string());

    if command == "validate" {
        let (Some(field), Some(value)) = (args.next(), args.next()) else {
            eprintln!("{USAGE}");
            std::process::exit(2);
        };
        return validate(&field, &value);
    }

    let current_path = args.next().unwrap_or_else(|| "/dashboard".to_string());

    let config = PortalConfig::from_env().context("invalid portal configuration")?;

    let theme = std::env::var("SUPPLIER_PORTAL_THEME")
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(ThemeMode::System);
    let stores = SessionStores::init(theme);

    // Without a token the status request goes out anonymously and the
    // server's 401 drives the login redirect.
    if let Ok(token) = std::env::var("SUPPLIER_PORTAL_TOKEN") {
        let email = std::env::var("SUPPLIER_PORTAL_EMAIL").unwrap_or_default();
        stores.auth.sign_in(token, email).await;
    }

    eprintln!("Supplier Portal v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Status: {}", config.status_url());

    let source = Arc::new(
        HttpStatusSource::new(&config, Arc::clone(&stores.auth))
            .context("failed to build HTTP client")?,
    );

    match command.as_str() {
        "status" => {
            let Some(snapshot) = source.fetch_status().await? else {
                let out = serde_json::json!({
                    "snapshot": null,
                    "route": config.routes.login,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            };
            let resolution = resolve(&snapshot);
            let out = serde_json::json!({
                "snapshot": snapshot,
                "nextStep": resolution.step,
                "isComplete": resolution.is_complete(),
                "ambiguous": resolution.is_ambiguous,
                "route": config.routes.route_for(resolution.step),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        "route" => {
            let navigator = Arc::new(HistoryNavigator::new(current_path));
            let options = RouterOptions::new().with_auto_redirect(config.auto_redirect);
            let router = OnboardingRouter::new(config.routes.clone(), options, navigator.clone());
            let view = OnboardingView::new(source, router)
                .with_supplier_store(Arc::clone(&stores.supplier));

            let decision = view.mount().await?;
            let out = serde_json::json!({
                "decision": decision,
                "location": navigator.current(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            view.unmount().await;
        }
        other => {
            eprintln!("unknown command '{other}'\n{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Check one onboarding form input and print its normalized value.
fn validate(field: &str, value: &str) -> anyhow::Result<()> {
    let validator = StepValidator::new();
    let normalized = match field {
        "pan" => validator.pan(value),
        "otp" => validator.email_otp(value),
        "email" => validator.email(value),
        other => {
            eprintln!("unknown field '{other}'\n{USAGE}");
            std::process::exit(2);
        }
    }
    .map_err(supplier_portal::error::Error::from)?;
    println!("{normalized}");
    Ok(())
}
