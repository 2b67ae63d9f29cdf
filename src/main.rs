use std::net::SocketAddr;

use clap::{Parser, ValueEnum};
use github_oauth_backend::models::{AppConfig, AppState, app_config::session_key_from_env};
use github_oauth_backend::{build_oauth_router, build_stub_router};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Variant {
    /// Greeting routes only, no credentials needed.
    Stub,
    /// GitHub login with sessions and CORS.
    #[value(name = "oauth")]
    OAuth,
}

#[derive(Debug, Parser)]
#[command(version, about = "GitHub OAuth login backend")]
struct Args {
    #[arg(long, env = "APP_VARIANT", value_enum, default_value_t = Variant::OAuth)]
    variant: Variant,

    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:10000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "github_oauth_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let app = match args.variant {
        Variant::Stub => build_stub_router(),
        Variant::OAuth => {
            let app_config = AppConfig::from_env()?;
            let session_key = session_key_from_env()?;
            let app_state = AppState::new(&app_config)?;
            build_oauth_router(app_state, session_key)
        }
    };

    tracing::info!(addr = %args.listen, variant = ?args.variant, "listening");

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
