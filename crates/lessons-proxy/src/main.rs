use clap::Parser;
use dotenvy::dotenv;
use lessons_proxy::{API_KEY_VAR, AppState, Config, router};
use miette::{IntoDiagnostic, miette};
use std::env;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "LESSONS_PROXY_CONFIG",
        default_value = "proxy-config.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = initialize()?;

    let api_key = env::var(API_KEY_VAR).ok();
    if api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
        warn!("{API_KEY_VAR} is not set; chat requests will fail with 500");
    }

    info!("Starting server on {}", config.core.listen_addr);
    let listener = TcpListener::bind(&config.core.listen_addr)
        .await
        .into_diagnostic()?;
    let router = router(AppState::new(config, api_key));
    axum::serve(listener, router).await.into_diagnostic()?;
    Ok(())
}

pub fn initialize() -> miette::Result<Config> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .map_err(|e| miette!("Failed to set miette hook: {}", e))?;
    miette::set_panic_hook();
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    Ok(Config::load_or_default(&cli.config)?)
}
