/// PR mock - person/identity registry stand-in for integration testing
use pr_mock::{
    config::{LogFormat, ServerConfig},
    context::AppContext,
    error::PrResult,
    metrics, server,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> PrResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    init_logging(&config);
    metrics::init();

    print_banner();

    // Create application context
    let ctx = AppContext::new(config)?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn init_logging(config: &ServerConfig) {
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| "pr_mock=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn print_banner() {
    println!(
        r#"
    ____  ____     __  ___           __
   / __ \/ __ \   /  |/  /___  _____/ /__
  / /_/ / /_/ /  / /|_/ / __ \/ ___/ //_/
 / ____/ _, _/  / /  / / /_/ / /__/ ,<
/_/   /_/ |_|  /_/  /_/\____/\___/_/|_|

        Person Registry mock v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
