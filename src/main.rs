use anyhow::Result;
use clap::Parser;
use ozor_gateway::app::App;
use ozor_gateway::models::Config;
use ozor_gateway::web;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ozor-gateway")]
#[command(about = "Gemini chat/image gateway for the Ozor assistant")]
struct CliArgs {
    /// Port to listen on (overrides the PORT environment variable).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ozor_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ozor-gateway");

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let port = args.port.unwrap_or(config.port);
    let app = App::new(&config);

    if let Err(e) = web::serve(app, port).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
