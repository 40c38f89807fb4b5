use account_store::cli::{self, Cli};
use account_store::config::AppConfig;
use account_store::infrastructure::logging::init_logging;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_logging(&config.logging);

    cli::run(cli, &config).await
}
