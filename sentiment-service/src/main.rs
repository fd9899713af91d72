use anyhow::Context;
use clap::Parser;
use sentiment_service as app;
use sentiment_service::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();

    if config.print_openapi {
        let openapi = app::build_openapi_spec();
        println!(
            "{}",
            openapi
                .to_pretty_json()
                .context("failed to serialize OpenAPI document")?
        );
        return Ok(());
    }

    app::init_tracing();
    app::run_server(&config)
        .await
        .context("sentiment service failed")?;
    Ok(())
}
