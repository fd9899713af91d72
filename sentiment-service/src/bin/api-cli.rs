//! A small client for the sentiment service.
//!
//! By default it queries a running server; with `--local` it classifies the
//! text in-process instead.

use anyhow::{bail, Context, Result};
use clap::Parser;
use sentiment_core::error::ErrorBody;
use sentiment_service::classifier::{self, Sentiment};
use sentiment_service::dtos::SentimentResponse;
use sentiment_service::handlers::ANALYZE_SENTIMENT_PATH;

#[derive(Parser, Debug)]
#[command(author, version, about = "Classify text with the sentiment service.")]
struct Cli {
    /// Base URL of the sentiment service.
    #[arg(long, env = "SENTIMENT_API_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Classify locally without contacting a server.
    #[arg(long)]
    local: bool,

    /// Text to classify; multiple words are joined with single spaces.
    #[arg(required = true)]
    text: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let text = cli.text.join(" ");

    let sentiment = if cli.local {
        classifier::classify(&text)
    } else {
        query_remote(&cli.url, &text).await?
    };

    println!("{sentiment}");
    Ok(())
}

async fn query_remote(base_url: &str, text: &str) -> Result<Sentiment> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), ANALYZE_SENTIMENT_PATH);

    let response = reqwest::Client::new()
        .get(&url)
        .query(&[("text", text)])
        .send()
        .await
        .with_context(|| format!("failed to reach {url}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.json::<ErrorBody>().await.unwrap_or_else(|_| ErrorBody {
            error: status.to_string(),
        });
        bail!("server returned {status}: {}", body.error);
    }

    let body: SentimentResponse = response
        .json()
        .await
        .context("server returned an unexpected response body")?;
    Ok(body.sentiment)
}
