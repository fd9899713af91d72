use clap::Parser;

/// Runtime configuration of the sentiment server.
///
/// Every option can also come from the environment, including a `.env` file
/// loaded at startup.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Keyword-based sentiment classification service.")]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Print the OpenAPI document as JSON and exit.
    #[arg(long)]
    pub print_openapi: bool,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
