//! mixsearch server binary.
//!
//! Serves the search core over one of two transports: a REST API
//! (axum) or an MCP stdio tool server for agent clients. Transport is
//! picked with `--mode`; everything else is flags with `MIXSEARCH_`
//! environment overrides.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use mixsearch_core::{SearchConfig, SearchService};

mod routes;
mod tool;

#[derive(Parser, Debug)]
#[command(name = "mixsearch")]
#[command(about = "Multi-engine web search with content extraction", long_about = None)]
struct Cli {
    /// Transport to serve.
    #[arg(long, value_enum, default_value = "rest")]
    mode: Mode,

    /// Bind address for REST mode.
    #[arg(long, env = "MIXSEARCH_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Bind port for REST mode.
    #[arg(long, env = "MIXSEARCH_PORT", default_value_t = 8000)]
    port: u16,

    /// Base URL of the Browserless-compatible rendering service.
    #[arg(long, env = "MIXSEARCH_BROWSER_ENDPOINT")]
    browser_endpoint: Option<String>,

    /// API token for the rendering service.
    #[arg(long, env = "MIXSEARCH_BROWSER_TOKEN")]
    browser_token: Option<String>,

    /// Maximum simultaneous in-flight content extractions.
    #[arg(long, env = "MIXSEARCH_MAX_CONCURRENT")]
    max_concurrent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// HTTP REST API.
    Rest,
    /// MCP tool server on stdin/stdout.
    Stdio,
}

impl Cli {
    fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default();
        if let Some(ref endpoint) = self.browser_endpoint {
            config.browser_endpoint = endpoint.clone();
        }
        config.browser_token = self.browser_token.clone();
        if let Some(max) = self.max_concurrent {
            config.max_concurrent_extractions = max;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // In stdio mode the protocol owns stdout, so logs must go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mixsearch=info,mixsearch_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.search_config();
    let service = SearchService::new(&config)?;

    match cli.mode {
        Mode::Rest => routes::serve(service, &cli.host, cli.port).await,
        Mode::Stdio => tool::serve_stdio(service).await,
    }
}
