use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use precis_client::ClientConfig;
use precis_core::catalog::{self, ModelInfo};
use precis_core::models::{ExtractionRequest, Provider};
use precis_core::{ExtractService, classify, normalize_url};

#[derive(Parser)]
#[command(name = "precis", version, about = "Summarize a web page with an LLM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page and print its title, summary and key points as JSON
    Extract {
        /// Target URL; `https://` is assumed when no scheme is given
        url: String,

        /// Model provider: anthropic (providerA) or openai (providerB)
        #[arg(short, long, default_value = "anthropic")]
        provider: Provider,

        /// Model id (defaults to the provider's default model)
        #[arg(short, long)]
        model: Option<String>,

        /// Pretty-print the JSON result
        #[arg(long, default_value_t = false)]
        pretty: bool,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// List known models
    Models {
        /// Only list models for this provider
        #[arg(short, long)]
        provider: Option<Provider>,
    },
}

#[derive(Args)]
struct ClientArgs {
    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_api_key: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Anthropic API base URL
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = "https://api.anthropic.com")]
    anthropic_base_url: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    openai_base_url: String,

    /// Page download timeout in seconds
    #[arg(long, env = "PRECIS_FETCH_TIMEOUT_SECS", default_value_t = 15)]
    fetch_timeout: u64,

    /// Model call timeout in seconds
    #[arg(long, env = "PRECIS_MODEL_TIMEOUT_SECS", default_value_t = 60)]
    model_timeout: u64,
}

impl From<ClientArgs> for ClientConfig {
    fn from(args: ClientArgs) -> Self {
        Self {
            anthropic_api_key: args.anthropic_api_key.filter(|k| !k.trim().is_empty()),
            openai_api_key: args.openai_api_key.filter(|k| !k.trim().is_empty()),
            anthropic_base_url: args.anthropic_base_url,
            openai_base_url: args.openai_base_url,
            fetch_timeout: Duration::from_secs(args.fetch_timeout),
            model_timeout: Duration::from_secs(args.model_timeout),
            // The user controls the machine, so local targets are fair game.
            allow_private_urls: true,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays pipeable JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("precis=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            url,
            provider,
            model,
            pretty,
            client,
        } => {
            let request = match model {
                Some(model) => ExtractionRequest::new(url, provider).with_model(model),
                None => ExtractionRequest::new(url, provider),
            };
            cmd_extract(request, client.into(), pretty).await?;
        }
        Commands::Models { provider } => cmd_models(provider),
    }

    Ok(())
}

async fn cmd_extract(request: ExtractionRequest, config: ClientConfig, pretty: bool) -> Result<()> {
    let service = ExtractService::new(
        config.fetcher().context("Failed to create HTTP client")?,
        config.anthropic()?,
        config.openai()?,
    );

    let target = normalize_url(&request.url);
    let result = match service.extract(request).await {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!("Extraction failed: {e}");
            let classified = classify(&e, Some(target.as_str()));
            anyhow::bail!("{} (status {})", classified.message, classified.status);
        }
    };

    let output = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{output}");

    Ok(())
}

fn cmd_models(provider: Option<Provider>) {
    let models: Vec<&ModelInfo> = match provider {
        Some(p) => catalog::models_for(p).collect(),
        None => catalog::catalog().iter().collect(),
    };

    for m in models {
        let marker = if m.provider.default_model() == m.id {
            " (default)"
        } else {
            ""
        };
        println!("{:<28} {:<10} {}{marker}", m.id, m.provider.as_str(), m.name);
        println!("{:<28} {}", "", m.description);
    }
}
