use anyhow::Context;
use clap::Parser;

use iam_token_cache::config::settings::{CoordinatorConfig, LogFormat};
use iam_token_cache::utils::logging::{self, LogLevel};
use iam_token_cache::TokenCoordinator;

/// Fetch one bearer token from the identity provider and print it.
///
/// Handy for shell scripting:
/// `curl -H "Authorization: $(iam-token --header)" https://...`
#[derive(Debug, Parser)]
#[command(name = "iam-token", version, about = "Fetch and print an IAM bearer token")]
struct Args {
    /// API key presented to the identity provider
    #[arg(long, env = "IAM_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Token endpoint; the production endpoint is used when omitted
    #[arg(long, env = "IAM_URL")]
    iam_url: Option<String>,

    /// Print the full Authorization header value instead of the bare token
    #[arg(long)]
    header: bool,

    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,

    #[arg(long, env = "LOG_FORMAT", value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(&logging::resolve_logging_config(args.log_level, args.log_format));

    let mut config = CoordinatorConfig::new(args.api_key);
    if let Some(iam_url) = args.iam_url {
        config = config.with_iam_url(iam_url);
    }

    let coordinator =
        TokenCoordinator::from_config(config).context("building token coordinator")?;
    let output = if args.header {
        coordinator.get_auth_header().await?
    } else {
        coordinator.get_token().await?
    };
    println!("{output}");
    Ok(())
}
