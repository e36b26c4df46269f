//! specstore CLI
//!
//! Publishes a spec file from a GitHub repository into an OpenAI vector
//! store and wires that store to an assistant with `file_search` enabled.

mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use specstore_core::config::{AppConfig, SourceArgs};
use specstore_core::{logging, AppError, AppResult};
use specstore_github::GitHubClient;
use specstore_openai::{OpenAiClient, DEFAULT_POLL_INTERVAL};
use tracing::Instrument;

/// Publish a repository spec file to an OpenAI vector store and assistant
///
/// Secrets are read from GITHUB_TOKEN and OPENAI_API_KEY. GITHUB_OWNER,
/// GITHUB_REPO, GITHUB_PATH and GITHUB_REF override the matching flags.
/// Set VECTOR_STORE_ID / ASSISTANT_ID to reuse existing resources.
#[derive(Parser, Debug)]
#[command(name = "specstore")]
#[command(version)]
struct Cli {
    /// GitHub owner or organization
    #[arg(long)]
    owner: String,

    /// GitHub repository name
    #[arg(long)]
    repo: String,

    /// Path to the spec file in the repository [default: spec/spec.json]
    #[arg(long)]
    path: Option<String>,

    /// Branch, tag or commit SHA [default: main]
    #[arg(long = "ref")]
    reference: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = SourceArgs {
        owner: cli.owner,
        repo: cli.repo,
        path: cli.path,
        reference: cli.reference,
    };

    // Secrets are checked here, before any client exists
    let config = match configure(source, |key| std::env::var(key).ok()) {
        Ok(config) => config.with_overrides(cli.log_level, cli.verbose, cli.no_color),
        Err(code) => return ExitCode::from(code),
    };

    if let Err(e) = logging::init_logging(config.log_level.as_deref(), config.no_color) {
        eprintln!("{}", e);
        return ExitCode::from(1);
    }

    tracing::info!("specstore {} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Config: {:?}", config);

    match provision(&config).await {
        Ok(provisioned) => {
            println!();
            println!("{}", provisioned.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Provisioning failed: {}", e);
            eprintln!("Error: {}", e);
            if matches!(e, AppError::NotFound { .. }) {
                eprintln!(
                    "Check --owner/--repo/--path/--ref (or GITHUB_OWNER/GITHUB_REPO/GITHUB_PATH/GITHUB_REF) and that GITHUB_TOKEN can read the repository."
                );
            }
            ExitCode::FAILURE
        }
    }
}

/// Exit status for a run stopped by missing configuration.
const CONFIG_EXIT_STATUS: u8 = 1;

/// Resolve configuration, or report the problem and return the exit status.
fn configure<F>(source: SourceArgs, env: F) -> Result<AppConfig, u8>
where
    F: Fn(&str) -> Option<String>,
{
    AppConfig::from_lookup(source, env).map_err(|e| {
        eprintln!("{}", e);
        CONFIG_EXIT_STATUS
    })
}

async fn provision(config: &AppConfig) -> AppResult<pipeline::Provisioned> {
    let github = GitHubClient::with_base_url(&config.github_api_url, &config.github_token)?;
    let openai = OpenAiClient::with_base_url(&config.openai_base_url, &config.openai_api_key);

    let span = tracing::info_span!("provision", owner = %config.owner, repo = %config.repo);
    pipeline::run(config, &github, &openai, &openai, DEFAULT_POLL_INTERVAL)
        .instrument(span)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    fn source() -> SourceArgs {
        SourceArgs {
            owner: "acme".to_string(),
            repo: "boat".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_secret_exits_with_status_one() {
        let only_openai = |key: &str| (key == "OPENAI_API_KEY").then(|| "sk-test".to_string());
        assert_eq!(configure(source(), only_openai).unwrap_err(), 1);

        let only_github = |key: &str| (key == "GITHUB_TOKEN").then(|| "ghp_test".to_string());
        assert_eq!(configure(source(), only_github).unwrap_err(), 1);
    }

    #[test]
    fn test_configure_with_secrets() {
        let secrets = |key: &str| match key {
            "GITHUB_TOKEN" => Some("ghp_test".to_string()),
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        };
        let config = configure(source(), secrets).unwrap();
        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo, "boat");
    }

    #[test]
    fn test_no_color_accepts_any_value_from_env() {
        std::env::set_var("NO_COLOR", "1");
        let cli = Cli::try_parse_from(["specstore", "--owner", "acme", "--repo", "boat"]).unwrap();
        assert!(cli.no_color);
    }

    #[test]
    fn test_owner_and_repo_required() {
        assert!(Cli::try_parse_from(["specstore", "--repo", "boat"]).is_err());
        assert!(Cli::try_parse_from(["specstore", "--owner", "acme"]).is_err());
    }

    #[test]
    fn test_parse_ref_flag() {
        let cli = Cli::try_parse_from([
            "specstore", "--owner", "acme", "--repo", "boat", "--path", "docs/spec.json", "--ref",
            "v1.2.0",
        ])
        .unwrap();
        assert_eq!(cli.owner, "acme");
        assert_eq!(cli.repo, "boat");
        assert_eq!(cli.path.as_deref(), Some("docs/spec.json"));
        assert_eq!(cli.reference.as_deref(), Some("v1.2.0"));
    }
}
