//! api-probe - send one request through the api client and print the outcome

use std::process::ExitCode;
use std::time::Duration;

use api::{
    ApiClient, ApiError, ApiErrorKind, ClientConfig, ConfigError, RequestDescriptor, RestMethod,
    DEFAULT_TIMEOUT_SECS,
};
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Send one request and print the classified outcome.
///
/// A successful JSON body is pretty-printed to stdout. Failures are printed to
/// stderr; validation failures are also mapped onto the `--field` names and
/// printed to stdout as a JSON object.
///
/// Exit codes: 0 success, 1 configuration, 2 validation, 3 unauthorized,
/// 4 server, 5 network.
///
/// Examples:
///   api-probe --base-url https://api.example.com get /users/1
///   api-probe post /users --body '{"email":"x"}' --field email --field name
#[derive(Debug, Parser)]
#[command(name = "api-probe")]
#[command(version)]
#[command(about = "Send one request through the api client and print the outcome")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Base endpoint URL
    #[arg(long, env = "API_BASE_URL", value_name = "URL")]
    base_url: Url,

    /// Request timeout in seconds
    #[arg(long, env = "API_TIMEOUT_SECS", value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Credential attached to the request
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Send the credential in this header instead of `Authorization: Bearer`
    #[arg(long, env = "API_AUTH_HEADER", value_name = "HEADER")]
    auth_header: Option<String>,

    /// HTTP method (case-insensitive)
    #[arg(value_name = "METHOD")]
    method: RestMethod,

    /// Path relative to the base URL
    #[arg(value_name = "PATH")]
    path: String,

    /// Query parameter as key=value (repeatable)
    #[arg(short, long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    query: Vec<(String, String)>,

    /// JSON request body
    #[arg(long, value_name = "JSON", value_parser = parse_json)]
    body: Option<serde_json::Value>,

    /// Form field names used to map validation errors (repeatable)
    #[arg(short = 'f', long = "field", value_name = "NAME")]
    fields: Vec<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] ApiError),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Output(_) => 1,
            Self::Request(e) => match e.kind() {
                ApiErrorKind::ValidationError => 2,
                ApiErrorKind::UnauthorizedError => 3,
                ApiErrorKind::ServerError => 4,
                ApiErrorKind::NetworkError => 5,
            },
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

fn parse_json(raw: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON body: {e}"))
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.base_url.clone());
        config.timeout = Duration::from_secs(self.timeout);
        config.token = self.token.clone().filter(|t| !t.trim().is_empty());
        config.auth_header = self.auth_header.clone().filter(|h| !h.trim().is_empty());
        config
    }

    fn descriptor(&self) -> Result<RequestDescriptor, ConfigError> {
        let mut builder = RequestDescriptor::builder()
            .method(self.method)
            .path(self.path.as_str());
        for (key, value) in &self.query {
            builder = builder.query(key.as_str(), value);
        }
        if let Some(body) = &self.body {
            builder = builder.json(body)?;
        }
        Ok(builder.build())
    }
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,api=info".to_string(),
            2 => "info,api=debug".to_string(),
            _ => "debug,api=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

async fn run(cli: &Cli) -> Result<serde_json::Value, CliError> {
    let client = ApiClient::from_config(&cli.client_config())?;
    let descriptor = cli.descriptor()?;
    Ok(client.request::<serde_json::Value>(&descriptor).await?)
}

fn render_failure(cli: &Cli, err: &CliError) -> Result<(), serde_json::Error> {
    eprintln!("error: {err}");

    if let CliError::Request(api_err) = err {
        if let Some(fields) = api_err.field_errors(&cli.fields) {
            println!("{}", serde_json::to_string_pretty(&fields.into_inner())?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    tracing::debug!(method = %cli.method, path = %cli.path, "probing");

    let outcome = run(&cli).await.and_then(|body| {
        if !body.is_null() {
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(())
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(render) = render_failure(&cli, &err) {
                eprintln!("error: failed to render output: {render}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}
