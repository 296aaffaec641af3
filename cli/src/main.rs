mod probe;

use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};
use contracts::{ContractError, SummarizeRequest};
use contracts::token::TokenError;
use serde_json::{Map, Value};

use crate::probe::Probe;

/// Exit status for a request the server rejected as unauthenticated.
const EXIT_UNAUTHORIZED: u8 = 3;
const EXIT_FAILURE: u8 = 1;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing credentials; pass --email/--password or set INSIGHTDECK_EMAIL/INSIGHTDECK_PASSWORD")]
    MissingCredentials,
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unauthorized (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Contract(#[from] ContractError),
    #[error("token inspection failed: {0}")]
    Token(#[from] TokenError),
    #[error("invalid JSON argument: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("expected a JSON {expected} for --{arg}")]
    WrongJsonType { arg: &'static str, expected: &'static str },
}

impl CliError {
    fn exit_status(&self) -> u8 {
        match self {
            Self::Unauthorized { .. } => EXIT_UNAUTHORIZED,
            _ => EXIT_FAILURE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "insightdeck-cli", about = "InsightDeck API diagnostic probes")]
struct Cli {
    #[arg(long, env = "INSIGHTDECK_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Timeout applied to every request.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Credentials {
    #[arg(long, env = "INSIGHTDECK_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "INSIGHTDECK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl Credentials {
    fn require(&self) -> Result<(&str, &str), CliError> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => Ok((email, password)),
            _ => Err(CliError::MissingCredentials),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the normalized login shape.
    Login(Credentials),
    /// Log in, then GET a protected path with the bearer token.
    Protected {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long, default_value = contracts::PROFILE_PATH)]
        path: String,
    },
    /// Log in, then POST chart data to the summarization endpoint.
    Summarize {
        #[command(flatten)]
        credentials: Credentials,
        /// JSON array of data rows.
        #[arg(long)]
        data: String,
        /// JSON object with chart settings.
        #[arg(long, default_value = "{}")]
        chart_config: String,
    },
    /// Decode a JWT payload without verifying it.
    InspectToken { token: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_status())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Command::Login(credentials) => {
            let (email, password) = credentials.require()?;
            let probe = Probe::new(&cli.base_url, timeout)?;
            let outcome = probe.login(email, password).await?;
            print_json(&outcome.report())
        }
        Command::Protected { credentials, path } => {
            let (email, password) = credentials.require()?;
            let probe = Probe::new(&cli.base_url, timeout)?;
            let outcome = probe.login(email, password).await?;
            let body = probe.protected(&outcome.payload.token, &path).await?;
            print_json(&body)
        }
        Command::Summarize { credentials, data, chart_config } => {
            let request = summarize_request(&data, &chart_config)?;
            let (email, password) = credentials.require()?;
            let probe = Probe::new(&cli.base_url, timeout)?;
            let outcome = probe.login(email, password).await?;
            let body = probe.summarize(&outcome.payload.token, &request).await?;
            print_json(&body)
        }
        Command::InspectToken { token } => {
            let report = probe::inspect_token(&token, now_secs())?;
            print_json(&report)
        }
    }
}

fn summarize_request(data: &str, chart_config: &str) -> Result<SummarizeRequest, CliError> {
    let Value::Array(data) = serde_json::from_str::<Value>(data)? else {
        return Err(CliError::WrongJsonType { arg: "data", expected: "array" });
    };
    let chart_config: Map<String, Value> = match serde_json::from_str::<Value>(chart_config)? {
        Value::Object(map) => map,
        _ => return Err(CliError::WrongJsonType { arg: "chart-config", expected: "object" }),
    };
    Ok(SummarizeRequest { data, chart_config })
}

fn now_secs() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_secs()).unwrap_or(0)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;
