use anyhow::{Context, Result};
use lithium_sso::{AuthTokenRequest, SsoClient, SsoConfig};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const JOB_ENV: &str = "LITHIUM_SSO_JOB";
const DEFAULT_JOB_PATH: &str = "sso-job.json";
const LOG_LEVEL: Level = Level::INFO;
const COLORED_LOGS: bool = true;

/// One token to issue: the deployment config plus the user it is for.
#[derive(Debug, Deserialize)]
struct TokenJob {
    client: SsoConfig,
    user: AuthTokenRequest,
    /// Replace the e-mail with its PrivacyGuard-encrypted form before issuing.
    #[serde(default)]
    privacy_guard_email: bool,
}

fn main() -> ExitCode {
    setup_tracing();

    let path = job_path();
    info!("Loading token job from {}", path.display());

    let result = run(&path);
    if let Err(err) = &result {
        error!("Token issuance failed: {:#}", err);
    }
    // The JSON line is the only report of the outcome on stdout.
    println!("{}", report(&result));
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report(result: &Result<String>) -> serde_json::Value {
    match result {
        Ok(token) => serde_json::json!({ "sso_token": token }),
        Err(err) => serde_json::json!({ "error": format!("{:#}", err) }),
    }
}

fn run(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let job: TokenJob = serde_json::from_str(&raw).context("parsing token job")?;

    let client = SsoClient::from_config(&job.client)?;
    let _span = client.span().entered();

    let mut user = job.user;
    if job.privacy_guard_email {
        if !client.has_privacy_guard() {
            anyhow::bail!("privacy_guard_email set but no privacy_guard_key configured");
        }
        user.email = client.privacy_guard_field(&user.email)?;
    }

    info!("Issuing token (cookie {})", client.cookie_name());
    Ok(client.issue_token(&user)?)
}

fn job_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(JOB_ENV))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_JOB_PATH))
}

fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LOG_LEVEL.as_str()));

    // stdout carries the JSON result, logs go to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(COLORED_LOGS);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
