use std::{env, time::Duration};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use reqwest::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000/";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WORKSPACE_IDLE_MINUTES: u64 = 60;

/// Runtime settings for the portal, sourced from the environment.
#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub api_base_url: Url,
    pub port: u16,
    pub request_timeout: Duration,
    pub workspace_idle: Duration,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("PORTAL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = parse_base_url(&raw_url)?;

        let port = parse_or_default(&lookup, "PORT", DEFAULT_PORT)?;
        let timeout_secs = parse_or_default(
            &lookup,
            "PORTAL_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            bail!("PORTAL_REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        let idle_minutes = parse_or_default(
            &lookup,
            "PORTAL_WORKSPACE_IDLE_MINUTES",
            DEFAULT_WORKSPACE_IDLE_MINUTES,
        )?;
        let workspace_idle = idle_window(idle_minutes)?;

        Ok(Self {
            api_base_url,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
            workspace_idle,
        })
    }
}

/// Parse the API base URL, forcing a trailing slash so endpoint joins stay
/// under the configured path.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&normalized)
        .with_context(|| format!("PORTAL_API_URL is not a valid URL: {trimmed}"))?;
    if url.cannot_be_a_base() {
        bail!("PORTAL_API_URL cannot be used as a base URL: {trimmed}");
    }

    Ok(url)
}

/// The idle window must leave a representable cutoff timestamp.
fn idle_window(minutes: u64) -> Result<Duration> {
    let Some(secs) = minutes.checked_mul(60) else {
        bail!("PORTAL_WORKSPACE_IDLE_MINUTES is too large: {minutes}");
    };
    let idle = Duration::from_secs(secs);

    let cutoff = chrono::Duration::from_std(idle)
        .ok()
        .and_then(|delta| Utc::now().checked_sub_signed(delta));
    if cutoff.is_none() {
        bail!("PORTAL_WORKSPACE_IDLE_MINUTES is too large: {minutes}");
    }

    Ok(idle)
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        None => Ok(default),
    }
}
