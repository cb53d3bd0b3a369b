//! Process configuration read from the environment

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use account::AccountConfig;
use account::config::{DEFAULT_SESSION_TTL, SameSite};
use anyhow::{Context, bail};
use platform::crypto;

const DEFAULT_PORT: u16 = 8095;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Settings for the API process
#[derive(Debug)]
pub struct Settings {
    /// `None` runs on in-memory stores
    pub database_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub addr: SocketAddr,
    pub account: AccountConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = non_empty_var("DATABASE_URL");

        let host: IpAddr = match non_empty_var("APP_HOST") {
            Some(host) => host.parse().context("APP_HOST must be an IP address")?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port: u16 = match non_empty_var("APP_PORT") {
            Some(port) => port.parse().context("APP_PORT must be a port number")?,
            None => DEFAULT_PORT,
        };

        let frontend_origins = non_empty_var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            frontend_origins,
            addr: SocketAddr::new(host, port),
            account: account_config()?,
        })
    }
}

fn account_config() -> anyhow::Result<AccountConfig> {
    let base = match non_empty_var("SESSION_SECRET") {
        Some(secret_b64) => AccountConfig {
            session_secret: decode_secret(&secret_b64)?,
            ..AccountConfig::default()
        },
        None if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, using a random secret with insecure cookies");
            AccountConfig::development()
        }
        None => bail!("SESSION_SECRET must be set in production"),
    };

    let session_ttl = match non_empty_var("SESSION_TTL_SECS") {
        Some(secs) => Duration::from_secs(
            secs.parse()
                .context("SESSION_TTL_SECS must be a number of seconds")?,
        ),
        None => DEFAULT_SESSION_TTL,
    };

    let cookie_same_site = match non_empty_var("SESSION_COOKIE_SAMESITE") {
        Some(value) => parse_same_site(&value)?,
        None => base.cookie_same_site,
    };

    Ok(AccountConfig {
        session_ttl,
        cookie_same_site,
        password_pepper: non_empty_var("PASSWORD_PEPPER").map(String::into_bytes),
        ..base
    })
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes =
        crypto::from_base64(secret_b64.trim()).context("SESSION_SECRET must be base64")?;

    bytes.try_into().map_err(|bytes: Vec<u8>| {
        anyhow::anyhow!(
            "SESSION_SECRET must decode to 32 bytes, got {}",
            bytes.len()
        )
    })
}

fn parse_same_site(value: &str) -> anyhow::Result<SameSite> {
    SameSite::parse(value).with_context(|| {
        format!("SESSION_COOKIE_SAMESITE must be Strict, Lax or None, got {value:?}")
    })
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
