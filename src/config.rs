// src/config.rs

use std::{env, time::Duration};

use anyhow::{bail, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// REST interface of the hosted backend
    Supabase,
    /// direct connection to the backend's Postgres
    Postgres,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Unknown values fall back to `Pretty`.
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Plain-token cookie name used by the backend's older auth helpers.
pub const DEFAULT_AUTH_COOKIE: &str = "sb-access-token";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub store_timeout: Duration,
    pub log_format: LogFormat,
    /// Cookie read for the access token when no bearer header is sent.
    pub auth_cookie: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match var("PORT") {
            Some(p) => p.parse().with_context(|| format!("PORT is not a valid port: {p}"))?,
            None => 8080,
        };

        let supabase_url = var("SUPABASE_URL").context("SUPABASE_URL must be set")?;
        let supabase_anon_key = var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY must be set")?;

        let backend = match var("STORE_BACKEND").as_deref() {
            None | Some("supabase") => StoreBackend::Supabase,
            Some("postgres") => StoreBackend::Postgres,
            Some(other) => bail!("unknown STORE_BACKEND: {other}"),
        };

        let database_url = var("DATABASE_URL");
        if backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND=postgres");
        }

        let store_timeout = match var("STORE_TIMEOUT_SECS") {
            Some(s) => Duration::from_secs(
                s.parse()
                    .with_context(|| format!("STORE_TIMEOUT_SECS is not a number: {s}"))?,
            ),
            None => Duration::from_secs(10),
        };

        let log_format = var("LOG_FORMAT")
            .map(|s| LogFormat::parse(&s))
            .unwrap_or_default();

        let auth_cookie = var("AUTH_COOKIE")
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTH_COOKIE.to_string());

        Ok(Self {
            port,
            supabase_url,
            supabase_anon_key,
            backend,
            database_url,
            store_timeout,
            log_format,
            auth_cookie,
        })
    }
}
