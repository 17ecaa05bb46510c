//! Environment-driven configuration.

use std::env;
use std::net::SocketAddr;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
}

impl Config {
    /// Reads configuration from the environment. `BIND_ADDR` defaults to
    /// localhost; a missing `DATABASE_URL` selects the in-memory store.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = match env::var("BIND_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("BIND_ADDR `{}` is not a socket address", raw))?,
            Err(_) => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };
        Ok(Self {
            bind_addr,
            database_url: env::var("DATABASE_URL").ok(),
        })
    }
}
