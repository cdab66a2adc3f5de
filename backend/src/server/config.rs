//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::redeem_service::DEFAULT_DEADLINE;
use crate::inbound::http::auth::ApiCredential;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: Option<String>,
    pub(crate) credential: ApiCredential,
    pub(crate) redeem_deadline: Duration,
}

impl ServerConfig {
    /// Construct a configuration with defaults for everything but the
    /// credential.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, credential: ApiCredential) -> Self {
        Self {
            bind_addr,
            database_url: None,
            credential,
            redeem_deadline: DEFAULT_DEADLINE,
        }
    }

    /// Attach a PostgreSQL connection string for the persistence adapters.
    #[must_use]
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Override the end-to-end redeem deadline.
    #[must_use]
    pub fn with_redeem_deadline(mut self, deadline: Duration) -> Self {
        self.redeem_deadline = deadline;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Read configuration from the environment.
    ///
    /// - `REDEEMD_BIND_ADDR` (default `0.0.0.0:8080`)
    /// - `REDEEMD_API_KEY` (required in release builds; debug builds fall
    ///   back to a development key with a warning)
    /// - `DATABASE_URL` (optional; without it the server runs on the
    ///   in-memory store)
    /// - `REDEEMD_REDEEM_TIMEOUT_SECS` (default 10)
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is present but unparseable, or when
    /// the API key is missing in a release build.
    pub fn from_env() -> std::io::Result<Self> {
        let raw_addr =
            env::var("REDEEMD_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
        let bind_addr: SocketAddr = raw_addr.parse().map_err(|err| {
            std::io::Error::other(format!("invalid REDEEMD_BIND_ADDR {raw_addr}: {err}"))
        })?;

        let credential = match env::var("REDEEMD_API_KEY") {
            Ok(secret) => {
                // Digest immediately and wipe the plaintext.
                let secret = Zeroizing::new(secret);
                ApiCredential::new(&secret)
            }
            Err(_) if cfg!(debug_assertions) => {
                warn!("REDEEMD_API_KEY not set; using a development key (dev only)");
                ApiCredential::new("dev-api-key")
            }
            Err(err) => {
                return Err(std::io::Error::other(format!(
                    "REDEEMD_API_KEY must be set: {err}"
                )));
            }
        };

        let redeem_deadline = match env::var("REDEEMD_REDEEM_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|err| {
                    std::io::Error::other(format!(
                        "invalid REDEEMD_REDEEM_TIMEOUT_SECS {raw}: {err}"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_DEADLINE,
        };

        let mut config = Self::new(bind_addr, credential).with_redeem_deadline(redeem_deadline);
        if let Ok(url) = env::var("DATABASE_URL") {
            config = config.with_database_url(url);
        }
        Ok(config)
    }
}
