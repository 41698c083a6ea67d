//! Environment-supplied configuration, validated once at startup.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::llm::LlmSettings;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

const ADDR_VARS: &[&str] = &["QUICKNOTES_ADDR"];
const STORE_VARS: &[&str] = &["QUICKNOTES_STORE"];
const BACKEND_URL_VARS: &[&str] = &["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const BACKEND_KEY_VARS: &[&str] = &["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];
const TIMEOUT_VARS: &[&str] = &["QUICKNOTES_HTTP_TIMEOUT_SECS"];
const LOCAL_USER_VARS: &[&str] = &["QUICKNOTES_LOCAL_USER"];

/// Endpoint and public key of the hosted backend serving both the `notes`
/// table and the auth service.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub url: String,
    pub anon_key: String,
}

impl BackendSettings {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }
}

impl fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSettings")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// The hosted REST table and auth service.
    Rest(BackendSettings),
    /// Process-local rows for a single local user. Nothing is persisted.
    Memory { user: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub store: StoreBackend,
    pub llm: LlmSettings,
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Fails with [`CoreError::Configuration`] when the hosted store is
    /// selected but its endpoint or key is missing; there is no silent
    /// fallback to an empty store.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_raw = first_set(&lookup, ADDR_VARS).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw.parse::<SocketAddr>().map_err(|error| {
            CoreError::Configuration(format!("invalid QUICKNOTES_ADDR {addr_raw:?}: {error}"))
        })?;

        let store = match first_set(&lookup, STORE_VARS).as_deref() {
            None | Some("rest") => {
                let url = first_set(&lookup, BACKEND_URL_VARS);
                let anon_key = first_set(&lookup, BACKEND_KEY_VARS);
                match (url, anon_key) {
                    (Some(url), Some(anon_key)) => {
                        StoreBackend::Rest(BackendSettings::new(url, anon_key))
                    }
                    _ => {
                        return Err(CoreError::Configuration(
                            "Missing environment variables: set SUPABASE_URL and SUPABASE_ANON_KEY, \
                             or QUICKNOTES_STORE=memory for a local store"
                                .to_string(),
                        ))
                    }
                }
            }
            Some("memory") => StoreBackend::Memory {
                user: first_set(&lookup, LOCAL_USER_VARS)
                    .unwrap_or_else(|| "local-user".to_string()),
            },
            Some(other) => {
                return Err(CoreError::Configuration(format!(
                    "unknown QUICKNOTES_STORE {other:?}, expected \"rest\" or \"memory\""
                )))
            }
        };

        let timeout_secs = match first_set(&lookup, TIMEOUT_VARS) {
            Some(raw) => raw.parse::<u64>().map_err(|error| {
                CoreError::Configuration(format!(
                    "invalid QUICKNOTES_HTTP_TIMEOUT_SECS {raw:?}: {error}"
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            addr,
            store,
            llm: LlmSettings::from_lookup(&lookup),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Outbound HTTP client shared by the store, auth and provider clients.
    pub fn http_client(&self) -> CoreResult<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(self.http_timeout)
            .build()
            .map_err(|error| {
                CoreError::Configuration(format!("failed to build http client: {error}"))
            })
    }
}

/// First variable among `keys` that is set to a non-empty value.
pub(crate) fn first_set<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
