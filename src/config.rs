use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::events::DEFAULT_EVENT_CAPACITY;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
    pub settings_path: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub event_capacity: usize,
    /// Extra browser origins allowed to call the API, beyond the server's own.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(var("PORT"), "PORT", DEFAULT_PORT),
            cert_path: var("CERT_PATH").map(PathBuf::from),
            key_path: var("KEY_PATH").map(PathBuf::from),
            settings_path: var("WORKBENCH_SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_settings_path),
            static_dir: var("WORKBENCH_STATIC_DIR").map(PathBuf::from),
            event_capacity: parse_or(
                var("WORKBENCH_EVENT_CAPACITY"),
                "WORKBENCH_EVENT_CAPACITY",
                DEFAULT_EVENT_CAPACITY,
            )
            .max(1),
            allowed_origins: var("WORKBENCH_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Exact origins the CORS layer accepts: the server's own address over
    /// http and https (with `localhost`/`127.0.0.1` aliases for loopback),
    /// then anything listed in `WORKBENCH_ALLOWED_ORIGINS`.
    pub fn renderer_origins(&self) -> Vec<String> {
        let mut hosts = vec![self.host.clone()];
        if is_loopback(&self.host) {
            for alias in ["localhost", "127.0.0.1"] {
                if !hosts.iter().any(|h| h == alias) {
                    hosts.push(alias.to_string());
                }
            }
        }

        let mut origins = Vec::new();
        for host in &hosts {
            for scheme in ["http", "https"] {
                origins.push(format!("{}://{}:{}", scheme, host, self.port));
            }
        }
        for origin in &self.allowed_origins {
            if !origins.contains(origin) {
                origins.push(origin.clone());
            }
        }
        origins
    }
}

fn is_loopback(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1" || host == "::1"
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T: FromStr + Copy>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} value '{}', using default", key, raw);
            default
        }),
    }
}

fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agent-workbench")
        .join("settings.json")
}
