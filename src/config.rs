use std::{fs, net::SocketAddr, path::Path};

use anyhow::Context;
use serde::{Deserialize, Deserializer, de};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_WECHAT_API_BASE: &str = "https://api.weixin.qq.com";

/// Settings read from `config.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "port")]
    pub port: u16,
    /// SQLite DSN, e.g. `sqlite://scoring.db`.
    #[serde(default)]
    pub database: String,
    pub app_id: String,
    pub app_secret: String,
    #[serde(default = "default_wechat_api_base")]
    pub wechat_api_base: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_wechat_api_base() -> String {
    DEFAULT_WECHAT_API_BASE.to_owned()
}

fn default_max_connections() -> u32 {
    16
}

// accepts 8080, "8080" and ":8080"
fn port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text
            .trim_start_matches(':')
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid port {text:?}"))),
    }
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Config> {
        let config: Config = serde_json::from_str(json).context("malformed config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`, then applies `DATABASE_URL` from the environment if set.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Config> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let mut config: Config = serde_json::from_str(&json)
            .with_context(|| format!("malformed config file {}", path.display()))?;
        if let Ok(database_url) = dotenv::var("DATABASE_URL") {
            config.database = database_url;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.database.is_empty() {
            anyhow::bail!("no database configured (set `database` or DATABASE_URL)");
        }
        if self.app_id.is_empty() || self.app_secret.is_empty() {
            anyhow::bail!("`appId` and `appSecret` must not be empty");
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
