//! # configs
//!
//! Layered settings for the posts service. Later layers win:
//!
//! 1. built-in defaults
//! 2. `config/default.toml`, then `config/local.toml` (both optional)
//! 3. `RUSTY_POSTS__<SECTION>__<KEY>` environment variables (`.env` is read first)
//! 4. the bare `PORT` and `MONGODB_URI` variables
//!
//! Connection credentials are held as [`SecretString`] and never reach logs.

use config::{Config, ConfigBuilder, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::info;

pub const ENV_PREFIX: &str = "RUSTY_POSTS";

/// Placeholder in `database.uri` replaced by `database.password`.
pub const PASSWORD_PLACEHOLDER: &str = "{password}";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    pub posts: PostsSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served for any path no route claims.
    pub static_dir: String,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(deserialize_with = "secret")]
    pub uri: SecretString,
    #[serde(default, deserialize_with = "optional_secret")]
    pub password: Option<SecretString>,
    pub name: String,
    pub collection: String,
}

impl DatabaseSettings {
    /// The uri with `{password}` filled in when a password is configured.
    pub fn connection_uri(&self) -> SecretString {
        let uri = self.uri.expose_secret();
        match &self.password {
            Some(password) => {
                SecretString::from(uri.replace(PASSWORD_PLACEHOLDER, password.expose_secret()))
            }
            None => SecretString::from(uri.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateEchoSetting {
    Stored,
    Merged,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostsSettings {
    pub upsert_on_update: bool,
    pub update_echo: UpdateEchoSetting,
    pub required_fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Settings {
    /// Reads `.env`, then every layer from the process environment and disk.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment());
        let builder = with_bare_overrides(
            builder,
            std::env::var("PORT").ok(),
            std::env::var("MONGODB_URI").ok(),
        )?;

        Self::from_config(builder.build()?)
    }

    /// The built-in defaults as a builder, for callers that add their own layers.
    pub fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.static_dir", "public")?
            .set_default("storage.backend", "mongodb")?
            .set_default("database.uri", "mongodb://localhost:27017")?
            .set_default("database.name", "postsDB")?
            .set_default("database.collection", "posts")?
            .set_default("posts.upsert_on_update", true)?
            .set_default("posts.update_echo", "stored")?
            .set_default("posts.required_fields", Vec::<String>::new())?
            .set_default("log.format", "pretty")?
            .set_default("log.filter", "info")?)
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.name.trim().is_empty() {
            return Err(ConfigError::Invalid("database.name must not be empty".into()));
        }
        if self.database.collection.trim().is_empty() {
            return Err(ConfigError::Invalid("database.collection must not be empty".into()));
        }
        if self.database.password.is_none()
            && self.database.uri.expose_secret().contains(PASSWORD_PLACEHOLDER)
        {
            return Err(ConfigError::Invalid(format!(
                "database.uri contains {PASSWORD_PLACEHOLDER} but database.password is unset"
            )));
        }
        Ok(())
    }

    /// Logs the effective configuration, secrets excluded.
    pub fn log_summary(&self) {
        info!(
            bind = %self.server.bind_addr(),
            static_dir = %self.server.static_dir,
            backend = ?self.storage.backend,
            database = %self.database.name,
            collection = %self.database.collection,
            upsert_on_update = self.posts.upsert_on_update,
            update_echo = ?self.posts.update_echo,
            required_fields = ?self.posts.required_fields,
            "configuration loaded"
        );
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("posts.required_fields")
}

fn with_bare_overrides(
    builder: ConfigBuilder<config::builder::DefaultState>,
    port: Option<String>,
    mongodb_uri: Option<String>,
) -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(builder
        .set_override_option("server.port", port)?
        .set_override_option("database.uri", mongodb_uri)?)
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

fn optional_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.is_empty())
        .map(SecretString::from))
}
