use std::env;

use auth::HashingParams;
use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

const MIN_SECRET_BYTES: usize = 32;
const MAX_ACCESS_EXPIRATION_MINUTES: i64 = 24 * 60;
const MAX_REFRESH_EXPIRATION_DAYS: i64 = 365;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_access_expiration_minutes")]
    pub access_expiration_minutes: i64,
    #[serde(default = "default_refresh_expiration_days")]
    pub refresh_expiration_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_expiration_minutes() -> i64 {
    15
}

fn default_refresh_expiration_days() -> i64 {
    7
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let params = HashingParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_expiration_minutes", &self.access_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .finish()
    }
}

impl JwtConfig {
    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes {
            access: chrono::Duration::minutes(self.access_expiration_minutes),
            refresh: chrono::Duration::days(self.refresh_expiration_days),
        }
    }
}

impl PasswordConfig {
    pub fn params(&self) -> HashingParams {
        HashingParams {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__ACCESS_SECRET=... overrides jwt.access_secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, secret) in [
            ("jwt.access_secret", &self.jwt.access_secret),
            ("jwt.refresh_secret", &self.jwt.refresh_secret),
        ] {
            if secret.len() < MIN_SECRET_BYTES {
                return Err(ConfigError::Message(format!(
                    "{} must be at least {} bytes",
                    name, MIN_SECRET_BYTES
                )));
            }
        }

        // Shared secrets would let a refresh token pass as an access token
        if self.jwt.access_secret == self.jwt.refresh_secret {
            return Err(ConfigError::Message(
                "jwt.access_secret and jwt.refresh_secret must differ".to_string(),
            ));
        }

        if !(1..=MAX_ACCESS_EXPIRATION_MINUTES).contains(&self.jwt.access_expiration_minutes) {
            return Err(ConfigError::Message(format!(
                "jwt.access_expiration_minutes must be between 1 and {}",
                MAX_ACCESS_EXPIRATION_MINUTES
            )));
        }
        if !(1..=MAX_REFRESH_EXPIRATION_DAYS).contains(&self.jwt.refresh_expiration_days) {
            return Err(ConfigError::Message(format!(
                "jwt.refresh_expiration_days must be between 1 and {}",
                MAX_REFRESH_EXPIRATION_DAYS
            )));
        }

        self.password
            .params()
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))
    }
}
