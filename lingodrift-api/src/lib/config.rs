use std::env;
use std::fmt;

use auth::HashCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Minimum signing secret length for HS256.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub cors: CorsConfig,
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
    pub secret: String,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

/// Argon2id cost applied to newly hashed passwords.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_token_expire_minutes() -> i64 {
    auth::jwt::DEFAULT_TOKEN_TTL_MINUTES
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .finish()
    }
}

impl JwtConfig {
    /// Token lifetime as a duration.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Minutes overflow the duration range
    pub fn access_token_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_minutes(self.access_token_expire_minutes).ok_or_else(|| {
            ConfigError::Message(
                "jwt.access_token_expire_minutes is out of range".to_string(),
            )
        })
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let cost = HashCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl PasswordConfig {
    pub fn cost(&self) -> HashCost {
        HashCost {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "https://lingualdrift.com".to_string(),
                "https://staging.lingodrift.com".to_string(),
            ],
        }
    }
}

/// Active configuration profile, `production` unless RUN_MODE says otherwise.
pub fn run_mode() -> String {
    env::var("RUN_MODE").unwrap_or_else(|_| "production".to_string())
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy variables SECRET_KEY and DATABASE_URL
    /// 2. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 3. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 4. Default config file (config/default.toml)
    ///
    /// There is no built-in signing secret; loading fails unless one is
    /// configured.
    pub fn load() -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode())).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .set_override_option("jwt.secret", env::var("SECRET_KEY").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings that would make the service insecure or unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                MIN_SECRET_BYTES
            )));
        }

        if self.jwt.access_token_expire_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_expire_minutes must be positive".to_string(),
            ));
        }

        self.jwt.access_token_ttl()?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    const MINIMAL: &str = r#"
        [database]
        url = "postgresql://localhost/lingodrift"

        [server]
        http_port = 8000

        [jwt]
        secret = "0123456789abcdef0123456789abcdef"
    "#;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = parse(MINIMAL).expect("Minimal config should parse");

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.access_token_expire_minutes, 15);
        assert_eq!(
            config.jwt.access_token_ttl().unwrap(),
            chrono::Duration::minutes(15)
        );
        assert_eq!(config.password.cost(), HashCost::default());
        assert_eq!(config.cors, CorsConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_secret_fails() {
        let toml = r#"
            [database]
            url = "postgresql://localhost/lingodrift"

            [server]
            http_port = 8000

            [jwt]
            access_token_expire_minutes = 15
        "#;

        assert!(parse(toml).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = parse(MINIMAL).unwrap();
        config.jwt.secret = "dev_secret_key_change_in_prod".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut config = parse(MINIMAL).unwrap();
        config.jwt.access_token_expire_minutes = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_ttl_rejected() {
        let mut config = parse(MINIMAL).unwrap();
        config.jwt.access_token_expire_minutes = i64::MAX / 2;

        assert!(matches!(config.validate(), Err(ConfigError::Message(_))));
        assert!(config.jwt.access_token_ttl().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = parse(MINIMAL).unwrap();

        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("0123456789abcdef"));
        assert!(rendered.contains("<redacted>"));
    }
}
