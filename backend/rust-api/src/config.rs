use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub store_backend: StoreBackend,
    pub evaluator: EvaluatorConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = config::ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(config::ConfigError::Message(format!(
                "Unknown store backend: {}",
                other
            ))),
        }
    }
}

/// Writing/speaking evaluation settings. Without a `url` the simulated
/// evaluator is used with the configured artificial delays.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorConfig {
    pub url: Option<String>,
    pub writing_delay_ms: u64,
    pub speaking_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            url: None,
            writing_delay_ms: 1000,
            speaking_delay_ms: 1500,
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first (two levels up), then local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/{env}.toml + APP_ prefixed overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "bandprep".to_string());

        let jwt_secret = match settings
            .get_string("auth.jwt_secret")
            .or_else(|_| env::var("JWT_SECRET"))
        {
            Ok(secret) => secret,
            Err(_) if env == "prod" => {
                return Err(config::ConfigError::Message(
                    "JWT_SECRET must be set in production".to_string(),
                ))
            }
            Err(_) => {
                tracing::warn!("Using default JWT_SECRET (dev mode only!)");
                "dev-secret-only-for-local-testing".to_string()
            }
        };

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let store_backend = settings
            .get_string("store.backend")
            .or_else(|_| env::var("STORE_BACKEND"))
            .map(|value| value.parse())
            .unwrap_or(Ok(StoreBackend::Mongo))?;

        let defaults = EvaluatorConfig::default();
        let evaluator = EvaluatorConfig {
            url: settings
                .get_string("evaluator.url")
                .or_else(|_| env::var("EVALUATOR_URL"))
                .ok()
                .filter(|url| !url.trim().is_empty()),
            writing_delay_ms: read_u64(
                &settings,
                "evaluator.writing_delay_ms",
                "EVALUATOR_WRITING_DELAY_MS",
            )
            .unwrap_or(defaults.writing_delay_ms),
            speaking_delay_ms: read_u64(
                &settings,
                "evaluator.speaking_delay_ms",
                "EVALUATOR_SPEAKING_DELAY_MS",
            )
            .unwrap_or(defaults.speaking_delay_ms),
            timeout_secs: read_u64(
                &settings,
                "evaluator.timeout_secs",
                "EVALUATOR_TIMEOUT_SECS",
            )
            .unwrap_or(defaults.timeout_secs),
        };

        Ok(Config {
            mongo_uri,
            mongo_database,
            jwt_secret,
            bind_addr,
            store_backend,
            evaluator,
        })
    }
}

fn read_u64(settings: &config::Config, key: &str, env_key: &str) -> Option<u64> {
    settings
        .get_int(key)
        .ok()
        .and_then(|value| u64::try_from(value).ok())
        .or_else(|| env::var(env_key).ok().and_then(|v| v.trim().parse().ok()))
}
