use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub listen_addr: String,
    pub token_expiry_hours: i64,
    pub bcrypt_cost: u32,
    /// Comma-separated list of origins allowed to call the API with credentials.
    pub cors_origins: String,
    pub db_max_connections: u32,
    pub log_dir: String,
    pub auto_create_schema: bool,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    jwt_secret: Option<String>,
    listen_addr: Option<String>,
    token_expiry_hours: Option<i64>,
    bcrypt_cost: Option<u32>,
    cors_origins: Option<String>,
    db_max_connections: Option<u32>,
    log_dir: Option<String>,
    auto_create_schema: Option<bool>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3030".to_string()
}

fn default_token_expiry_hours() -> i64 {
    24
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_cors_origins() -> String {
    "https://cassanova.net,https://www.cassanova.net,http://localhost:3000".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl ServerConfig {
    /// A config with every optional setting at its default.
    pub fn with_defaults(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        ServerConfig {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            listen_addr: default_listen_addr(),
            token_expiry_hours: default_token_expiry_hours(),
            bcrypt_cost: default_bcrypt_cost(),
            cors_origins: default_cors_origins(),
            db_max_connections: default_db_max_connections(),
            log_dir: default_log_dir(),
            auto_create_schema: false,
        }
    }

    /// Loads the config from an optional TOML file, then lets environment
    /// variables (and `.env`) override individual keys.
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config: PartialServerConfig = match config_path {
            Some(path_str) if Path::new(path_str).exists() => {
                let path = Path::new(path_str);
                let contents = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                toml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
            }
            _ => PartialServerConfig::default(),
        };

        // 2. Load from environment variables
        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        // 3. Merge: environment overrides file
        merge(file_config, env_config)
    }

    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn merge(file: PartialServerConfig, env: PartialServerConfig) -> Result<ServerConfig, String> {
    let database_url = env
        .database_url
        .or(file.database_url)
        .ok_or("DATABASE_URL is required")?;
    let jwt_secret = env
        .jwt_secret
        .or(file.jwt_secret)
        .filter(|secret| !secret.is_empty())
        .ok_or("JWT_SECRET is required")?;

    let defaults = ServerConfig::with_defaults(database_url, jwt_secret);

    Ok(ServerConfig {
        listen_addr: env.listen_addr.or(file.listen_addr).unwrap_or(defaults.listen_addr),
        token_expiry_hours: env
            .token_expiry_hours
            .or(file.token_expiry_hours)
            .unwrap_or(defaults.token_expiry_hours),
        bcrypt_cost: env.bcrypt_cost.or(file.bcrypt_cost).unwrap_or(defaults.bcrypt_cost),
        cors_origins: env.cors_origins.or(file.cors_origins).unwrap_or(defaults.cors_origins),
        db_max_connections: env
            .db_max_connections
            .or(file.db_max_connections)
            .unwrap_or(defaults.db_max_connections),
        log_dir: env.log_dir.or(file.log_dir).unwrap_or(defaults.log_dir),
        auto_create_schema: env
            .auto_create_schema
            .or(file.auto_create_schema)
            .unwrap_or(defaults.auto_create_schema),
        ..defaults
    })
}
