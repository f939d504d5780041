use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub local_storage_url: String,
    pub session_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:rive.db?mode=rwc".to_string()),
            local_storage_url: env::var("LOCAL_STORAGE_URL")
                .unwrap_or_else(|_| "sqlite:rive-local.db?mode=rwc".to_string()),
            session_ttl_days: env::var("SESSION_TTL_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
        })
    }
}
