use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Create the default staff accounts and toolroom catalogue at startup
    pub seed_defaults: bool,
    /// Initial password given to seeded staff accounts
    pub default_staff_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://toolroom.db?mode=rwc".to_string());

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(Vec::new),
            seed_defaults: env::var("SEED_DEFAULTS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            default_staff_password: env::var("DEFAULT_STAFF_PASSWORD")
                .unwrap_or_else(|_| "Toolroom2025!".to_string()),
        }
    }
}
