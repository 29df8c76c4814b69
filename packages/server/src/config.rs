use chrono::TimeDelta;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl_hours: i64,
    /// Argon2 memory cost for new password hashes.
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    /// Waiting period between swaps once the bonus swap is used.
    pub swap_cooldown_minutes: i64,
}

impl PredictionConfig {
    pub fn swap_cooldown(&self) -> TimeDelta {
        TimeDelta::minutes(self.swap_cooldown_minutes)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DemoConfig {
    /// Expose `POST /demo/reset`.
    pub enable_reset: bool,
    /// Round the seeded season is currently in.
    pub current_round: u8,
    /// Password shared by the seeded demo accounts.
    pub password: String,
    /// Seed for generated match results and demo predictions.
    pub rng_seed: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub prediction: PredictionConfig,
    pub demo: DemoConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_hours", 24 * 7)?
            .set_default("auth.argon2_memory_kib", 19 * 1024)?
            .set_default("auth.argon2_iterations", 2)?
            .set_default("prediction.swap_cooldown_minutes", 24 * 60)?
            .set_default("demo.enable_reset", true)?
            .set_default("demo.current_round", 8)?
            .set_default("demo.password", "password123")?
            .set_default("demo.rng_seed", 2025)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., PREDICTOR__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("PREDICTOR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
