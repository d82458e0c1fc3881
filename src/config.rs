use std::env;

/// Process configuration, read once at startup. `DATABASE_URL` is required;
/// the bind address defaults to 127.0.0.1:8000.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("APP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("APP_PORT is not a valid port: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self {
            database_url,
            host,
            port,
        })
    }
}
