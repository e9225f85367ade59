/// Centralized environment configuration.
/// All env vars and defaults are defined here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL. Required.
    pub database_url: String,

    /// Address the HTTP server binds to.
    /// Default: 0.0.0.0:3000
    pub listen_addr: String,

    /// Storage adapter for employee pictures: "console" only for now. The
    /// application stores final object URLs and issues delete requests; the
    /// upload path lives outside this service.
    pub storage_adapter: String,
}

impl Config {
    /// Build config from environment variables.
    /// Returns an error if required vars are missing.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in .env")?;

        let listen_addr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let storage_adapter = std::env::var("STORAGE_ADAPTER")
            .unwrap_or_else(|_| "console".to_string());

        Ok(Self {
            database_url,
            listen_addr,
            storage_adapter,
        })
    }

    /// Config for tests. Uses in-memory database URL and console storage.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            listen_addr: "127.0.0.1:0".to_string(),
            storage_adapter: "console".to_string(),
        }
    }
}
