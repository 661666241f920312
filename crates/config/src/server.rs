use crate::{ConfigError, Env};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub(crate) fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = env
            .optional("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        // BACKEND_PORT wins over PORT so a shared shell PORT does not leak in.
        let port = if env.optional("BACKEND_PORT").is_some() {
            env.parse_or("BACKEND_PORT", DEFAULT_PORT)?
        } else {
            env.parse_or("PORT", DEFAULT_PORT)?
        };
        Ok(Self { host, port })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
