use crate::{ConfigError, Env};

/// A comma-separated allow list where `*` means "anything".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowList {
    Any,
    Only(Vec<String>),
}

impl AllowList {
    pub fn parse(raw: &str) -> Self {
        let items: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        if items.is_empty() || items.iter().any(|item| item == "*") {
            AllowList::Any
        } else {
            AllowList::Only(items)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allow_origins: AllowList,
    pub allow_credentials: bool,
    pub allow_methods: AllowList,
    pub allow_headers: AllowList,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_origins: AllowList::Any,
            allow_credentials: true,
            allow_methods: AllowList::Any,
            allow_headers: AllowList::Any,
        }
    }
}

impl CorsConfig {
    pub(crate) fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let list = |name: &str| {
            env.optional(name)
                .map(|raw| AllowList::parse(&raw))
                .unwrap_or(AllowList::Any)
        };
        Ok(Self {
            enabled: env.flag_or("CORS_ENABLED", true)?,
            allow_origins: list("CORS_ALLOW_ORIGINS"),
            allow_credentials: env.flag_or("CORS_ALLOW_CREDENTIALS", true)?,
            allow_methods: list("CORS_ALLOW_METHODS"),
            allow_headers: list("CORS_ALLOW_HEADERS"),
        })
    }
}
