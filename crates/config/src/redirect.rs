use strum_macros::{Display, EnumString};

use crate::{ConfigError, Env};

/// How the redirect scheme is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HttpsPolicy {
    /// https unless the base domain is a local development host
    #[default]
    Auto,
    #[strum(to_string = "always", serialize = "true")]
    Always,
    #[strum(to_string = "never", serialize = "false")]
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectConfig {
    /// Domain the company subdomain is prefixed to, e.g. `example.com`.
    pub base_domain: String,
    pub https: HttpsPolicy,
}

impl RedirectConfig {
    pub fn new(base_domain: impl Into<String>, https: HttpsPolicy) -> Self {
        Self {
            base_domain: base_domain.into(),
            https,
        }
    }

    pub(crate) fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_domain = env.required("GUEST_SERV_DOMAIN")?;
        if raw_domain.contains("://") {
            return Err(ConfigError::Invalid {
                name: "GUEST_SERV_DOMAIN",
                reason: format!("{raw_domain:?} must be a bare domain without a scheme"),
            });
        }
        let base_domain = raw_domain.trim_matches(|c| c == '.' || c == '/').to_string();
        if base_domain.is_empty() {
            return Err(ConfigError::Invalid {
                name: "GUEST_SERV_DOMAIN",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            base_domain,
            https: env.parse_or("REDIRECT_HTTPS", HttpsPolicy::Auto)?,
        })
    }
}
