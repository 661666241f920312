use std::net::IpAddr;

use config::{HttpsPolicy, RedirectConfig};
use strum_macros::Display;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RedirectTargetError {
    #[error("Subdomain {subdomain:?} does not form a valid URL: {source}")]
    InvalidUrl {
        subdomain: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Subdomain {0:?} is empty or contains a URL delimiter")]
    InvalidSubdomain(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn for_policy(policy: HttpsPolicy, base_domain: &str) -> Self {
        match policy {
            HttpsPolicy::Always => Scheme::Https,
            HttpsPolicy::Never => Scheme::Http,
            HttpsPolicy::Auto if is_local_host(base_domain) => Scheme::Http,
            HttpsPolicy::Auto => Scheme::Https,
        }
    }

    pub fn is_secure(self) -> bool {
        self == Scheme::Https
    }
}

/// Where a resolved scan sends the visitor: the company's subdomain of the
/// configured base domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub url: Url,
    pub scheme: Scheme,
}

impl RedirectTarget {
    pub fn for_subdomain(
        config: &RedirectConfig,
        subdomain: &str,
    ) -> Result<Self, RedirectTargetError> {
        if subdomain.is_empty()
            || subdomain
                .chars()
                .any(|c| matches!(c, '/' | '?' | '#' | '@' | ':' | '\\') || c.is_whitespace())
        {
            return Err(RedirectTargetError::InvalidSubdomain(subdomain.to_string()));
        }

        let scheme = Scheme::for_policy(config.https, &config.base_domain);
        let raw = format!("{scheme}://{subdomain}.{}/", config.base_domain);
        let url = Url::parse(&raw).map_err(|source| RedirectTargetError::InvalidUrl {
            subdomain: subdomain.to_string(),
            source,
        })?;

        Ok(Self { url, scheme })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Hosts that only make sense during local development, where TLS is
/// normally absent. Any `:port` suffix is ignored.
pub fn is_local_host(domain: &str) -> bool {
    let host = strip_port(domain).to_ascii_lowercase();
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }
    match host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
        Ok(ip) => ip.is_loopback() || ip.is_unspecified(),
        Err(_) => false,
    }
}

fn strip_port(domain: &str) -> &str {
    if let Some(rest) = domain.strip_prefix('[') {
        // [::1]:8000
        return match rest.find(']') {
            Some(end) => &domain[..end + 2],
            None => domain,
        };
    }
    match domain.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            host
        }
        _ => domain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_domain: &str, https: HttpsPolicy) -> RedirectConfig {
        RedirectConfig::new(base_domain, https)
    }

    #[test]
    fn builds_https_target_for_public_domain() {
        let target =
            RedirectTarget::for_subdomain(&config("example.com", HttpsPolicy::Auto), "acme")
                .unwrap();
        assert_eq!(target.as_str(), "https://acme.example.com/");
        assert_eq!(target.scheme, Scheme::Https);
        assert!(target.scheme.is_secure());
    }

    #[test]
    fn local_domains_use_http_under_auto_policy() {
        for domain in ["localhost", "localhost:8000", "app.localhost", "127.0.0.1:3000", "0.0.0.0"] {
            assert_eq!(
                Scheme::for_policy(HttpsPolicy::Auto, domain),
                Scheme::Http,
                "{domain}"
            );
        }
        assert_eq!(
            Scheme::for_policy(HttpsPolicy::Auto, "example.com:8443"),
            Scheme::Https
        );

        let target =
            RedirectTarget::for_subdomain(&config("localhost:8000", HttpsPolicy::Auto), "acme")
                .unwrap();
        assert_eq!(target.as_str(), "http://acme.localhost:8000/");
    }

    #[test]
    fn explicit_policy_overrides_host_detection() {
        let forced = RedirectTarget::for_subdomain(&config("localhost", HttpsPolicy::Always), "acme")
            .unwrap();
        assert_eq!(forced.as_str(), "https://acme.localhost/");

        let plain = RedirectTarget::for_subdomain(&config("example.com", HttpsPolicy::Never), "acme")
            .unwrap();
        assert_eq!(plain.as_str(), "http://acme.example.com/");
        assert!(!plain.scheme.is_secure());
    }

    #[test]
    fn rejects_subdomains_that_would_change_the_host() {
        let config = config("example.com", HttpsPolicy::Auto);
        for subdomain in ["", "evil.com/", "a b", "user@evil", "x?y", "a:1"] {
            assert!(
                matches!(
                    RedirectTarget::for_subdomain(&config, subdomain),
                    Err(RedirectTargetError::InvalidSubdomain(_))
                ),
                "{subdomain:?}"
            );
        }
    }

    #[test]
    fn scheme_renders_lowercase() {
        assert_eq!(Scheme::Http.to_string(), "http");
        assert_eq!(Scheme::Https.to_string(), "https");
    }

    #[test]
    fn ip_base_domains_cannot_take_a_subdomain() {
        let err = RedirectTarget::for_subdomain(&config("127.0.0.1", HttpsPolicy::Auto), "acme")
            .unwrap_err();
        assert!(matches!(err, RedirectTargetError::InvalidUrl { .. }));
    }

    #[test]
    fn detects_local_hosts() {
        assert!(is_local_host("localhost"));
        assert!(is_local_host("LOCALHOST:80"));
        assert!(is_local_host("api.localhost"));
        assert!(is_local_host("127.0.0.1"));
        assert!(is_local_host("[::1]:8000"));
        assert!(is_local_host("::1"));
        assert!(is_local_host("0.0.0.0:8000"));

        assert!(!is_local_host("example.com"));
        assert!(!is_local_host("localhost.example.com"));
        assert!(!is_local_host("10.0.0.1"));
    }
}
