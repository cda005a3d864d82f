//! URL validation, applied before any fetch is attempted.

use std::collections::HashSet;
use std::net::IpAddr;

use url::{Host, Url};

use crate::error::{SecurityError, SecurityResult};

/// Returns true when `candidate` is an absolute, well-formed HTTP(S) URL.
///
/// Pure syntax check: no DNS, no network. Use a [`UrlValidator`] with
/// [`UrlValidator::block_private_networks`] when internal hosts must be
/// refused as well.
pub fn is_valid(candidate: &str) -> bool {
    UrlValidator::new().validate(candidate).is_ok()
}

/// URL validator.
///
/// The default validator only accepts absolute `http`/`https` URLs with a
/// well-formed host. Hardened instances additionally refuse:
/// - Access to internal services (localhost, 127.0.0.1)
/// - Access to private IP ranges (10.x, 172.16.x, 192.168.x)
/// - Access to cloud metadata services (169.254.x)
#[derive(Debug, Clone)]
pub struct UrlValidator {
    /// Allowed URL schemes
    allowed_schemes: HashSet<String>,

    /// Blocked hostnames
    blocked_hosts: HashSet<String>,

    /// Blocked CIDR ranges
    blocked_cidrs: Vec<ipnet::IpNet>,

    /// Hosts that bypass the block lists
    allowed_hosts: HashSet<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    /// Create a syntax-only validator for `http` and `https`.
    pub fn new() -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: HashSet::new(),
            blocked_cidrs: Vec::new(),
            allowed_hosts: HashSet::new(),
        }
    }

    /// Refuse loopback, private, link-local and metadata hosts.
    pub fn block_private_networks(mut self) -> Self {
        self.blocked_hosts.extend(
            [
                "localhost",
                "metadata.google.internal",
                "metadata.gke.internal",
                "instance-data",
            ]
            .into_iter()
            .map(String::from),
        );
        self.blocked_cidrs.extend(
            [
                "10.0.0.0/8",
                "172.16.0.0/12",
                "192.168.0.0/16",
                "169.254.0.0/16", // Link-local / cloud metadata
                "127.0.0.0/8",
                "0.0.0.0/8",
                "::1/128",
                "fc00::/7",
                "fe80::/10",
            ]
            .into_iter()
            .filter_map(|cidr| cidr.parse::<ipnet::IpNet>().ok()),
        );
        self
    }

    /// Add an allowed host (bypasses the block lists, not the syntax check).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into());
        self
    }

    /// Block an additional host.
    pub fn block_host(mut self, host: impl Into<String>) -> Self {
        self.blocked_hosts.insert(host.into());
        self
    }

    /// Block an additional CIDR range.
    pub fn block_cidr(mut self, cidr: ipnet::IpNet) -> Self {
        self.blocked_cidrs.push(cidr);
        self
    }

    /// Validate a URL, returning the parsed form.
    pub fn parse(&self, candidate: &str) -> SecurityResult<Url> {
        if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
            return Err(SecurityError::UrlParse(url::ParseError::InvalidDomainCharacter));
        }

        let parsed = Url::parse(candidate)?;

        if !self.allowed_schemes.contains(parsed.scheme()) {
            return Err(SecurityError::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed.host().ok_or(SecurityError::NoHost)?;
        let host_str = parsed.host_str().unwrap_or_default().to_string();

        if let Host::Domain(domain) = host {
            if !is_well_formed_domain(domain) {
                return Err(SecurityError::MalformedHost(domain.to_string()));
            }
        }

        if self.allowed_hosts.contains(&host_str) {
            return Ok(parsed);
        }

        if self.blocked_hosts.contains(&host_str) {
            return Err(SecurityError::BlockedHost(host_str));
        }

        let ip = match host {
            Host::Ipv4(ip) => Some(IpAddr::V4(ip)),
            Host::Ipv6(ip) => Some(IpAddr::V6(ip)),
            Host::Domain(_) => None,
        };
        if let Some(ip) = ip {
            if self.blocked_cidrs.iter().any(|cidr| cidr.contains(&ip)) {
                return Err(SecurityError::BlockedCidr(ip.to_string()));
            }
        }

        Ok(parsed)
    }

    /// Validate a URL for safety.
    pub fn validate(&self, candidate: &str) -> SecurityResult<()> {
        self.parse(candidate).map(|_| ())
    }
}

/// DNS name check: labels of 1-63 alphanumerics or hyphens, no leading or
/// trailing hyphen. A single trailing dot (fully-qualified form) is allowed.
fn is_well_formed_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http() {
        assert!(!is_valid("ftp://x"));
        assert!(!is_valid("file:///etc/passwd"));
        assert!(!is_valid("javascript:alert(1)"));
        assert!(!is_valid("mailto:someone@example.com"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(!is_valid(""));
        assert!(!is_valid("not a url"));
        assert!(!is_valid("/relative/path"));
        assert!(!is_valid("example.com/page"));
        assert!(!is_valid("http://"));
        assert!(!is_valid(" https://example.com"));
    }

    #[test]
    fn test_rejects_malformed_hosts() {
        assert!(!is_valid("http://exa mple.com/"));
        assert!(!is_valid("http://-bad-.example.com/"));
        assert!(!is_valid("http://under_score.example.com/"));
        assert!(!is_valid("http://a..b.com/"));
    }

    #[test]
    fn test_accepts_http_urls() {
        assert!(is_valid("http://host/path"));
        assert!(is_valid("https://example.com/"));
        assert!(is_valid("https://a.example/ok"));
        assert!(is_valid("http://example.com:8080/a?b=c#d"));
        assert!(is_valid("http://192.0.2.10/page"));
        assert!(is_valid("http://[2001:db8::1]/page"));
        assert!(is_valid("https://example.com./"));
    }

    #[test]
    fn test_default_allows_localhost() {
        assert!(is_valid("http://localhost/"));
        assert!(is_valid("http://127.0.0.1/"));
    }

    #[test]
    fn test_blocks_private_networks() {
        let validator = UrlValidator::new().block_private_networks();
        assert!(validator.validate("http://localhost/").is_err());
        assert!(validator.validate("http://127.0.0.1/").is_err());
        assert!(validator.validate("http://[::1]/").is_err());
        assert!(validator.validate("http://10.0.0.1/").is_err());
        assert!(validator.validate("http://172.16.0.1/").is_err());
        assert!(validator.validate("http://192.168.1.1/").is_err());
        assert!(validator.validate("http://169.254.169.254/").is_err());
        assert!(validator
            .validate("http://metadata.google.internal/")
            .is_err());
        assert!(validator.validate("https://example.com/").is_ok());
    }

    #[test]
    fn test_allowed_hosts_bypass() {
        let validator = UrlValidator::new()
            .block_private_networks()
            .allow_host("localhost");
        assert!(validator.validate("http://localhost/").is_ok());
    }

    #[test]
    fn test_extra_blocked_hosts_and_ranges() {
        let validator = UrlValidator::new()
            .block_host("tracker.example")
            .block_cidr("203.0.113.0/24".parse().unwrap());

        assert!(matches!(
            validator.validate("https://tracker.example/page"),
            Err(SecurityError::BlockedHost(h)) if h == "tracker.example"
        ));
        assert!(matches!(
            validator.validate("http://203.0.113.7/"),
            Err(SecurityError::BlockedCidr(ip)) if ip == "203.0.113.7"
        ));
        assert!(validator.validate("http://203.0.114.7/").is_ok());
        assert!(validator.validate("https://example.com/").is_ok());
    }

    #[test]
    fn test_error_kinds() {
        let validator = UrlValidator::new();
        assert!(matches!(
            validator.validate("ftp://example.com/"),
            Err(SecurityError::DisallowedScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            validator.validate("http://bad_host.com/"),
            Err(SecurityError::MalformedHost(_)) | Err(SecurityError::UrlParse(_))
        ));
    }
}
