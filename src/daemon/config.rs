/// Environment variable overriding the per-request timeout
pub const TIMEOUT_ENV_VAR: &str = "DAEMON_STATE_TIMEOUT_SECS";

/// Connection configuration for the Docker daemon client
///
/// The endpoint itself (socket path, `DOCKER_HOST`, TLS material) is discovered
/// by bollard from the process environment.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Per-request timeout in seconds (default: 120)
    pub timeout_secs: u64,
    /// Negotiate the API version with the daemon when connecting
    pub negotiate_version: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            negotiate_version: true,
        }
    }
}

impl ClientConfig {
    /// Default configuration with the timeout overridden from the environment
    pub fn from_env() -> Self {
        Self::default().with_timeout_override(std::env::var(TIMEOUT_ENV_VAR).ok().as_deref())
    }

    fn with_timeout_override(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => log::warn!(
                    "Ignoring {}='{}': not a positive number of seconds",
                    TIMEOUT_ENV_VAR,
                    raw
                ),
            }
        }
        self
    }
}
