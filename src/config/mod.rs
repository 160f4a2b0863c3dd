use std::env;
use std::str::FromStr;
use std::time::Duration;

/// TXT record value the mock verifier accepts.
pub const DEFAULT_VERIFY_TOKEN: &str = "HYOW-VERIFY-PLACEHOLDER-XXXXXX";

/// Hostnames ending with this suffix always fail the simulated DNS check.
pub const DEFAULT_DNS_FAILURE_SUFFIX: &str = ".invalid";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    /// Simulated time from scan creation to completion.
    pub scan_completion_ms: u64,
    pub latency_enabled: bool,
    pub latency_min_ms: u64,
    pub latency_max_ms: u64,
    pub verify_token: String,
    pub dns_failure_suffix: String,
    pub seed: bool,
    /// Background completion sweep interval; 0 disables the sweeper.
    pub sweep_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            frontend_url: "http://localhost:5173".to_string(),
            scan_completion_ms: 2500,
            latency_enabled: true,
            latency_min_ms: 150,
            latency_max_ms: 600,
            verify_token: DEFAULT_VERIFY_TOKEN.to_string(),
            dns_failure_suffix: DEFAULT_DNS_FAILURE_SUFFIX.to_string(),
            seed: true,
            sweep_interval_ms: 0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Self::default();
        Ok(Self {
            host: env::var("BACKEND_HOST").unwrap_or(defaults.host),
            port: parse_or("BACKEND_PORT", defaults.port),
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            scan_completion_ms: parse_or("HYOW_SCAN_COMPLETION_MS", defaults.scan_completion_ms),
            latency_enabled: parse_or("HYOW_LATENCY", defaults.latency_enabled),
            latency_min_ms: parse_or("HYOW_LATENCY_MIN_MS", defaults.latency_min_ms),
            latency_max_ms: parse_or("HYOW_LATENCY_MAX_MS", defaults.latency_max_ms),
            verify_token: env::var("HYOW_VERIFY_TOKEN").unwrap_or(defaults.verify_token),
            dns_failure_suffix: env::var("HYOW_DNS_FAILURE_SUFFIX")
                .unwrap_or(defaults.dns_failure_suffix),
            seed: parse_or("HYOW_SEED", defaults.seed),
            sweep_interval_ms: parse_or("HYOW_SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
        })
    }

    /// Completion window as a chrono duration for lifecycle math.
    pub fn completion_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.scan_completion_ms as i64)
    }

    /// Latency bounds, or `None` when latency simulation is off.
    pub fn latency_range(&self) -> Option<(Duration, Duration)> {
        if !self.latency_enabled {
            return None;
        }
        let min = self.latency_min_ms.min(self.latency_max_ms);
        let max = self.latency_max_ms.max(self.latency_min_ms);
        Some((Duration::from_millis(min), Duration::from_millis(max)))
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
