use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::runs::LatencyProfile;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Seed for run generation and simulated latency
    #[arg(long, env = "RUNS_SEED")]
    pub seed: Option<u64>,

    /// Probability that a successful listing arms a failure burst
    #[arg(long, env = "FAULT_PROBABILITY")]
    pub fault_probability: Option<f64>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,

    /// Log output format: pretty or json
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub resilience: ResilienceConfig,
    pub catalog: CatalogConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub timeout_disabled: bool,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Number of runs generated at startup.
    pub size: usize,
    /// Generation seed. A random one is drawn when unset.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    pub list_latency_min_ms: u64,
    pub list_latency_max_ms: u64,
    pub get_latency_ms: u64,
    pub fault_probability: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// Output format of the `fmt` tracing layer.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl SimulationConfig {
    #[must_use]
    pub fn latency(&self) -> LatencyProfile {
        LatencyProfile {
            list_min: Duration::from_millis(self.list_latency_min_ms),
            list_max: Duration::from_millis(self.list_latency_max_ms),
            get: Duration::from_millis(self.get_latency_ms),
        }
    }
}

impl ResilienceConfig {
    /// Request timeout, or `None` when the timeout middleware is disabled.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        (!self.timeout_disabled).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("resilience.request_timeout_secs", 30)?
            .set_default("catalog.size", 50)?
            .set_default("simulation.list_latency_min_ms", 800)?
            .set_default("simulation.list_latency_max_ms", 1200)?
            .set_default("simulation.get_latency_ms", 1000)?
            .set_default("simulation.fault_probability", 0.1)?
            .set_default("logging.format", "pretty")?;

        // 2. Config file: explicit path, else ./config.{yaml,toml,json} if present
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // 3. Environment variables, e.g. RUNS_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("RUNS")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their env aliases) win over everything else
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(seed) = cli.seed {
            builder = builder.set_override("catalog.seed", seed)?;
        }
        if let Some(p) = cli.fault_probability {
            builder = builder.set_override("simulation.fault_probability", p)?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }
        if let Some(format) = cli.log_format {
            builder = builder.set_override("logging.format", format)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_latency_profile() {
        let sim = SimulationConfig {
            list_latency_min_ms: 10,
            list_latency_max_ms: 20,
            get_latency_ms: 5,
            fault_probability: 0.0,
        };
        let latency = sim.latency();
        assert_eq!(latency.list_min, Duration::from_millis(10));
        assert_eq!(latency.list_max, Duration::from_millis(20));
        assert_eq!(latency.get, Duration::from_millis(5));
    }

    #[test]
    fn test_request_timeout_toggle() {
        let mut resilience = ResilienceConfig {
            timeout_disabled: false,
            request_timeout_secs: 12,
        };
        assert_eq!(resilience.request_timeout(), Some(Duration::from_secs(12)));
        resilience.timeout_disabled = true;
        assert_eq!(resilience.request_timeout(), None);
    }
}
