use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use orchestrator_core::OrchestratorConfig;

#[derive(Parser, Debug)]
#[command(
    name = "orchestrator",
    about = "Sequence the acquire and predict services behind /health, /ready and /run",
    version
)]
pub struct Cli {
    /// Port to listen on [env: PORT, default: 3000]
    #[arg(long)]
    pub port: Option<u16>,

    /// Base URL of the acquire service [env: ACQUIRE_URL, default: http://localhost:3003]
    #[arg(long)]
    pub acquire_url: Option<String>,

    /// Base URL of the predict service [env: PREDICT_URL, default: http://localhost:3002]
    #[arg(long)]
    pub predict_url: Option<String>,

    /// Timeout for each upstream /ready probe, in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub ready_timeout_ms: Option<u64>,

    /// Timeout for each pipeline step, in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub step_timeout_ms: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "ORCHESTRATOR_LOG", default_value = "info")]
    pub log: String,
}

impl Cli {
    /// Environment first, then command-line flags on top.
    pub fn resolve_config(&self) -> Result<OrchestratorConfig> {
        let base = OrchestratorConfig::from_env().context("invalid environment configuration")?;
        self.apply(base)
    }

    fn apply(&self, base: OrchestratorConfig) -> Result<OrchestratorConfig> {
        let mut config = OrchestratorConfig::new(
            self.port.unwrap_or(base.port),
            self.acquire_url.clone().unwrap_or(base.acquire_url),
            self.predict_url.clone().unwrap_or(base.predict_url),
        )
        .context("invalid command-line configuration")?;

        config.ready_timeout = self
            .ready_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(base.ready_timeout);
        config.step_timeout = self
            .step_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(base.step_timeout);
        Ok(config)
    }
}
