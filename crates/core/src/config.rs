use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `QUIETSEND__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// Held items are dropped after this many failed delivery attempts.
    /// `0` retries forever.
    #[serde(default = "default_max_delivery_attempts")]
    pub max_delivery_attempts: u32,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_sweep_interval_secs() -> u64 {
    60
}
fn default_max_delivery_attempts() -> u32 {
    8
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_delivery_attempts: default_max_delivery_attempts(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            scheduler: SchedulerConfig::default(),
            queue: QueueConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("QUIETSEND")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.node_id, "node-01");
        assert_eq!(config.scheduler.sweep_interval_secs, 60);
        assert_eq!(config.queue.max_delivery_attempts, 8);
    }
}
