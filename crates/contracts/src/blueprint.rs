//! SchedulerBlueprint - Config Loader output
//!
//! Describes the complete service configuration: HTTP listener, dispatch
//! policy and observability settings. Every section is optional.

use serde::{Deserialize, Serialize};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete service configuration blueprint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Dispatch policy
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Dispatch policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// HIGH dispatches allowed in a row while NORMAL customers wait, must be >= 1
    #[serde(default = "default_ratio_threshold")]
    pub ratio_threshold: u32,

    /// Queue scan order of lookups by contact key
    #[serde(default)]
    pub lookup_order: LookupOrder,

    /// Which dispatcher front-end serializes access to the queues
    #[serde(default)]
    pub mode: DispatchMode,

    /// Request channel capacity of the actor front-end
    #[serde(default = "default_actor_capacity")]
    pub actor_capacity: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            ratio_threshold: default_ratio_threshold(),
            lookup_order: LookupOrder::default(),
            mode: DispatchMode::default(),
            actor_capacity: default_actor_capacity(),
        }
    }
}

fn default_ratio_threshold() -> u32 {
    2
}

fn default_actor_capacity() -> usize {
    256
}

/// Scan order of lookups by contact key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOrder {
    /// NORMAL queue first, then HIGH
    #[default]
    NormalFirst,
    /// HIGH queue first, then NORMAL
    HighFirst,
}

/// Dispatcher front-end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Shared state behind a mutex
    #[default]
    Mutex,
    /// State owned by one task, requests over a channel
    Actor,
}

/// Logging and metrics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilitySettings {
    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus exporter port (None = disabled)
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Default log level, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub default_log_level: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            metrics_port: None,
            default_log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
