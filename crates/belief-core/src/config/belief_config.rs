//! Top-level configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    DetectionConfig, GateConfig, ObservabilityConfig, SchedulerConfig, StorageConfig, ViewConfig,
};
use crate::confidence::Confidence;
use crate::constants::{MAX_VIEW_LIFETIME_DAYS, MIN_VIEW_LIFETIME_DAYS};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`BELIEF_*`)
/// 2. Config file passed to [`BeliefConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BeliefConfig {
    pub detection: DetectionConfig,
    pub views: ViewConfig,
    pub gate: GateConfig,
    pub scheduler: SchedulerConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl BeliefConfig {
    /// Load defaults, then `path` if given, then `BELIEF_*` overrides, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides_with(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `BELIEF_*` overrides read through `lookup`.
    /// Unparseable values are ignored and the previous value kept.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BELIEF_LOOKBACK_DAYS").and_then(|s| s.parse().ok()) {
            self.detection.lookback_days = v;
        }
        if let Some(v) = lookup("BELIEF_BATCH_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.scheduler.batch_timeout_ms = v;
        }
        if let Some(v) = lookup("BELIEF_MAX_CONCURRENT_USERS").and_then(|s| s.parse().ok()) {
            self.scheduler.max_concurrent_users = v;
        }
        if let Some(v) = lookup("BELIEF_DB_PATH") {
            self.storage.db_path = Some(v);
        }
        if let Some(v) = lookup("BELIEF_JSON_LOGS").and_then(|s| s.parse().ok()) {
            self.observability.json_logs = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_i64("detection.lookback_days", self.detection.lookback_days)?;
        positive_i64(
            "detection.anomaly_baseline_days",
            self.detection.anomaly_baseline_days,
        )?;
        if self.detection.min_occurrences < 2 {
            return Err(invalid("detection.min_occurrences", "must be at least 2"));
        }
        non_negative("detection.min_frequency_per_day", self.detection.min_frequency_per_day)?;
        unit_interval("detection.min_consistency", self.detection.min_consistency)?;
        non_negative("detection.min_trend_change", self.detection.min_trend_change)?;
        non_negative(
            "detection.min_anomaly_deviation",
            self.detection.min_anomaly_deviation,
        )?;
        if self.detection.temporal_min_lift < 1.0 {
            return Err(invalid("detection.temporal_min_lift", "must be at least 1.0"));
        }

        if !(MIN_VIEW_LIFETIME_DAYS..=MAX_VIEW_LIFETIME_DAYS)
            .contains(&self.views.default_expiration_days)
        {
            return Err(invalid(
                "views.default_expiration_days",
                &format!("must be between {MIN_VIEW_LIFETIME_DAYS} and {MAX_VIEW_LIFETIME_DAYS}"),
            ));
        }
        for (field, value) in [
            ("views.high_frequency_multiplier", self.views.high_frequency_multiplier),
            ("views.trend_multiplier", self.views.trend_multiplier),
            ("views.anomaly_multiplier", self.views.anomaly_multiplier),
            ("views.temporal_multiplier", self.views.temporal_multiplier),
        ] {
            if !(value > 0.0 && value <= 2.0) {
                return Err(invalid(field, "must be in (0.0, 2.0]"));
            }
        }
        unit_interval("views.min_confidence", self.views.min_confidence)?;
        if self.views.timespan_reference_days <= 0.0 {
            return Err(invalid("views.timespan_reference_days", "must be greater than 0"));
        }

        if !(Confidence::PROMOTION..=1.0).contains(&self.gate.min_confidence) {
            return Err(invalid(
                "gate.min_confidence",
                "must be between 0.85 and 1.0; concepts never carry confidence at or below 0.85",
            ));
        }
        positive_i64("gate.min_time_span_days", self.gate.min_time_span_days)?;
        unit_interval(
            "gate.max_counter_evidence_ratio",
            self.gate.max_counter_evidence_ratio,
        )?;
        unit_interval(
            "gate.reject_counter_evidence_ratio",
            self.gate.reject_counter_evidence_ratio,
        )?;
        if self.gate.reject_counter_evidence_ratio < self.gate.max_counter_evidence_ratio {
            return Err(invalid(
                "gate.reject_counter_evidence_ratio",
                "must not be below gate.max_counter_evidence_ratio",
            ));
        }

        if self.scheduler.batch_timeout_ms == 0 {
            return Err(invalid("scheduler.batch_timeout_ms", "must be greater than 0"));
        }
        if self.scheduler.max_concurrent_users == 0 {
            return Err(invalid(
                "scheduler.max_concurrent_users",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn positive_i64(field: &str, value: i64) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(invalid(field, "must be greater than 0"));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(value >= 0.0 && value.is_finite()) {
        return Err(invalid(field, "must be a finite value >= 0.0"));
    }
    Ok(())
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, "must be between 0.0 and 1.0"));
    }
    Ok(())
}
