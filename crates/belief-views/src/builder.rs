use belief_core::config::ViewConfig;

use crate::generator::ViewGenerator;

/// Fluent construction of a [`ViewGenerator`] with non-default tuning.
#[derive(Debug, Clone, Default)]
pub struct ViewGeneratorBuilder {
    config: ViewConfig,
}

impl ViewGeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expiration_days(mut self, days: i64) -> Self {
        self.config.default_expiration_days = days;
        self
    }

    pub fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.config.min_confidence = confidence;
        self
    }

    pub fn with_high_frequency_multiplier(mut self, mult: f64) -> Self {
        self.config.high_frequency_multiplier = mult;
        self
    }

    pub fn with_trend_multiplier(mut self, mult: f64) -> Self {
        self.config.trend_multiplier = mult;
        self
    }

    pub fn with_anomaly_multiplier(mut self, mult: f64) -> Self {
        self.config.anomaly_multiplier = mult;
        self
    }

    pub fn with_temporal_multiplier(mut self, mult: f64) -> Self {
        self.config.temporal_multiplier = mult;
        self
    }

    pub fn with_timespan_reference_days(mut self, days: f64) -> Self {
        self.config.timespan_reference_days = days;
        self
    }

    pub fn build(self) -> ViewGenerator {
        ViewGenerator::new(self.config)
    }
}
