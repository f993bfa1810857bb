//! Turn-routing configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Configuration for the per-turn router.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Minimum classifier confidence to accept an intent; below this the
    /// turn degrades to a clarification exchange.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Number of recent turns handed to the classifier as context.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Hard cap on router passes within one inbound turn. The halting rule
    /// terminates within one cycle; the cap is defense-in-depth.
    #[serde(default = "default_max_route_iterations")]
    pub max_route_iterations: u32,
}

impl RoutingConfig {
    /// Validate routing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ValidationError::InvalidConfidenceThreshold);
        }
        if self.history_window == 0 {
            return Err(ValidationError::InvalidHistoryWindow);
        }
        if self.max_route_iterations == 0 {
            return Err(ValidationError::InvalidRouteIterationCap);
        }
        Ok(())
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            history_window: default_history_window(),
            max_route_iterations: default_max_route_iterations(),
        }
    }
}

fn default_confidence_threshold() -> f32 {
    0.7
}

fn default_history_window() -> usize {
    5
}

fn default_max_route_iterations() -> u32 {
    4
}
