//! Guided VNS configuration.

use serde::{Deserialize, Serialize};

/// Configuration parameters for [`GuidedVns`](super::GuidedVns).
///
/// # Examples
///
/// ```
/// use u_cvrp::vns::VnsConfig;
///
/// let config = VnsConfig::default()
///     .with_max_rounds(1000)
///     .with_max_no_improve(100);
/// assert_eq!(config.max_rounds, 1000);
/// assert_eq!(config.max_no_improve, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VnsConfig {
    /// Maximum number of penalize-then-descend rounds.
    pub max_rounds: usize,
    /// Rounds without a new best before stopping.
    pub max_no_improve: usize,
    /// Random seed (None for default seed).
    pub seed: Option<u64>,
}

impl Default for VnsConfig {
    fn default() -> Self {
        Self {
            max_rounds: 500,
            max_no_improve: 200,
            seed: None,
        }
    }
}

impl VnsConfig {
    /// Sets the maximum number of rounds.
    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    /// Sets the maximum rounds without improvement.
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: VnsConfig = serde_json::from_str(r#"{"max_rounds": 7}"#).expect("valid");
        assert_eq!(config.max_rounds, 7);
        assert_eq!(config.max_no_improve, 200);
        assert_eq!(config.seed, None);
    }
}
