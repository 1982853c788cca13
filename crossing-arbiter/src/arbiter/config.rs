//! Thresholds and policy for crossing arbitration.

/// Configuration parameters for the arbitration engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbiterConfig {
    /// A train claims a crossing once its head car is closer than this.
    pub proximity_threshold: f64,

    /// A train releases a crossing once its tail car is farther than this
    /// and has passed the crossing.
    pub clearance_threshold: f64,

    /// Prefix of the group label addressing each train ("train" gives
    /// "train0", "train1", ...).
    pub group_prefix: String,

    /// Union the blocking cars of every other claimant instead of
    /// consulting only the earliest one. Off by default: the arbitration
    /// is designed for two trains per crossing.
    pub allow_multi_contender: bool,
}

impl ArbiterConfig {
    /// Create a new configuration with the given thresholds.
    pub fn new(proximity_threshold: f64, clearance_threshold: f64) -> Self {
        Self {
            proximity_threshold,
            clearance_threshold,
            ..Self::default()
        }
    }

    /// Set the group label prefix.
    pub fn with_group_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.group_prefix = prefix.into();
        self
    }

    /// Enable or disable multi-contender arbitration.
    pub fn with_multi_contender(mut self, allow: bool) -> Self {
        self.allow_multi_contender = allow;
        self
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 300.0,
            clearance_threshold: 10.0,
            group_prefix: "train".to_string(),
            allow_multi_contender: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ArbiterConfig::default();

        assert_eq!(config.proximity_threshold, 300.0);
        assert_eq!(config.clearance_threshold, 10.0);
        assert_eq!(config.group_prefix, "train");
        assert!(!config.allow_multi_contender);
    }

    #[test]
    fn custom_config() {
        let config = ArbiterConfig::new(50.0, 2.0)
            .with_group_prefix("simu")
            .with_multi_contender(true);

        assert_eq!(config.proximity_threshold, 50.0);
        assert_eq!(config.clearance_threshold, 2.0);
        assert_eq!(config.group_prefix, "simu");
        assert!(config.allow_multi_contender);
    }
}
