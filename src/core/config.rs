//! Tree-shaping configuration with documented constants
//!
//! All tuning knobs for the builder are collected here with explanations of
//! their purpose and how they interact with each other.

/// Configuration for tree synthesis and expansion
///
/// These values bound the fan-out of a single request and the amount of
/// content attached to each node. Changing them changes per-request
/// external-model spend.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Maximum children kept on a request root (a node with no ancestors)
    ///
    /// Roots get broader initial breadth so a fresh topic shows a useful
    /// overview. At 6, a depth-1 request costs at most 7 node syntheses.
    pub root_child_cap: usize,

    /// Maximum children kept on an interior node (a node with ancestors)
    ///
    /// Interior nodes stay narrower than roots to bound total fan-out as
    /// users expand deeper into an existing tree.
    pub branch_child_cap: usize,

    /// Practice items requested per node
    pub practice_items_per_node: usize,

    /// Minimum references requested per node
    pub min_references: usize,

    /// Maximum references requested per node
    pub max_references: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            root_child_cap: 6,
            branch_child_cap: 4,
            practice_items_per_node: 3,
            min_references: 2,
            max_references: 3,
        }
    }
}

impl BuilderConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.branch_child_cap > self.root_child_cap {
            return Err(format!(
                "branch_child_cap ({}) should be <= root_child_cap ({})",
                self.branch_child_cap, self.root_child_cap
            ));
        }

        if self.min_references > self.max_references {
            return Err(format!(
                "min_references ({}) should be <= max_references ({})",
                self.min_references, self.max_references
            ));
        }

        if self.practice_items_per_node == 0 {
            return Err("practice_items_per_node must be positive".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BuilderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_caps_rejected() {
        let cfg = BuilderConfig {
            root_child_cap: 2,
            branch_child_cap: 4,
            ..BuilderConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_inverted_reference_range_rejected() {
        let cfg = BuilderConfig {
            min_references: 5,
            max_references: 3,
            ..BuilderConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
