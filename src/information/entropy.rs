//! Persistence Entropy: Information Content of Persistence Diagrams
//!
//! Condenses the lifetimes of one homology dimension into a single
//! scalar describing how evenly "topological mass" is spread over the
//! features of that dimension.

use serde::{Deserialize, Serialize};

use crate::topology::PersistenceDiagram;

/// Logarithm used by the entropy sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogBase {
    /// Nats
    Natural,
    /// Bits, the usual persistence-entropy convention
    #[default]
    Binary,
}

impl LogBase {
    fn log(self, x: f64) -> f64 {
        match self {
            Self::Natural => x.ln(),
            Self::Binary => x.log2(),
        }
    }
}

/// How a diagram is reduced to an entropy value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntropyConfig {
    pub base: LogBase,
    /// Divide by log(n) so the value lies in [0, 1]
    pub normalize: bool,
}

/// Entropy summary of one homology dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologicalEntropy {
    /// Persistent entropy (Shannon)
    pub persistent_entropy: f64,
    /// Entropy divided by its maximum log(n), in [0, 1]
    pub normalized_entropy: f64,
    /// Total lifetime (normalization constant)
    pub total_lifetime: f64,
    /// Number of features with positive finite lifetime
    pub n_features: usize,
}

impl TopologicalEntropy {
    /// Summarize a set of lifetimes
    ///
    /// H_P = -Σᵢ pᵢ log(pᵢ), pᵢ = lᵢ / Σⱼ lⱼ
    ///
    /// Non-positive and non-finite lifetimes carry no mass and are skipped.
    pub fn from_lifetimes(lifetimes: &[f64], base: LogBase) -> Self {
        let positive: Vec<f64> = lifetimes
            .iter()
            .copied()
            .filter(|l| l.is_finite() && *l > 0.0)
            .collect();
        let total: f64 = positive.iter().sum();
        let n_features = positive.len();

        if n_features <= 1 || total <= 0.0 {
            return Self {
                persistent_entropy: 0.0,
                normalized_entropy: 0.0,
                total_lifetime: total,
                n_features,
            };
        }

        let mut entropy = 0.0;
        for l in &positive {
            let p = l / total;
            entropy -= p * base.log(p);
        }

        Self {
            persistent_entropy: entropy,
            normalized_entropy: entropy / base.log(n_features as f64),
            total_lifetime: total,
            n_features,
        }
    }

    /// Summarize dimension `d` of a diagram
    pub fn from_diagram(pd: &PersistenceDiagram, d: usize, base: LogBase) -> Self {
        Self::from_lifetimes(&pd.lifetimes(d), base)
    }
}

/// Entropy of a set of lifetimes under `config`
pub fn persistence_entropy(lifetimes: &[f64], config: &EntropyConfig) -> f64 {
    let summary = TopologicalEntropy::from_lifetimes(lifetimes, config.base);
    if config.normalize {
        summary.normalized_entropy
    } else {
        summary.persistent_entropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::PersistenceInterval;
    use approx::assert_relative_eq;

    #[test]
    fn test_entropy_uniform() {
        // Three intervals with equal lifetime
        let mut pd = PersistenceDiagram::new();
        pd.add(PersistenceInterval::new(0.0, 1.0, 0));
        pd.add(PersistenceInterval::new(0.0, 1.0, 0));
        pd.add(PersistenceInterval::new(0.0, 1.0, 0));

        let entropy = TopologicalEntropy::from_diagram(&pd, 0, LogBase::Natural);

        // Uniform distribution has entropy ln(3)
        assert_relative_eq!(entropy.persistent_entropy, 3.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(entropy.normalized_entropy, 1.0, epsilon = 1e-12);
        assert_eq!(entropy.n_features, 3);
    }

    #[test]
    fn test_entropy_single() {
        // Single interval has zero entropy
        let mut pd = PersistenceDiagram::new();
        pd.add(PersistenceInterval::new(0.0, 1.0, 0));
        pd.add(PersistenceInterval::new(0.0, f64::INFINITY, 0));

        let entropy = TopologicalEntropy::from_diagram(&pd, 0, LogBase::Natural);
        assert_eq!(entropy.persistent_entropy, 0.0);
        assert_eq!(entropy.n_features, 1);
    }

    #[test]
    fn test_default_entropy_is_in_bits() {
        assert_eq!(EntropyConfig::default().base, LogBase::Binary);
        assert_relative_eq!(
            persistence_entropy(&[2.0, 2.0], &EntropyConfig::default()),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            persistence_entropy(&[1.0, 1.0, 1.0, 1.0], &EntropyConfig::default()),
            2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_entropy_empty() {
        assert_eq!(persistence_entropy(&[], &EntropyConfig::default()), 0.0);
        assert_eq!(persistence_entropy(&[0.0, 0.0], &EntropyConfig::default()), 0.0);
    }

    #[test]
    fn test_entropy_scale_invariant() {
        let lifetimes = [0.3, 1.2, 0.05, 2.0, 0.7];
        let scaled: Vec<f64> = lifetimes.iter().map(|l| l * 17.5).collect();
        let config = EntropyConfig::default();

        assert_relative_eq!(
            persistence_entropy(&lifetimes, &config),
            persistence_entropy(&scaled, &config),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_binary_base_and_normalization() {
        let config = EntropyConfig {
            base: LogBase::Binary,
            normalize: false,
        };
        // Two equal features carry exactly one bit
        assert_relative_eq!(persistence_entropy(&[2.0, 2.0], &config), 1.0, epsilon = 1e-12);

        let skewed = [1.0, 9.0];
        let nats = persistence_entropy(
            &skewed,
            &EntropyConfig {
                base: LogBase::Natural,
                normalize: false,
            },
        );
        let normalized = persistence_entropy(
            &skewed,
            &EntropyConfig {
                base: LogBase::Natural,
                normalize: true,
            },
        );
        assert_relative_eq!(normalized, nats / 2.0_f64.ln(), epsilon = 1e-12);
        assert!(normalized > 0.0 && normalized < 1.0);
    }
}
