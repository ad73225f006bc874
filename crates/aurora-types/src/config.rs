// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Configuration
// Mirrors constructor parameters of: Infrastructure/IE/evolver.py,
// armonizador.py, armonizador_optimizado.py, extender.py
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{AuroraError, AuroraResult};

/// Runtime configuration shared by all Aurora engines.
///
/// Every threshold the engines consult lives here so a deployment can
/// retune the system from a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuroraConfig {
    /// Minimum similarity for a tensor to join an existing archetype.
    /// Default: 0.7 (from Python ArchetypeLearner.umbral_similitud).
    pub similarity_threshold: f64,

    /// Global coherence a corrected tensor must reach to be accepted.
    /// Default: 0.7 (from Python Armonizador.umbral_coherencia).
    pub coherence_threshold: f64,

    /// Maximum recursion depth for Fibonacci self-correction.
    /// Default: 10 (from Python Armonizador.max_recursion).
    pub max_recursion: usize,

    /// Minimum sequence length for dynamics learning.
    /// Default: 3 (from Python DynamicsLearner.ventana_minima).
    pub min_sequence: usize,

    /// Two slots are opposed when every component differs by more than
    /// this margin. Default: 4.
    pub contradiction_margin: u8,

    /// Exemplars retained per archetype before the oldest is dropped.
    /// Default: 32.
    pub max_exemplars: usize,

    /// Worker threads for parallel harmonization.
    /// Default: 4 (from Python ArmonizadorOptimizado.num_workers).
    pub num_workers: usize,

    /// Incoherences per parallel batch.
    /// Default: 50 (from Python ArmonizadorOptimizado.batch_size).
    pub batch_size: usize,

    /// Deadline per parallel correction, in milliseconds.
    /// Default: 30000 (from Python future.result(timeout=30)).
    pub worker_timeout_ms: u64,

    /// Weight of abstraction-level proximity in unfold coherence.
    /// Default: 0.3 (from Python Extender._evaluar_coherencia).
    pub w_level: f64,

    /// Weight of breadcrumb word overlap in unfold coherence.
    /// Default: 0.4.
    pub w_words: f64,

    /// Weight of context-tensor similarity in unfold coherence.
    /// Default: 0.3.
    pub w_context: f64,
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            coherence_threshold: 0.7,
            max_recursion: 10,
            min_sequence: 3,
            contradiction_margin: 4,
            max_exemplars: 32,
            num_workers: 4,
            batch_size: 50,
            worker_timeout_ms: 30_000,
            w_level: 0.3,
            w_words: 0.4,
            w_context: 0.3,
        }
    }
}

impl AuroraConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> AuroraResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(AuroraError::Config(format!(
                "similarity_threshold must be in [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.coherence_threshold) {
            return Err(AuroraError::Config(format!(
                "coherence_threshold must be in [0, 1], got {}",
                self.coherence_threshold
            )));
        }
        if self.max_recursion == 0 {
            return Err(AuroraError::Config(
                "max_recursion must be > 0".to_string(),
            ));
        }
        if self.min_sequence < 2 {
            return Err(AuroraError::Config(format!(
                "min_sequence must be >= 2, got {}",
                self.min_sequence
            )));
        }
        if self.contradiction_margin > 7 {
            return Err(AuroraError::Config(format!(
                "contradiction_margin must be <= 7, got {}",
                self.contradiction_margin
            )));
        }
        if self.max_exemplars < 2 {
            return Err(AuroraError::Config(format!(
                "max_exemplars must be >= 2, got {}",
                self.max_exemplars
            )));
        }
        if self.num_workers == 0 {
            return Err(AuroraError::Config(
                "num_workers must be > 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(AuroraError::Config("batch_size must be > 0".to_string()));
        }
        if self.worker_timeout_ms == 0 {
            return Err(AuroraError::Config(
                "worker_timeout_ms must be > 0".to_string(),
            ));
        }
        let w_sum = self.w_level + self.w_words + self.w_context;
        if (w_sum - 1.0).abs() > 1e-9 {
            return Err(AuroraError::Config(format!(
                "unfold weights must sum to 1.0, got {} + {} + {} = {w_sum}",
                self.w_level, self.w_words, self.w_context
            )));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> AuroraResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AuroraError::Config(format!("JSON parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(AuroraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_similarity_threshold() {
        let cfg = AuroraConfig {
            similarity_threshold: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_unfold_weights_must_sum_to_one() {
        let cfg = AuroraConfig {
            w_level: 0.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_json_roundtrip() {
        let cfg = AuroraConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = AuroraConfig::from_json(&json).unwrap();
        assert_eq!(parsed.max_recursion, 10);
        assert_eq!(parsed.batch_size, 50);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(AuroraConfig::from_json("{not json").is_err());
    }
}
