// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Evolver façade
// Mirrors: Infrastructure/IE/evolver.py (Evolver)
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use aurora_tensor::FractalTensor;
use aurora_types::{AuroraConfig, AuroraError, AuroraResult};

use crate::archetype::{Archetype, ArchetypeLearner};
use crate::dynamics::{Dynamics, DynamicsLearner};
use crate::relator::{Relator, RelatorKind, RelatorNetwork};
use crate::transcender::Transcender;

/// Outcome of one `learn` call: the archetype that absorbed the tensor
/// and the relators minted toward the most frequent archetypes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnReport {
    pub archetype_id: String,
    pub relator_ids: Vec<String>,
}

/// Population counters for diagnostics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvolverStats {
    pub archetypes: usize,
    pub relators: usize,
    pub dynamics: usize,
    pub strong_connections: usize,
    pub step: usize,
}

/// Coordinates the three pattern learners over one shared Fibonacci
/// step index. Every rotation-consuming operation (absorb, connect)
/// advances the index by one, so successive operations explore
/// different rotation windows.
#[derive(Debug, Clone)]
pub struct Evolver {
    archetype_learner: ArchetypeLearner,
    dynamics_learner: DynamicsLearner,
    relator_network: RelatorNetwork,
    transcender: Transcender,
    strong_threshold: f64,
    step: usize,
}

impl Evolver {
    pub fn new(config: &AuroraConfig) -> Self {
        Self {
            archetype_learner: ArchetypeLearner::new(
                config.similarity_threshold,
                config.max_exemplars,
            ),
            dynamics_learner: DynamicsLearner::new(config.min_sequence),
            relator_network: RelatorNetwork::new(),
            transcender: Transcender::new(),
            strong_threshold: config.coherence_threshold,
            step: 0,
        }
    }

    /// Absorb a tensor into the archetype population. Consumes one
    /// rotation window and returns the index of the matched or newly
    /// minted archetype.
    pub fn absorb(&mut self, tensor: &FractalTensor) -> usize {
        let idx = self.archetype_learner.absorb(tensor, self.step);
        self.step += 1;
        idx
    }

    /// Absorb, then connect the resulting archetype to the current top
    /// three. Relators stronger than 0.5 are reported.
    pub fn learn(&mut self, tensor: &FractalTensor) -> AuroraResult<LearnReport> {
        let idx = self.absorb(tensor);
        let archetype_id = self.archetype_learner.get(idx).id.clone();
        let top_ids: Vec<String> = self
            .archetype_learner
            .top(3)
            .into_iter()
            .map(|i| self.archetype_learner.get(i).id.clone())
            .collect();

        let mut relator_ids = Vec::new();
        for other_id in top_ids {
            if other_id == archetype_id {
                continue;
            }
            let rel_idx = self.connect(&archetype_id, &other_id, RelatorKind::Analogic)?;
            let relator = &self.relator_network.all()[rel_idx];
            if relator.strength > 0.5 {
                relator_ids.push(relator.id.clone());
            }
        }
        Ok(LearnReport {
            archetype_id,
            relator_ids,
        })
    }

    /// Learn the temporal pattern of a sequence. Delegates to the
    /// dynamics learner; no rotation window is consumed. Sequences
    /// shorter than the configured minimum yield `None`.
    pub fn learn_sequence(&mut self, sequence: &[FractalTensor]) -> Option<&Dynamics> {
        self.dynamics_learner.learn_sequence(sequence)
    }

    /// Connect two archetypes by id. Consumes one rotation window.
    pub fn connect(
        &mut self,
        origin_id: &str,
        destination_id: &str,
        kind: RelatorKind,
    ) -> AuroraResult<usize> {
        let origin = self
            .archetype_learner
            .by_id(origin_id)
            .ok_or_else(|| AuroraError::UnknownArchetype(origin_id.to_string()))?;
        let destination = self
            .archetype_learner
            .by_id(destination_id)
            .ok_or_else(|| AuroraError::UnknownArchetype(destination_id.to_string()))?;
        let idx = self.relator_network.connect(
            origin,
            destination,
            kind,
            self.step,
            &mut self.transcender,
        );
        self.step += 1;
        Ok(idx)
    }

    pub fn archetype(&self, index: usize) -> Option<&Archetype> {
        self.archetype_learner.all().get(index)
    }

    pub fn archetype_by_id(&self, id: &str) -> Option<&Archetype> {
        self.archetype_learner.by_id(id)
    }

    pub fn archetypes(&self) -> &[Archetype] {
        self.archetype_learner.all()
    }

    pub fn top_archetypes(&self, n: usize) -> Vec<&Archetype> {
        self.archetype_learner
            .top(n)
            .into_iter()
            .map(|i| self.archetype_learner.get(i))
            .collect()
    }

    pub fn relators(&self) -> &[Relator] {
        self.relator_network.all()
    }

    pub fn network(&self) -> &RelatorNetwork {
        &self.relator_network
    }

    pub fn dynamics(&self) -> &[Dynamics] {
        self.dynamics_learner.all()
    }

    pub fn transcender_mut(&mut self) -> &mut Transcender {
        &mut self.transcender
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn stats(&self) -> EvolverStats {
        EvolverStats {
            archetypes: self.archetype_learner.len(),
            relators: self.relator_network.len(),
            dynamics: self.dynamics_learner.len(),
            strong_connections: self
                .relator_network
                .strong_connections(self.strong_threshold)
                .len(),
            step: self.step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_tensor::Vector;

    fn tensor(l1: [(u8, u8, u8); 3]) -> FractalTensor {
        let slots = l1.map(|(f, fun, e)| Vector::raw(f, fun, e));
        FractalTensor::from_raw_level1(slots, 3)
    }

    fn fix_a() -> FractalTensor {
        tensor([(1, 1, 1), (2, 2, 2), (3, 3, 3)])
    }

    fn fix_b() -> FractalTensor {
        tensor([(4, 3, 7), (2, 6, 1), (6, 7, 5)])
    }

    fn fix_c() -> FractalTensor {
        tensor([(2, 4, 2), (7, 3, 1), (6, 7, 2)])
    }

    #[test]
    fn test_absorb_advances_shared_step() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        ev.absorb(&fix_a());
        ev.absorb(&fix_b());
        ev.absorb(&fix_c());
        assert_eq!(ev.archetypes().len(), 3);
        assert_eq!(ev.step(), 3);
    }

    #[test]
    fn test_connect_uses_shared_step() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        ev.absorb(&fix_a());
        ev.absorb(&fix_b());
        ev.absorb(&fix_c());
        let r1 = ev.connect("ARQ_0001", "ARQ_0002", RelatorKind::Analogic).unwrap();
        let r2 = ev.connect("ARQ_0002", "ARQ_0003", RelatorKind::Analogic).unwrap();
        assert!((ev.relators()[r1].strength - 0.582957).abs() < 1e-4);
        assert!((ev.relators()[r2].strength - 0.560679).abs() < 1e-4);
        assert_eq!(ev.step(), 5);
        let path = ev
            .network()
            .shortest_path("ARQ_0001", "ARQ_0003")
            .unwrap()
            .unwrap();
        assert_eq!(path, vec!["ARQ_0001", "ARQ_0002", "ARQ_0003"]);
    }

    #[test]
    fn test_connect_unknown_archetype() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        ev.absorb(&fix_a());
        assert!(matches!(
            ev.connect("ARQ_0001", "ARQ_0042", RelatorKind::Causal),
            Err(AuroraError::UnknownArchetype(_))
        ));
    }

    #[test]
    fn test_learn_connects_to_frequent_archetypes() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        let r1 = ev.learn(&fix_a()).unwrap();
        assert_eq!(r1.archetype_id, "ARQ_0001");
        assert!(r1.relator_ids.is_empty());

        let r2 = ev.learn(&fix_b()).unwrap();
        assert_eq!(r2.archetype_id, "ARQ_0002");
        assert_eq!(r2.relator_ids, vec!["REL_0001"]);

        let r3 = ev.learn(&fix_c()).unwrap();
        assert_eq!(r3.archetype_id, "ARQ_0003");
        assert_eq!(r3.relator_ids, vec!["REL_0002", "REL_0003"]);

        let strengths: Vec<f64> = ev.relators().iter().map(|r| r.strength).collect();
        assert!((strengths[0] - 0.5899887).abs() < 1e-5);
        assert!((strengths[1] - 0.5623193).abs() < 1e-5);
        assert!((strengths[2] - 0.5227229).abs() < 1e-5);
        assert_eq!(ev.step(), 6);
    }

    #[test]
    fn test_learn_sequence_delegates() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        let seq: Vec<_> = (0..4)
            .map(|i| FractalTensor::uniform(i, i, i, 2).unwrap())
            .collect();
        let dyn_ = ev.learn_sequence(&seq).unwrap();
        assert_eq!(dyn_.mean_delta.components(), [1, 1, 1]);
        // Two tensors carry no dynamics; nothing is minted.
        assert!(ev.learn_sequence(&seq[..2]).is_none());
        assert_eq!(ev.dynamics().len(), 1);
    }

    #[test]
    fn test_stats_counts_population() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        ev.learn(&fix_a()).unwrap();
        ev.learn(&fix_b()).unwrap();
        let stats = ev.stats();
        assert_eq!(stats.archetypes, 2);
        assert_eq!(stats.relators, 1);
        assert_eq!(stats.dynamics, 0);
        assert_eq!(stats.strong_connections, 0);
    }
}
