// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Archetype Learner
// Mirrors: Infrastructure/IE/evolver.py (Arquetipo, ArchetypeLearner)
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use aurora_tensor::{rotation_step, FractalTensor, Vector, MAX_TENSOR_DISTANCE};
use aurora_types::clamp_unit;

/// EMA weight for prototype updates.
const PROTOTYPE_ALPHA: f64 = 0.2;

/// A timeless universal pattern: prototype plus its supporting exemplars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archetype {
    pub id: String,
    pub prototype: FractalTensor,
    /// Most recent absorbed exemplars, oldest first, bounded by the
    /// learner's `max_exemplars`.
    pub exemplars: Vec<FractalTensor>,
    pub frequency: u32,
    pub level: u8,
}

impl Archetype {
    /// Consistency of the exemplars around the prototype, in [0, 1].
    /// An archetype with fewer than two exemplars is trivially coherent.
    pub fn coherence(&self) -> f64 {
        if self.exemplars.len() < 2 {
            return 1.0;
        }
        let mean: f64 = self
            .exemplars
            .iter()
            .map(|e| e.level1_distance(&self.prototype) as f64 / MAX_TENSOR_DISTANCE as f64)
            .sum::<f64>()
            / self.exemplars.len() as f64;
        clamp_unit(1.0 - mean)
    }
}

/// Detects universal patterns through Fibonacci-rotated matching.
///
/// The Fibonacci step is owned by the Evolver and passed in, so all of
/// the Evolver's collaborators consume rotations from one shared walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeLearner {
    archetypes: Vec<Archetype>,
    counter: u32,
    similarity_threshold: f64,
    max_exemplars: usize,
}

impl ArchetypeLearner {
    pub fn new(similarity_threshold: f64, max_exemplars: usize) -> Self {
        Self {
            archetypes: Vec::new(),
            counter: 0,
            similarity_threshold,
            max_exemplars,
        }
    }

    /// Absorb a tensor: match it (or one of 3 Fibonacci rotations)
    /// against every known prototype, or mint a new archetype.
    ///
    /// Returns the index of the archetype that received the tensor.
    /// Ties break toward the first archetype in insertion order.
    pub fn absorb(&mut self, tensor: &FractalTensor, step: usize) -> usize {
        let mut candidates = Vec::with_capacity(4);
        candidates.push(tensor.clone());
        for i in 0..3 {
            candidates.push(tensor.rotated(rotation_step(step, i)));
        }

        let mut best: Option<(usize, usize, f64)> = None;
        for (ai, arq) in self.archetypes.iter().enumerate() {
            for (ci, cand) in candidates.iter().enumerate() {
                let sim = cand.similarity(&arq.prototype);
                if sim >= self.similarity_threshold
                    && best.map_or(true, |(_, _, b)| sim > b)
                {
                    best = Some((ai, ci, sim));
                }
            }
        }

        match best {
            Some((ai, ci, sim)) => {
                let winner = candidates.swap_remove(ci);
                let arq = &mut self.archetypes[ai];
                if arq.exemplars.len() == self.max_exemplars {
                    arq.exemplars.remove(0);
                }
                arq.exemplars.push(winner.clone());
                arq.frequency += 1;
                update_prototype(arq, &winner);
                log::debug!(
                    "absorb: {} reinforced (similarity {sim:.4}, frequency {})",
                    arq.id,
                    arq.frequency
                );
                ai
            }
            None => {
                self.counter += 1;
                let id = format!("ARQ_{:04}", self.counter);
                log::debug!("absorb: new archetype {id}");
                self.archetypes.push(Archetype {
                    id,
                    prototype: tensor.clone(),
                    exemplars: vec![tensor.clone()],
                    frequency: 1,
                    level: tensor.level,
                });
                self.archetypes.len() - 1
            }
        }
    }

    pub fn get(&self, index: usize) -> &Archetype {
        &self.archetypes[index]
    }

    pub fn by_id(&self, id: &str) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.id == id)
    }

    /// All archetypes in insertion order.
    pub fn all(&self) -> &[Archetype] {
        &self.archetypes
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Top `n` archetype indices by descending frequency; stable, so
    /// insertion order decides among equals.
    pub fn top(&self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.archetypes.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.archetypes[i].frequency));
        order.truncate(n);
        order
    }
}

/// Exponential moving average toward the newest exemplar, with integer
/// truncation per component, followed by hierarchy regeneration.
fn update_prototype(arq: &mut Archetype, newest: &FractalTensor) {
    let mut level1 = *arq.prototype.level1();
    for (slot, incoming) in level1.iter_mut().zip(newest.level1().iter()) {
        let blend = |p: u8, e: u8| {
            ((1.0 - PROTOTYPE_ALPHA) * p as f64 + PROTOTYPE_ALPHA * e as f64) as u8
        };
        *slot = Vector::raw(
            blend(slot.forma, incoming.forma),
            blend(slot.funcion, incoming.funcion),
            blend(slot.estructura, incoming.estructura),
        );
    }
    arq.prototype.set_level1(level1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(l1: [(u8, u8, u8); 3], level: u8) -> FractalTensor {
        let vs = l1.map(|(f, fu, e)| Vector::new(f, fu, e).unwrap());
        FractalTensor::new(vs, level).unwrap()
    }

    #[test]
    fn test_identical_tensors_share_archetype() {
        let mut learner = ArchetypeLearner::new(0.7, 32);
        let t = tensor([(1, 2, 3), (1, 2, 3), (1, 2, 3)], 3);
        let first = learner.absorb(&t, 0);
        let second = learner.absorb(&t, 1);
        assert_eq!(first, second);
        assert_eq!(learner.len(), 1);
        let arq = learner.get(first);
        assert_eq!(arq.frequency, 2);
        // EMA of an identical exemplar is a fixpoint.
        assert_eq!(arq.prototype.level1(), t.level1());
        assert_eq!(arq.id, "ARQ_0001");
    }

    #[test]
    fn test_distant_tensor_creates_new_archetype() {
        let mut learner = ArchetypeLearner::new(0.7, 32);
        learner.absorb(&tensor([(1, 1, 1), (2, 2, 2), (3, 3, 3)], 3), 0);
        learner.absorb(&tensor([(4, 3, 7), (2, 6, 1), (6, 7, 5)], 3), 1);
        learner.absorb(&tensor([(2, 4, 2), (7, 3, 1), (6, 7, 2)], 3), 2);
        assert_eq!(learner.len(), 3);
        assert_eq!(learner.get(2).id, "ARQ_0003");
    }

    #[test]
    fn test_rotated_match_stores_winning_rotation() {
        let mut learner = ArchetypeLearner::new(0.7, 32);
        let base = tensor([(0, 0, 0), (0, 0, 0), (0, 0, 0)], 0);
        learner.absorb(&base, 0);
        // (7,7,7) rotated by F[1] % 8 = 1 lands exactly on the prototype.
        let far = tensor([(7, 7, 7), (7, 7, 7), (7, 7, 7)], 0);
        let idx = learner.absorb(&far, 1);
        assert_eq!(idx, 0);
        let arq = learner.get(0);
        assert_eq!(arq.exemplars.last().unwrap().level1(), base.level1());
    }

    #[test]
    fn test_exemplars_bounded() {
        let mut learner = ArchetypeLearner::new(0.7, 4);
        let t = tensor([(1, 2, 3), (1, 2, 3), (1, 2, 3)], 3);
        for step in 0..10 {
            learner.absorb(&t, step);
        }
        let arq = learner.get(0);
        assert_eq!(arq.exemplars.len(), 4);
        assert_eq!(arq.frequency, 10);
    }

    #[test]
    fn test_coherence_trivial_below_two_exemplars() {
        let mut learner = ArchetypeLearner::new(0.7, 32);
        let idx = learner.absorb(&tensor([(1, 2, 3), (4, 5, 6), (7, 0, 1)], 3), 0);
        assert_eq!(learner.get(idx).coherence(), 1.0);
    }

    #[test]
    fn test_top_orders_by_frequency_then_insertion() {
        let mut learner = ArchetypeLearner::new(0.7, 32);
        let a = tensor([(1, 1, 1), (2, 2, 2), (3, 3, 3)], 3);
        let b = tensor([(4, 3, 7), (2, 6, 1), (6, 7, 5)], 3);
        learner.absorb(&a, 0);
        learner.absorb(&b, 1);
        learner.absorb(&b, 2);
        let top = learner.top(2);
        assert_eq!(learner.get(top[0]).id, "ARQ_0002");
        assert_eq!(learner.get(top[1]).id, "ARQ_0001");
    }
}
