// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Dynamics Learner
// Mirrors: Infrastructure/IE/evolver.py (Dinamica, DynamicsLearner)
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use aurora_tensor::{FractalTensor, Vector, MAX_TENSOR_DISTANCE};

/// Shortest sequence on which periodicity detection is attempted.
const PERIODICITY_MIN_LEN: usize = 6;

/// Normalized distance below which two tensors count as repeats.
const PERIODICITY_TOLERANCE: f64 = 0.3;

/// A learned temporal transformation pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dynamics {
    pub id: String,
    pub sequence: Vec<FractalTensor>,
    /// Mean per-dimension change between adjacent tensors, mod 8.
    pub mean_delta: Vector,
    pub periodicity: Option<usize>,
}

impl Dynamics {
    /// Apply the mean delta to every level-1 slot of `current`, mod 8.
    pub fn predict_next(&self, current: &FractalTensor) -> FractalTensor {
        let level1 = current.level1().map(|v| {
            Vector::raw(
                (v.forma + self.mean_delta.forma) % 8,
                (v.funcion + self.mean_delta.funcion) % 8,
                (v.estructura + self.mean_delta.estructura) % 8,
            )
        });
        FractalTensor::from_raw_level1(level1, current.level)
    }
}

/// Extracts temporal patterns from tensor sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicsLearner {
    dynamics: Vec<Dynamics>,
    counter: u32,
    min_sequence: usize,
}

impl DynamicsLearner {
    pub fn new(min_sequence: usize) -> Self {
        Self {
            dynamics: Vec::new(),
            counter: 0,
            min_sequence,
        }
    }

    /// Learn the mean delta and periodicity of a temporal sequence.
    /// A sequence shorter than the configured minimum carries no
    /// dynamics and yields `None`.
    pub fn learn_sequence(&mut self, sequence: &[FractalTensor]) -> Option<&Dynamics> {
        if sequence.len() < self.min_sequence {
            log::debug!(
                "learn_sequence: {} tensors, need at least {}",
                sequence.len(),
                self.min_sequence
            );
            return None;
        }

        let deltas: Vec<Vector> = sequence
            .windows(2)
            .map(|pair| slot_delta(&pair[0], &pair[1]))
            .collect();
        let mean_delta = floor_mean(&deltas);
        let periodicity = detect_periodicity(sequence);

        self.counter += 1;
        let dynamics = Dynamics {
            id: format!("DYN_{:04}", self.counter),
            sequence: sequence.to_vec(),
            mean_delta,
            periodicity,
        };
        log::debug!(
            "learn_sequence: {} delta={} periodicity={periodicity:?}",
            dynamics.id,
            dynamics.mean_delta
        );
        self.dynamics.push(dynamics);
        let idx = self.dynamics.len() - 1;
        Some(&self.dynamics[idx])
    }

    pub fn all(&self) -> &[Dynamics] {
        &self.dynamics
    }

    pub fn len(&self) -> usize {
        self.dynamics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dynamics.is_empty()
    }
}

/// Per-dimension change between two tensors: circular difference mod 8,
/// floor-averaged across the three level-1 slots.
fn slot_delta(prev: &FractalTensor, next: &FractalTensor) -> Vector {
    let diff = |a: u8, b: u8| ((b as i16 - a as i16).rem_euclid(8)) as u16;
    let mut sums = [0u16; 3];
    for (p, n) in prev.level1().iter().zip(next.level1().iter()) {
        sums[0] += diff(p.forma, n.forma);
        sums[1] += diff(p.funcion, n.funcion);
        sums[2] += diff(p.estructura, n.estructura);
    }
    Vector::raw((sums[0] / 3) as u8, (sums[1] / 3) as u8, (sums[2] / 3) as u8)
}

fn floor_mean(deltas: &[Vector]) -> Vector {
    let n = deltas.len() as u16;
    let sum = |f: fn(&Vector) -> u8| deltas.iter().map(|v| f(v) as u16).sum::<u16>() / n;
    Vector::raw(
        sum(|v| v.forma) as u8,
        sum(|v| v.funcion) as u8,
        sum(|v| v.estructura) as u8,
    )
}

/// First period p in 2..=n/2 under which every tensor repeats its phase
/// representative within tolerance. Short sequences report none.
fn detect_periodicity(sequence: &[FractalTensor]) -> Option<usize> {
    let n = sequence.len();
    if n < PERIODICITY_MIN_LEN {
        return None;
    }
    (2..=n / 2).find(|&period| {
        (period..n).all(|i| {
            let d = sequence[i].level1_distance(&sequence[i % period]) as f64
                / MAX_TENSOR_DISTANCE as f64;
            d <= PERIODICITY_TOLERANCE
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(v: u8, level: u8) -> FractalTensor {
        FractalTensor::uniform(v, v, v, level).unwrap()
    }

    #[test]
    fn test_short_sequence_carries_no_dynamics() {
        let mut learner = DynamicsLearner::new(3);
        let seq = vec![uniform(0, 2), uniform(1, 2)];
        assert!(learner.learn_sequence(&seq).is_none());
        // Nothing is minted for an absent pattern.
        assert!(learner.is_empty());
    }

    #[test]
    fn test_uniform_ramp_delta() {
        let mut learner = DynamicsLearner::new(3);
        let seq: Vec<_> = (0..4).map(|i| uniform(i, 2)).collect();
        let dyn_ = learner.learn_sequence(&seq).unwrap();
        assert_eq!(dyn_.id, "DYN_0001");
        assert_eq!(dyn_.mean_delta.components(), [1, 1, 1]);
        // Four tensors are too few for periodicity detection.
        assert_eq!(dyn_.periodicity, None);
    }

    #[test]
    fn test_prediction_advances_ramp() {
        let mut learner = DynamicsLearner::new(3);
        let seq: Vec<_> = (0..4).map(|i| uniform(i, 2)).collect();
        let dyn_ = learner.learn_sequence(&seq).unwrap().clone();
        let next = dyn_.predict_next(&seq[3]);
        assert_eq!(next.level1(), uniform(4, 2).level1());
        assert_eq!(next.level, 2);
    }

    #[test]
    fn test_prediction_wraps_octal() {
        let mut learner = DynamicsLearner::new(3);
        let seq: Vec<_> = (4..8).map(|i| uniform(i, 1)).collect();
        let dyn_ = learner.learn_sequence(&seq).unwrap().clone();
        let next = dyn_.predict_next(&seq[3]);
        assert_eq!(next.level1()[0].components(), [0, 0, 0]);
    }

    #[test]
    fn test_alternating_sequence_has_period_two() {
        let mut learner = DynamicsLearner::new(3);
        let seq: Vec<_> = (0..6)
            .map(|i| uniform(if i % 2 == 0 { 2 } else { 3 }, 0))
            .collect();
        let dyn_ = learner.learn_sequence(&seq).unwrap();
        assert_eq!(dyn_.periodicity, Some(2));
    }

    #[test]
    fn test_non_periodic_sequence() {
        let mut learner = DynamicsLearner::new(3);
        let seq: Vec<_> = (0..6).map(|i| uniform(i, 0)).collect();
        let dyn_ = learner.learn_sequence(&seq).unwrap();
        assert_eq!(dyn_.periodicity, None);
    }
}
