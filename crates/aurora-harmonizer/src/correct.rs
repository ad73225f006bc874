// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Harmonizer
// Mirrors: Infrastructure/IE/armonizador.py (autocorrección, aprendizaje)
// ─────────────────────────────────────────────────────────────────────

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use aurora_core::Evolver;
use aurora_tensor::{rotation_step, FractalTensor, MAX_TENSOR_DISTANCE};
use aurora_types::AuroraConfig;

use crate::detect::{
    detect_incoherences, CorrespondenceRegistry, Incoherence, IncoherenceKind,
};

/// A correction that restored global coherence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correction {
    pub tensor: FractalTensor,
    pub resulting_coherence: f64,
    pub depth: usize,
    /// Normalized level-1 distance between the origin and the accepted
    /// variant, capped at 1.
    pub cost: f64,
}

/// What one corrected error taught the harmonizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorLearning {
    pub kind: IncoherenceKind,
    pub confidence_deltas: HashMap<String, f64>,
    pub pattern: String,
}

/// Outcome of harmonizing one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonyReport {
    pub coherent: bool,
    pub detected: usize,
    pub corrected: usize,
    pub failed: usize,
    pub learnings: usize,
    pub archetype_confidence: HashMap<String, f64>,
    pub relator_confidence: HashMap<String, f64>,
    /// The batch with corrected tensors substituted in place.
    pub outputs: Vec<FractalTensor>,
}

/// Detects incoherences, autocorrects them through recursive Fibonacci
/// rotation, and learns from every corrected error by discounting the
/// confidence of the archetypes and relators involved.
#[derive(Debug, Clone)]
pub struct Harmonizer {
    registry: CorrespondenceRegistry,
    archetype_confidence: HashMap<String, f64>,
    relator_confidence: HashMap<String, f64>,
    learnings: Vec<ErrorLearning>,
    coherence_threshold: f64,
    contradiction_margin: u8,
    max_recursion: usize,
    step: usize,
}

impl Harmonizer {
    pub fn new(config: &AuroraConfig) -> Self {
        Self {
            registry: CorrespondenceRegistry::default(),
            archetype_confidence: HashMap::new(),
            relator_confidence: HashMap::new(),
            learnings: Vec::new(),
            coherence_threshold: config.coherence_threshold,
            contradiction_margin: config.contradiction_margin,
            max_recursion: config.max_recursion,
            step: 0,
        }
    }

    /// Run the detectors over a batch within one logical space.
    pub fn detect(
        &mut self,
        evolver: &mut Evolver,
        batch: &[FractalTensor],
        space: &str,
    ) -> Vec<Incoherence> {
        detect_incoherences(
            evolver,
            &mut self.registry,
            batch,
            space,
            self.coherence_threshold,
            self.contradiction_margin,
        )
    }

    /// Try to correct one incoherence. Three Fibonacci rotations of the
    /// origin are scored for global coherence; when none passes the
    /// threshold the first variant becomes the new origin and the search
    /// recurses, up to `max_recursion` levels deep.
    pub fn correct(&mut self, evolver: &mut Evolver, incoherence: &Incoherence) -> Option<Correction> {
        self.correct_with(evolver, incoherence, &|t, paso| t.rotated(paso))
    }

    /// `correct` with a pluggable rotation, so callers can route the
    /// variant construction through a shared cache.
    pub fn correct_with(
        &mut self,
        evolver: &mut Evolver,
        incoherence: &Incoherence,
        rotate: &dyn Fn(&FractalTensor, u8) -> FractalTensor,
    ) -> Option<Correction> {
        let origin = incoherence.tensor_origin.as_ref()?;
        self.correct_tensor(evolver, origin, 0, rotate)
    }

    fn correct_tensor(
        &mut self,
        evolver: &mut Evolver,
        origin: &FractalTensor,
        depth: usize,
        rotate: &dyn Fn(&FractalTensor, u8) -> FractalTensor,
    ) -> Option<Correction> {
        if depth >= self.max_recursion {
            return None;
        }
        let variants: Vec<FractalTensor> = (0..3)
            .map(|i| rotate(origin, rotation_step(self.step, i)))
            .collect();

        let mut best: Option<Correction> = None;
        for variant in &variants {
            let score = self.global_coherence(evolver, variant);
            let acceptable = score >= self.coherence_threshold;
            let better = best
                .as_ref()
                .map_or(true, |b| score > b.resulting_coherence);
            if acceptable && better {
                let cost = (origin.level1_distance(variant) as f64
                    / MAX_TENSOR_DISTANCE as f64)
                    .min(1.0);
                best = Some(Correction {
                    tensor: variant.clone(),
                    resulting_coherence: score,
                    depth,
                    cost,
                });
            }
        }
        if best.is_some() {
            return best;
        }
        self.step = (self.step + 1) % 12;
        self.correct_tensor(evolver, &variants[0], depth + 1, rotate)
    }

    /// Weighted global coherence of a candidate tensor: internal slot
    /// validity, the coherence of the archetype that absorbs it, and the
    /// mean strength of that archetype's relators (neutral 0.5 when it
    /// has none).
    pub fn global_coherence(&self, evolver: &mut Evolver, tensor: &FractalTensor) -> f64 {
        let valid = tensor.level1().iter().filter(|v| v.is_valid()).count();
        let internal = valid as f64 / 3.0;

        let arq_idx = evolver.absorb(tensor);
        let (archetype_coherence, archetype_id) = match evolver.archetype(arq_idx) {
            Some(a) => (a.coherence(), a.id.clone()),
            None => (0.0, String::new()),
        };

        let strengths: Vec<f64> = evolver
            .relators()
            .iter()
            .filter(|r| r.origin == archetype_id || r.destination == archetype_id)
            .map(|r| r.strength)
            .collect();
        let relational = if strengths.is_empty() {
            0.5
        } else {
            strengths.iter().sum::<f64>() / strengths.len() as f64
        };

        0.4 * internal + 0.4 * archetype_coherence + 0.2 * relational
    }

    /// Discount the confidence of whatever the corrected error touched,
    /// proportionally to the correction cost, and record the pattern.
    pub fn learn_from_error(
        &mut self,
        incoherence: &Incoherence,
        correction: &Correction,
    ) -> &ErrorLearning {
        let delta = -0.1 * correction.cost;
        let mut deltas = HashMap::new();

        if let Some(id) = &incoherence.archetype_id {
            let current = self.archetype_confidence.get(id).copied().unwrap_or(1.0);
            self.archetype_confidence
                .insert(id.clone(), (current + delta).max(0.0));
            deltas.insert(id.clone(), delta);
        }
        if let Some(id) = &incoherence.relator_id {
            let current = self.relator_confidence.get(id).copied().unwrap_or(1.0);
            self.relator_confidence
                .insert(id.clone(), (current + delta).max(0.0));
            deltas.insert(id.clone(), delta);
        }

        let learning = ErrorLearning {
            kind: incoherence.kind,
            confidence_deltas: deltas,
            pattern: error_pattern(incoherence.kind).to_string(),
        };
        self.learnings.push(learning);
        let idx = self.learnings.len() - 1;
        &self.learnings[idx]
    }

    /// Detect, correct by descending severity, and learn. Corrections of
    /// batch-born incoherences replace the tensor in the reported
    /// outputs.
    pub fn harmonize(
        &mut self,
        evolver: &mut Evolver,
        batch: &[FractalTensor],
        space: &str,
    ) -> HarmonyReport {
        let mut incoherences = self.detect(evolver, batch, space);
        incoherences.sort_by(|a, b| b.severity.total_cmp(&a.severity));

        let mut outputs = batch.to_vec();
        let mut corrected = 0;
        let mut failed = 0;
        for incoherence in &incoherences {
            match self.correct(evolver, incoherence) {
                Some(correction) => {
                    corrected += 1;
                    self.learn_from_error(incoherence, &correction);
                    if let Some(idx) = incoherence.tensor_index {
                        outputs[idx] = correction.tensor;
                    }
                }
                None => {
                    failed += 1;
                    log::warn!(
                        "harmonize: no convergent correction for {} (severity {:.3})",
                        incoherence.kind,
                        incoherence.severity
                    );
                }
            }
        }

        log::info!(
            "harmonize: space={space} detected={} corrected={corrected} failed={failed}",
            incoherences.len()
        );
        HarmonyReport {
            coherent: failed == 0,
            detected: incoherences.len(),
            corrected,
            failed,
            learnings: self.learnings.len(),
            archetype_confidence: self.archetype_confidence.clone(),
            relator_confidence: self.relator_confidence.clone(),
            outputs,
        }
    }

    pub fn archetype_confidence(&self, id: &str) -> f64 {
        self.archetype_confidence.get(id).copied().unwrap_or(1.0)
    }

    pub fn relator_confidence(&self, id: &str) -> f64 {
        self.relator_confidence.get(id).copied().unwrap_or(1.0)
    }

    pub fn archetype_confidences(&self) -> &HashMap<String, f64> {
        &self.archetype_confidence
    }

    pub fn relator_confidences(&self) -> &HashMap<String, f64> {
        &self.relator_confidence
    }

    pub fn learnings(&self) -> &[ErrorLearning] {
        &self.learnings
    }
}

fn error_pattern(kind: IncoherenceKind) -> &'static str {
    match kind {
        IncoherenceKind::Correspondence => "Ms duplicated without validating the space",
        IncoherenceKind::Contradiction => "opposed tensors left unsegregated",
        IncoherenceKind::WeakArchetype => "archetype backed by too few exemplars",
        IncoherenceKind::BrokenRelator => "relation lacks reciprocal validation",
        IncoherenceKind::AmbiguousNull => "null left unclassified",
    }
}
