// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Incoherence Detection
// Mirrors: Infrastructure/IE/armonizador.py (detección)
// ─────────────────────────────────────────────────────────────────────

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use aurora_core::Evolver;
use aurora_tensor::{FractalTensor, Vector};

/// The five incoherence families the absolute-coherence principle names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncoherenceKind {
    /// Same Ms mapped to two different MetaM routes in one logical space.
    Correspondence,
    /// Two tensors of the batch oppose each other in every component.
    Contradiction,
    /// An archetype whose exemplars disagree with its prototype.
    WeakArchetype,
    /// A relator whose strength fell under the coherence threshold.
    BrokenRelator,
    /// Out-of-range components standing in for an unclassified null.
    AmbiguousNull,
}

impl fmt::Display for IncoherenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncoherenceKind::Correspondence => "correspondence",
            IncoherenceKind::Contradiction => "contradiction",
            IncoherenceKind::WeakArchetype => "weak_archetype",
            IncoherenceKind::BrokenRelator => "broken_relator",
            IncoherenceKind::AmbiguousNull => "ambiguous_null",
        };
        f.write_str(name)
    }
}

/// One detected incoherence. `tensor_index` points back into the batch
/// when the origin came from it, so corrections can replace the slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incoherence {
    pub kind: IncoherenceKind,
    pub severity: f64,
    pub tensor_origin: Option<FractalTensor>,
    pub tensor_index: Option<usize>,
    pub archetype_id: Option<String>,
    pub relator_id: Option<String>,
}

impl Incoherence {
    fn new(kind: IncoherenceKind, severity: f64) -> Self {
        Self {
            kind,
            severity,
            tensor_origin: None,
            tensor_index: None,
            archetype_id: None,
            relator_id: None,
        }
    }
}

fn vector_id(v: &Vector) -> String {
    format!("{}_{}_{}", v.forma, v.funcion, v.estructura)
}

fn metam_id(tensor: &FractalTensor) -> String {
    tensor
        .level1()
        .iter()
        .map(vector_id)
        .collect::<Vec<_>>()
        .join("_")
}

/// Per logical space, the unique Ms-to-MetaM correspondence seen so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrespondenceRegistry {
    spaces: HashMap<String, HashMap<String, String>>,
}

impl CorrespondenceRegistry {
    /// Register the tensor's correspondence. Returns false when the Ms
    /// identifier is already bound to a different route.
    pub fn register(&mut self, space: &str, tensor: &FractalTensor) -> bool {
        let ms = vector_id(&tensor.level1()[0]);
        let route = metam_id(tensor);
        let known = self.spaces.entry(space.to_string()).or_default();
        match known.get(&ms) {
            Some(existing) => existing == &route,
            None => {
                known.insert(ms, route);
                true
            }
        }
    }

    pub fn spaces(&self) -> usize {
        self.spaces.len()
    }
}

/// Runs the five detectors over a batch. Watching for weak archetypes
/// absorbs every batch tensor into the evolver as a side effect.
pub fn detect_incoherences(
    evolver: &mut Evolver,
    registry: &mut CorrespondenceRegistry,
    batch: &[FractalTensor],
    space: &str,
    coherence_threshold: f64,
    contradiction_margin: u8,
) -> Vec<Incoherence> {
    let mut found = Vec::new();

    for (idx, tensor) in batch.iter().enumerate() {
        if !registry.register(space, tensor) {
            let mut inc = Incoherence::new(IncoherenceKind::Correspondence, 0.9);
            inc.tensor_origin = Some(tensor.clone());
            inc.tensor_index = Some(idx);
            found.push(inc);
        }
    }

    for i in 0..batch.len() {
        for j in i + 1..batch.len() {
            if opposed(&batch[i], &batch[j], contradiction_margin) {
                let mut inc = Incoherence::new(IncoherenceKind::Contradiction, 1.0);
                inc.tensor_origin = Some(batch[i].clone());
                inc.tensor_index = Some(i);
                found.push(inc);
            }
        }
    }

    for (idx, tensor) in batch.iter().enumerate() {
        let arq_idx = evolver.absorb(tensor);
        if let Some(archetype) = evolver.archetype(arq_idx) {
            let coherence = archetype.coherence();
            if coherence < coherence_threshold {
                let mut inc =
                    Incoherence::new(IncoherenceKind::WeakArchetype, 1.0 - coherence);
                inc.tensor_origin = Some(tensor.clone());
                inc.tensor_index = Some(idx);
                inc.archetype_id = Some(archetype.id.clone());
                found.push(inc);
            }
        }
    }

    for relator in evolver.relators() {
        if relator.strength < coherence_threshold {
            let mut inc =
                Incoherence::new(IncoherenceKind::BrokenRelator, 1.0 - relator.strength);
            inc.tensor_origin = Some(relator.transformation.clone());
            inc.relator_id = Some(relator.id.clone());
            found.push(inc);
        }
    }

    for (idx, tensor) in batch.iter().enumerate() {
        let invalid = tensor.level1().iter().filter(|v| !v.is_valid()).count();
        if invalid > 0 {
            let mut inc = Incoherence::new(
                IncoherenceKind::AmbiguousNull,
                0.3 * invalid as f64 / 3.0,
            );
            inc.tensor_origin = Some(tensor.clone());
            inc.tensor_index = Some(idx);
            found.push(inc);
        }
    }

    log::debug!("detect_incoherences: {} found in space {space}", found.len());
    found
}

/// Every component of every slot differs by more than the margin.
fn opposed(a: &FractalTensor, b: &FractalTensor, margin: u8) -> bool {
    a.level1().iter().zip(b.level1().iter()).all(|(va, vb)| {
        let da = va.components();
        let db = vb.components();
        da.iter()
            .zip(db.iter())
            .all(|(x, y)| (*x as i16 - *y as i16).abs() > margin as i16)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_types::AuroraConfig;

    fn tensor(l1: [(u8, u8, u8); 3]) -> FractalTensor {
        let slots = l1.map(|(f, fun, e)| Vector::raw(f, fun, e));
        FractalTensor::from_raw_level1(slots, 3)
    }

    fn detect(
        evolver: &mut Evolver,
        registry: &mut CorrespondenceRegistry,
        batch: &[FractalTensor],
        space: &str,
    ) -> Vec<Incoherence> {
        detect_incoherences(evolver, registry, batch, space, 0.7, 4)
    }

    #[test]
    fn test_correspondence_conflict() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        let mut reg = CorrespondenceRegistry::default();
        let t1 = tensor([(1, 2, 3), (4, 5, 6), (7, 0, 1)]);
        let t2 = tensor([(1, 2, 3), (0, 0, 0), (0, 0, 0)]);
        let incs = detect(&mut ev, &mut reg, &[t1, t2], "S");
        assert_eq!(incs.len(), 1);
        assert_eq!(incs[0].kind, IncoherenceKind::Correspondence);
        assert!((incs[0].severity - 0.9).abs() < 1e-12);
        assert_eq!(incs[0].tensor_index, Some(1));
    }

    #[test]
    fn test_correspondence_is_per_space() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        let mut reg = CorrespondenceRegistry::default();
        let t1 = tensor([(1, 2, 3), (4, 5, 6), (7, 0, 1)]);
        let t2 = tensor([(1, 2, 3), (0, 0, 0), (0, 0, 0)]);
        assert!(detect(&mut ev, &mut reg, &[t1], "one").is_empty());
        // A different logical space starts a fresh registry.
        let incs = detect(&mut ev, &mut reg, &[t2], "two");
        assert!(incs.is_empty());
        assert_eq!(reg.spaces(), 2);
    }

    #[test]
    fn test_contradiction_requires_every_component() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        let mut reg = CorrespondenceRegistry::default();
        let low = FractalTensor::uniform(0, 0, 0, 0).unwrap();
        let high = FractalTensor::uniform(7, 7, 7, 0).unwrap();
        let incs = detect(&mut ev, &mut reg, &[low.clone(), high], "c");
        assert!(incs
            .iter()
            .any(|i| i.kind == IncoherenceKind::Contradiction && i.severity == 1.0));

        // One agreeing component breaks the contradiction.
        let mut ev2 = Evolver::new(&AuroraConfig::default());
        let mut reg2 = CorrespondenceRegistry::default();
        let near = tensor([(0, 7, 7), (7, 7, 7), (7, 7, 7)]);
        let incs2 = detect(&mut ev2, &mut reg2, &[low, near], "c");
        assert!(!incs2.iter().any(|i| i.kind == IncoherenceKind::Contradiction));
    }

    #[test]
    fn test_broken_relator_detected() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        let mut reg = CorrespondenceRegistry::default();
        ev.absorb(&tensor([(1, 1, 1), (2, 2, 2), (3, 3, 3)]));
        ev.absorb(&tensor([(4, 3, 7), (2, 6, 1), (6, 7, 5)]));
        ev.connect("ARQ_0001", "ARQ_0002", aurora_core::RelatorKind::Analogic)
            .unwrap();
        let strength = ev.relators()[0].strength;
        assert!((strength - 0.586991).abs() < 1e-4);

        let incs = detect(&mut ev, &mut reg, &[], "rel");
        assert_eq!(incs.len(), 1);
        assert_eq!(incs[0].kind, IncoherenceKind::BrokenRelator);
        assert!((incs[0].severity - (1.0 - strength)).abs() < 1e-12);
        assert_eq!(incs[0].relator_id.as_deref(), Some("REL_0001"));
    }

    #[test]
    fn test_ambiguous_null_severity_scales_with_slots() {
        let mut ev = Evolver::new(&AuroraConfig::default());
        let mut reg = CorrespondenceRegistry::default();
        let guard = tensor([(9, 0, 0), (0, 0, 0), (0, 0, 0)]);
        let incs = detect(&mut ev, &mut reg, &[guard], "null");
        assert_eq!(incs.len(), 1);
        assert_eq!(incs[0].kind, IncoherenceKind::AmbiguousNull);
        assert!((incs[0].severity - 0.1).abs() < 1e-12);

        let mut ev2 = Evolver::new(&AuroraConfig::default());
        let mut reg2 = CorrespondenceRegistry::default();
        let worse = tensor([(9, 0, 0), (8, 0, 0), (0, 0, 0)]);
        let incs2 = detect(&mut ev2, &mut reg2, &[worse], "null");
        assert!((incs2[0].severity - 0.2).abs() < 1e-12);
    }
}
