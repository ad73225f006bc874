// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Transcender (Ternary Synthesis)
// Mirrors: Infrastructure/IE/transcender.py
// ─────────────────────────────────────────────────────────────────────
//! Non-commutative ternary synthesis.
//!
//! Three tensors fuse into an Emergence: the emergent structure `Ms`,
//! the factual fingerprint `Ss`, and the full logical route `MetaM`.
//! Operand order matters by construction; the six permutations of a
//! generic triple produce six different scores.

use serde::{Deserialize, Serialize};

use aurora_tensor::{FractalTensor, Vector, MAX_TENSOR_DISTANCE};
use aurora_types::clamp_unit;

/// Result of one ternary synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emergence {
    /// Emergent structure: the synthesis itself.
    pub ms: FractalTensor,
    /// Factual fingerprint: sequential blend of the operands.
    pub ss: FractalTensor,
    /// Full logical route combining Ms and Ss.
    pub metam: FractalTensor,
    /// Distance of Ms from the convex hull of the operands, in [0, 1].
    pub novelty: f64,
    /// Hierarchical coherence of Ms.
    pub coherence: f64,
    /// MDL gain of Ms over the operands; may be negative.
    pub compression: f64,
    /// `0.4 * novelty + 0.3 * coherence + 0.3 * max(0, compression)`.
    pub score: f64,
}

/// Ternary synthesis engine with an emergence history.
#[derive(Debug, Clone, Default)]
pub struct Transcender {
    history: Vec<Emergence>,
}

fn mix_ms(a: &Vector, b: &Vector, c: &Vector) -> Vector {
    Vector::raw(
        ((a.forma as u16 ^ ((b.forma as u16) << 1) ^ ((c.forma as u16) << 2)) & 7) as u8,
        ((a.funcion as u16 + b.funcion as u16 * 2 + c.funcion as u16 * 3) % 8) as u8,
        (a.estructura ^ b.estructura ^ c.estructura) & 7,
    )
}

fn mix_ss(a: &Vector, b: &Vector, c: &Vector) -> Vector {
    // First blend A with B, then fold C in.
    let t0 = ((a.forma as u16 + b.forma as u16) % 8) as u8;
    let t1 = (a.funcion ^ b.funcion) & 7;
    let t2 = ((a.estructura as u16 * b.estructura as u16) % 8) as u8;
    Vector::raw(
        (t0 ^ c.forma) & 7,
        ((t1 as u16 + c.funcion as u16) % 8) as u8,
        (((t2 as u16 + c.estructura as u16) * 3) % 8) as u8,
    )
}

fn mix_metam(m: &Vector, s: &Vector, a: &Vector, b: &Vector, c: &Vector) -> Vector {
    let residue = ((a.estructura as u16 + b.estructura as u16 + c.estructura as u16) % 8) as u8;
    Vector::raw(
        ((m.forma as u16 + s.forma as u16) % 8) as u8,
        ((m.funcion as u16 * s.funcion as u16) % 8) as u8,
        (m.estructura ^ s.estructura ^ residue) & 7,
    )
}

/// Minimum description length of a tensor's level 1.
///
/// `log2(unique level-1 vectors) + 10 * coherence`. Mirrors
/// `_mdl_length()` from `transcender.py`.
pub fn mdl_length(tensor: &FractalTensor) -> f64 {
    let mut unique: Vec<[u8; 3]> = tensor.level1().iter().map(Vector::components).collect();
    unique.sort_unstable();
    unique.dedup();
    (unique.len() as f64).log2() + tensor.coherence() * 10.0
}

impl Transcender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthesize three tensors into an Emergence. Order matters.
    pub fn synthesize(
        &mut self,
        a: &FractalTensor,
        b: &FractalTensor,
        c: &FractalTensor,
    ) -> Emergence {
        let mut ms_l1 = [Vector::default(); 3];
        let mut ss_l1 = [Vector::default(); 3];
        let mut mm_l1 = [Vector::default(); 3];
        let mut hull_l1 = [Vector::default(); 3];

        for i in 0..3 {
            let (va, vb, vc) = (&a.level1()[i], &b.level1()[i], &c.level1()[i]);
            ms_l1[i] = mix_ms(va, vb, vc);
            ss_l1[i] = mix_ss(va, vb, vc);
            hull_l1[i] = Vector::raw(
                ((va.forma as u16 + vb.forma as u16 + vc.forma as u16) / 3) as u8,
                ((va.funcion as u16 + vb.funcion as u16 + vc.funcion as u16) / 3) as u8,
                ((va.estructura as u16 + vb.estructura as u16 + vc.estructura as u16) / 3) as u8,
            );
        }
        for i in 0..3 {
            mm_l1[i] = mix_metam(
                &ms_l1[i],
                &ss_l1[i],
                &a.level1()[i],
                &b.level1()[i],
                &c.level1()[i],
            );
        }

        let ms = FractalTensor::from_raw_level1(ms_l1, a.level.max(b.level).max(c.level));
        let ss = FractalTensor::from_raw_level1(
            ss_l1,
            ((a.level as u16 + b.level as u16 + c.level as u16) / 3) as u8,
        );
        let metam = FractalTensor::from_raw_level1(mm_l1, (ms.level.max(ss.level) + 1).min(7));
        let hull = FractalTensor::from_raw_level1(hull_l1, 0);

        let novelty = ms.level1_distance(&hull) as f64 / MAX_TENSOR_DISTANCE as f64;
        let coherence = ms.coherence();
        let mdl_in = mdl_length(a) + mdl_length(b) + mdl_length(c);
        let compression = if mdl_in > 0.0 {
            (mdl_in - mdl_length(&ms)) / mdl_in
        } else {
            0.0
        };
        let score = clamp_unit(0.4 * novelty + 0.3 * coherence + 0.3 * compression.max(0.0));

        let emergence = Emergence {
            ms,
            ss,
            metam,
            novelty,
            coherence,
            compression,
            score,
        };
        log::debug!(
            "synthesize: novelty={novelty:.4} coherence={coherence:.4} \
             compression={compression:.4} score={score:.4}"
        );
        self.history.push(emergence.clone());
        emergence
    }

    /// Score all six operand orderings.
    ///
    /// Returns `(ordering, score)` pairs; distinct scores for a generic
    /// triple demonstrate non-commutativity.
    pub fn validate_non_commutativity(
        &mut self,
        a: &FractalTensor,
        b: &FractalTensor,
        c: &FractalTensor,
    ) -> Vec<(&'static str, f64)> {
        vec![
            ("ABC", self.synthesize(a, b, c).score),
            ("BAC", self.synthesize(b, a, c).score),
            ("ACB", self.synthesize(a, c, b).score),
            ("BCA", self.synthesize(b, c, a).score),
            ("CAB", self.synthesize(c, a, b).score),
            ("CBA", self.synthesize(c, b, a).score),
        ]
    }

    /// Highest-scoring emergence seen so far.
    pub fn best_emergence(&self) -> Option<&Emergence> {
        self.history
            .iter()
            .max_by(|x, y| x.score.total_cmp(&y.score))
    }

    pub fn history(&self) -> &[Emergence] {
        &self.history
    }
}
