// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Fractal Tensor
// Mirrors: Infrastructure/IE/tensor_ffe.py (TensorFFE)
// ─────────────────────────────────────────────────────────────────────
//! The 3 → 9 → 27 fractal hierarchy.
//!
//! Level 1 is authoritative: levels 2 and 3 are pure functions of it and
//! are regenerated after every level-1 mutation. The essential wire form
//! therefore carries only the 27 bits of level 1.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use aurora_types::{clamp_unit, AuroraError, AuroraResult};

use crate::ladder::LEVEL_DIMENSIONS;
use crate::vector::{Vector, OCTAL_MASK};

/// Maximum level-1 Manhattan distance between two tensors (3 * 21).
pub const MAX_TENSOR_DISTANCE: u32 = 63;

/// Fractal FFE tensor with deterministic 3/9/27 hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractalTensor {
    level1: [Vector; 3],
    level2: [Vector; 9],
    level3: [Vector; 27],
    /// Position on the abstraction continuum, 0 (Phonetic) to 7 (Theoretic).
    pub level: u8,
    /// Dimension tags active at the current abstraction level.
    pub active_dimensions: BTreeSet<String>,
}

fn xor(a: &Vector, b: &Vector) -> Vector {
    Vector::raw(
        (a.forma ^ b.forma) & OCTAL_MASK,
        (a.funcion ^ b.funcion) & OCTAL_MASK,
        (a.estructura ^ b.estructura) & OCTAL_MASK,
    )
}

fn seed_dimensions(level: u8) -> BTreeSet<String> {
    LEVEL_DIMENSIONS[(level as usize).min(7)]
        .iter()
        .map(|d| (*d).to_string())
        .collect()
}

impl FractalTensor {
    /// Validated constructor. Every vector must be octal and the
    /// abstraction level inside the continuum.
    pub fn new(level1: [Vector; 3], level: u8) -> AuroraResult<Self> {
        if level > 7 {
            return Err(AuroraError::AbstractionLevel(level as i64));
        }
        for v in &level1 {
            if !v.is_valid() {
                return Err(AuroraError::OutOfRange {
                    name: "level1",
                    value: v.components().iter().copied().max().unwrap_or(0) as i64,
                });
            }
        }
        Ok(Self::from_raw_level1(level1, level))
    }

    /// Unvalidated constructor for raw batch entry.
    ///
    /// Out-of-range components are preserved at level 1 so the
    /// harmonizer can see them; the derived levels are still generated.
    pub fn from_raw_level1(level1: [Vector; 3], level: u8) -> Self {
        let mut tensor = Self {
            level1,
            level2: [Vector::default(); 9],
            level3: [Vector::default(); 27],
            level: level.min(7),
            active_dimensions: seed_dimensions(level),
        };
        tensor.regenerate();
        tensor
    }

    /// The all-zero tensor at abstraction level 0.
    pub fn zero() -> Self {
        Self::from_raw_level1([Vector::default(); 3], 0)
    }

    /// Tensor with the same vector in all three level-1 slots.
    pub fn uniform(forma: u8, funcion: u8, estructura: u8, level: u8) -> AuroraResult<Self> {
        let v = Vector::new(forma, funcion, estructura)?;
        Self::new([v, v, v], level)
    }

    pub fn level1(&self) -> &[Vector; 3] {
        &self.level1
    }

    pub fn level2(&self) -> &[Vector; 9] {
        &self.level2
    }

    pub fn level3(&self) -> &[Vector; 27] {
        &self.level3
    }

    /// Replace level 1 and regenerate the derived hierarchy.
    pub fn set_level1(&mut self, level1: [Vector; 3]) {
        self.level1 = level1;
        self.regenerate();
    }

    /// Recompute levels 2 and 3 from level 1.
    ///
    /// Level 2: ternary XOR fan-out of the three parents, plus three
    /// cross-braided slots. Level 3: each (parent, child) pair spawns an
    /// XOR child, a component-shifted child, and a mixed-arithmetic
    /// child. Mirrors `generar_nivel_2` / `generar_nivel_3`.
    pub fn regenerate(&mut self) {
        let [a, b, c] = &self.level1;

        self.level2[0] = xor(a, b);
        self.level2[1] = xor(a, c);
        self.level2[2] = xor(b, c);
        self.level2[3] = xor(b, a);
        self.level2[4] = xor(b, c);
        self.level2[5] = xor(c, a);
        self.level2[6] = Vector::raw(
            (a.forma ^ b.forma) & OCTAL_MASK,
            (b.funcion ^ c.funcion) & OCTAL_MASK,
            (c.estructura ^ a.estructura) & OCTAL_MASK,
        );
        self.level2[7] = Vector::raw(
            (b.forma ^ c.forma) & OCTAL_MASK,
            (c.funcion ^ a.funcion) & OCTAL_MASK,
            (a.estructura ^ b.estructura) & OCTAL_MASK,
        );
        self.level2[8] = Vector::raw(
            (c.forma ^ a.forma) & OCTAL_MASK,
            (a.funcion ^ b.funcion) & OCTAL_MASK,
            (b.estructura ^ c.estructura) & OCTAL_MASK,
        );

        for i in 0..3 {
            for j in 0..3 {
                let k = i * 3 + j;
                let n1 = self.level1[i];
                let n2 = self.level2[k];
                let base = 3 * k;
                self.level3[base] = xor(&n1, &n2);
                self.level3[base + 1] = Vector::raw(
                    (n2.forma ^ n1.funcion) & OCTAL_MASK,
                    (n2.funcion ^ n1.estructura) & OCTAL_MASK,
                    (n2.estructura ^ n1.forma) & OCTAL_MASK,
                );
                self.level3[base + 2] = Vector::raw(
                    ((n1.forma as u16 + n2.forma as u16) % 8) as u8,
                    ((n1.funcion ^ n2.funcion) ^ OCTAL_MASK) & OCTAL_MASK,
                    ((n1.estructura as u16 * 3) % 8) as u8,
                );
            }
        }
    }

    /// Hierarchical self-consistency in [0, 1].
    ///
    /// Mean cyclic neighbor distance at each level, averaged and mapped
    /// so identical rings score 1.0.
    pub fn coherence(&self) -> f64 {
        fn ring_mean(vectors: &[Vector]) -> f64 {
            let n = vectors.len();
            let total: u32 = (0..n)
                .map(|i| vectors[i].distance(&vectors[(i + 1) % n]))
                .sum();
            total as f64 / n as f64
        }
        let d1 = ring_mean(&self.level1);
        let d2 = ring_mean(&self.level2);
        let d3 = ring_mean(&self.level3);
        clamp_unit(1.0 - (d1 + d2 + d3) / (3.0 * 21.0))
    }

    /// Octal rotation of level 1 by `step`, hierarchy regenerated.
    /// Abstraction level and dimension tags carry over.
    pub fn rotated(&self, step: u8) -> Self {
        let mut out = self.clone();
        for v in &mut out.level1 {
            *v = v.rotated(step);
        }
        out.regenerate();
        out
    }

    /// Level-1 Manhattan distance to another tensor, in [0, 63].
    pub fn level1_distance(&self, other: &FractalTensor) -> u32 {
        self.level1
            .iter()
            .zip(other.level1.iter())
            .map(|(a, b)| a.distance(b))
            .sum()
    }

    /// Level-1 similarity `1 - d/63`, in [0, 1].
    pub fn similarity(&self, other: &FractalTensor) -> f64 {
        clamp_unit(1.0 - self.level1_distance(other) as f64 / MAX_TENSOR_DISTANCE as f64)
    }

    /// True when every level-1 vector is octal.
    pub fn is_valid(&self) -> bool {
        self.level1.iter().all(Vector::is_valid)
    }

    /// Essential wire form: the 27 bits of level 1 packed into a `u32`,
    /// slot 0 in the highest bits.
    pub fn to_essential_bits(&self) -> u32 {
        ((self.level1[0].to_bits() as u32) << 18)
            | ((self.level1[1].to_bits() as u32) << 9)
            | (self.level1[2].to_bits() as u32)
    }

    /// Rebuild from the essential 27 bits; the hierarchy is regenerated.
    pub fn from_essential_bits(bits: u32, level: u8) -> AuroraResult<Self> {
        if bits >> 27 != 0 {
            return Err(AuroraError::Serialization(format!(
                "essential form must fit in 27 bits, got {bits:#x}"
            )));
        }
        let level1 = [
            Vector::from_bits(((bits >> 18) & 0x1FF) as u16),
            Vector::from_bits(((bits >> 9) & 0x1FF) as u16),
            Vector::from_bits((bits & 0x1FF) as u16),
        ];
        Self::new(level1, level)
    }
}

impl std::fmt::Display for FractalTensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tensor[L{}]({}, {}, {})",
            self.level, self.level1[0], self.level1[1], self.level1[2]
        )
    }
}
