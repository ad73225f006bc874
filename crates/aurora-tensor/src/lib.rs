// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Fractal Tensor Algebra
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Fractal FFE tensors: octal vectors, the deterministic 3 → 9 → 27
//! hierarchy, the abstraction ladder, and Fibonacci rotation.
//!
//! # Structural Invariants
//!
//! 1. **Level 1 is authoritative**: levels 2 and 3 are pure functions of
//!    level 1 and are regenerated after every mutation. Two tensors with
//!    equal level 1 are equal everywhere.
//!
//! 2. **Validity is explicit**: [`Vector::new`] and [`FractalTensor::new`]
//!    reject out-of-range components; the `raw` constructors exist solely
//!    so unvalidated batch input can reach the harmonizer intact.
//!
//! 3. **Rotation closes the ring**: rotating any tensor, valid or raw,
//!    yields octal components.

pub mod ladder;
pub mod rotation;
pub mod tensor;
pub mod vector;

pub use rotation::{rotation_step, FIBONACCI};
pub use tensor::{FractalTensor, MAX_TENSOR_DISTANCE};
pub use vector::{Vector, MAX_VECTOR_DISTANCE};
