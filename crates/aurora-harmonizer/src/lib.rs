// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Harmonizer
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! The absolute-coherence layer: detects the five incoherence families,
//! autocorrects them through recursive Fibonacci rotation, and learns
//! from every correction by discounting the confidence of the
//! archetypes and relators involved.
//!
//! [`Harmonizer`] runs the full cycle sequentially. For large batches,
//! [`ParallelHarmonizer`] fans corrections out to worker threads that
//! share the evolver behind a mutex and a rotation cache.

pub mod correct;
pub mod detect;
pub mod parallel;

pub use correct::{Correction, ErrorLearning, Harmonizer, HarmonyReport};
pub use detect::{CorrespondenceRegistry, Incoherence, IncoherenceKind};
pub use parallel::{CacheStats, ParallelHarmonizer, RotationCache};
