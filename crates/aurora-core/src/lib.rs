// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Core Reasoning Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Emergent synthesis and pattern learning over fractal FFE tensors.
//!
//! The engine is built from four collaborators:
//!
//! * [`Transcender`] synthesizes three tensors into an emergence
//!   (structure, form, function) and measures its quality.
//! * [`ArchetypeLearner`], [`DynamicsLearner`] and [`RelatorNetwork`]
//!   extract the three kinds of pattern: universal archetypes,
//!   temporal dynamics and structural relations.
//! * [`Evolver`] coordinates them over one shared Fibonacci step
//!   index, so successive operations explore different rotations.
//! * [`Extender`] runs the inverse road, unfolding abstract tensors
//!   back toward concrete words guided by breadcrumbs.
//!
//! # Invariants
//!
//! 1. **Synthesis is non-commutative**: the six orderings of a triple
//!    produce distinct emergences; `validate_non_commutativity` proves
//!    it per triple.
//! 2. **One step index per evolver**: every rotation-consuming
//!    operation advances it exactly once, absorb and connect alike.
//! 3. **Identifiers are dense**: `ARQ_`, `DYN_` and `REL_` ids are
//!    minted from per-population counters and never reused.

pub mod archetype;
pub mod dynamics;
pub mod evolver;
pub mod extender;
pub mod relator;
pub mod transcender;

pub use archetype::{Archetype, ArchetypeLearner};
pub use dynamics::{Dynamics, DynamicsLearner};
pub use evolver::{Evolver, EvolverStats, LearnReport};
pub use extender::{Breadcrumb, Extender, UnfoldResult};
pub use relator::{Relator, RelatorKind, RelatorNetwork};
pub use transcender::{Emergence, Transcender};
