// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Shared Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Configuration, error hierarchy, and score helpers shared by every
//! Aurora engine crate.

pub mod config;
pub mod error;
pub mod norm;

pub use config::AuroraConfig;
pub use error::{AuroraError, AuroraResult};
pub use norm::clamp_unit;
