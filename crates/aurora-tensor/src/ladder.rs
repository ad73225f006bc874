// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Abstraction Ladder
// Mirrors: Infrastructure/IE/tensor_ffe.py (TransformadorFFE)
// ─────────────────────────────────────────────────────────────────────
//! The 8-step abstraction continuum, Phonetic (0) through Theoretic (7).
//!
//! Climbing the ladder prunes the dimension tags of the level left
//! behind and activates the tags of the level entered; descending only
//! re-activates the concrete tags. Level-1 geometry is untouched either
//! way, so a round trip restores the original tag set exactly.

use aurora_types::{AuroraError, AuroraResult};

use crate::tensor::FractalTensor;

/// Names of the 8 abstraction levels.
pub const LEVEL_NAMES: [&str; 8] = [
    "Phonetic",
    "Syllabic",
    "Morphemic",
    "Lexical",
    "Syntactic",
    "Semantic",
    "Discursive",
    "Theoretic",
];

/// Dimension tags relevant at each abstraction level.
pub const LEVEL_DIMENSIONS: [&[&str]; 8] = [
    &["frequency", "amplitude", "phase", "timbre"],
    &["syllable_structure", "stress", "rhythmic_pattern"],
    &["root", "affixes", "base_meaning", "category"],
    &["full_meaning", "grammatical_category", "lexical_context"],
    &["clause_function", "syntactic_relations", "phrase_structure"],
    &["contextual_meaning", "conceptual_relations", "pragmatics"],
    &["argument_structure", "textual_coherence", "style"],
    &["theoretical_frames", "abstract_principles", "universal_laws"],
];

/// Human-readable name of an abstraction level.
pub fn level_name(level: u8) -> &'static str {
    LEVEL_NAMES[(level as usize).min(7)]
}

/// One step up the continuum. At level 7 the tensor is returned as is.
pub fn abstracting(tensor: &FractalTensor) -> FractalTensor {
    if tensor.level >= 7 {
        return tensor.clone();
    }
    let mut up = tensor.clone();
    let old = tensor.level as usize;
    up.level = tensor.level + 1;
    for dim in LEVEL_DIMENSIONS[old] {
        up.active_dimensions.remove(*dim);
    }
    for dim in LEVEL_DIMENSIONS[old + 1] {
        up.active_dimensions.insert((*dim).to_string());
    }
    up
}

/// One step down the continuum. At level 0 the tensor is returned as is.
pub fn extending(tensor: &FractalTensor) -> FractalTensor {
    if tensor.level == 0 {
        return tensor.clone();
    }
    let mut down = tensor.clone();
    let old = tensor.level as usize;
    down.level = tensor.level - 1;
    for dim in LEVEL_DIMENSIONS[old] {
        down.active_dimensions.remove(*dim);
    }
    for dim in LEVEL_DIMENSIONS[old - 1] {
        down.active_dimensions.insert((*dim).to_string());
    }
    down
}

/// Walk the continuum to an arbitrary target level.
pub fn transform_to(tensor: &FractalTensor, target: u8) -> AuroraResult<FractalTensor> {
    if target > 7 {
        return Err(AuroraError::AbstractionLevel(target as i64));
    }
    let mut current = tensor.clone();
    while current.level < target {
        current = abstracting(&current);
    }
    while current.level > target {
        current = extending(&current);
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    fn lexical_tensor() -> FractalTensor {
        let v = Vector::new(1, 2, 3).unwrap();
        FractalTensor::new([v, v, v], 3).unwrap()
    }

    #[test]
    fn test_level_names() {
        assert_eq!(level_name(0), "Phonetic");
        assert_eq!(level_name(3), "Lexical");
        assert_eq!(level_name(7), "Theoretic");
    }

    #[test]
    fn test_abstracting_swaps_dimension_tags() {
        let t = lexical_tensor();
        let up = abstracting(&t);
        assert_eq!(up.level, 4);
        assert!(up.active_dimensions.contains("clause_function"));
        assert!(!up.active_dimensions.contains("full_meaning"));
    }

    #[test]
    fn test_abstracting_saturates_at_theoretic() {
        let t = transform_to(&lexical_tensor(), 7).unwrap();
        let up = abstracting(&t);
        assert_eq!(up.level, 7);
    }

    #[test]
    fn test_extending_saturates_at_phonetic() {
        let t = transform_to(&lexical_tensor(), 0).unwrap();
        let down = extending(&t);
        assert_eq!(down.level, 0);
    }

    #[test]
    fn test_roundtrip_restores_tags() {
        let t = lexical_tensor();
        let back = extending(&abstracting(&t));
        assert_eq!(back.level, 3);
        assert_eq!(back.active_dimensions, t.active_dimensions);
        assert_eq!(back.level1(), t.level1());
    }

    #[test]
    fn test_transform_to_rejects_bad_level() {
        assert!(transform_to(&lexical_tensor(), 8).is_err());
    }
}
