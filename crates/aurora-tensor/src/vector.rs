// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — FFE Vector
// Mirrors: Infrastructure/IE/tensor_ffe.py (VectorFFE)
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use aurora_types::{AuroraError, AuroraResult};

/// Octal mask for one FFE dimension.
pub const OCTAL_MASK: u8 = 0b111;

/// Maximum Manhattan distance between two valid vectors (3 * 7).
pub const MAX_VECTOR_DISTANCE: u32 = 21;

/// One FFE vector: three semantic dimensions in the octal range [0, 7].
///
/// `forma` is the morphological aspect, `funcion` the operative purpose,
/// `estructura` the organizational pattern. The type deliberately admits
/// out-of-range components through [`Vector::raw`]: unvalidated batch
/// entries must be representable so the harmonizer can detect and repair
/// them. Everything constructed through [`Vector::new`] is valid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Vector {
    pub forma: u8,
    pub funcion: u8,
    pub estructura: u8,
}

impl Vector {
    /// Validated constructor: every component must be in [0, 7].
    pub fn new(forma: u8, funcion: u8, estructura: u8) -> AuroraResult<Self> {
        for (name, value) in [
            ("forma", forma),
            ("funcion", funcion),
            ("estructura", estructura),
        ] {
            if value > 7 {
                return Err(AuroraError::OutOfRange {
                    name,
                    value: value as i64,
                });
            }
        }
        Ok(Self {
            forma,
            funcion,
            estructura,
        })
    }

    /// Unvalidated constructor for raw batch entry.
    ///
    /// Out-of-range components survive until the harmonizer's null
    /// detector flags them; rotation folds them back into the octal ring.
    pub fn raw(forma: u8, funcion: u8, estructura: u8) -> Self {
        Self {
            forma,
            funcion,
            estructura,
        }
    }

    /// True when every component is in the octal range.
    pub fn is_valid(&self) -> bool {
        self.forma <= 7 && self.funcion <= 7 && self.estructura <= 7
    }

    /// Pack into 9 bits: `forma << 6 | funcion << 3 | estructura`.
    pub fn to_bits(&self) -> u16 {
        (((self.forma & OCTAL_MASK) as u16) << 6)
            | (((self.funcion & OCTAL_MASK) as u16) << 3)
            | ((self.estructura & OCTAL_MASK) as u16)
    }

    /// Unpack from 9 bits.
    pub fn from_bits(bits: u16) -> Self {
        Self {
            forma: ((bits >> 6) as u8) & OCTAL_MASK,
            funcion: ((bits >> 3) as u8) & OCTAL_MASK,
            estructura: (bits as u8) & OCTAL_MASK,
        }
    }

    /// Manhattan distance in octal space, in [0, 21] for valid vectors.
    pub fn distance(&self, other: &Vector) -> u32 {
        let d = |a: u8, b: u8| (a as i32 - b as i32).unsigned_abs();
        d(self.forma, other.forma)
            + d(self.funcion, other.funcion)
            + d(self.estructura, other.estructura)
    }

    /// Rotate every component by `step` on the octal ring.
    pub fn rotated(&self, step: u8) -> Self {
        Self {
            forma: (self.forma.wrapping_add(step)) % 8,
            funcion: (self.funcion.wrapping_add(step)) % 8,
            estructura: (self.estructura.wrapping_add(step)) % 8,
        }
    }

    pub fn components(&self) -> [u8; 3] {
        [self.forma, self.funcion, self.estructura]
    }
}

impl std::fmt::Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FFE({},{},{})", self.forma, self.funcion, self.estructura)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Vector::new(8, 0, 0).is_err());
        assert!(Vector::new(0, 9, 0).is_err());
        assert!(Vector::new(7, 7, 7).is_ok());
    }

    #[test]
    fn test_raw_admits_out_of_range() {
        let v = Vector::raw(9, 0, 0);
        assert!(!v.is_valid());
    }

    #[test]
    fn test_bits_roundtrip() {
        let v = Vector::new(5, 3, 6).unwrap();
        assert_eq!(v.to_bits(), (5 << 6) | (3 << 3) | 6);
        assert_eq!(Vector::from_bits(v.to_bits()), v);
    }

    #[test]
    fn test_distance_manhattan() {
        let a = Vector::new(0, 0, 0).unwrap();
        let b = Vector::new(7, 7, 7).unwrap();
        assert_eq!(a.distance(&b), MAX_VECTOR_DISTANCE);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_rotation_wraps_octal() {
        let v = Vector::new(6, 7, 0).unwrap();
        let r = v.rotated(3);
        assert_eq!(r.components(), [1, 2, 3]);
    }

    #[test]
    fn test_rotation_folds_raw_into_range() {
        let v = Vector::raw(9, 0, 0);
        let r = v.rotated(2);
        assert!(r.is_valid());
        assert_eq!(r.components(), [3, 2, 2]);
    }
}
