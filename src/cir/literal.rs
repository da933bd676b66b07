//! Literals are signed gate references: `literal = 2 * id + inverted`.
//!
//! Literals `0` and `1` both refer to the constant gate (id 0), respectively
//! uninverted and inverted.

use super::GateId;

/// Splits a literal into the gate id it refers to and its inversion flag.
///
/// ```rust
/// use ciraig::literal::decode;
/// assert_eq!(decode(6), (3, false));
/// assert_eq!(decode(7), (3, true));
/// assert_eq!(decode(1), (0, true));
/// ```
pub fn decode(literal: u64) -> (GateId, bool) {
    ((literal >> 1) as GateId, literal & 1 == 1)
}

/// Builds the literal referring to gate `id`, inverted if `inverted` is set.
pub fn encode(id: GateId, inverted: bool) -> u64 {
    ((id as u64) << 1) | inverted as u64
}

/// Largest literal allowed for a circuit declaring `m` variables.
pub(crate) fn max_literal(m: u64) -> u64 {
    m.saturating_mul(2).saturating_add(1)
}
