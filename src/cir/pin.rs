//! A [`Pin`] is a fanin edge: it points at a gate of the circuit and may be inverted.
//!
//! Pins only exist on the fanin side. The mirrored fanout entry is a bare [`GateId`],
//! the phase of a fanout edge is found in the fanin list of the consumer
//! (see [`CirGate::fanin_phase_of`](super::CirGate::fanin_phase_of)).

use std::ops::Not;

use super::{GateId, literal};

/// A directed, possibly inverted, reference to a gate of the circuit.
///
/// The referenced gate is identified by its id, which indexes the gate table owned
/// by the [`Circuit`](super::Circuit).
///
/// ```rust
/// use ciraig::Pin;
/// let pin = Pin::new(3, false);
/// assert_eq!(!pin, Pin::new(3, true));
/// assert_eq!(pin.get_literal(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin {
    gate: GateId,
    inverted: bool,
}

impl Not for Pin {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.inverted = !self.inverted;
        self
    }
}

impl From<u64> for Pin {
    fn from(literal: u64) -> Self {
        let (gate, inverted) = literal::decode(literal);
        Pin { gate, inverted }
    }
}

impl From<&Pin> for (GateId, bool) {
    fn from(pin: &Pin) -> Self {
        (pin.gate, pin.inverted)
    }
}

impl Pin {
    pub fn new(gate: GateId, inverted: bool) -> Self {
        Pin { gate, inverted }
    }

    pub fn get_gate_id(&self) -> GateId {
        self.gate
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// The literal this pin would be written as.
    pub fn get_literal(&self) -> u64 {
        literal::encode(self.gate, self.inverted)
    }
}
