//! Module defining the [`Circuit`] struct, as well as [`CirGate`], [`Pin`] and the ASCII AIGER reader/writer.
//!
//! A circuit is read once from a character stream with [`Circuit::read_circuit`], then
//! queried, traversed and written back with [`Circuit::write_aag`].

mod cone;
pub mod dfs;
pub mod dot;
pub mod error;
pub mod gate;
mod integrity;
mod lexer;
pub mod literal;
pub mod options;
mod parser;
pub mod pin;
mod report;
mod writer;

use std::cell::Cell;

pub use error::{CirError, ParseError, Result};
pub use gate::{CirGate, GateId, GateKind};
pub use options::{DriverCheck, ParseOptions};
pub use parser::Header;
pub use pin::Pin;

/// A whole combinational circuit.
///
/// The circuit owns every gate in a table indexed by gate id, covering the
/// `M + 1` variables and the `O` outputs (outputs get ids `M+1..=M+O`). Slots of
/// ids that are never declared nor referenced stay empty. The table grows up to
/// the highest populated id, and a table that cannot be allocated is reported as
/// [`CirError::TableTooLarge`].
///
/// Besides the table, the circuit keeps the declaration order of inputs, outputs
/// and AND gates, the trailing comment lines and the canonical DFS order
/// (see [`dfs`]). All of them are fixed once parsing succeeded.
///
/// Traversals use a pass counter: each pass takes a new generation and marks the
/// gates it reaches with it. Only one traversal may be in flight at a time, which
/// the `Cell`s make explicit (a circuit is not `Sync`).
#[derive(Debug)]
pub struct Circuit {
    header: Header,
    table_size: usize,
    gates: Vec<Option<CirGate>>,
    inputs: Vec<GateId>,
    outputs: Vec<GateId>,
    ands: Vec<GateId>,
    comments: Vec<String>,
    dfs_list: Vec<GateId>,
    generation: Cell<u64>,
}

impl Circuit {
    /// Creates an empty gate table for the given header, constant gate included.
    pub(crate) fn with_header(header: Header) -> Self {
        Circuit {
            header,
            table_size: usize::try_from(header.m.saturating_add(header.o).saturating_add(1))
                .unwrap_or(usize::MAX),
            gates: vec![Some(CirGate::const0())],
            inputs: Vec::new(),
            outputs: Vec::new(),
            ands: Vec::new(),
            comments: Vec::new(),
            dfs_list: Vec::new(),
            generation: Cell::new(0),
        }
    }

    /// Retrieves a gate from its id.
    ///
    /// Returns [`None`] for ids outside the table and for ids that were neither
    /// declared nor referenced. A gate referenced but never declared is returned,
    /// as a [`GateKind::Undefined`] gate.
    pub fn get_gate(&self, id: GateId) -> Option<&CirGate> {
        self.gates.get(id)?.as_ref()
    }

    /// Same as [`Circuit::get_gate`], with a proper error.
    pub(crate) fn gate(&self, id: GateId) -> Result<&CirGate> {
        self.get_gate(id).ok_or(CirError::GateNotFound(id))
    }

    pub(crate) fn gate_mut(&mut self, id: GateId) -> Result<&mut CirGate> {
        self.gates
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(CirError::GateNotFound(id))
    }

    /// The header as it was read.
    pub fn get_header(&self) -> Header {
        self.header
    }

    /// Number of ids of the circuit, `M + O + 1`.
    pub fn get_table_size(&self) -> usize {
        self.table_size
    }

    /// Ids of the primary inputs, in declaration order.
    pub fn get_inputs(&self) -> &[GateId] {
        &self.inputs
    }

    /// Ids of the primary outputs, in declaration order.
    pub fn get_outputs(&self) -> &[GateId] {
        &self.outputs
    }

    /// Ids of the AND gates, in declaration order.
    pub fn get_ands(&self) -> &[GateId] {
        &self.ands
    }

    /// Comment lines, the leading `c` line included.
    pub fn get_comments(&self) -> &[String] {
        &self.comments
    }

    /// Canonical DFS order of the gates reachable from the outputs.
    pub fn get_dfs_list(&self) -> &[GateId] {
        &self.dfs_list
    }

    /// Iterates over every populated gate by increasing id.
    pub fn gates(&self) -> impl Iterator<Item = &CirGate> {
        self.gates.iter().flatten()
    }

    /// Whether gate `id` is referenced but never declared.
    pub fn is_undefined(&self, id: GateId) -> bool {
        self.get_gate(id).is_some_and(CirGate::is_undefined)
    }

    /// Starts a new traversal pass and returns its generation.
    pub(crate) fn next_generation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    /// Slot of gate `id`, growing the table if needed.
    fn slot_mut(&mut self, id: GateId) -> Result<&mut Option<CirGate>> {
        if id >= self.table_size {
            return Err(CirError::InvalidState(format!(
                "gate id={} is out of the table (size {})",
                id, self.table_size
            )));
        }
        if id >= self.gates.len() {
            self.gates
                .try_reserve(id + 1 - self.gates.len())
                .map_err(|source| CirError::TableTooLarge { id, source })?;
            self.gates.resize(id + 1, None);
        }
        Ok(&mut self.gates[id])
    }

    /// Registers a declared gate, recording it in the list matching its kind.
    pub(crate) fn insert_gate(&mut self, gate: CirGate) -> Result<()> {
        let id = gate.get_id();
        let kind = gate.get_kind();
        let slot = self.slot_mut(id)?;
        if slot.is_some() {
            return Err(CirError::InvalidState(format!(
                "gate id={} is already populated",
                id
            )));
        }
        tracing::trace!(id, %kind, line = gate.get_line(), "new gate");
        *slot = Some(gate);
        match kind {
            GateKind::PrimaryInput => self.inputs.push(id),
            GateKind::PrimaryOutput => self.outputs.push(id),
            GateKind::And => self.ands.push(id),
            _ => (),
        }
        Ok(())
    }

    /// Wires `literal` as the next fanin of gate `consumer`.
    ///
    /// The referenced gate is created as [`GateKind::Undefined`] if nothing was
    /// declared under its id. The fanout entry is mirrored on the referenced gate.
    pub(crate) fn connect(&mut self, consumer: GateId, literal: u64) -> Result<()> {
        let pin = Pin::from(literal);
        let source = pin.get_gate_id();
        let slot = self.slot_mut(source)?;
        if slot.is_none() {
            *slot = Some(CirGate::new(GateKind::Undefined, literal, 0));
            tracing::trace!(id = source, "new undefined gate");
        }
        self.gate_mut(consumer)?.add_fanin(pin);
        self.gate_mut(source)?.add_fanout(consumer);
        tracing::trace!(consumer, literal, "wired fanin");
        Ok(())
    }

    /// Sorts every fanout list by increasing id.
    pub(crate) fn sort_fanouts(&mut self) {
        for gate in self.gates.iter_mut().flatten() {
            gate.sort_fanouts();
        }
    }

    pub(crate) fn set_symbol(&mut self, id: GateId, symbol: String) -> Result<()> {
        self.gate_mut(id)?.set_symbol(symbol);
        Ok(())
    }

    pub(crate) fn push_comment(&mut self, comment: String) {
        self.comments.push(comment);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn header(m: u64, i: u64, o: u64, a: u64) -> Header {
        Header { m, i, l: 0, o, a }
    }

    #[test]
    fn with_header_test() {
        let cir = Circuit::with_header(header(3, 2, 1, 0));
        assert_eq!(cir.get_table_size(), 5);
        assert!(cir.get_gate(0).unwrap().is_const0());
        assert!(cir.get_gate(1).is_none());
        assert!(cir.get_gate(5).is_none());
        assert!(matches!(cir.gate(7), Err(CirError::GateNotFound(7))));
    }

    #[test]
    fn insert_gate_test() {
        let mut cir = Circuit::with_header(header(3, 1, 1, 1));
        cir.insert_gate(CirGate::new(GateKind::PrimaryInput, 2, 2))
            .unwrap();
        cir.insert_gate(CirGate::new(GateKind::PrimaryOutput, 8, 3))
            .unwrap();
        cir.insert_gate(CirGate::new(GateKind::And, 6, 4)).unwrap();
        assert_eq!(cir.get_inputs(), &[1]);
        assert_eq!(cir.get_outputs(), &[4]);
        assert_eq!(cir.get_ands(), &[3]);

        // Slots can only be filled once, and only inside the table.
        assert!(
            cir.insert_gate(CirGate::new(GateKind::And, 2, 5))
                .is_err()
        );
        assert!(
            cir.insert_gate(CirGate::new(GateKind::And, 20, 5))
                .is_err()
        );
    }

    #[test]
    fn connect_test() {
        let mut cir = Circuit::with_header(header(3, 1, 1, 1));
        cir.insert_gate(CirGate::new(GateKind::PrimaryInput, 2, 2))
            .unwrap();
        cir.insert_gate(CirGate::new(GateKind::PrimaryOutput, 8, 3))
            .unwrap();
        cir.insert_gate(CirGate::new(GateKind::And, 6, 4)).unwrap();

        cir.connect(4, 7).unwrap();
        cir.connect(3, 3).unwrap();
        cir.connect(3, 5).unwrap();

        let and = cir.get_gate(3).unwrap();
        assert_eq!(and.get_fanins(), &[Pin::new(1, true), Pin::new(2, true)]);
        assert_eq!(and.get_fanouts(), &[4]);
        assert_eq!(cir.get_gate(1).unwrap().get_fanouts(), &[3]);

        // Id 2 was never declared.
        assert!(cir.is_undefined(2));
        assert!(cir.get_gate(2).unwrap().is_inverted());
        assert!(!cir.is_undefined(1));
    }

    #[test]
    fn table_too_large_test() {
        let mut cir = Circuit::with_header(header(u64::MAX / 4, 0, 1, 0));
        let id = cir.get_table_size() - 1;
        let output = CirGate::new(GateKind::PrimaryOutput, literal::encode(id, false), 3);
        assert!(matches!(
            cir.insert_gate(output),
            Err(CirError::TableTooLarge { .. })
        ));
        assert!(cir.get_outputs().is_empty());
    }

    #[test]
    fn generation_test() {
        let cir = Circuit::with_header(header(0, 0, 0, 0));
        let g1 = cir.next_generation();
        let g2 = cir.next_generation();
        assert!(g2 > g1);
    }
}
