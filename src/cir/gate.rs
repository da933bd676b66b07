use std::{cell::Cell, fmt::Display};

use super::{Pin, literal};

/// A gate id.
///
/// The constant gate [`GateKind::Const0`] has id 0. Ids index the gate table of a
/// [`Circuit`](super::Circuit), they are unique and dense over `0..=M+O`.
pub type GateId = usize;

/// The variant of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// The constant low signal, always id 0.
    Const0,
    /// A primary input.
    PrimaryInput,
    /// A primary output, with exactly one fanin (its driver).
    PrimaryOutput,
    /// An AND gate with exactly two fanins.
    And,
    /// A gate referenced as a fanin but never declared.
    Undefined,
}

impl GateKind {
    /// Tag used in listings and diagnostics.
    pub fn type_str(&self) -> &'static str {
        match self {
            GateKind::Const0 => "CONST0",
            GateKind::PrimaryInput => "PI",
            GateKind::PrimaryOutput => "PO",
            GateKind::And => "AIG",
            GateKind::Undefined => "UNDEF",
        }
    }

    /// Number of fanins a gate of this kind carries once the circuit is wired.
    pub fn fanin_count(&self) -> usize {
        match self {
            GateKind::PrimaryOutput => 1,
            GateKind::And => 2,
            _ => 0,
        }
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_str())
    }
}

/// A gate of the circuit.
///
/// Gates carry both their fanins (as [`Pin`]s, with phase) and their fanouts
/// (as plain ids). Fanouts are mirrors of fanins: when gate `A` has a fanin
/// pin on `B`, `B` has `A` in its fanouts.
///
/// Traversals mark gates with the generation of the pass they belong to, so
/// "already visited in this pass" is a single comparison and nothing needs to
/// be reset between passes.
#[derive(Debug, Clone)]
pub struct CirGate {
    id: GateId,
    kind: GateKind,
    /// Parity of the literal that introduced the gate.
    inverted: bool,
    /// 1-based source line, 0 for the constant and undefined gates.
    line: usize,
    symbol: Option<String>,
    fanins: Vec<Pin>,
    fanouts: Vec<GateId>,
    stamp: Cell<u64>,
}

impl PartialEq for CirGate {
    /// Field by field, except the traversal stamp.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.inverted == other.inverted
            && self.line == other.line
            && self.symbol == other.symbol
            && self.fanins == other.fanins
            && self.fanouts == other.fanouts
    }
}

impl Eq for CirGate {}

impl CirGate {
    /// Creates a gate from the literal that declares (or first references) it.
    pub(crate) fn new(kind: GateKind, literal: u64, line: usize) -> Self {
        let (id, inverted) = literal::decode(literal);
        CirGate {
            id,
            kind,
            inverted,
            line,
            symbol: None,
            fanins: Vec::new(),
            fanouts: Vec::new(),
            stamp: Cell::new(0),
        }
    }

    pub(crate) fn const0() -> Self {
        CirGate::new(GateKind::Const0, 0, 0)
    }

    pub fn is_const0(&self) -> bool {
        self.kind == GateKind::Const0
    }

    pub fn is_input(&self) -> bool {
        self.kind == GateKind::PrimaryInput
    }

    pub fn is_output(&self) -> bool {
        self.kind == GateKind::PrimaryOutput
    }

    pub fn is_and(&self) -> bool {
        self.kind == GateKind::And
    }

    pub fn is_undefined(&self) -> bool {
        self.kind == GateKind::Undefined
    }

    pub fn get_id(&self) -> GateId {
        self.id
    }

    pub fn get_kind(&self) -> GateKind {
        self.kind
    }

    pub fn get_line(&self) -> usize {
        self.line
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn get_symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub(crate) fn set_symbol(&mut self, symbol: String) {
        self.symbol = Some(symbol);
    }

    pub fn get_fanins(&self) -> &[Pin] {
        &self.fanins
    }

    /// Fanouts, sorted by increasing id once the circuit is built.
    pub fn get_fanouts(&self) -> &[GateId] {
        &self.fanouts
    }

    pub(crate) fn add_fanin(&mut self, fanin: Pin) {
        self.fanins.push(fanin);
    }

    pub(crate) fn add_fanout(&mut self, fanout: GateId) {
        self.fanouts.push(fanout);
    }

    pub(crate) fn sort_fanouts(&mut self) {
        self.fanouts.sort_unstable();
    }

    /// Phase of the first fanin pin of this gate pointing at `id`, if any.
    ///
    /// This is how the phase of a fanout edge `id -> self` is recovered.
    pub fn fanin_phase_of(&self, id: GateId) -> Option<bool> {
        self.fanins
            .iter()
            .find(|pin| pin.get_gate_id() == id)
            .map(Pin::is_inverted)
    }

    /// True if at least one fanin points at an undefined gate.
    /// `is_undefined` tells whether a given id is undefined.
    pub(crate) fn has_floating_fanin(&self, is_undefined: impl Fn(GateId) -> bool) -> bool {
        self.fanins
            .iter()
            .any(|pin| is_undefined(pin.get_gate_id()))
    }

    pub(crate) fn is_visited(&self, generation: u64) -> bool {
        self.stamp.get() == generation
    }

    pub(crate) fn mark_visited(&self, generation: u64) {
        self.stamp.set(generation);
    }
}
