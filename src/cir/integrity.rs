use std::collections::BTreeMap;

use crate::cir::{CirError, CirGate, Circuit, GateId, GateKind, Result};

impl Circuit {
    /// Checking that the gate table is consistent.
    /// The parser builds circuits that always pass this check, it runs once
    /// at the end of parsing to catch wiring mistakes early.
    pub(crate) fn check_integrity(&self) -> Result<()> {
        match self.get_gate(0) {
            Some(gate) if gate.is_const0() => (),
            _ => {
                return Err(CirError::InvalidState(
                    "gate 0 is not the constant".to_string(),
                ));
            }
        }

        // (fanin, consumer) -> fanin pins minus fanout entries.
        let mut edges = BTreeMap::new();
        for (id, slot) in self.gates.iter().enumerate() {
            if let Some(gate) = slot {
                if gate.get_id() != id {
                    return Err(CirError::InvalidState(format!(
                        "gate id={} stored in slot {}",
                        gate.get_id(),
                        id
                    )));
                }
                self.check_gate_integrity(gate, &mut edges)?;
            }
        }
        if let Some((&(fanin, consumer), &balance)) = edges.iter().find(|&(_, &b)| b != 0) {
            return Err(CirError::InvalidState(format!(
                "gate id={} reads gate {} {:+} time(s) off from its fanout entries",
                consumer, fanin, balance
            )));
        }

        self.check_list(&self.inputs, GateKind::PrimaryInput)?;
        self.check_list(&self.outputs, GateKind::PrimaryOutput)?;
        self.check_list(&self.ands, GateKind::And)?;

        // Outputs are numbered right after the variables.
        let first = self.header.m as usize + 1;
        for (k, &id) in self.outputs.iter().enumerate() {
            if id != first + k {
                return Err(CirError::InvalidState(format!(
                    "output #{} has id={}, expected {}",
                    k,
                    id,
                    first + k
                )));
            }
        }

        Ok(())
    }

    fn check_list(&self, ids: &[GateId], kind: GateKind) -> Result<()> {
        for &id in ids {
            let gate = self.gate(id)?;
            if gate.get_kind() != kind {
                return Err(CirError::InvalidState(format!(
                    "gate id={} is listed as {} but is {}",
                    id,
                    kind,
                    gate.get_kind()
                )));
            }
        }
        Ok(())
    }

    /// Check the integrity of an individual gate, that is:
    /// - it has as many fanins as its kind requires
    /// - fanins and fanouts point to existing gates
    /// - fanouts are sorted
    ///
    /// Each edge is also counted in `edges`, +1 from the consumer side and -1
    /// from the fanin side, for the caller to check the mirroring.
    fn check_gate_integrity(
        &self,
        gate: &CirGate,
        edges: &mut BTreeMap<(GateId, GateId), i64>,
    ) -> Result<()> {
        let id = gate.get_id();
        let expected = gate.get_kind().fanin_count();
        if gate.get_fanins().len() != expected {
            return Err(CirError::InvalidState(format!(
                "{} gate id={} has {} fanin(s), expected {}",
                gate.get_kind(),
                id,
                gate.get_fanins().len(),
                expected
            )));
        }

        for pin in gate.get_fanins() {
            let fanin = self.get_gate(pin.get_gate_id()).ok_or_else(|| {
                CirError::InvalidState(format!(
                    "gate id={} has a fanin on missing gate {}",
                    id,
                    pin.get_gate_id()
                ))
            })?;
            *edges.entry((fanin.get_id(), id)).or_default() += 1;
        }

        for &fanout in gate.get_fanouts() {
            let consumer = self.get_gate(fanout).ok_or_else(|| {
                CirError::InvalidState(format!(
                    "gate id={} has a fanout on missing gate {}",
                    id, fanout
                ))
            })?;
            if consumer.fanin_phase_of(id).is_none() {
                return Err(CirError::InvalidState(format!(
                    "gate id={} lists {} as fanout, which does not read it",
                    id, fanout
                )));
            }
            *edges.entry((id, fanout)).or_default() -= 1;
        }

        if !gate.get_fanouts().is_sorted() {
            return Err(CirError::InvalidState(format!(
                "fanouts of gate id={} are not sorted",
                id
            )));
        }

        Ok(())
    }
}
