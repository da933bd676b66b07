//! Human readable reports on a parsed circuit.
//!
//! Every report is returned as a `String`, the caller decides where it goes.

use crate::cir::{CirGate, Circuit, GateId, GateKind, Result};

const BOX_WIDTH: usize = 50;

fn id_list(ids: &[GateId]) -> String {
    ids.iter().map(|id| format!(" {}", id)).collect()
}

impl Circuit {
    /// Counts of inputs, outputs and AND gates.
    ///
    /// ```rust
    /// use ciraig::Circuit;
    /// let cir = Circuit::read_circuit("aag 3 2 0 1 1\n2\n4\n6\n6 2 5\n".as_bytes()).unwrap();
    /// assert!(cir.report_summary().contains("  AIG          1\n"));
    /// ```
    pub fn report_summary(&self) -> String {
        let (i, o, a) = (self.inputs.len(), self.outputs.len(), self.ands.len());
        let mut out = String::from("\nCircuit Statistics\n==================\n");
        for (tag, count) in [("PI", i), ("PO", o), ("AIG", a)] {
            out.push_str(&format!("  {:<7}{:>7}\n", tag, count));
        }
        out.push_str("------------------\n");
        out.push_str(&format!("  {:<7}{:>7}\n", "Total", i + o + a));
        out
    }

    /// One line per gate of the canonical order.
    pub fn report_netlist(&self) -> String {
        let mut out = String::from("\n");
        for (k, gate) in self
            .dfs_list
            .iter()
            .filter_map(|&id| self.get_gate(id))
            .enumerate()
        {
            out.push_str(&format!("[{}] {:<3} {}", k, gate.get_kind().type_str(), gate.get_id()));
            for pin in gate.get_fanins() {
                out.push(' ');
                if self.is_undefined(pin.get_gate_id()) {
                    out.push('*');
                }
                if pin.is_inverted() {
                    out.push('!');
                }
                out.push_str(&pin.get_gate_id().to_string());
            }
            if let Some(symbol) = gate.get_symbol() {
                out.push_str(&format!(" ({})", symbol));
            }
            out.push('\n');
        }
        out
    }

    pub fn report_pis(&self) -> String {
        format!("PIs of the circuit:{}\n", id_list(&self.inputs))
    }

    pub fn report_pos(&self) -> String {
        format!("POs of the circuit:{}\n", id_list(&self.outputs))
    }

    /// Gates with a fanin on an undefined gate, then gates nothing reads.
    ///
    /// Floating gates are AND gates then outputs, unused gates are inputs then
    /// AND gates, each in declaration order. Empty lists are not printed.
    pub fn report_floating(&self) -> String {
        let is_undefined = |id| self.is_undefined(id);
        let floating: Vec<GateId> = self
            .ands
            .iter()
            .chain(&self.outputs)
            .copied()
            .filter(|&id| {
                self.get_gate(id)
                    .is_some_and(|gate| gate.has_floating_fanin(is_undefined))
            })
            .collect();
        let unused: Vec<GateId> = self
            .inputs
            .iter()
            .chain(&self.ands)
            .copied()
            .filter(|&id| {
                self.get_gate(id)
                    .is_some_and(|gate| gate.get_fanouts().is_empty())
            })
            .collect();

        let mut out = String::new();
        if !floating.is_empty() {
            out.push_str(&format!("Gates with floating fanin(s):{}\n", id_list(&floating)));
        }
        if !unused.is_empty() {
            out.push_str(&format!("Gates defined but not used  :{}\n", id_list(&unused)));
        }
        out
    }

    /// Boxed one-gate summary: kind, id, symbol and source line.
    ///
    /// ```text
    /// ==================================================
    /// = AIG(5)"name", line 7                           =
    /// ==================================================
    /// ```
    pub fn report_gate(&self, id: GateId) -> Result<String> {
        let gate = self.gate(id)?;
        let divider = "=".repeat(BOX_WIDTH);
        Ok(format!(
            "{}\n{:<width$}=\n{}\n",
            divider,
            box_title(gate),
            divider,
            width = BOX_WIDTH - 1
        ))
    }
}

fn box_title(gate: &CirGate) -> String {
    let tag = match gate.get_kind() {
        GateKind::Const0 => "const",
        kind => kind.type_str(),
    };
    let symbol = gate
        .get_symbol()
        .map(|symbol| format!("\"{}\"", symbol))
        .unwrap_or_default();
    format!("= {}({}){}, line {}", tag, gate.get_id(), symbol, gate.get_line())
}
