//! Bounded fanin/fanout cone printing.
//!
//! ```text
//! AIG 5
//!   AIG 3
//!     PI 1
//!     PI 2
//!   !AIG 4
//!     AIG 3 (*)
//!     PI 1
//! ```
//!
//! Each level is indented by two spaces and prefixed with `!` when the edge
//! leading to it is inverted. A gate met a second time during the same report
//! is not expanded again, it gets a ` (*)` marker unless it has no children.

use crate::cir::{CirGate, Circuit, GateId, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Fanin,
    Fanout,
}

impl Circuit {
    /// Prints the fanin cone of gate `id`, `level` edges deep.
    pub fn report_fanin(&self, id: GateId, level: usize) -> Result<String> {
        self.report_cone(id, level, Direction::Fanin)
    }

    /// Prints the fanout cone of gate `id`, `level` edges deep.
    ///
    /// Fanout edges have no phase of their own, the `!` comes from the fanin
    /// list of the consumer.
    pub fn report_fanout(&self, id: GateId, level: usize) -> Result<String> {
        self.report_cone(id, level, Direction::Fanout)
    }

    fn report_cone(&self, id: GateId, level: usize, direction: Direction) -> Result<String> {
        let root = self.gate(id)?;
        // Marks are local to this report.
        let generation = self.next_generation();
        let mut out = String::new();
        // (gate, depth, edge leading to it is inverted), popped in pre-order.
        let mut stack = vec![(root, 0, root.is_inverted())];

        while let Some((gate, depth, inverted)) = stack.pop() {
            out.push_str(&"  ".repeat(depth));
            if inverted {
                out.push('!');
            }
            out.push_str(&format!("{} {}", gate.get_kind().type_str(), gate.get_id()));
            if depth >= level {
                out.push('\n');
                continue;
            }

            let children = self.cone_children(gate, direction)?;
            if gate.is_visited(generation) {
                if !children.is_empty() {
                    out.push_str(" (*)");
                }
                out.push('\n');
                continue;
            }
            gate.mark_visited(generation);
            out.push('\n');

            stack.extend(
                children
                    .into_iter()
                    .rev()
                    .map(|(child, inverted)| (child, depth + 1, inverted)),
            );
        }
        Ok(out)
    }

    /// Children of `gate` in the given direction, with the phase of the edge.
    fn cone_children(&self, gate: &CirGate, direction: Direction) -> Result<Vec<(&CirGate, bool)>> {
        match direction {
            Direction::Fanin => gate
                .get_fanins()
                .iter()
                .map(|pin| {
                    self.gate(pin.get_gate_id())
                        .map(|fanin| (fanin, pin.is_inverted()))
                })
                .collect(),
            Direction::Fanout => gate
                .get_fanouts()
                .iter()
                .map(|&fanout| {
                    self.gate(fanout).map(|consumer| {
                        let inverted = consumer.fanin_phase_of(gate.get_id()).unwrap_or(false);
                        (consumer, inverted)
                    })
                })
                .collect(),
        }
    }
}
