//! Canonical DFS order of a circuit.
//!
//! Starting from each output in declaration order, fanins are explored in order
//! and a gate is listed once all its fanins are (post-order). A gate reachable
//! from several outputs is listed at its first completion only.
//!
//! The constant and undefined gates are never listed. AND gates that no output
//! depends on are not listed either, which is how the writer drops dead logic.

use tracing::debug;

use crate::cir::{Circuit, GateId, GateKind};

impl Circuit {
    /// Computes the canonical DFS order. Called once, right after wiring.
    pub(crate) fn build_dfs_list(&mut self) {
        let generation = self.next_generation();
        let mut order = Vec::new();
        // (gate, index of the next fanin to explore)
        let mut stack: Vec<(GateId, usize)> = Vec::new();

        for &output in &self.outputs {
            let Some(root) = self.get_gate(output) else {
                continue;
            };
            if root.is_visited(generation) {
                continue;
            }
            root.mark_visited(generation);
            stack.push((output, 0));

            while let Some(frame) = stack.last_mut() {
                let (id, cursor) = *frame;
                frame.1 += 1;
                let Some(gate) = self.get_gate(id) else {
                    stack.pop();
                    continue;
                };
                match gate.get_fanins().get(cursor) {
                    Some(pin) => {
                        if let Some(fanin) = self.get_gate(pin.get_gate_id()) {
                            if !fanin.is_visited(generation) {
                                fanin.mark_visited(generation);
                                stack.push((fanin.get_id(), 0));
                            }
                        }
                    }
                    None => {
                        stack.pop();
                        if !matches!(gate.get_kind(), GateKind::Const0 | GateKind::Undefined) {
                            order.push(id);
                        }
                    }
                }
            }
        }

        debug!(listed = order.len(), "canonical order computed");
        self.dfs_list = order;
    }
}

#[cfg(test)]
mod test {
    use crate::Circuit;

    #[test]
    fn post_order_test() {
        // 4 = 1 & 2, 5 = 4 & !3, outputs 5 then 4.
        let src = "aag 5 3 0 2 2\n2\n4\n6\n10\n8\n8 2 4\n10 8 7\n";
        let cir = Circuit::read_circuit(src.as_bytes()).unwrap();
        assert_eq!(cir.get_dfs_list(), &[1, 2, 4, 3, 5, 6, 7]);
    }

    #[test]
    fn shared_fanin_test() {
        // Diamond: 3 = 1 & 2, 4 = 3 & 1, 5 = 3 & !4.
        let src = "aag 5 2 0 1 3\n2\n4\n10\n6 2 4\n8 6 2\n10 6 9\n";
        let cir = Circuit::read_circuit(src.as_bytes()).unwrap();
        assert_eq!(cir.get_dfs_list(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn skip_const_and_undefined_test() {
        // 2 = const & undefined 3
        let src = "aag 3 1 0 1 1\n2\n4\n4 1 6\n";
        let cir = Circuit::read_circuit(src.as_bytes()).unwrap();
        assert_eq!(cir.get_dfs_list(), &[2, 4]);
    }

    #[test]
    fn unused_and_not_listed_test() {
        let src = "aag 3 2 0 1 1\n2\n4\n2\n6 2 4\n";
        let cir = Circuit::read_circuit(src.as_bytes()).unwrap();
        assert_eq!(cir.get_dfs_list(), &[1, 4]);
        assert!(!cir.get_dfs_list().contains(&3));
    }

    #[test]
    fn topological_test() {
        let src = "aag 7 2 0 2 5\n2\n4\n14\n12\n6 2 4\n8 6 3\n10 8 6\n12 10 5\n14 12 8\n";
        let cir = Circuit::read_circuit(src.as_bytes()).unwrap();
        let list = cir.get_dfs_list();
        let position = |id| list.iter().position(|&x| x == id).unwrap();
        for &id in list {
            let gate = cir.get_gate(id).unwrap();
            assert!(!gate.is_const0() && !gate.is_undefined());
            for pin in gate.get_fanins() {
                if cir.get_gate(pin.get_gate_id()).unwrap().is_and() {
                    assert!(position(pin.get_gate_id()) < position(id));
                }
            }
        }
        let mut dedup = list.to_vec();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), list.len());
    }
}
