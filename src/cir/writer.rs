//! ASCII AIGER writer.
//!
//! Only the gates of the canonical order are written: AND gates no output
//! depends on are dropped and the `A` field of the header counts the AND gates
//! actually written. Inputs and outputs are always kept, with their names.

use std::io::Write;

use tracing::debug;

use crate::cir::{CirError, Circuit, Result, literal};

impl Circuit {
    /// Writes the circuit in the ASCII AIGER format.
    ///
    /// ```rust
    /// use ciraig::Circuit;
    /// let src = "aag 3 2 0 1 1\n2\n4\n6\n6 2 5\ni0 a\nc\nhello\n";
    /// let cir = Circuit::read_circuit(src.as_bytes()).unwrap();
    /// let mut out = Vec::new();
    /// cir.write_aag(&mut out).unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), src);
    /// ```
    pub fn write_aag<W: Write>(&self, w: &mut W) -> Result<()> {
        let ands: Vec<_> = self
            .dfs_list
            .iter()
            .filter_map(|&id| self.get_gate(id))
            .filter(|gate| gate.is_and())
            .collect();
        writeln!(
            w,
            "aag {} {} 0 {} {}",
            self.header.m,
            self.inputs.len(),
            self.outputs.len(),
            ands.len()
        )?;

        for &id in &self.inputs {
            writeln!(w, "{}", literal::encode(id, false))?;
        }
        for &id in &self.outputs {
            let driver = self
                .gate(id)?
                .get_fanins()
                .first()
                .map(|pin| pin.get_literal())
                .unwrap_or(0);
            writeln!(w, "{}", driver)?;
        }
        for gate in &ands {
            write!(w, "{}", literal::encode(gate.get_id(), false))?;
            for pin in gate.get_fanins() {
                write!(w, " {}", pin.get_literal())?;
            }
            writeln!(w)?;
        }

        for (ty, ids) in [('i', &self.inputs), ('o', &self.outputs)] {
            for (position, &id) in ids.iter().enumerate() {
                if let Some(symbol) = self.gate(id)?.get_symbol() {
                    writeln!(w, "{}{} {}", ty, position, symbol)?;
                }
            }
        }
        for comment in &self.comments {
            writeln!(w, "{}", comment)?;
        }

        debug!(ands = ands.len(), dropped = self.ands.len() - ands.len(), "circuit written");
        Ok(())
    }

    /// Same as [`Circuit::write_aag`], into a `String`.
    pub fn to_aag_string(&self) -> Result<String> {
        let mut out = Vec::new();
        self.write_aag(&mut out)?;
        String::from_utf8(out).map_err(|e| CirError::InvalidState(e.to_string()))
    }
}
