pub mod cir;

// Re-exporting symbols and modules.
pub use cir::{dfs, dot, literal};
pub use cir::{
    CirError, CirGate, Circuit, DriverCheck, GateId, GateKind, Header, ParseError, ParseOptions,
    Pin, Result,
};
