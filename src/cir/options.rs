//! Knobs for [`Circuit::read_circuit_with`](super::Circuit::read_circuit_with).

/// How outputs sharing a driver are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverCheck {
    /// An output whose driver literal equals the driver literal of an earlier
    /// output is a redefinition. The same gate driven with the other phase is fine.
    #[default]
    Literal,
    /// Any two outputs driven by the same gate are a redefinition, whatever the phases.
    Gate,
    /// Outputs may share drivers freely.
    Allow,
}

/// Parameters of the ASCII AIGER reader.
///
/// ```rust
/// use ciraig::{DriverCheck, ParseOptions};
/// let options = ParseOptions::default().duplicate_drivers(DriverCheck::Gate);
/// assert_eq!(options.get_duplicate_drivers(), DriverCheck::Gate);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    duplicate_drivers: DriverCheck,
}

impl ParseOptions {
    pub fn duplicate_drivers(mut self, check: DriverCheck) -> Self {
        self.duplicate_drivers = check;
        self
    }

    pub fn get_duplicate_drivers(&self) -> DriverCheck {
        self.duplicate_drivers
    }
}
