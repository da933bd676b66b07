use std::{collections::TryReserveError, path::PathBuf};

use thiserror::Error;

use super::{GateId, GateKind};

/// The result of a circuit operation.
pub type Result<T> = std::result::Result<T, CirError>;

/// Error returned when a circuit operation failed.
#[derive(Debug, Error)]
pub enum CirError {
    /// The design file could not be opened.
    #[error("Cannot open design \"{}\"!!", .path.display())]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the character stream failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Just forwarding a [`ParseError`].
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The gate table could not grow to hold gate `id`.
    #[error("cannot allocate a gate table for id={id}: {source}")]
    TableTooLarge {
        id: GateId,
        #[source]
        source: TryReserveError,
    },

    /// No gate is stored under the given id.
    #[error("gate with id={0} does not exist")]
    GateNotFound(GateId),

    /// The circuit reached an invalid state. A successfully parsed circuit never does.
    #[error("the circuit has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),
}

/// A diagnostic produced while reading an ASCII AIGER description.
///
/// Every variant carries the 1-based `line` where the violation was found and,
/// when the position inside the line is meaningful, the 0-based `col`.
/// The [`Display`](std::fmt::Display) implementation renders the complete
/// diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("[ERROR] Line {line}, Col {}: Extra space character is detected!!", .col + 1)]
    ExtraSpace { line: usize, col: usize },

    #[error("[ERROR] Line {line}, Col {}: Missing space character!!", .col + 1)]
    MissingSpace { line: usize, col: usize },

    /// Any whitespace other than a plain space, `code` being its byte value.
    #[error("[ERROR] Line {line}, Col {}: Illegal white space char({code}) is detected!!", .col + 1)]
    IllegalWhitespace { line: usize, col: usize, code: u8 },

    #[error("[ERROR] Line {line}: Illegal {what}!!")]
    IllegalNum { line: usize, what: String },

    #[error("[ERROR] Line {line}: Illegal identifier \"{ident}\"!!")]
    IllegalIdentifier { line: usize, ident: String },

    #[error("[ERROR] Line {line}, Col {}: Illegal symbol type ({ty})!!", .col + 1)]
    IllegalSymbolType { line: usize, col: usize, ty: String },

    #[error("[ERROR] Line {line}, Col {}: Symbolic name contains un-printable char({code})!!", .col + 1)]
    IllegalSymbolName { line: usize, col: usize, code: u8 },

    #[error("[ERROR] Line {line}, Col {}: Missing {what}!!", .col + 1)]
    MissingNum {
        line: usize,
        col: usize,
        what: String,
    },

    #[error("[ERROR] Line {line}: Missing \"{what}\"!!")]
    MissingIdentifier { line: usize, what: String },

    #[error("[ERROR] Line {line}, Col {}: A new line is expected here!!", .col + 1)]
    MissingNewline { line: usize, col: usize },

    /// The file ended before all declared gates were defined.
    #[error("[ERROR] Line {line}: Missing {what} definition!!")]
    MissingDef { line: usize, what: String },

    #[error("[ERROR] Line {line}, Col {}: {what} {literal}({}) cannot be inverted!!", .col + 1, .literal / 2)]
    CannotInvert {
        line: usize,
        col: usize,
        what: String,
        literal: u64,
    },

    #[error("[ERROR] Line {line}, Col {}: Literal \"{literal}\" exceeds maximum valid ID!!", .col + 1)]
    MaxLitId { line: usize, col: usize, literal: u64 },

    #[error(
        "[ERROR] Line {line}: Literal \"{literal}\" is redefined, previously defined as {previous} in line {previous_line}!!"
    )]
    RedefGate {
        line: usize,
        literal: u64,
        previous: GateKind,
        previous_line: usize,
    },

    #[error("[ERROR] Line {line}: Symbolic name for \"{ty}{index}\" is redefined!!")]
    RedefSymbolicName { line: usize, ty: char, index: usize },

    #[error("[ERROR] Line {line}, Col {}: Cannot redefine constant ({literal})!!", .col + 1)]
    RedefConst { line: usize, col: usize, literal: u64 },

    #[error("[ERROR] Line {line}: {what} is too small ({value})!!")]
    NumTooSmall {
        line: usize,
        what: String,
        value: i64,
    },

    #[error("[ERROR] Line {line}: {what} is too big ({value})!!")]
    NumTooBig {
        line: usize,
        what: String,
        value: i64,
    },

    /// Only combinational circuits are supported.
    #[error("[ERROR] Line {line}: Latches are not supported ({count})!!")]
    UnsupportedLatches { line: usize, count: u64 },
}

impl ParseError {
    /// The 1-based line of the violation.
    pub fn line(&self) -> usize {
        match *self {
            ParseError::ExtraSpace { line, .. }
            | ParseError::MissingSpace { line, .. }
            | ParseError::IllegalWhitespace { line, .. }
            | ParseError::IllegalNum { line, .. }
            | ParseError::IllegalIdentifier { line, .. }
            | ParseError::IllegalSymbolType { line, .. }
            | ParseError::IllegalSymbolName { line, .. }
            | ParseError::MissingNum { line, .. }
            | ParseError::MissingIdentifier { line, .. }
            | ParseError::MissingNewline { line, .. }
            | ParseError::MissingDef { line, .. }
            | ParseError::CannotInvert { line, .. }
            | ParseError::MaxLitId { line, .. }
            | ParseError::RedefGate { line, .. }
            | ParseError::RedefSymbolicName { line, .. }
            | ParseError::RedefConst { line, .. }
            | ParseError::NumTooSmall { line, .. }
            | ParseError::NumTooBig { line, .. }
            | ParseError::UnsupportedLatches { line, .. } => line,
        }
    }

    /// The 0-based column of the violation, for positional diagnostics only.
    pub fn col(&self) -> Option<usize> {
        match *self {
            ParseError::ExtraSpace { col, .. }
            | ParseError::MissingSpace { col, .. }
            | ParseError::IllegalWhitespace { col, .. }
            | ParseError::IllegalSymbolType { col, .. }
            | ParseError::IllegalSymbolName { col, .. }
            | ParseError::MissingNum { col, .. }
            | ParseError::MissingNewline { col, .. }
            | ParseError::CannotInvert { col, .. }
            | ParseError::MaxLitId { col, .. }
            | ParseError::RedefConst { col, .. } => Some(col),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_test() {
        assert_eq!(
            ParseError::ExtraSpace { line: 2, col: 0 }.to_string(),
            "[ERROR] Line 2, Col 1: Extra space character is detected!!"
        );
        assert_eq!(
            ParseError::CannotInvert {
                line: 3,
                col: 0,
                what: "PI".to_string(),
                literal: 5
            }
            .to_string(),
            "[ERROR] Line 3, Col 1: PI 5(2) cannot be inverted!!"
        );
        assert_eq!(
            ParseError::RedefGate {
                line: 4,
                literal: 6,
                previous: GateKind::PrimaryInput,
                previous_line: 2
            }
            .to_string(),
            "[ERROR] Line 4: Literal \"6\" is redefined, previously defined as PI in line 2!!"
        );
    }

    #[test]
    fn position_test() {
        let e = ParseError::MissingNewline { line: 7, col: 4 };
        assert_eq!(e.line(), 7);
        assert_eq!(e.col(), Some(4));

        let e = ParseError::NumTooBig {
            line: 9,
            what: "PI index".to_string(),
            value: 3,
        };
        assert_eq!(e.line(), 9);
        assert_eq!(e.col(), None);
    }

    #[test]
    fn forward_test() {
        let e: CirError = ParseError::MissingDef {
            line: 5,
            what: "AIG".to_string(),
        }
        .into();
        assert_eq!(e.to_string(), "[ERROR] Line 5: Missing AIG definition!!");
    }
}
