use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use tracing::{debug, error, instrument};

use crate::cir::{
    CirError, CirGate, Circuit, DriverCheck, GateId, GateKind, ParseError, ParseOptions, Result,
    lexer::{Token, Tokens, parse_int, split_tokens},
    literal,
};

type ParseResult<T> = std::result::Result<T, ParseError>;

const HEADER_PARAMS: [&str; 5] = ["variables", "PIs", "latches", "POs", "AIGs"];

/// The `aag M I L O A` header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Maximum variable index.
    pub m: u64,
    /// Number of inputs.
    pub i: u64,
    /// Number of latches, always 0 for a parsed circuit.
    pub l: u64,
    /// Number of outputs.
    pub o: u64,
    /// Number of AND gates.
    pub a: u64,
}

impl Header {
    fn parse(line: usize, text: &[u8]) -> ParseResult<Self> {
        let tokens = split_tokens(line, text, 6)?;

        let Some(magic) = tokens.tokens.first() else {
            return Err(ParseError::MissingIdentifier {
                line,
                what: "aag".to_string(),
            });
        };
        if magic.text != b"aag" {
            // "aag3 ..." is a missing space rather than a wrong tag.
            if let Some(rest) = magic.text.strip_prefix(b"aag") {
                if parse_int(rest).is_some() {
                    return Err(ParseError::MissingSpace {
                        line,
                        col: magic.col + 3,
                    });
                }
            }
            return Err(ParseError::IllegalIdentifier {
                line,
                ident: magic.lossy().into_owned(),
            });
        }

        if tokens.len() < 6 {
            return Err(ParseError::MissingNum {
                line,
                col: tokens.end,
                what: format!("number of {}", HEADER_PARAMS[tokens.len() - 1]),
            });
        }

        let mut values = [0u64; 5];
        for (k, token) in tokens.tokens[1..].iter().enumerate() {
            let param = HEADER_PARAMS[k];
            let value = parse_int(token.text).ok_or_else(|| ParseError::IllegalNum {
                line,
                what: format!("number of {}({})", param, token.lossy()),
            })?;
            if value < 0 {
                return Err(ParseError::NumTooSmall {
                    line,
                    what: format!("Number of {}", param),
                    value,
                });
            }
            values[k] = value as u64;
        }
        tokens.expect_newline(line)?;

        let [m, i, l, o, a] = values;
        if i.saturating_add(l).saturating_add(a) > m {
            return Err(ParseError::NumTooSmall {
                line,
                what: "Number of variables".to_string(),
                value: m as i64,
            });
        }
        if l != 0 {
            return Err(ParseError::UnsupportedLatches { line, count: l });
        }

        Ok(Header { m, i, l, o, a })
    }
}

/// Parser context: the line source, the current line number and the options.
///
/// Every diagnostic is built from this context, at the line it currently points to.
struct Parser<'o, R> {
    reader: R,
    line: usize,
    options: &'o ParseOptions,
}

impl<'o, R: BufRead> Parser<'o, R> {
    fn new(reader: R, options: &'o ParseOptions) -> Self {
        Parser {
            reader,
            line: 0,
            options,
        }
    }

    /// Moves to the next line, as raw bytes without its `\n` (or `\r\n`).
    ///
    /// The line counter moves even at the end of the stream, so that "missing"
    /// diagnostics point at the line that should exist.
    fn next_line(&mut self) -> Result<Option<Vec<u8>>> {
        self.line += 1;
        let mut text = Vec::new();
        if self.reader.read_until(b'\n', &mut text)? == 0 {
            return Ok(None);
        }
        if text.last() == Some(&b'\n') {
            text.pop();
            if text.last() == Some(&b'\r') {
                text.pop();
            }
        }
        Ok(Some(text))
    }

    /// Next line of a gate section, `what` being `PI`, `PO` or `AIG`.
    fn expect_line(&mut self, what: &str) -> Result<Vec<u8>> {
        match self.next_line()? {
            None => Err(ParseError::MissingDef {
                line: self.line,
                what: what.to_string(),
            }
            .into()),
            Some(text) if text.is_empty() => Err(ParseError::MissingNum {
                line: self.line,
                col: 0,
                what: format!("{} literal ID", what),
            }
            .into()),
            Some(text) => Ok(text),
        }
    }

    fn first_token<'t>(&self, tokens: &Tokens<'t>, what: &str) -> ParseResult<Token<'t>> {
        tokens
            .tokens
            .first()
            .copied()
            .ok_or_else(|| ParseError::MissingNum {
                line: self.line,
                col: 0,
                what: what.to_string(),
            })
    }

    /// Reads a literal in `[0, max]`.
    fn literal(&self, token: Token<'_>, what: &str, max: u64) -> ParseResult<u64> {
        let value = parse_int(token.text).ok_or_else(|| ParseError::IllegalNum {
            line: self.line,
            what: format!("{}({})", what, token.lossy()),
        })?;
        if value < 0 {
            return Err(ParseError::NumTooSmall {
                line: self.line,
                what: what.to_string(),
                value,
            });
        }
        let literal = value as u64;
        if literal > max {
            return Err(ParseError::MaxLitId {
                line: self.line,
                col: token.col,
                literal,
            });
        }
        Ok(literal)
    }

    /// Checks a literal declaring a new input or AND gate: not the constant,
    /// not inverted and not already taken.
    fn declaration(&self, cir: &Circuit, token: Token<'_>, what: &str, literal: u64) -> ParseResult<()> {
        if literal <= 1 {
            return Err(ParseError::RedefConst {
                line: self.line,
                col: token.col,
                literal,
            });
        }
        if literal & 1 == 1 {
            return Err(ParseError::CannotInvert {
                line: self.line,
                col: token.col,
                what: what.to_string(),
                literal,
            });
        }
        let (id, _) = literal::decode(literal);
        if let Some(previous) = cir.get_gate(id) {
            return Err(ParseError::RedefGate {
                line: self.line,
                literal,
                previous: previous.get_kind(),
                previous_line: previous.get_line(),
            });
        }
        Ok(())
    }

    fn read_input(&mut self, cir: &mut Circuit, max: u64) -> Result<()> {
        let text = self.expect_line("PI")?;
        let tokens = split_tokens(self.line, &text, 1)?;
        let token = self.first_token(&tokens, "PI literal ID")?;
        let literal = self.literal(token, "PI literal ID", max)?;
        self.declaration(cir, token, "PI", literal)?;
        tokens.expect_newline(self.line)?;

        cir.insert_gate(CirGate::new(GateKind::PrimaryInput, literal, self.line))
    }

    /// Reads an output and records its driver in `fanins`.
    ///
    /// At this point `fanins` only holds output drivers, which is what the
    /// duplicate driver check compares against.
    fn read_output(&mut self, cir: &mut Circuit, max: u64, fanins: &mut Vec<(GateId, u64)>) -> Result<()> {
        let text = self.expect_line("PO")?;
        let tokens = split_tokens(self.line, &text, 1)?;
        let token = self.first_token(&tokens, "PO literal ID")?;
        let literal = self.literal(token, "PO literal ID", max)?;

        let previous = match self.options.get_duplicate_drivers() {
            DriverCheck::Literal => fanins.iter().find(|&&(_, driver)| driver == literal),
            DriverCheck::Gate => fanins.iter().find(|&&(_, driver)| driver >> 1 == literal >> 1),
            DriverCheck::Allow => None,
        };
        if let Some(&(output, _)) = previous {
            let previous = cir.gate(output)?;
            return Err(ParseError::RedefGate {
                line: self.line,
                literal,
                previous: previous.get_kind(),
                previous_line: previous.get_line(),
            }
            .into());
        }
        tokens.expect_newline(self.line)?;

        let id = usize::try_from(cir.get_header().m)
            .unwrap_or(usize::MAX)
            .saturating_add(1 + cir.get_outputs().len());
        cir.insert_gate(CirGate::new(
            GateKind::PrimaryOutput,
            literal::encode(id, false),
            self.line,
        ))?;
        fanins.push((id, literal));
        Ok(())
    }

    fn read_and(&mut self, cir: &mut Circuit, max: u64, fanins: &mut Vec<(GateId, u64)>) -> Result<()> {
        let text = self.expect_line("AIG")?;
        let tokens = split_tokens(self.line, &text, 3)?;
        if tokens.len() < 3 {
            return Err(ParseError::MissingSpace {
                line: self.line,
                col: tokens.end,
            }
            .into());
        }

        let lhs = tokens.tokens[0];
        let literal = self.literal(lhs, "AIG literal ID", max)?;
        self.declaration(cir, lhs, "AIG", literal)?;
        let (id, _) = literal::decode(literal);

        for &token in &tokens.tokens[1..] {
            let fanin = self.literal(token, "AIG input literal ID", max)?;
            fanins.push((id, fanin));
        }
        tokens.expect_newline(self.line)?;

        cir.insert_gate(CirGate::new(GateKind::And, literal, self.line))
    }

    /// Reads symbol lines until the `c` line (or the end of the stream).
    fn read_symbols(&mut self, cir: &mut Circuit) -> Result<()> {
        while let Some(text) = self.next_line()? {
            if text == b"c" {
                cir.push_comment("c".to_string());
                return self.read_comments(cir);
            }
            self.read_symbol(cir, &text)?;
        }
        Ok(())
    }

    /// A symbol line is `i<index> <name>` or `o<index> <name>`, `name` being the
    /// rest of the line.
    fn read_symbol(&self, cir: &mut Circuit, bytes: &[u8]) -> Result<()> {
        let line = self.line;

        let Some(&first) = bytes.first() else {
            return Err(ParseError::IllegalSymbolType {
                line,
                col: 0,
                ty: String::new(),
            }
            .into());
        };
        match first {
            b'i' | b'o' => (),
            b' ' => return Err(ParseError::ExtraSpace { line, col: 0 }.into()),
            b if b.is_ascii_whitespace() => {
                return Err(ParseError::IllegalWhitespace { line, col: 0, code: b }.into());
            }
            // "c" alone was handled by the caller, "cx" is a bad type.
            b'c' if bytes.get(1) == Some(&b' ') => {
                return Err(ParseError::MissingNewline { line, col: 1 }.into());
            }
            b'c' if bytes.get(1).is_some_and(u8::is_ascii_whitespace) => {
                return Err(ParseError::IllegalWhitespace {
                    line,
                    col: 1,
                    code: bytes[1],
                }
                .into());
            }
            _ => {
                return Err(ParseError::IllegalSymbolType {
                    line,
                    col: 0,
                    ty: String::from_utf8_lossy(bytes).chars().take(1).collect(),
                }
                .into());
            }
        }

        let sep = bytes
            .iter()
            .position(|b| b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        if sep < bytes.len() && bytes[sep] != b' ' {
            return Err(ParseError::IllegalWhitespace {
                line,
                col: sep,
                code: bytes[sep],
            }
            .into());
        }

        let index_text = &bytes[1..sep];
        if index_text.is_empty() {
            return Err(ParseError::MissingNum {
                line,
                col: 1,
                what: "symbol index".to_string(),
            }
            .into());
        }
        let index = match parse_int(index_text) {
            Some(value) if value >= 0 => value as usize,
            _ => {
                return Err(ParseError::IllegalNum {
                    line,
                    what: format!("symbol index({})", String::from_utf8_lossy(index_text)),
                }
                .into());
            }
        };

        let (ty, ids, what) = match first {
            b'i' => ('i', cir.get_inputs(), "PI index"),
            _ => ('o', cir.get_outputs(), "PO index"),
        };
        let Some(&id) = ids.get(index) else {
            return Err(ParseError::NumTooBig {
                line,
                what: what.to_string(),
                value: index as i64,
            }
            .into());
        };
        if cir.gate(id)?.get_symbol().is_some() {
            return Err(ParseError::RedefSymbolicName { line, ty, index }.into());
        }

        let name = bytes.get(sep + 1..).unwrap_or_default();
        if name.is_empty() {
            return Err(ParseError::MissingIdentifier {
                line,
                what: "symbolic name".to_string(),
            }
            .into());
        }
        if name.first() == Some(&b' ') {
            return Err(ParseError::ExtraSpace { line, col: sep + 1 }.into());
        }
        if let Some(pos) = name.iter().position(|b| !(0x20..=0x7e).contains(b)) {
            return Err(ParseError::IllegalSymbolName {
                line,
                col: sep + 1 + pos,
                code: name[pos],
            }
            .into());
        }

        // Printable ASCII only at this point.
        cir.set_symbol(id, String::from_utf8_lossy(name).into_owned())
    }

    /// Everything after the `c` line is kept verbatim. Bytes that are not
    /// UTF-8 are replaced by U+FFFD.
    fn read_comments(&mut self, cir: &mut Circuit) -> Result<()> {
        while let Some(text) = self.next_line()? {
            let comment = String::from_utf8(text)
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
            cir.push_comment(comment);
        }
        Ok(())
    }

    fn parse(mut self) -> Result<Circuit> {
        let text = self.next_line()?.ok_or_else(|| ParseError::MissingIdentifier {
            line: 1,
            what: "aag".to_string(),
        })?;
        let header = Header::parse(self.line, &text)?;
        debug!(
            m = header.m,
            i = header.i,
            l = header.l,
            o = header.o,
            a = header.a,
            "header accepted"
        );

        let max = literal::max_literal(header.m);
        let mut cir = Circuit::with_header(header);
        // (consumer, fanin literal), outputs first then AND gates.
        let mut fanins = Vec::new();

        for _ in 0..header.i {
            self.read_input(&mut cir, max)?;
        }
        for _ in 0..header.o {
            self.read_output(&mut cir, max, &mut fanins)?;
        }
        for _ in 0..header.a {
            self.read_and(&mut cir, max, &mut fanins)?;
        }
        debug!(line = self.line, "gate sections read");

        for (consumer, literal) in fanins {
            cir.connect(consumer, literal)?;
        }
        cir.build_dfs_list();
        cir.sort_fanouts();

        self.read_symbols(&mut cir)?;
        debug!(
            comments = cir.get_comments().len(),
            "symbols and comments read"
        );

        cir.check_integrity()?;
        Ok(cir)
    }
}

impl Circuit {
    /// Reads a circuit in the ASCII AIGER format, with default [`ParseOptions`].
    ///
    /// Parsing stops at the first violation of the format, the returned error
    /// carries the diagnostic. No partial circuit is ever returned.
    ///
    /// ```rust
    /// use ciraig::Circuit;
    /// let cir = Circuit::read_circuit("aag 3 2 0 1 1\n2\n4\n6\n6 2 5\n".as_bytes()).unwrap();
    /// assert_eq!(cir.get_inputs(), &[1, 2]);
    /// assert_eq!(cir.get_outputs(), &[4]);
    /// assert_eq!(cir.get_dfs_list(), &[1, 2, 3, 4]);
    ///
    /// let err = Circuit::read_circuit("aag 3 2 0 1\n".as_bytes()).unwrap_err();
    /// assert_eq!(err.to_string(), "[ERROR] Line 1, Col 12: Missing number of AIGs!!");
    /// ```
    pub fn read_circuit(reader: impl BufRead) -> Result<Self> {
        Circuit::read_circuit_with(reader, &ParseOptions::default())
    }

    /// Same as [`Circuit::read_circuit`], with explicit options.
    #[instrument(level = "debug", skip_all, err)]
    pub fn read_circuit_with(reader: impl BufRead, options: &ParseOptions) -> Result<Self> {
        Parser::new(reader, options).parse()
    }

    /// Opens and reads an `.aag` file.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            let err = CirError::CannotOpen {
                path: path.to_path_buf(),
                source,
            };
            error!("{}", err);
            err
        })?;
        Circuit::read_circuit(BufReader::new(file))
    }
}
