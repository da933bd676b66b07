//! Strict whitespace splitting of a single line.
//!
//! Tokens are separated by exactly one space. Leading spaces, runs of spaces and
//! any whitespace other than a space are rejected with the precise column.
//!
//! Lines are raw bytes, columns are byte offsets.

use std::borrow::Cow;

use super::ParseError;

/// A token and the 0-based column where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) text: &'a [u8],
    pub(crate) col: usize,
}

impl Token<'_> {
    /// The token as printed in diagnostics.
    pub(crate) fn lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.text)
    }
}

/// The result of splitting a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tokens<'a> {
    pub(crate) tokens: Vec<Token<'a>>,
    /// Column of the separator following the last expected token, if the line
    /// goes on after it. The caller reports it as a missing newline once the
    /// tokens themselves have been validated.
    pub(crate) trailing: Option<usize>,
    /// Length of the line, the column where a missing token would start.
    pub(crate) end: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Fails with [`ParseError::MissingNewline`] if the line did not end after the tokens.
    pub(crate) fn expect_newline(&self, line: usize) -> Result<(), ParseError> {
        match self.trailing {
            Some(col) => Err(ParseError::MissingNewline { line, col }),
            None => Ok(()),
        }
    }
}

/// Splits `text` (line `line`) into at most `count` tokens.
///
/// Fewer tokens are returned if the line ends early, deciding whether this is an
/// error is left to the caller.
pub(crate) fn split_tokens(line: usize, text: &[u8], count: usize) -> Result<Tokens<'_>, ParseError> {
    let mut tokens = Vec::with_capacity(count);
    let mut start: Option<usize> = None;
    let mut after_space = false;

    for (col, &b) in text.iter().enumerate() {
        match b {
            b' ' => {
                if col == 0 || after_space {
                    return Err(ParseError::ExtraSpace { line, col });
                }
                if let Some(s) = start.take() {
                    tokens.push(Token {
                        text: &text[s..col],
                        col: s,
                    });
                }
                if tokens.len() == count {
                    return Ok(Tokens {
                        tokens,
                        trailing: Some(col),
                        end: text.len(),
                    });
                }
                after_space = true;
            }
            b if b.is_ascii_whitespace() => {
                return Err(ParseError::IllegalWhitespace { line, col, code: b });
            }
            _ => {
                if start.is_none() {
                    start = Some(col);
                }
                after_space = false;
            }
        }
    }

    if let Some(s) = start {
        tokens.push(Token {
            text: &text[s..],
            col: s,
        });
    }

    Ok(Tokens {
        tokens,
        trailing: None,
        end: text.len(),
    })
}

/// Parses a decimal integer, with an optional leading minus sign only.
pub(crate) fn parse_int(s: &[u8]) -> Option<i64> {
    let digits = s.strip_prefix(b"-").unwrap_or(s);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(s).ok()?.parse::<i64>().ok()
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    fn texts(tokens: &Tokens<'_>) -> Vec<String> {
        tokens.tokens.iter().map(|t| t.lossy().into_owned()).collect()
    }

    #[test]
    fn split_test() {
        let t = split_tokens(1, b"aag 3 2 0 1 0", 6).unwrap();
        assert_eq!(texts(&t), vec!["aag", "3", "2", "0", "1", "0"]);
        assert_eq!(t.trailing, None);
        assert_eq!(t.tokens[1].col, 4);

        let t = split_tokens(5, b"12 104 7", 3).unwrap();
        assert_eq!(
            t.tokens.iter().map(|t| t.col).collect::<Vec<_>>(),
            vec![0, 3, 7]
        );

        // Bytes that are not UTF-8 stay inside their token, columns count bytes.
        let t = split_tokens(2, b"2\xff\xfe 4", 2).unwrap();
        assert_eq!(t.tokens[0].text, b"2\xff\xfe");
        assert_eq!(t.tokens[1].col, 4);
        assert_eq!(t.tokens[0].lossy(), "2\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn split_short_test() {
        let t = split_tokens(1, b"aag 3 2 0 1", 6).unwrap();
        assert_eq!(t.len(), 5);
        assert_eq!(t.end, 11);

        let t = split_tokens(1, b"", 1).unwrap();
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn split_trailing_test() {
        let t = split_tokens(3, b"2 4", 1).unwrap();
        assert_eq!(texts(&t), vec!["2"]);
        assert_eq!(t.trailing, Some(1));
        assert_eq!(
            t.expect_newline(3),
            Err(ParseError::MissingNewline { line: 3, col: 1 })
        );

        // Content after the last expected token is not split any further.
        let t = split_tokens(3, b"2 4  \tx", 1).unwrap();
        assert_eq!(t.trailing, Some(1));

        let t = split_tokens(3, b"2 ", 1).unwrap();
        assert_eq!(t.trailing, Some(1));
    }

    #[rstest]
    #[case(" 2", ParseError::ExtraSpace { line: 2, col: 0 })]
    #[case("2  4 6", ParseError::ExtraSpace { line: 2, col: 2 })]
    #[case("\t2", ParseError::IllegalWhitespace { line: 2, col: 0, code: 9 })]
    #[case("2 4\t6", ParseError::IllegalWhitespace { line: 2, col: 3, code: 9 })]
    #[case("2 \t4", ParseError::IllegalWhitespace { line: 2, col: 2, code: 9 })]
    #[case("2 4 6\r", ParseError::IllegalWhitespace { line: 2, col: 5, code: 13 })]
    fn split_error_test(#[case] text: &str, #[case] expected: ParseError) {
        assert_eq!(split_tokens(2, text.as_bytes(), 3), Err(expected));
    }

    #[test]
    fn parse_int_test() {
        assert_eq!(parse_int(b"42"), Some(42));
        assert_eq!(parse_int(b"0"), Some(0));
        assert_eq!(parse_int(b"-3"), Some(-3));
        assert_eq!(parse_int(b""), None);
        assert_eq!(parse_int(b"-"), None);
        assert_eq!(parse_int(b"+3"), None);
        assert_eq!(parse_int(b"3x"), None);
        assert_eq!(parse_int(b"99999999999999999999999"), None);
    }
}
