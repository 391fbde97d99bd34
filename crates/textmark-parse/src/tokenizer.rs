//! Content stream tokenizer.
//!
//! Parses decoded content stream bytes into a sequence of [`Operator`]s,
//! each carrying its [`Operand`]s and the byte offset it was read at.
//! [`tokenize_lenient`] recovers from malformed tokens: the fault is
//! recorded, the pending operands are discarded, and reading resumes at the
//! next token boundary.

use crate::error::InterpretError;

/// A content stream operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer number (e.g., `42`, `-7`).
    Integer(i64),
    /// Real number (e.g., `0.5`, `.5`).
    Real(f64),
    /// Name object (e.g., `/F1`). Stored without the leading `/`.
    Name(String),
    /// Literal string delimited by parentheses, stored as raw bytes.
    LiteralString(Vec<u8>),
    /// Hexadecimal string delimited by angle brackets, stored as decoded bytes.
    HexString(Vec<u8>),
    /// Array of operands (e.g., `[(a) -120 (b)]`).
    Array(Vec<Operand>),
    /// Boolean value (`true` or `false`).
    Boolean(bool),
    /// The null object.
    Null,
    /// Dictionary object (`<< /Key value ... >>`).
    Dictionary(Vec<(String, Operand)>),
}

impl Operand {
    /// Numeric value of an integer or real operand.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Bytes of a literal or hex string operand.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::LiteralString(b) | Operand::HexString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }
}

/// A content stream operator with its preceding operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Operator name (e.g., `"BT"`, `"Tf"`, `"Tj"`).
    pub name: String,
    /// Operands that preceded this operator on the operand stack.
    pub operands: Vec<Operand>,
    /// Byte offset of the operator keyword in the stream.
    pub offset: usize,
}

/// Operators recovered from a stream together with the faults skipped.
#[derive(Debug, Default)]
pub struct Tokenized {
    pub operators: Vec<Operator>,
    /// One [`InterpretError::Tokenize`] per malformed token.
    pub faults: Vec<InterpretError>,
}

/// Parse content stream bytes, failing on the first malformed token.
///
/// # Errors
///
/// Returns [`InterpretError::Tokenize`] for malformed content streams.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, InterpretError> {
    let mut tokenized = tokenize_lenient(input);
    if tokenized.faults.is_empty() {
        Ok(tokenized.operators)
    } else {
        Err(tokenized.faults.swap_remove(0))
    }
}

/// Parse content stream bytes, skipping malformed tokens.
///
/// Comments (`%` to end of line) are stripped and inline images
/// (`BI … ID … EI`) are consumed without producing an operator.
pub fn tokenize_lenient(input: &[u8]) -> Tokenized {
    let mut lexer = Lexer { input, pos: 0 };
    let mut out = Tokenized::default();
    let mut operands: Vec<Operand> = Vec::new();

    loop {
        lexer.skip_whitespace_and_comments();
        let Some(b) = lexer.peek() else {
            break;
        };
        let start = lexer.pos;
        let step = match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'*' | b'\'' | b'"' => {
                let keyword = lexer.keyword();
                match keyword.as_str() {
                    "true" => operands.push(Operand::Boolean(true)),
                    "false" => operands.push(Operand::Boolean(false)),
                    "null" => operands.push(Operand::Null),
                    "BI" => {
                        operands.clear();
                        if let Err(e) = lexer.skip_inline_image() {
                            out.faults.push(e);
                        }
                    }
                    _ => out.operators.push(Operator {
                        name: keyword,
                        operands: std::mem::take(&mut operands),
                        offset: start,
                    }),
                }
                Ok(())
            }
            b']' => Err(InterpretError::tokenize(start, "unexpected ']' outside array")),
            b')' | b'>' | b'{' | b'}' => Err(InterpretError::tokenize(
                start,
                format!("unexpected {:?}", b as char),
            )),
            _ => lexer.operand().map(|op| operands.push(op)),
        };
        if let Err(fault) = step {
            out.faults.push(fault);
            operands.clear();
            lexer.recover(start);
        }
    }
    out
}

/// Returns `true` if `b` is a PDF whitespace character.
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

/// Returns `true` if `b` is a PDF delimiter character.
fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Convert a hex digit character to its value (0-15).
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos + ahead).copied()
    }

    fn fault(&self, message: impl Into<String>) -> InterpretError {
        InterpretError::tokenize(self.pos, message)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|c| c != b'\n' && c != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Skip past the token that started at `start` to the next whitespace.
    fn recover(&mut self, start: usize) {
        self.pos = self.pos.max(start + 1);
        while self.peek().is_some_and(|b| !is_whitespace(b)) {
            self.pos += 1;
        }
    }

    /// Parse one operand (anything but a bare keyword).
    fn operand(&mut self) -> Result<Operand, InterpretError> {
        match self.peek() {
            Some(b'(') => self.literal_string().map(Operand::LiteralString),
            Some(b'<') if self.peek_at(1) == Some(b'<') => {
                self.dictionary().map(Operand::Dictionary)
            }
            Some(b'<') => self.hex_string().map(Operand::HexString),
            Some(b'[') => self.array().map(Operand::Array),
            Some(b'/') => Ok(Operand::Name(self.name())),
            Some(b'0'..=b'9' | b'+' | b'-' | b'.') => self.number(),
            Some(b'a'..=b'z' | b'A'..=b'Z') => Ok(match self.keyword().as_str() {
                "true" => Operand::Boolean(true),
                "false" => Operand::Boolean(false),
                "null" => Operand::Null,
                other => Operand::Name(other.to_string()),
            }),
            Some(b) => Err(self.fault(format!("unexpected byte 0x{b:02X}"))),
            None => Err(self.fault("unexpected end of stream")),
        }
    }

    /// Literal string `(...)` with balanced parentheses and escapes.
    fn literal_string(&mut self) -> Result<Vec<u8>, InterpretError> {
        let start = self.pos;
        self.pos += 1;
        let mut result = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    result.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(result);
                    }
                    result.push(b);
                }
                b'\\' => {
                    let Some(escaped) = self.peek() else {
                        break;
                    };
                    self.pos += 1;
                    match escaped {
                        b'n' => result.push(b'\n'),
                        b'r' => result.push(b'\r'),
                        b't' => result.push(b'\t'),
                        b'b' => result.push(0x08),
                        b'f' => result.push(0x0C),
                        // line continuation
                        b'\r' => {
                            if self.peek() == Some(b'\n') {
                                self.pos += 1;
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut val = u32::from(escaped - b'0');
                            for _ in 0..2 {
                                match self.peek() {
                                    Some(d @ b'0'..=b'7') => {
                                        val = val * 8 + u32::from(d - b'0');
                                        self.pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            // high-order overflow is ignored
                            result.push((val & 0xFF) as u8);
                        }
                        other => result.push(other),
                    }
                }
                _ => result.push(b),
            }
        }
        Err(InterpretError::tokenize(start, "unterminated literal string"))
    }

    /// Hex string `<...>`; an odd digit count gets a trailing 0.
    fn hex_string(&mut self) -> Result<Vec<u8>, InterpretError> {
        let start = self.pos;
        self.pos += 1;
        let mut digits = Vec::new();
        loop {
            match self.peek() {
                None => return Err(InterpretError::tokenize(start, "unterminated hex string")),
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b) if is_whitespace(b) => self.pos += 1,
                Some(b) => {
                    let v = hex_value(b)
                        .ok_or_else(|| self.fault(format!("invalid hex digit {:?}", b as char)))?;
                    digits.push(v);
                    self.pos += 1;
                }
            }
        }
        if digits.len() % 2 != 0 {
            digits.push(0);
        }
        Ok(digits.chunks(2).map(|c| (c[0] << 4) | c[1]).collect())
    }

    /// Array `[...]`.
    fn array(&mut self) -> Result<Vec<Operand>, InterpretError> {
        let start = self.pos;
        self.pos += 1;
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => return Err(InterpretError::tokenize(start, "unterminated array")),
                Some(b']') => {
                    self.pos += 1;
                    return Ok(elements);
                }
                Some(_) => elements.push(self.operand()?),
            }
        }
    }

    /// Dictionary `<< /Key value ... >>`.
    fn dictionary(&mut self) -> Result<Vec<(String, Operand)>, InterpretError> {
        let start = self.pos;
        self.pos += 2;
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => return Err(InterpretError::tokenize(start, "unterminated dictionary")),
                (Some(b'>'), Some(b'>')) => {
                    self.pos += 2;
                    return Ok(entries);
                }
                (Some(b'/'), _) => {
                    let key = self.name();
                    self.skip_whitespace_and_comments();
                    let value = self.operand()?;
                    entries.push((key, value));
                }
                _ => return Err(self.fault("expected name key in dictionary")),
            }
        }
    }

    /// `/Name` token with `#XX` escapes resolved.
    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !is_whitespace(b) && !is_delimiter(b))
        {
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];
        let mut name = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    name.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            name.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&name).into_owned()
    }

    /// Integer or real number.
    fn number(&mut self) -> Result<Operand, InterpretError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut has_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'.' if !has_dot => has_dot = true,
                b'0'..=b'9' => {}
                _ => break,
            }
            self.pos += 1;
        }
        let token = String::from_utf8_lossy(&self.input[start..self.pos]);
        let parsed = if has_dot {
            token.parse::<f64>().ok().map(Operand::Real)
        } else {
            token.parse::<i64>().ok().map(Operand::Integer)
        };
        parsed.ok_or_else(|| InterpretError::tokenize(start, format!("invalid number {token:?}")))
    }

    /// Keyword: alphabetic plus `*`, `'` and `"`.
    fn keyword(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphabetic() || matches!(b, b'*' | b'\'' | b'"'))
        {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Consume an inline image after `BI`: dictionary entries, `ID`, the
    /// binary data, and the closing `EI`.
    fn skip_inline_image(&mut self) -> Result<(), InterpretError> {
        let start = self.pos;
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => {
                    return Err(InterpretError::tokenize(
                        start,
                        "unterminated inline image (missing ID)",
                    ));
                }
                (Some(b'I'), Some(b'D'))
                    if self.peek_at(2).is_none_or(is_whitespace) =>
                {
                    self.pos += 3;
                    break;
                }
                _ => {
                    self.operand()?;
                }
            }
        }
        while self.pos < self.input.len() {
            let at_boundary = self.pos == 0 || is_whitespace(self.input[self.pos - 1]);
            if at_boundary
                && self.peek() == Some(b'E')
                && self.peek_at(1) == Some(b'I')
                && self
                    .peek_at(2)
                    .is_none_or(|b| is_whitespace(b) || is_delimiter(b))
            {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(InterpretError::tokenize(
            start,
            "unterminated inline image (missing EI)",
        ))
    }
}
