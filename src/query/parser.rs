//! Query language parser.
//!
//! Tokens are whitespace-separated except inside phrase literals. Precedence
//! is `!` over juxtaposition (AND) over `|` (OR); parentheses group.
//! Offsets in errors are byte positions into the query string.

use std::error::Error;
use std::fmt;

use crate::query::ast::{Atom, AtomKind, Query};

/// A malformed query, with the byte offset of the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query parse error at byte {}: {}", self.offset, self.message)
    }
}

impl Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Word { text: String, offset: usize },
    Phrase { text: String, offset: usize },
    Bang(usize),
    Pipe(usize),
    Open(usize),
    Close(usize),
}

impl Tok {
    fn offset(&self) -> usize {
        match self {
            Tok::Word { offset, .. } | Tok::Phrase { offset, .. } => *offset,
            Tok::Bang(o) | Tok::Pipe(o) | Tok::Open(o) | Tok::Close(o) => *o,
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Tok>, ParseError> {
    let bytes = input.as_bytes();
    let mut toks = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' => i += 1,
            b'|' => {
                toks.push(Tok::Pipe(i));
                i += 1;
            }
            b'!' => {
                toks.push(Tok::Bang(i));
                i += 1;
            }
            b'(' => {
                toks.push(Tok::Open(i));
                i += 1;
            }
            b')' => {
                toks.push(Tok::Close(i));
                i += 1;
            }
            b'"' => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(ParseError::new(start, "unterminated phrase"));
                }
                toks.push(Tok::Phrase {
                    text: input[start + 1..i].to_string(),
                    offset: start,
                });
                i += 1;
            }
            _ => {
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t' | b'"' | b'(' | b')' | b'|')
                {
                    i += 1;
                }
                toks.push(Tok::Word {
                    text: input[start..i].to_string(),
                    offset: start,
                });
            }
        }
    }
    Ok(toks)
}

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
    end: usize,
    ignore_case: bool,
    smart_case: bool,
}

/// Parse a query string into an operator tree.
///
/// `ignore_case` and `smart_case` fix each atom's case sensitivity at parse
/// time: with smart case, an atom containing an uppercase byte compares
/// case-sensitively regardless of `ignore_case`.
pub fn parse(input: &str, ignore_case: bool, smart_case: bool) -> Result<Query, ParseError> {
    let toks = tokenize(input)?;
    if toks.is_empty() {
        return Ok(Query::And(Vec::new()));
    }
    let mut parser = Parser {
        toks,
        pos: 0,
        end: input.len(),
        ignore_case,
        smart_case,
    };
    let query = parser.parse_or()?;
    match parser.peek() {
        None => Ok(query),
        Some(tok) => Err(ParseError::new(tok.offset(), "unmatched ')'")),
    }
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn here(&self) -> usize {
        self.peek().map_or(self.end, Tok::offset)
    }

    fn parse_or(&mut self) -> Result<Query, ParseError> {
        let mut parts = vec![self.parse_and()?];
        while matches!(self.peek(), Some(Tok::Pipe(_))) {
            self.bump();
            parts.push(self.parse_and()?);
        }
        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(Query::Or(parts))
        }
    }

    fn parse_and(&mut self) -> Result<Query, ParseError> {
        let mut units = Vec::new();
        while matches!(
            self.peek(),
            Some(Tok::Word { .. } | Tok::Phrase { .. } | Tok::Bang(_) | Tok::Open(_))
        ) {
            units.push(self.parse_unary()?);
        }
        match units.len() {
            0 => Err(ParseError::new(self.here(), "expected a search term")),
            1 => Ok(units.remove(0)),
            _ => Ok(Query::And(units)),
        }
    }

    fn parse_unary(&mut self) -> Result<Query, ParseError> {
        let Some(tok) = self.bump() else {
            return Err(ParseError::new(self.end, "expected a search term"));
        };
        match tok {
            Tok::Bang(offset) => {
                if self.peek().is_none() {
                    return Err(ParseError::new(offset, "expected a search term after '!'"));
                }
                Ok(negate(self.parse_unary()?))
            }
            Tok::Open(offset) => {
                let inner = self.parse_or()?;
                match self.bump() {
                    Some(Tok::Close(_)) => Ok(inner),
                    _ => Err(ParseError::new(offset, "unmatched '('")),
                }
            }
            Tok::Close(offset) => Err(ParseError::new(offset, "unmatched ')'")),
            Tok::Pipe(offset) => Err(ParseError::new(offset, "expected a search term")),
            Tok::Phrase { text, .. } => {
                let mut atom = Atom::new(text, AtomKind::Phrase);
                atom.case_sensitive = self.resolve_case(&atom.text);
                Ok(Query::Leaf(atom))
            }
            Tok::Word { text, .. } => Ok(Query::Leaf(self.word_atom(&text))),
        }
    }

    /// Derive atom kind and anchors from the word's syntax markers.
    fn word_atom(&self, word: &str) -> Atom {
        let mut body = word;
        let anchor_prefix = body.starts_with('^');
        if anchor_prefix {
            body = &body[1..];
        }
        let anchor_suffix = body.ends_with('$');
        if anchor_suffix {
            body = &body[..body.len() - 1];
        }
        let exact_marker = body.starts_with('=');
        if exact_marker {
            body = &body[1..];
        }

        let kind = if exact_marker || anchor_prefix || anchor_suffix {
            AtomKind::Exact
        } else {
            AtomKind::Fuzzy
        };

        let mut atom = Atom::new(body, kind);
        // '=' and '^..$' both mean whole-line equality; plain anchors keep
        // their one-sided meaning.
        atom.anchor_prefix = anchor_prefix;
        atom.anchor_suffix = anchor_suffix;
        atom.case_sensitive = self.resolve_case(body);
        atom
    }

    fn resolve_case(&self, body: &str) -> bool {
        !self.ignore_case
            || (self.smart_case && body.bytes().any(|b| b.is_ascii_uppercase()))
    }
}

fn negate(node: Query) -> Query {
    match node {
        Query::Leaf(mut atom) => {
            atom.negated = !atom.negated;
            Query::Leaf(atom)
        }
        Query::Not(inner) => *inner,
        other => Query::Not(Box::new(other)),
    }
}
