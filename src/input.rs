use std::fs::File;
use std::io::{self, BufRead, BufReader};

use tracing::warn;

/// One line of input together with where it came from.
///
/// `seq` is a global monotone sequence number assigned by the reader; it is
/// what makes equal-score results come out in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// Source file; empty for standard input.
    pub filename: String,
    /// 1-based line number within the source.
    pub lineno: u64,
    /// Global position in the input stream, starting at 0.
    pub seq: u64,
    pub text: String,
}

/// Streaming line reader over a list of input sources.
///
/// Sources are opened lazily, one at a time. A source that cannot be opened
/// is reported on standard error and skipped; the remaining sources are
/// still read. The terminating newline (and a preceding `\r`) is stripped
/// from each line, everything else is passed through unchanged.
pub struct LineReader {
    pending: std::vec::IntoIter<String>,
    current: Option<(String, Box<dyn BufRead>)>,
    lineno: u64,
    seq: u64,
    opened: usize,
    failed: usize,
}

impl LineReader {
    /// Create a reader over `filenames`; an empty list means standard input.
    pub fn open(filenames: &[String]) -> Self {
        let sources = if filenames.is_empty() {
            vec![String::new()]
        } else {
            filenames.to_vec()
        };
        Self {
            pending: sources.into_iter(),
            current: None,
            lineno: 0,
            seq: 0,
            opened: 0,
            failed: 0,
        }
    }

    /// Number of sources opened successfully so far.
    pub fn opened(&self) -> usize {
        self.opened
    }

    /// Number of sources that could not be opened.
    pub fn failed(&self) -> usize {
        self.failed
    }

    fn open_source(name: &str) -> io::Result<Box<dyn BufRead>> {
        if name.is_empty() {
            Ok(Box::new(io::stdin().lock()))
        } else {
            Ok(Box::new(BufReader::new(File::open(name)?)))
        }
    }

    fn advance_source(&mut self) -> bool {
        loop {
            let Some(name) = self.pending.next() else {
                return false;
            };
            match Self::open_source(&name) {
                Ok(reader) => {
                    self.opened += 1;
                    self.lineno = 0;
                    self.current = Some((name, reader));
                    return true;
                }
                Err(err) => {
                    self.failed += 1;
                    warn!(file = %name, error = %err, "cannot open input");
                    eprintln!("lf: {name}: {err}");
                }
            }
        }
    }
}

impl Iterator for LineReader {
    type Item = LineRecord;

    fn next(&mut self) -> Option<LineRecord> {
        loop {
            if self.current.is_none() && !self.advance_source() {
                return None;
            }
            let Some((name, reader)) = self.current.as_mut() else {
                return None;
            };
            let mut text = String::new();
            match reader.read_line(&mut text) {
                Ok(0) => {
                    self.current = None;
                }
                Ok(_) => {
                    if text.ends_with('\n') {
                        text.pop();
                        if text.ends_with('\r') {
                            text.pop();
                        }
                    }
                    self.lineno += 1;
                    let record = LineRecord {
                        filename: name.clone(),
                        lineno: self.lineno,
                        seq: self.seq,
                        text,
                    };
                    self.seq += 1;
                    return Some(record);
                }
                Err(err) => {
                    warn!(file = %name, error = %err, "read error, dropping source");
                    eprintln!("lf: {name}: {err}");
                    self.current = None;
                }
            }
        }
    }
}
