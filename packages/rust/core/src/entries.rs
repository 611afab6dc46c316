//! Parsing of KB source lines (`key --- value`).

use std::io::BufRead;

use kbload_shared::KbEntry;

/// Outcome of parsing a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Nothing but whitespace and delimiters.
    Blank,
    /// Exactly one key and one value.
    Entry(KbEntry),
    /// Any other number of non-empty fields, kept for diagnostics.
    Malformed(Vec<String>),
}

/// A parsed line with its 1-based position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    pub number: usize,
    pub parsed: ParsedLine,
}

/// Split `line` on `delimiter`, dropping fields that are empty after trimming.
pub fn parse_line(line: &str, delimiter: &str) -> ParsedLine {
    let mut fields: Vec<String> = line
        .split(delimiter)
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(String::from)
        .collect();

    match fields.len() {
        0 => ParsedLine::Blank,
        2 => {
            let value = fields.pop().unwrap_or_default();
            let key = fields.pop().unwrap_or_default();
            ParsedLine::Entry(KbEntry { key, value })
        }
        _ => ParsedLine::Malformed(fields),
    }
}

/// Lazy iterator over the parsed lines of a reader.
///
/// Each line is read and parsed on demand; the iterator is consumed once.
/// Bytes that are not valid UTF-8 are replaced with U+FFFD so that a legacy
/// encoded line never stops the load.
pub struct EntryLines<R> {
    reader: R,
    buf: Vec<u8>,
    delimiter: String,
    number: usize,
}

impl<R: BufRead> EntryLines<R> {
    pub fn new(reader: R, delimiter: impl Into<String>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            delimiter: delimiter.into(),
            number: 0,
        }
    }
}

impl<R: BufRead> Iterator for EntryLines<R> {
    type Item = std::io::Result<NumberedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.number += 1;
                let text = String::from_utf8_lossy(&self.buf);
                Some(Ok(NumberedLine {
                    number: self.number,
                    parsed: parse_line(&text, &self.delimiter),
                }))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
