//! Record readers
//!
//! A reader yields one record at a time together with the bytes that are
//! written back out for it (the capture). Text records are lines split on the
//! delimiter; binary records are fixed-size chunks described by a
//! [`Layout`]. Both work on raw bytes, so input that is not UTF-8 sorts and
//! comes back out unchanged.

use crate::error::SortError;
use crate::layout::Layout;
use log::warn;
use std::borrow::Cow;
use std::io::{BufRead, ErrorKind, Read};
use std::ops::Range;

/// Decoded value of one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Raw field bytes; numeric keys decode them lossily
    Text(Cow<'a, [u8]>),
    Number(f64),
}

impl<'a> FieldValue<'a> {
    pub fn text(text: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(text.as_bytes()))
    }
}

pub trait RecordReader {
    type Record;

    /// Next record, or `None` at end of input
    fn read(&mut self) -> Result<Option<Self::Record>, SortError>;

    /// Bytes written to the output for `record`
    fn capture(&self, record: &Self::Record) -> Vec<u8>;

    fn field_count(&self, record: &Self::Record) -> usize;

    /// Field at `index`, or `None` when the record has no such field
    fn field<'r>(&self, record: &'r Self::Record, index: usize) -> Option<FieldValue<'r>>;
}

/// One input line without its terminator, and where each field sits in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    line: Vec<u8>,
    fields: Vec<Range<usize>>,
}

impl TextRecord {
    fn split(line: Vec<u8>, delimiter: &[u8]) -> Self {
        let mut fields = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i + delimiter.len() <= line.len() {
            if line[i..].starts_with(delimiter) {
                fields.push(start..i);
                i += delimiter.len();
                start = i;
            } else {
                i += 1;
            }
        }
        fields.push(start..line.len());
        TextRecord { line, fields }
    }

    pub fn fields(&self) -> impl Iterator<Item = &[u8]> {
        self.fields.iter().map(|range| &self.line[range.clone()])
    }
}

/// Line-oriented delimited records
pub struct TextReader<R> {
    input: R,
    delimiter: Vec<u8>,
    buffer: Vec<u8>,
}

impl<R: BufRead> TextReader<R> {
    pub fn new(input: R, delimiter: char) -> Self {
        TextReader {
            input,
            delimiter: delimiter.to_string().into_bytes(),
            buffer: Vec::new(),
        }
    }
}

impl<R: BufRead> RecordReader for TextReader<R> {
    type Record = TextRecord;

    fn read(&mut self) -> Result<Option<TextRecord>, SortError> {
        loop {
            self.buffer.clear();
            if self.input.read_until(b'\n', &mut self.buffer)? == 0 {
                return Ok(None);
            }
            let line = self.buffer.strip_suffix(b"\n").unwrap_or(&self.buffer);
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            return Ok(Some(TextRecord::split(line.to_vec(), &self.delimiter)));
        }
    }

    fn capture(&self, record: &TextRecord) -> Vec<u8> {
        let mut line = Vec::with_capacity(record.line.len() + 1);
        line.extend_from_slice(&record.line);
        line.push(b'\n');
        line
    }

    fn field_count(&self, record: &TextRecord) -> usize {
        record.fields.len()
    }

    fn field<'r>(&self, record: &'r TextRecord, index: usize) -> Option<FieldValue<'r>> {
        let range = record.fields.get(index)?.clone();
        Some(FieldValue::Text(Cow::Borrowed(&record.line[range])))
    }
}

/// Fixed-size binary records
pub struct BinaryReader<R> {
    input: R,
    layout: Layout,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(input: R, layout: Layout) -> Self {
        BinaryReader { input, layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl<R: Read> RecordReader for BinaryReader<R> {
    type Record = Vec<u8>;

    fn read(&mut self) -> Result<Option<Vec<u8>>, SortError> {
        let mut bytes = vec![0; self.layout.size()];
        let mut filled = 0;
        while filled < bytes.len() {
            match self.input.read(&mut bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        if filled < bytes.len() {
            warn!(
                "discarding incomplete trailing record: {filled} of {} bytes",
                bytes.len()
            );
            return Ok(None);
        }
        Ok(Some(bytes))
    }

    fn capture(&self, record: &Vec<u8>) -> Vec<u8> {
        record.clone()
    }

    fn field_count(&self, _record: &Vec<u8>) -> usize {
        self.layout.len()
    }

    fn field<'r>(&self, record: &'r Vec<u8>, index: usize) -> Option<FieldValue<'r>> {
        self.layout.field(record, index)
    }
}
