//! Fixed binary record layouts
//!
//! A layout string lists field types separated by commas, each optionally
//! prefixed with a repeat count: `3d,ui,s[8]` is three doubles, an unsigned
//! 32-bit integer and an 8-byte string. All numbers are little-endian.
//!
//! | type   | size | meaning            |
//! |--------|------|--------------------|
//! | `b`    | 1    | signed byte        |
//! | `ub`   | 1    | unsigned byte      |
//! | `w`    | 2    | signed 16-bit      |
//! | `uw`   | 2    | unsigned 16-bit    |
//! | `i`    | 4    | signed 32-bit      |
//! | `ui`   | 4    | unsigned 32-bit    |
//! | `l`    | 8    | signed 64-bit      |
//! | `ul`   | 8    | unsigned 64-bit    |
//! | `c`    | 1    | character          |
//! | `f`    | 4    | float              |
//! | `d`    | 8    | double             |
//! | `s[N]` | N    | NUL-padded string  |

use crate::error::SortError;
use crate::record::FieldValue;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Char,
    Float,
    Double,
    Str(usize),
}

impl FieldType {
    pub fn size(self) -> usize {
        match self {
            FieldType::Int8 | FieldType::UInt8 | FieldType::Char => 1,
            FieldType::Int16 | FieldType::UInt16 => 2,
            FieldType::Int32 | FieldType::UInt32 | FieldType::Float => 4,
            FieldType::Int64 | FieldType::UInt64 | FieldType::Double => 8,
            FieldType::Str(len) => len,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "b" => FieldType::Int8,
            "ub" => FieldType::UInt8,
            "w" => FieldType::Int16,
            "uw" => FieldType::UInt16,
            "i" => FieldType::Int32,
            "ui" => FieldType::UInt32,
            "l" => FieldType::Int64,
            "ul" => FieldType::UInt64,
            "c" => FieldType::Char,
            "f" => FieldType::Float,
            "d" => FieldType::Double,
            _ => {
                let len = token.strip_prefix("s[")?.strip_suffix(']')?;
                FieldType::Str(len.parse().ok().filter(|&len| len > 0)?)
            }
        })
    }

    /// Decodes a field from exactly `self.size()` bytes.
    fn decode(self, bytes: &[u8]) -> FieldValue<'_> {
        macro_rules! le {
            ($t:ty) => {
                <$t>::from_le_bytes(bytes.try_into().unwrap_or_default()) as f64
            };
        }
        match self {
            FieldType::Int8 | FieldType::Char => FieldValue::Number(bytes[0] as i8 as f64),
            FieldType::UInt8 => FieldValue::Number(bytes[0] as f64),
            FieldType::Int16 => FieldValue::Number(le!(i16)),
            FieldType::UInt16 => FieldValue::Number(le!(u16)),
            FieldType::Int32 => FieldValue::Number(le!(i32)),
            FieldType::UInt32 => FieldValue::Number(le!(u32)),
            FieldType::Int64 => FieldValue::Number(le!(i64)),
            FieldType::UInt64 => FieldValue::Number(le!(u64)),
            FieldType::Float => FieldValue::Number(le!(f32)),
            FieldType::Double => FieldValue::Number(le!(f64)),
            FieldType::Str(_) => {
                let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                FieldValue::Text(Cow::Borrowed(&bytes[..end]))
            }
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Int8 => "b",
            FieldType::UInt8 => "ub",
            FieldType::Int16 => "w",
            FieldType::UInt16 => "uw",
            FieldType::Int32 => "i",
            FieldType::UInt32 => "ui",
            FieldType::Int64 => "l",
            FieldType::UInt64 => "ul",
            FieldType::Char => "c",
            FieldType::Float => "f",
            FieldType::Double => "d",
            FieldType::Str(len) => return write!(f, "s[{len}]"),
        };
        f.write_str(name)
    }
}

/// Largest record a layout may describe
pub const MAX_RECORD_SIZE: usize = 1 << 24;

/// Parsed layout with precomputed field offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    fields: Vec<FieldType>,
    offsets: Vec<usize>,
    size: usize,
}

impl Layout {
    /// Record size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    /// Reads field `index` of `record`, which must be `self.size()` bytes.
    pub fn field<'a>(&self, record: &'a [u8], index: usize) -> Option<FieldValue<'a>> {
        let field = *self.fields.get(index)?;
        let start = self.offsets[index];
        let bytes = record.get(start..start + field.size())?;
        Some(field.decode(bytes))
    }
}

/// Expanded form, one type per field: `2d` is written as `d,d`.
impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl FromStr for Layout {
    type Err = SortError;

    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| SortError::InvalidLayout {
            layout: layout.to_string(),
            reason,
        };
        let mut groups = Vec::new();
        let mut size: usize = 0;
        for token in layout.split(',').map(str::trim) {
            if token.is_empty() {
                return Err(invalid("empty field type".to_string()));
            }
            let digits = token.chars().take_while(char::is_ascii_digit).count();
            let (count, name) = token.split_at(digits);
            let count = if count.is_empty() {
                1
            } else {
                count
                    .parse::<usize>()
                    .map_err(|e| invalid(format!("bad repeat count in \"{token}\": {e}")))?
            };
            let field = FieldType::parse(name)
                .ok_or_else(|| invalid(format!("unknown field type \"{name}\"")))?;
            size = field
                .size()
                .checked_mul(count)
                .and_then(|bytes| size.checked_add(bytes))
                .filter(|&total| total <= MAX_RECORD_SIZE)
                .ok_or_else(|| {
                    invalid(format!("record size exceeds {MAX_RECORD_SIZE} bytes at \"{token}\""))
                })?;
            groups.push((field, count));
        }

        let mut fields = Vec::new();
        let mut offsets = Vec::new();
        let mut offset = 0;
        for (field, count) in groups {
            for _ in 0..count {
                fields.push(field);
                offsets.push(offset);
                offset += field.size();
            }
        }
        if size == 0 {
            return Err(invalid("layout has no fields".to_string()));
        }
        Ok(Layout {
            fields,
            offsets,
            size,
        })
    }
}
