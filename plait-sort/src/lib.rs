//! Multi-key grouping sort for delimited and fixed-layout records
//!
//!     Reads every record of the input, groups records by a composite key built from named
//!     fields, and writes the groups out in key order. Records with equal keys keep their input
//!     order. The whole input is held in memory; there is no external merge phase.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # SortError
//!     ├── fields.rs               # KeyProjection, Key, KeyPart
//!     ├── layout.rs               # binary record layouts
//!     ├── record.rs               # text and binary record readers
//!     ├── engine.rs               # GroupingSort
//!     └── lib.rs                  # SortOptions and the sort() entry point
//!
//!     Keys are numeric (`f64`) unless string keys are requested, which compare raw bytes.
//!     Numeric text fields are trimmed and an empty field counts as zero.

pub mod engine;
pub mod error;
pub mod fields;
pub mod layout;
pub mod record;

pub use engine::{GroupingSort, SortOrder};
pub use error::SortError;
pub use fields::{split_names, Key, KeyPart, KeyProjection};
pub use layout::{FieldType, Layout};
pub use record::{BinaryReader, FieldValue, RecordReader, TextReader, TextRecord};

use log::{debug, info};
use ordered_float::OrderedFloat;
use std::io::{BufRead, Write};

/// Settings for one sort run, fixed before any input is read
#[derive(Debug, Clone, PartialEq)]
pub struct SortOptions {
    /// Input field names; empty names are placeholders
    pub fields: Vec<String>,
    /// Key order; defaults to `fields`
    pub order: Option<Vec<String>>,
    pub string_keys: bool,
    pub reverse: bool,
    /// Flush the output after every record
    pub flush: bool,
    pub delimiter: char,
    /// Fixed binary layout; text input when `None`
    pub binary: Option<Layout>,
}

impl Default for SortOptions {
    fn default() -> Self {
        SortOptions {
            fields: Vec::new(),
            order: None,
            string_keys: false,
            reverse: false,
            flush: false,
            delimiter: ',',
            binary: None,
        }
    }
}

impl SortOptions {
    fn sort_order(&self) -> SortOrder {
        if self.reverse {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

/// What a run did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSummary {
    pub records: usize,
    pub groups: usize,
}

/// Sorts `input` into `output`.
///
/// The key projection and the binary layout are checked before the first
/// record is read.
pub fn sort<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    options: &SortOptions,
) -> Result<SortSummary, SortError> {
    let projection = KeyProjection::resolve(&options.fields, options.order.as_deref())?;
    debug!("key slots read fields {:?}", projection.slots());

    match &options.binary {
        Some(layout) => {
            if projection.required_fields() > layout.len() {
                return Err(SortError::InvalidLayout {
                    layout: layout.to_string(),
                    reason: format!(
                        "key needs {} field(s), layout has {}",
                        projection.required_fields(),
                        layout.len()
                    ),
                });
            }
            let reader = BinaryReader::new(input, layout.clone());
            dispatch(reader, &mut output, &projection, options)
        }
        None => {
            let reader = TextReader::new(input, options.delimiter);
            dispatch(reader, &mut output, &projection, options)
        }
    }
}

fn dispatch<T: RecordReader, W: Write>(
    reader: T,
    output: &mut W,
    projection: &KeyProjection,
    options: &SortOptions,
) -> Result<SortSummary, SortError> {
    if options.string_keys {
        run::<Vec<u8>, _, _>(reader, output, projection, options)
    } else {
        run::<OrderedFloat<f64>, _, _>(reader, output, projection, options)
    }
}

fn run<K: KeyPart, T: RecordReader, W: Write>(
    mut reader: T,
    output: &mut W,
    projection: &KeyProjection,
    options: &SortOptions,
) -> Result<SortSummary, SortError> {
    let mut engine = GroupingSort::<K>::new();
    while let Some(record) = reader.read()? {
        let number = engine.len() + 1;
        let found = reader.field_count(&record);
        let key = projection.extract(number, found, |i| reader.field(&record, i))?;
        engine.push(key, reader.capture(&record));
    }
    engine.write_to(output, options.sort_order(), options.flush)?;

    let summary = SortSummary {
        records: engine.len(),
        groups: engine.group_count(),
    };
    info!(
        "sorted {} record(s) in {} group(s)",
        summary.records, summary.groups
    );
    Ok(summary)
}
