//! Record-at-a-time conversion driver
//!
//! A [`Converter`] pairs an input and an output format. It either reads the
//! whole stream as one record ([`Converter::run_whole`]) or treats every input
//! line as an independent record ([`Converter::run_linewise`]).
//!
//! In linewise mode every record produces exactly one physical output line:
//! the converted text goes through [`sanitize_line`] before it is written. The
//! loop stops at end of input, on an unterminated final line, or when the
//! shutdown flag is raised. The flag is checked each time a read returns and
//! before the line is converted: a line read while the signal arrived is
//! dropped, and a record that has started converting is always completed.

use crate::common::sanitize_line;
use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::registry::FormatRegistry;
use log::{debug, info};
use std::io::{BufRead, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Input exhausted, or its last line had no terminator
    EndOfInput,
    /// The shutdown flag was up when a read returned
    Shutdown,
    /// The single whole-stream record was written
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverStats {
    /// Records converted and written (or skipped for empty output)
    pub records: usize,
    pub stop: StopReason,
}

pub struct Converter<'r> {
    from: &'r dyn Format,
    to: &'r dyn Format,
    options: ConvertOptions,
}

impl<'r> Converter<'r> {
    /// Looks up both formats. Unknown names fail here, before any input is
    /// read.
    pub fn new(
        registry: &'r FormatRegistry,
        from: &str,
        to: &str,
        options: ConvertOptions,
    ) -> Result<Self, FormatError> {
        let from = registry.get(from)?;
        let to = registry.get(to)?;
        if !from.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support parsing",
                from.name()
            )));
        }
        if !to.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support serialization",
                to.name()
            )));
        }
        Ok(Converter { from, to, options })
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Converts one record of text.
    pub fn convert(&self, source: &str) -> Result<String, FormatError> {
        let tree = self.from.parse(source, &self.options)?;
        self.to.serialize(&tree, &self.options)
    }

    /// Reads all of `reader`, converts it as one record and writes the result.
    pub fn run_whole<R: Read, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> Result<DriverStats, FormatError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        let output = self.convert(&source)?;
        writer.write_all(output.as_bytes())?;
        writer.flush()?;

        let stats = DriverStats {
            records: 1,
            stop: StopReason::Complete,
        };
        info!(
            "{} -> {}: converted whole input ({} bytes)",
            self.from.name(),
            self.to.name(),
            source.len()
        );
        Ok(stats)
    }

    /// Converts `reader` line by line until end of input or `shutdown`.
    ///
    /// The first failing record ends the run with its error.
    pub fn run_linewise<R: BufRead, W: Write>(
        &self,
        reader: R,
        writer: W,
        shutdown: &AtomicBool,
    ) -> Result<DriverStats, FormatError> {
        let stats = for_each_line(reader, writer, shutdown, |record| self.convert(record))?;
        info!(
            "{} -> {}: {} record(s), stopped on {:?}",
            self.from.name(),
            self.to.name(),
            stats.records,
            stats.stop
        );
        Ok(stats)
    }
}

/// Runs `record` over every terminated input line and writes each non-empty
/// result, sanitized, as one output line.
///
/// `record` receives the line without its terminator.
pub fn for_each_line<R, W, F>(
    mut reader: R,
    mut writer: W,
    shutdown: &AtomicBool,
    mut record: F,
) -> Result<DriverStats, FormatError>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<String, FormatError>,
{
    let mut line = String::new();
    let mut records = 0;
    let stop = loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if shutdown.load(Ordering::Relaxed) {
            debug!("shutdown requested, dropping {read} byte(s) read");
            break StopReason::Shutdown;
        }
        if read == 0 {
            break StopReason::EndOfInput;
        }
        if !line.ends_with('\n') {
            debug!("dropping unterminated final line ({} bytes)", line.len());
            break StopReason::EndOfInput;
        }
        let output = sanitize_line(&record(line.trim_end_matches(['\n', '\r']))?);
        records += 1;
        if output.is_empty() {
            debug!("record {records}: empty output");
            continue;
        }
        writer.write_all(output.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    };
    Ok(DriverStats { records, stop })
}
