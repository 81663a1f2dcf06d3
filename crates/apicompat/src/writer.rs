//! Report writer fed by the difference traverser.
//!
//! Differences are buffered per group and written when the group closes:
//! one group per assembly when grouping by assembly, otherwise a single group
//! for the whole comparison. Groups without differences print nothing. The
//! report ends with `Total Issues: N`.

use std::io::{self, Write};

use apicompat_core::{Difference, DifferenceVisitor};
use serde::{Deserialize, Serialize};

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Header per group, one `Id: message` line per difference.
    #[default]
    Text,
    /// A single JSON document with every group and the total.
    Json,
}

#[derive(Debug, Serialize)]
struct Group {
    header: String,
    differences: Vec<Difference>,
}

#[derive(Serialize)]
struct Report<'a> {
    groups: &'a [Group],
    total: usize,
}

/// Writes differences to `out` in the chosen [`OutputFormat`].
#[derive(Debug)]
pub struct DifferenceWriter<W> {
    out: W,
    format: OutputFormat,
    buffer: Vec<Difference>,
    groups: Vec<Group>,
    total: usize,
}

impl<W: Write> DifferenceWriter<W> {
    /// Creates a writer.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            buffer: Vec::new(),
            groups: Vec::new(),
            total: 0,
        }
    }

    /// Number of differences flushed so far.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Closes the ungrouped group, if any differences are pending, and writes
    /// the total. Returns the number of differences in the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn finish(&mut self, implementation_set: &str, contract_set: &str) -> io::Result<usize> {
        self.flush_group(format!(
            "Compat issues between implementation set {implementation_set} and contract set {contract_set}:"
        ))?;

        let total = std::mem::take(&mut self.total);
        match self.format {
            OutputFormat::Text => writeln!(self.out, "Total Issues: {total}")?,
            OutputFormat::Json => {
                let groups = std::mem::take(&mut self.groups);
                let report = Report {
                    groups: &groups,
                    total,
                };
                serde_json::to_writer_pretty(&mut self.out, &report)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(total)
    }

    /// Returns the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn flush_group(&mut self, header: String) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let differences = std::mem::take(&mut self.buffer);
        self.total += differences.len();

        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{header}")?;
                for difference in &differences {
                    writeln!(self.out, "{difference}")?;
                }
            }
            OutputFormat::Json => self.groups.push(Group {
                header,
                differences,
            }),
        }
        Ok(())
    }
}

impl<W: Write> DifferenceVisitor for DifferenceWriter<W> {
    type Error = io::Error;

    fn enter_assembly(&mut self, _name: &str) -> io::Result<()> {
        assert!(
            self.buffer.is_empty(),
            "differences of the previous group were not flushed"
        );
        Ok(())
    }

    fn leave_assembly(&mut self, name: &str) -> io::Result<()> {
        self.flush_group(format!("Compat issues with assembly {name}:"))
    }

    fn visit_difference(&mut self, difference: &Difference) -> io::Result<()> {
        self.buffer.push(difference.clone());
        Ok(())
    }
}
