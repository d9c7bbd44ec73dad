use std::fmt;
use std::io::{self, Write};

use crate::table::{Aggregate, Table};

/// Final entries sorted byte-lexicographically by name.
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    entries: Vec<(&'a [u8], Aggregate)>,
}

impl<'a> Summary<'a> {
    pub fn from_table(table: &Table<'a>) -> Self {
        let mut entries: Vec<_> = table
            .iter()
            .map(|e| (e.name.as_bytes(), e.aggregate))
            .collect();
        // Names are unique within a table.
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        Self { entries }
    }

    pub fn entries(&self) -> &[(&'a [u8], Aggregate)] {
        &self.entries
    }

    /// Writes `{name=min/mean/max, ...}` with one fractional digit per
    /// statistic and no trailing newline. Names are written as raw bytes.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(b"{")?;
        for (i, (name, agg)) in self.entries.iter().enumerate() {
            if i != 0 {
                out.write_all(b", ")?;
            }
            out.write_all(name)?;
            write!(out, "={:.1}/{:.1}/{:.1}", agg.min, agg.mean(), agg.max)?;
        }
        out.write_all(b"}")
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write_to(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}
