//! Line-oriented reader shared by every delimited text export.

use crate::parsers::error::ParseError;
use log::debug;

/// How rows of a delimited text export are told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextLayout {
    pub delimiter: u8,
    /// Literal token identifying the header row.
    pub header_marker: &'static str,
    /// When set, a `#` anywhere in a line marks it as a comment, not just at the start.
    pub comment_anywhere: bool,
}

/// A data row and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// A provider table exactly as published: provider-native column names, string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Appends a row, rejecting it if its width differs from the header's.
    pub fn push_row(&mut self, line: usize, fields: Vec<String>) -> Result<(), ParseError> {
        if fields.len() != self.header.len() {
            return Err(ParseError::FieldCount {
                line,
                expected: self.header.len(),
                found: fields.len(),
            });
        }
        self.rows.push(RawRow { line, fields });
        Ok(())
    }

    fn position(&self, name: &str) -> Result<usize, ParseError> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ParseError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Fails with the first of `names` that the header lacks.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), ParseError> {
        names.iter().try_for_each(|name| self.position(name).map(|_| ()))
    }

    /// Cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, ParseError> {
        let idx = self.position(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.fields[idx].as_str())
            .collect())
    }
}

fn is_comment(line: &str, layout: &TextLayout) -> bool {
    line.starts_with('#') || (layout.comment_anywhere && line.contains('#'))
}

/// Maps a record's line in the filtered text back to the line in the export.
fn source_line(kept_lines: &[usize], position: Option<&csv::Position>) -> usize {
    position
        .and_then(|p| usize::try_from(p.line()).ok())
        .and_then(|line| kept_lines.get(line.wrapping_sub(1)).copied())
        .unwrap_or_default()
}

fn record_error(err: csv::Error, kept_lines: &[usize]) -> ParseError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return ParseError::FieldCount {
            line: source_line(kept_lines, pos.as_ref()),
            expected: *expected_len as usize,
            found: *len as usize,
        };
    }
    ParseError::Csv(err)
}

/// Reads a delimited export.
///
/// The first line is always skipped, as are blank and comment lines. The first
/// remaining line containing the layout's header marker becomes the header and
/// every remaining line after it is a data row. Rows are tokenized by the `csv`
/// reader, so quoted fields may contain the delimiter.
pub(crate) fn read_delimited(text: &str, layout: &TextLayout) -> Result<RawTable, ParseError> {
    let mut kept = String::with_capacity(text.len());
    let mut kept_lines = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if idx == 0 || line.trim().is_empty() || is_comment(line, layout) {
            continue;
        }
        // preamble until the marker shows up
        if kept_lines.is_empty() && !line.contains(layout.header_marker) {
            continue;
        }
        kept.push_str(line);
        kept.push('\n');
        kept_lines.push(idx + 1);
    }
    if kept_lines.is_empty() {
        return Err(ParseError::HeaderNotFound {
            marker: layout.header_marker,
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(layout.delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(kept.as_bytes());

    let header = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = RawTable::new(header);
    for record in reader.records() {
        let record = record.map_err(|e| record_error(e, &kept_lines))?;
        let line = source_line(&kept_lines, record.position());
        table.push_row(line, record.iter().map(str::to_string).collect())?;
    }

    debug!(
        "Read {} data rows with {} columns (header marker '{}')",
        table.height(),
        table.header.len(),
        layout.header_marker
    );
    Ok(table)
}
