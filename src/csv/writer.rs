// src/csv/writer.rs
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::listing::{Listing, CSV_COLUMNS};

/// Quote a field only when it needs it: embedded comma, quote, CR or LF.
/// Embedded quotes are doubled so the tokenizer decodes them back.
pub fn escape_field(s: &str) -> String {
    if s.contains(|c| matches!(c, ',' | '"' | '\r' | '\n')) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn render_row(fields: &[String]) -> String {
    let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    escaped.join(",")
}

/// Append listings to a CSV file, writing the header first iff the file
/// is new or empty. Write failures are real errors here, unlike the
/// row-level tolerance on the read side.
pub fn append_listings(path: &Path, rows: &[Listing]) -> io::Result<()> {
    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);

    if is_new {
        writeln!(out, "{}", CSV_COLUMNS.join(","))?;
    }
    for row in rows {
        writeln!(out, "{}", render_row(&row.csv_record()))?;
    }
    out.flush()
}
