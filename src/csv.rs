// src/csv.rs
//
// Delimited text in and out. Deals files come from the CRM export or from
// spreadsheet tools, so quoting, CRLF and a UTF-8 BOM all show up.

use std::io::{self, Write};

/// Split delimited text into rows of cells. Blank lines are dropped, a
/// trailing row without a newline is kept.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rd = RowReader { sep, rows: Vec::new(), row: Vec::new(), cell: String::new() };
    let mut quoted = false;
    let mut it = text.chars().peekable();

    while let Some(ch) = it.next() {
        if quoted {
            match ch {
                '"' if it.peek() == Some(&'"') => {
                    it.next();
                    rd.cell.push('"');
                }
                '"' => quoted = false,
                _ => rd.cell.push(ch),
            }
            continue;
        }
        match ch {
            '"' => quoted = true,
            '\r' => {
                if it.peek() == Some(&'\n') {
                    it.next();
                }
                rd.end_row();
            }
            '\n' => rd.end_row(),
            c if c == rd.sep => rd.end_cell(),
            c => rd.cell.push(c),
        }
    }
    // unterminated quotes still flush
    if !rd.cell.is_empty() || !rd.row.is_empty() {
        rd.end_row();
    }
    rd.rows
}

struct RowReader {
    sep: char,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

impl RowReader {
    fn end_cell(&mut self) {
        self.row.push(std::mem::take(&mut self.cell));
    }

    fn end_row(&mut self) {
        self.end_cell();
        let row = std::mem::take(&mut self.row);
        if !(row.len() == 1 && row[0].is_empty()) {
            self.rows.push(row);
        }
    }
}

/// Guess the delimiter from the header line: tab wins if it outnumbers commas.
pub fn sniff_delimiter(text: &str) -> char {
    let first = text.lines().next().unwrap_or("");
    let tabs = first.matches('\t').count();
    let commas = first.matches(',').count();
    if tabs > commas { '\t' } else { ',' }
}

/// Header name → column index lookup.
pub struct HeaderIndex {
    names: Vec<String>,
}

impl HeaderIndex {
    pub fn new(header: &[String]) -> Self {
        Self { names: header.iter().map(|h| h.trim().to_string()).collect() }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h == name)
    }

    /// Cell by column name; missing columns and short rows read as "".
    pub fn cell<'r>(&self, row: &'r [String], name: &str) -> &'r str {
        self.get(name)
            .and_then(|i| row.get(i))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}

fn quote_if_needed(cell: &str, sep: char) -> std::borrow::Cow<'_, str> {
    if cell.contains([sep, '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\"")).into()
    } else {
        cell.into()
    }
}

/// One `\n`-terminated row. Cells are quoted only when they must be.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{sep}")?;
        }
        w.write_all(quote_if_needed(cell, sep).as_bytes())?;
    }
    w.write_all(b"\n")
}

/// Whole table as text, for the clipboard and for tests.
pub fn rows_to_string(headers: Option<&[String]>, rows: &[Vec<String>], sep: char) -> String {
    let mut out = String::new();
    for r in headers.into_iter().chain(rows.iter().map(Vec::as_slice)) {
        let line: Vec<_> = r.iter().map(|c| quote_if_needed(c, sep)).collect();
        out.push_str(&line.join(&sep.to_string()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_and_crlf() {
        let rows = parse_rows("a,\"b, c\",\"say \"\"hi\"\"\"\r\n1,2,3\r\n", ',');
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "b, c", "say \"hi\""]);
        assert_eq!(rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn trailing_empty_cells_survive() {
        let rows = parse_rows("a,b,c\n1,,\n", ',');
        assert_eq!(rows[1], vec!["1", "", ""]);
    }

    #[test]
    fn writer_quotes_only_when_needed() {
        let s = rows_to_string(None, &[row!["plain", "a,b", "q\"q"]], ',');
        assert_eq!(s, "plain,\"a,b\",\"q\"\"q\"\n");
        let t = rows_to_string(None, &[row!["a,b", "c"]], '\t');
        assert_eq!(t, "a,b\tc\n");
    }

    #[test]
    fn sniffs_tabs() {
        assert_eq!(sniff_delimiter("a\tb\tc\n"), '\t');
        assert_eq!(sniff_delimiter("a,b\tc\n"), ',');
    }
}
