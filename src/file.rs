// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::csv::write_row;
use crate::config::options::ExportOptions;
use crate::error::{Error, Result};
use crate::store::DataSet;

/// Write a table to `path` per `export` (delimiter and header policy).
/// Returns the final path written to.
pub fn write_table(path: &Path, table: &DataSet, export: &ExportOptions) -> Result<PathBuf> {
    ensure_parent(path)?;
    let file = File::create(path)?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    let sep = export.format.delimiter();

    if export.include_headers {
        if let Some(h) = &table.headers {
            write_row(&mut out, h, sep)?;
        }
    }
    for row in &table.rows {
        write_row(&mut out, row, sep)?;
    }
    out.flush()?;
    Ok(path.to_path_buf())
}

/// Pretty JSON with a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    ensure_parent(path)?;
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(path.to_path_buf())
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Io(std::io::Error::other(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        ))));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c == '/' || c == '\\' { sep } else { c }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_follow_platform() {
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(normalize_separators("out/a\\b"), format!("out{sep}a{sep}b"));
    }
}
