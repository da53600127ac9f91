// Reviewer table import: tab-separated text or the first sheet of a workbook

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use concord_recon::Table;

use crate::error::LoadError;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// True when `path` should be read as a workbook rather than TSV.
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load one reviewer table keyed by `id_column`.
///
/// The table label is the path as given, which is what the report prints.
pub fn load_table(path: &Path, id_column: &str) -> Result<Table, LoadError> {
    let label = path.display().to_string();
    let (headers, records) = if is_spreadsheet(path) {
        read_spreadsheet(path)?
    } else {
        let content = read_file_as_utf8(path)?;
        parse_tsv(&label, &content)?
    };

    let table = Table::from_records(label, id_column, headers, records)?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded table"
    );
    Ok(table)
}

/// Read file and convert to UTF-8 if needed (Windows-1252 fallback)
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let read_err = |source| LoadError::Read {
        path: path.display().to_string(),
        source,
    };
    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Excel on Windows exports text as cp1252
            tracing::debug!(path = %path.display(), "input is not UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Split tab-separated text into a header and records. Blank lines are skipped.
pub fn parse_tsv(label: &str, content: &str) -> Result<(Vec<String>, Vec<Vec<String>>), LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::Parse {
            path: label.to_string(),
            message: e.to_string(),
        })?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    split_header(label, rows)
}

fn read_spreadsheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), LoadError> {
    let label = path.display().to_string();
    let parse_err = |message: String| LoadError::Parse {
        path: label.clone(),
        message,
    };

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| parse_err(format!("failed to open workbook: {e}")))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| parse_err("workbook contains no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| parse_err(format!("failed to read sheet '{sheet_name}': {e}")))?;

    tracing::debug!(path = %path.display(), sheet = %sheet_name, "reading first sheet");

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(data_to_string).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|v| !v.trim().is_empty()))
        .collect();

    split_header(&label, rows)
}

fn split_header(
    label: &str,
    mut rows: Vec<Vec<String>>,
) -> Result<(Vec<String>, Vec<Vec<String>>), LoadError> {
    if rows.is_empty() {
        return Err(LoadError::Parse {
            path: label.to_string(),
            message: "no header row".to_string(),
        });
    }
    let records = rows.split_off(1);
    let headers = rows.swap_remove(0);
    Ok((headers, records))
}

fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(n) => format_float(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => format_float(dt.as_f64()),
    }
}

/// Integers without decimals
fn format_float(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
