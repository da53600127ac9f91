// Combined table export: TSV, or an XLSX workbook for .xlsx/.xls paths

use std::path::Path;

use concord_recon::{Cell, OutputTable};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::WriteError;

/// Write the combined table to `path`.
///
/// The file is serialized fully in memory first; nothing touches the disk
/// unless serialization succeeds.
pub fn write_table(path: &Path, table: &OutputTable) -> Result<(), WriteError> {
    let bytes = if is_xlsx_output(path) {
        to_xlsx_bytes(table).map_err(|message| serialize_err(path, message))?
    } else {
        to_tsv_bytes(table).map_err(|message| serialize_err(path, message))?
    };

    std::fs::write(path, bytes).map_err(|source| WriteError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = table.len(), "wrote combined table");
    Ok(())
}

/// Only `.xlsx` and `.xls` get a workbook; `.xls` receives XLSX content.
/// Other spreadsheet extensions (`.ods`, `.xlsb`) fall through to TSV.
pub fn is_xlsx_output(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("xlsx" | "xls")
    )
}

fn serialize_err(path: &Path, message: String) -> WriteError {
    WriteError::Serialize {
        path: path.display().to_string(),
        message,
    }
}

pub fn to_tsv_bytes(table: &OutputTable) -> Result<Vec<u8>, String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new());

    writer.write_record(&table.headers).map_err(|e| e.to_string())?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|c| c.as_text().into_owned()))
            .map_err(|e| e.to_string())?;
    }

    writer.into_inner().map_err(|e| e.to_string())
}

pub fn to_xlsx_bytes(table: &OutputTable) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, header) in table.headers.iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| "too many columns for XLSX".to_string())?;
        worksheet
            .write_string_with_format(0, col, header, &header_format)
            .map_err(|e| format!("Failed to write header: {}", e))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row32 = u32::try_from(row_idx + 1).map_err(|_| "too many rows for XLSX".to_string())?;
        for (col, cell) in row.iter().enumerate() {
            let col16 = u16::try_from(col).map_err(|_| "too many columns for XLSX".to_string())?;
            if !cell.is_present() {
                continue;
            }
            let written = match cell.as_int() {
                Some(n) => worksheet.write_number(row32, col16, n as f64),
                None => worksheet.write_string(row32, col16, cell.as_text()),
            };
            written.map_err(|e| format!("Failed to write cell: {}", e))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Failed to build XLSX file: {}", e))
}
