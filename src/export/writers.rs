use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value};

use super::Table;
use crate::error::AdminError;

const BOM: &str = "\u{feff}";

/// Excel limits worksheet names to 31 characters.
const SHEET_NAME_MAX: usize = 31;

fn export_err(err: impl std::fmt::Display) -> AdminError {
    AdminError::Export(err.to_string())
}

pub(super) fn to_csv(table: &Table) -> Result<Vec<u8>, AdminError> {
    let mut writer = csv::Writer::from_writer(BOM.as_bytes().to_vec());
    writer.write_record(&table.headers).map_err(export_err)?;
    for row in &table.rows {
        writer.write_record(row).map_err(export_err)?;
    }
    writer.into_inner().map_err(export_err)
}

pub(super) fn to_xlsx(table: &Table) -> Result<Vec<u8>, AdminError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    let name: String = table.name.chars().take(SHEET_NAME_MAX).collect();
    sheet.set_name(name).map_err(export_err)?;

    for (col, title) in table.headers.iter().enumerate() {
        let col = u16::try_from(col).map_err(export_err)?;
        sheet
            .write_string_with_format(0, col, title, &bold)
            .map_err(export_err)?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx + 1).map_err(export_err)?;
        for (col, cell) in row.iter().enumerate() {
            let col = u16::try_from(col).map_err(export_err)?;
            sheet.write_string(row_num, col, cell).map_err(export_err)?;
        }
    }
    workbook.save_to_buffer().map_err(export_err)
}

pub(super) fn to_json(table: &Table) -> Value {
    Value::Array(
        table
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = table
                    .headers
                    .iter()
                    .zip(row)
                    .map(|(header, cell)| (header.clone(), Value::String(cell.clone())))
                    .collect();
                Value::Object(object)
            })
            .collect(),
    )
}
