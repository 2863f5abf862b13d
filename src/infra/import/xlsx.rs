use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::{Map, Value};

use crate::domain::entities::document::{Record, SheetTable};
use crate::usecase::error::ServiceError;

fn cell_to_header(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::String(v) => Value::String(v.clone()),
        Data::Float(v) => serde_json::Number::from_f64(*v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::Int(v) => Value::Number((*v).into()),
        Data::Bool(v) => Value::Bool(*v),
        Data::DateTime(v) => Value::String(v.to_string()),
        Data::DateTimeIso(v) => Value::String(v.clone()),
        Data::DurationIso(v) => Value::String(v.clone()),
        Data::Error(v) => Value::String(format!("{v:?}")),
        Data::Empty => Value::Null,
    }
}

fn zip_record(headers: &[String], row: &[Data]) -> Record {
    let mut record = Map::new();
    for (header, cell) in headers.iter().zip(row.iter()) {
        // Blank cells leave the field unset; cells past the header row are
        // dropped by the zip.
        if matches!(cell, Data::Empty) {
            continue;
        }
        record.insert(header.clone(), cell_to_value(cell));
    }
    record
}

/// Decodes the first worksheet (by declared workbook order) of an uploaded
/// file into a header list plus one record per data row. Additional sheets
/// are ignored by design. Pure transform over the input bytes.
pub fn ingest_workbook(bytes: &[u8]) -> Result<SheetTable, ServiceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| ServiceError::Format(format!("failed to read workbook: {err}")))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range
            .map_err(|err| ServiceError::Format(format!("failed to read first sheet: {err}")))?,
        None => return Ok(SheetTable::default()),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_to_header).collect(),
        None => return Ok(SheetTable::default()),
    };

    let records: Vec<Record> = rows.map(|row| zip_record(&headers, row)).collect();

    Ok(SheetTable { headers, records })
}
