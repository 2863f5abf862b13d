use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use plotters::prelude::*;
use serde_json::Value;

use crate::domain::entities::document::{ChartRow, Record};

/// Full-string numeric parse: numbers pass through, strings qualify only if
/// the entire trimmed text converts to a finite number. Prefix matches such
/// as "100abc" do not count.
pub fn parse_cell_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
        }
        _ => None,
    }
}

pub fn format_cell_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Headers whose column is numeric across every record of the file. A single
/// unparseable or unset cell disqualifies the column; an empty record set
/// classifies nothing.
pub fn classify_numeric_columns(headers: &[String], records: &[Record]) -> Vec<String> {
    if records.is_empty() {
        return Vec::new();
    }
    headers
        .iter()
        .filter(|header| {
            records
                .iter()
                .all(|record| record.get(header.as_str()).and_then(parse_cell_number).is_some())
        })
        .cloned()
        .collect()
}

/// Shapes records for plotting: the value field is coerced to a number (NaN
/// when unparseable, the row is never dropped), everything else is carried
/// unchanged. Returns an empty sequence when either field is unset or not in
/// the header list.
pub fn project_chart_rows(
    headers: &[String],
    records: &[Record],
    category_field: &str,
    value_field: &str,
) -> Vec<ChartRow> {
    if category_field.is_empty() || value_field.is_empty() {
        return Vec::new();
    }
    if !headers.iter().any(|header| header == category_field)
        || !headers.iter().any(|header| header == value_field)
    {
        return Vec::new();
    }

    records
        .iter()
        .map(|record| {
            let mut fields = record.clone();
            let value = fields
                .shift_remove(value_field)
                .as_ref()
                .and_then(parse_cell_number)
                .unwrap_or(f64::NAN);
            ChartRow { fields, value }
        })
        .collect()
}

pub fn chart_file_name(document_name: &str) -> String {
    format!("{document_name}-chart.png")
}

/// Draws one bar per row into a PNG at `path`. NaN values are skipped and
/// leave a gap at their slot. No text is drawn, so rendering works headless.
pub fn render_bar_chart(rows: &[ChartRow], width: u32, height: u32, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|err| anyhow!("failed to fill chart background: {err}"))?;

    let finite = rows.iter().map(|row| row.value).filter(|value| value.is_finite());
    let max = finite.clone().fold(0.0_f64, f64::max);
    let min = finite.fold(0.0_f64, f64::min);
    let y_max = if max > 0.0 { max * 1.1 } else { 1.0 };
    let y_min = if min < 0.0 { min * 1.1 } else { 0.0 };

    let bar_count = rows.len().max(1) as i32;
    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .build_cartesian_2d(0..bar_count, y_min..y_max)
        .map_err(|err| anyhow!("failed to build chart axes: {err}"))?;

    chart
        .draw_series(
            rows.iter()
                .enumerate()
                .filter(|(_, row)| row.value.is_finite())
                .map(|(slot, row)| {
                    let slot = slot as i32;
                    let mut bar =
                        Rectangle::new([(slot, 0.0), (slot + 1, row.value)], BLUE.filled());
                    bar.set_margin(0, 0, 2, 2);
                    bar
                }),
        )
        .map_err(|err| anyhow!("failed to draw chart bars: {err}"))?;

    root.present()
        .map_err(|err| anyhow!("failed to write chart image: {err}"))?;
    Ok(())
}

/// Export boundary: writes `<document name>-chart.png` into `out_dir`. A
/// missing render target (no rows) is a silent no-op.
pub fn export_chart(
    document_name: &str,
    rows: &[ChartRow],
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        return Ok(None);
    }
    let path = out_dir.join(chart_file_name(document_name));
    render_bar_chart(rows, 800, 480, &path)?;
    Ok(Some(path))
}
