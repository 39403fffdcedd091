use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{Column, Dataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row of column names, one record per line
/// * `.json`    – `{ "x": [...], "y": [...] }` or `[{ "x": 1.0, "y": 2.0 }, ...]`
/// * `.parquet` – every numeric column is read as `f64`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Columns whose every cell parses as a number are kept; the rest are skipped.
fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(col_idx).unwrap_or("").trim().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .filter_map(|(name, raw)| {
            let parsed: Result<Vec<f64>, _> = raw.iter().map(|s| s.parse::<f64>()).collect();
            match parsed {
                Ok(values) => Some(Column::new(name, values)),
                Err(_) => {
                    log::warn!("Skipping non-numeric CSV column '{name}'");
                    None
                }
            }
        })
        .collect();

    Ok(Dataset::new(columns)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepts the two common `DataFrame.to_json` layouts:
///
/// ```json
/// { "x": [1.0, 2.0], "y": [2.1, 3.9] }
/// ```
///
/// ```json
/// [ { "x": 1.0, "y": 2.1 }, { "x": 2.0, "y": 3.9 } ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    match root {
        JsonValue::Object(obj) => json_columns(&obj),
        JsonValue::Array(records) => json_records(&records),
        _ => bail!("Expected a JSON object of columns or an array of records"),
    }
}

fn json_columns(obj: &Map<String, JsonValue>) -> Result<Dataset> {
    let mut columns = Vec::with_capacity(obj.len());
    for (name, val) in obj {
        let arr = val
            .as_array()
            .with_context(|| format!("Column '{name}' is not an array"))?;
        let values = arr
            .iter()
            .enumerate()
            .map(|(j, v)| json_number(v).with_context(|| format!("{name}[{j}]: not a number")))
            .collect::<Result<Vec<f64>>>()?;
        columns.push(Column::new(name.clone(), values));
    }
    Ok(Dataset::new(columns)?)
}

fn json_records(records: &[JsonValue]) -> Result<Dataset> {
    let first = records
        .first()
        .and_then(|r| r.as_object())
        .context("Expected at least one JSON record object")?;
    let names: Vec<String> = first.keys().cloned().collect();

    let mut columns: Vec<Column> = names
        .iter()
        .map(|n| Column::new(n.clone(), Vec::with_capacity(records.len())))
        .collect();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for column in &mut columns {
            let value = obj
                .get(&column.name)
                .and_then(json_number)
                .with_context(|| format!("Row {i}: '{}' is missing or not a number", column.name))?;
            column.values.push(value);
        }
    }
    Ok(Dataset::new(columns)?)
}

fn json_number(val: &JsonValue) -> Option<f64> {
    match val {
        JsonValue::Null => Some(f64::NAN),
        other => other.as_f64(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load every numeric column of a Parquet file (Pandas or Polars output).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Column> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if columns.is_empty() {
            columns = schema
                .fields()
                .iter()
                .filter(|f| f.data_type().is_numeric())
                .map(|f| Column::new(f.name().clone(), Vec::new()))
                .collect();
        }

        for column in &mut columns {
            let idx = schema
                .index_of(&column.name)
                .with_context(|| format!("Parquet batch missing '{}' column", column.name))?;
            let values = extract_f64(batch.column(idx).as_ref())
                .with_context(|| format!("reading column '{}'", column.name))?;
            column.values.extend(values);
        }
    }

    if columns.is_empty() {
        bail!("Parquet file has no numeric columns");
    }
    Ok(Dataset::new(columns)?)
}

/// Cast any numeric Arrow array to `f64`, mapping nulls to NaN.
fn extract_f64(col: &dyn Array) -> Result<Vec<f64>> {
    let casted = cast(col, &DataType::Float64).context("casting column to Float64")?;
    let floats = casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .context("expected Float64Array")?;
    Ok(floats.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}
