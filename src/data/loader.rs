use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use calamine::{Data, Range, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{
    Category, CellValue, ConditionKey, Conditions, MetricsDataset, NumPvsN, NumsigRatio,
    PositionType, RowRecord, SignalT, TMinus1VsT,
};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a metrics dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet, header in row 1
/// * `.csv`     – header row, one metric per line
/// * `.json`    – `[{ "position_type": "롱", ..., "metric": "winRate", "value": 0.62 }, ...]`
/// * `.parquet` – one column per field
///
/// Rows that fail validation are logged and counted in
/// [`MetricsDataset::skipped`]; anything that prevents reading the table as a
/// whole is reported as [`DataError::Unavailable`].
pub fn load_file(path: &Path) -> Result<MetricsDataset, DataError> {
    read_table(path)
        .and_then(|table| table.into_dataset())
        .map_err(|e| DataError::unavailable(path, &e))
}

fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_spreadsheet(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// A load running on a background thread.
pub struct PendingLoad {
    path: PathBuf,
    rx: Receiver<Result<MetricsDataset, DataError>>,
}

impl PendingLoad {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for the result.
    pub fn poll(&self) -> Option<Result<MetricsDataset, DataError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DataError::Unavailable {
                path: self.path.clone(),
                reason: "loader thread exited without a result".into(),
            })),
        }
    }
}

/// Run [`load_file`] off the UI thread. `on_done` fires once the result has
/// been sent, typically to request a repaint.
pub fn spawn_load<F>(path: PathBuf, on_done: F) -> PendingLoad
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let thread_path = path.clone();
    std::thread::spawn(move || {
        let result = load_file(&thread_path);
        let _ = tx.send(result);
        on_done();
    });
    PendingLoad { path, rx }
}

// ---------------------------------------------------------------------------
// RawTable – header + untyped cells, shared by every format
// ---------------------------------------------------------------------------

struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Validate every row into a [`RowRecord`], keeping file order.
    fn into_dataset(self) -> Result<MetricsDataset> {
        let columns = ColumnIndex::resolve(&self.headers)?;

        let mut records = Vec::with_capacity(self.rows.len());
        let mut skipped = 0;
        for (i, cells) in self.rows.iter().enumerate() {
            if cells.iter().all(CellValue::is_blank) {
                continue;
            }
            // Sheet row number: header is row 1.
            let row_no = i + 2;
            match columns.record(cells, row_no) {
                Ok(record) => records.push(record),
                Err(e) => {
                    log::warn!("Skipping {e}");
                    skipped += 1;
                }
            }
        }
        Ok(MetricsDataset::new(records, skipped))
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// Position of each required field among the header cells.
struct ColumnIndex {
    position_type: usize,
    signal_t: usize,
    numsig_ratio: usize,
    num_pvs_n: usize,
    t_minus1_vs_t: usize,
    metric: usize,
    value: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let find = |aliases: &[&str]| -> Result<usize> {
            headers
                .iter()
                .position(|h| aliases.contains(&h.trim()))
                .with_context(|| format!("missing column '{}'", aliases[0]))
        };
        Ok(ColumnIndex {
            position_type: find(&["position_type"])?,
            signal_t: find(ConditionKey::SignalT.header_aliases())?,
            numsig_ratio: find(ConditionKey::NumsigRatio.header_aliases())?,
            num_pvs_n: find(ConditionKey::NumPvsN.header_aliases())?,
            t_minus1_vs_t: find(ConditionKey::TMinus1VsT.header_aliases())?,
            metric: find(&["metric"])?,
            value: find(&["value"])?,
        })
    }

    fn record(&self, cells: &[CellValue], row_no: usize) -> Result<RowRecord, DataError> {
        let cell = |idx: usize| cells.get(idx).unwrap_or(&NULL_CELL);

        let conditions = Conditions {
            signal_t: parse_category::<SignalT>(cell(self.signal_t), "signal_t", row_no)?,
            numsig_ratio: parse_category::<NumsigRatio>(
                cell(self.numsig_ratio),
                "numsig_ratio",
                row_no,
            )?,
            num_pvs_n: parse_category::<NumPvsN>(cell(self.num_pvs_n), "num_PvsN", row_no)?,
            t_minus1_vs_t: parse_category::<TMinus1VsT>(
                cell(self.t_minus1_vs_t),
                "t-1vst",
                row_no,
            )?,
        };
        let position_type =
            parse_category::<PositionType>(cell(self.position_type), "position_type", row_no)?;

        let metric = cell(self.metric).to_string().trim().to_string();
        if metric.is_empty() {
            return Err(DataError::malformed(row_no, "empty metric name"));
        }

        let raw_value = cell(self.value);
        let value = raw_value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                DataError::malformed(row_no, format!("value '{raw_value}' is not a number"))
            })?;

        Ok(RowRecord {
            position_type,
            conditions,
            metric,
            value,
        })
    }
}

fn parse_category<T: Category>(cell: &CellValue, column: &str, row_no: usize) -> Result<T, DataError> {
    let text = cell.to_string();
    T::parse(&text).ok_or_else(|| {
        DataError::malformed(row_no, format!("unknown {column} value '{}'", text.trim()))
    })
}

// ---------------------------------------------------------------------------
// Spreadsheet loader (calamine)
// ---------------------------------------------------------------------------

/// Read the first worksheet of any workbook format calamine understands.
fn load_spreadsheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;
    range_to_table(&range)
}

fn range_to_table(range: &Range<Data>) -> Result<RawTable> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .context("worksheet is empty")?
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let rows = rows
        .map(|r| r.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty | Data::Error(_) => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, one metric per line.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(csv_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

/// CSV cells stay text; numeric columns are read through `CellValue::as_f64`
/// so labels such as `007` survive unchanged.
fn csv_cell(s: &str) -> CellValue {
    if s.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as written by
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "position_type": "롱", "signal_t": "p", "numsig_ratio": "Under20p",
///     "num_PvsN": "moreN", "t-1vst": "same", "metric": "winRate", "value": 0.62 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field. Works with files written
/// by both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch.columns();
        for row in 0..batch.num_rows() {
            rows.push(
                columns
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect::<Vec<_>>(),
            );
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => match any.downcast_ref::<StringArray>() {
            Some(s) => CellValue::String(s.value(row).to_string()),
            None => CellValue::Null,
        },
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map_or(CellValue::Null, |a| CellValue::Bool(a.value(row))),
        other => CellValue::String(format!("{other:?}")),
    }
}

/// Count rows per metric; used when logging a freshly loaded dataset.
pub fn metric_histogram(dataset: &MetricsDataset) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in &dataset.rows {
        *counts.entry(row.metric.clone()).or_insert(0) += 1;
    }
    counts
}
