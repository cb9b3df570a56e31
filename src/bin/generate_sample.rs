use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const POSITIONS: [&str; 3] = ["양방향", "롱", "숏"];
const SIGNAL_T: [&str; 2] = ["n", "p"];
const NUMSIG_RATIO: [&str; 2] = ["Under20p", "Over20p"];
const NUM_PVSN: [&str; 2] = ["moreN", "moreP"];
const T_MINUS1_VS_T: [&str; 2] = ["same", "diff"];

const HEADER: [&str; 7] = [
    "position_type",
    "signal_t",
    "numsig_ratio",
    "num_PvsN",
    "t-1vst",
    "metric",
    "value",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// A metric name plus the range its synthetic values are drawn from.
struct MetricSpec {
    name: &'static str,
    lo: f64,
    hi: f64,
}

const METRICS: [MetricSpec; 6] = [
    MetricSpec { name: "winRate", lo: 0.35, hi: 0.70 },
    MetricSpec { name: "avgReturn", lo: -0.02, hi: 0.04 },
    MetricSpec { name: "sharpe", lo: -0.5, hi: 2.5 },
    MetricSpec { name: "profitFactor", lo: 0.6, hi: 2.2 },
    MetricSpec { name: "maxDrawdown", lo: 0.05, hi: 0.45 },
    MetricSpec { name: "avgHoldDays", lo: 1.0, hi: 12.0 },
];

struct Row {
    labels: [&'static str; 6],
    value: f64,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for position in POSITIONS {
        for signal in SIGNAL_T {
            for ratio in NUMSIG_RATIO {
                for pvsn in NUM_PVSN {
                    for change in T_MINUS1_VS_T {
                        for metric in &METRICS {
                            rows.push(Row {
                                labels: [position, signal, ratio, pvsn, change, metric.name],
                                value: rng.uniform(metric.lo, metric.hi),
                            });
                        }
                    }
                }
            }
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(HEADER)?;
    for row in rows {
        let value = format!("{:.6}", row.value);
        let mut record: Vec<&str> = row.labels.to_vec();
        record.push(&value);
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let mut fields: Vec<Field> = HEADER[..6]
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, false))
        .collect();
    fields.push(Field::new("value", DataType::Float64, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = (0..6)
        .map(|c| {
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.labels[c]).collect::<Vec<_>>(),
            )) as ArrayRef
        })
        .collect();
    columns.push(Arc::new(Float64Array::from(
        rows.iter().map(|r| r.value).collect::<Vec<_>>(),
    )));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).context("creating data directory")?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let csv_path = out_dir.join("sample_positions.csv");
    let parquet_path = out_dir.join("sample_positions.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} rows ({} combinations × {} metrics) to {} and {}",
        rows.len(),
        rows.len() / METRICS.len(),
        METRICS.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
