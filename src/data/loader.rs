use crate::data::price::PricePoint;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use std::path::{Path, PathBuf};

//positional columns: date, open, high, low, close, volume
const COLUMN_COUNT: usize = 6;

//cells treated as missing alongside empty ones
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

//a csv file holding one instrument's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentSource {
    pub name: String,
    pub path: PathBuf,
}

//lists the csv files of a directory, sorted by instrument name
pub fn discover_instruments<P: AsRef<Path>>(dir: P) -> Result<Vec<InstrumentSource>> {
    let dir = dir.as_ref();
    let entries =
        std::fs::read_dir(dir).context(format!("Failed to read data directory: {:?}", dir))?;

    let mut sources = Vec::new();

    for entry in entries {
        let path = entry
            .context(format!("Failed to list data directory: {:?}", dir))?
            .path();

        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }

        if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
            sources.push(InstrumentSource {
                name: name.to_string(),
                path: path.clone(),
            });
        }
    }

    sources.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(sources)
}

//loads a price series from a csv file
//rows with missing fields are dropped, the remaining dates must be strictly ascending
pub fn load_price_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PricePoint>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut points = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let line = index + 2;
        let record = result.context(format!("Failed to read CSV record at line {}", line))?;

        if has_missing_field(&record) {
            debug!("{:?}: dropping incomplete row at line {}", path, line);
            continue;
        }

        points.push(parse_record(&record, line)?);
    }

    ensure_ascending(&points)?;

    Ok(points)
}

fn is_missing(field: &str) -> bool {
    field.is_empty() || NA_MARKERS.contains(&field)
}

fn has_missing_field(record: &StringRecord) -> bool {
    record.len() < COLUMN_COUNT || record.iter().take(COLUMN_COUNT).any(is_missing)
}

fn parse_record(record: &StringRecord, line: usize) -> Result<PricePoint> {
    let date = parse_date(&record[0]).context(format!("Invalid date at line {}", line))?;
    let open = parse_price(&record[1], "open", line)?;
    let high = parse_price(&record[2], "high", line)?;
    let low = parse_price(&record[3], "low", line)?;
    let close = parse_price(&record[4], "close", line)?;
    let volume = parse_volume(&record[5]).context(format!("Invalid volume at line {}", line))?;

    Ok(PricePoint::new(date, open, high, low, close, volume))
}

//accepts dd-mm-yyyy with an optional trailing time, or iso yyyy-mm-dd
fn parse_date(raw: &str) -> Result<NaiveDate> {
    let day = raw.split_whitespace().next().unwrap_or_default();

    NaiveDate::parse_from_str(day, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(day, "%Y-%m-%d"))
        .context(format!("Unrecognised date '{}'", raw))
}

fn parse_price(raw: &str, column: &str, line: usize) -> Result<f64> {
    raw.parse::<f64>()
        .context(format!("Invalid {} '{}' at line {}", column, raw, line))
}

fn parse_volume(raw: &str) -> Result<u64> {
    if let Ok(volume) = raw.parse::<u64>() {
        return Ok(volume);
    }

    let volume = raw
        .parse::<f64>()
        .context(format!("Unrecognised volume '{}'", raw))?;
    if !volume.is_finite() || volume < 0.0 {
        bail!("Volume out of range: {}", raw);
    }

    Ok(volume.trunc() as u64)
}

fn ensure_ascending(points: &[PricePoint]) -> Result<()> {
    for pair in points.windows(2) {
        if pair[1].date <= pair[0].date {
            bail!(
                "Dates must be strictly ascending: {} follows {}",
                pair[1].date,
                pair[0].date
            );
        }
    }
    Ok(())
}
