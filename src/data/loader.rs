use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Restaurant, RestaurantDataset, SchemaInfo};

/// Logical fields every source must provide (after header normalization).
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "city",
    "area",
    "restaurant",
    "avg_ratings",
    "price",
    "delivery_time",
    "food_type",
];

/// The source lacks one or more required columns. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required columns missing from source: {}", .missing.join(", "))]
pub struct SchemaError {
    pub missing: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a restaurant dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one listing per line (recommended)
/// * `.json`    – `[{ "City": "...", "Avg ratings": 4.2, ... }, ...]`
/// * `.parquet` – any scalar column types, read through Arrow
pub fn load_file(path: &Path) -> Result<RestaurantDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            read_csv_table(file)?
        }
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = normalize(raw)?;
    log::info!(
        "Loaded {} listings from {} (map view: {:?})",
        dataset.len(),
        path.display(),
        dataset.schema.map_view
    );
    Ok(dataset)
}

/// Load CSV text from any reader. Used by [`load_file`] and handy for tests.
pub fn read_csv<R: Read>(reader: R) -> Result<RestaurantDataset> {
    normalize(read_csv_table(reader)?)
}

// ---------------------------------------------------------------------------
// Raw table: what every format is parsed into before normalization
// ---------------------------------------------------------------------------

/// Headers as found in the source and trimmed text cells (`None` = missing).
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

fn text_cell(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn read_csv_table<R: Read>(reader: R) -> Result<RawTable> {
    // Short rows keep their missing trailing cells as nulls.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        rows.push(record.iter().map(text_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).and_then(json_to_text))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => text_cell(s),
        other => Some(other.to_string()),
    }
}

/// Parquet with scalar columns. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
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
        for row in 0..batch.num_rows() {
            let mut cells = Vec::with_capacity(batch.num_columns());
            for (col_idx, col) in batch.columns().iter().enumerate() {
                if col.is_null(row) {
                    cells.push(None);
                    continue;
                }
                let text = array_value_to_string(col, row).with_context(|| {
                    format!("Row {row}: failed to read column '{}'", headers[col_idx])
                })?;
                cells.push(text_cell(&text));
            }
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Trim, lower-case and replace spaces with underscores: `" Avg Ratings"` → `avg_ratings`.
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// First run of digits in free text, as minutes. `"35 mins"` → `35.0`, `"N/A"` → `None`.
pub fn parse_delivery_time(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Numeric coercion: anything that is not a finite number becomes `None`.
pub fn parse_price(text: &str) -> Option<f64> {
    parse_number(text)
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Positions of the logical fields within a raw row.
struct ColumnIndex {
    city: usize,
    area: usize,
    restaurant: usize,
    avg_ratings: usize,
    price: usize,
    delivery_time: usize,
    food_type: usize,
    geo: Option<(usize, usize)>,
}

impl ColumnIndex {
    fn resolve(columns: &[String]) -> std::result::Result<Self, SchemaError> {
        // First occurrence wins when normalization produces duplicates.
        let pos = |name: &str| columns.iter().position(|c| c == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&name| pos(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError { missing });
        }

        let required = |name: &str| pos(name).unwrap_or_default();
        Ok(ColumnIndex {
            city: required("city"),
            area: required("area"),
            restaurant: required("restaurant"),
            avg_ratings: required("avg_ratings"),
            price: required("price"),
            delivery_time: required("delivery_time"),
            food_type: required("food_type"),
            geo: pos("latitude").zip(pos("longitude")),
        })
    }
}

fn normalize(raw: RawTable) -> Result<RestaurantDataset> {
    let columns: Vec<String> = raw.headers.iter().map(|h| normalize_header(h)).collect();
    let index = ColumnIndex::resolve(&columns)?;
    let schema = SchemaInfo::new(columns);

    let total = raw.rows.len();
    let mut records = Vec::with_capacity(total);

    for row in &raw.rows {
        let cell = |idx: usize| row.get(idx).and_then(|c| c.as_deref());
        let text = |idx: usize| cell(idx).unwrap_or_default().to_string();

        let Some(avg_ratings) = cell(index.avg_ratings).and_then(parse_number) else {
            continue;
        };

        let (latitude, longitude) = match index.geo {
            Some((lat, lon)) => (
                cell(lat).and_then(parse_number),
                cell(lon).and_then(parse_number),
            ),
            None => (None, None),
        };

        records.push(Restaurant {
            city: text(index.city),
            area: text(index.area),
            restaurant: text(index.restaurant),
            food_type: text(index.food_type),
            price: cell(index.price).and_then(parse_price),
            avg_ratings,
            delivery_time: cell(index.delivery_time).and_then(parse_delivery_time),
            latitude,
            longitude,
        });
    }

    let dropped = total - records.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} of {total} rows without a usable avg_ratings value");
    }

    Ok(RestaurantDataset::from_records(records, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MapView;

    const HEADER: &str = "City, Area ,Restaurant,Avg ratings,Price,Delivery time,Food type";

    #[test]
    fn delivery_time_takes_first_digit_run() {
        assert_eq!(parse_delivery_time("35 mins"), Some(35.0));
        assert_eq!(parse_delivery_time("N/A"), None);
        assert_eq!(parse_delivery_time("120"), Some(120.0));
        assert_eq!(parse_delivery_time("about 40-45 min"), Some(40.0));
        assert_eq!(parse_delivery_time(""), None);
    }

    #[test]
    fn price_coerces_to_null() {
        assert_eq!(parse_price("249"), Some(249.0));
        assert_eq!(parse_price(" 99.5 "), Some(99.5));
        assert_eq!(parse_price("two hundred"), None);
        assert_eq!(parse_price("nan"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn headers_are_normalized() {
        assert_eq!(normalize_header("  Avg Ratings "), "avg_ratings");
        assert_eq!(normalize_header("Delivery time"), "delivery_time");
        assert_eq!(normalize_header("FOOD TYPE"), "food_type");
    }

    #[test]
    fn missing_columns_are_a_schema_error() {
        let csv = "City,Restaurant,Price\nDelhi,Dhaba,100\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        let schema = err.downcast_ref::<SchemaError>().expect("schema error");
        assert_eq!(
            schema.missing,
            vec!["area", "avg_ratings", "delivery_time", "food_type"]
        );
        assert!(err.to_string().contains("avg_ratings"));
    }

    #[test]
    fn rows_without_rating_are_dropped() {
        let csv = format!(
            "{HEADER}\n\
             Delhi,Saket,A,4.1,249,35 mins,Indian\n\
             Delhi,Saket,B,,100,20 mins,Chinese\n\
             Delhi,Saket,C,--,100,20 mins,Chinese\n\
             Pune,Baner,D,3.9,cheap,N/A,Italian\n"
        );
        let ds = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].delivery_time, Some(35.0));
        assert_eq!(ds.records[0].price, Some(249.0));
        assert_eq!(ds.records[1].price, None);
        assert_eq!(ds.records[1].delivery_time, None);
        assert_eq!(ds.schema.map_view, MapView::CityRollup);
        assert_eq!(ds.price_bounds.map(|b| (b.min, b.max)), Some((249.0, 249.0)));
    }

    #[test]
    fn coordinates_enable_geo_view() {
        let csv = format!(
            "{HEADER},Latitude,Longitude\n\
             Delhi,Saket,A,4.1,249,35 mins,Indian,28.52,77.21\n\
             Delhi,Saket,B,4.0,249,35 mins,Indian,,\n"
        );
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.schema.map_view, MapView::Geo);
        assert_eq!(ds.records[0].position(), Some((28.52, 77.21)));
        assert_eq!(ds.records[1].position(), None);
    }

    #[test]
    fn empty_categorical_cells_become_empty_strings() {
        let csv = format!("{HEADER}\n,  ,Solo,4.0,10,5,\n");
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].city, "");
        assert_eq!(ds.records[0].area, "");
        assert_eq!(ds.records[0].food_type, "");
        assert!(ds.cities.is_empty());
    }

    #[test]
    fn short_rows_load_with_missing_cells() {
        let csv = format!(
            "{HEADER}\n\
             Delhi,Saket,A,4.1,249,35 mins,Indian\n\
             Delhi,Saket,B,4.0,100,20 mins\n"
        );
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].restaurant, "B");
        assert_eq!(ds.records[1].food_type, "");
        assert_eq!(ds.records[1].delivery_time, Some(20.0));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("listings.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
