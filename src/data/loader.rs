use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{
    COL_GENRE, COL_IMDB_SCORE, COL_LANGUAGE, COL_PREMIERE, COL_RUNTIME, COL_TITLE, FilmDataset,
    FilmRecord, REQUIRED_COLUMNS, TextEncoding,
};

/// Day, abbreviated month, two-digit year: `05-Oct-20`.
pub const PREMIERE_FORMAT: &str = "%d-%b-%y";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a top-level JSON array of records")]
    NotARecordArray,
    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("reading arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: DataType },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LoadError + '_ {
    move |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a film table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, UTF-8 or Latin-1 text
/// * `.json`    – `[{ "Title": ..., "Genre": ..., ... }, ...]`
/// * `.parquet` – one column per field, `Premiere` as text or date
pub fn load_file(path: &Path) -> LoadResult<FilmDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    let missing = dataset.missing_premieres();
    if missing > 0 {
        log::debug!("{missing} premiere values could not be parsed and were set to missing");
    }
    Ok(dataset)
}

/// Parse a premiere cell.  Anything that does not match [`PREMIERE_FORMAT`],
/// including impossible dates such as `31-Feb-20`, becomes `None`.
pub fn parse_premiere(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, PREMIERE_FORMAT).ok()
}

/// Decode raw file bytes as UTF-8, falling back to Latin-1.
///
/// Latin-1 maps every byte to the code point of the same value, so the
/// fallback always succeeds.
pub fn decode_text(bytes: Vec<u8>) -> (String, TextEncoding) {
    match String::from_utf8(bytes) {
        Ok(mut text) => {
            if text.starts_with('\u{feff}') {
                text.replace_range(..'\u{feff}'.len_utf8(), "");
            }
            (text, TextEncoding::Utf8)
        }
        Err(e) => {
            log::warn!("input is not valid UTF-8 ({e}), decoding as Latin-1");
            let text = e.into_bytes().into_iter().map(char::from).collect();
            (text, TextEncoding::Latin1)
        }
    }
}

// ---------------------------------------------------------------------------
// Row shape shared by the text formats
// ---------------------------------------------------------------------------

/// One row as it appears in CSV / JSON.  `P` is the raw premiere cell type.
#[derive(Debug, Deserialize)]
struct RawFilm<P> {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Premiere")]
    premiere: Option<P>,
    #[serde(rename = "Runtime")]
    runtime: Option<f64>,
    #[serde(rename = "IMDB Score")]
    imdb_score: Option<f64>,
    #[serde(rename = "Language")]
    language: String,
}

trait PremiereCell {
    fn to_date(&self) -> Option<NaiveDate>;
}

impl PremiereCell for String {
    fn to_date(&self) -> Option<NaiveDate> {
        parse_premiere(self)
    }
}

/// `DataFrame.to_json` writes datetime columns as epoch milliseconds and
/// unconverted ones as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonPremiere {
    EpochMillis(i64),
    Text(String),
}

impl PremiereCell for JsonPremiere {
    fn to_date(&self) -> Option<NaiveDate> {
        match self {
            JsonPremiere::EpochMillis(ms) => {
                DateTime::from_timestamp_millis(*ms).map(|dt| dt.date_naive())
            }
            JsonPremiere::Text(s) => parse_premiere(s),
        }
    }
}

impl<P: PremiereCell> RawFilm<P> {
    fn into_record(self) -> FilmRecord {
        FilmRecord {
            premiere: self.premiere.as_ref().and_then(PremiereCell::to_date),
            title: self.title,
            genre: self.genre,
            language: self.language,
            imdb_score: self.imdb_score.unwrap_or(f64::NAN),
            runtime: self.runtime.unwrap_or(f64::NAN),
        }
    }
}

fn check_required(mut has: impl FnMut(&str) -> bool) -> LoadResult<()> {
    match REQUIRED_COLUMNS.iter().find(|&&c| !has(c)) {
        Some(col) => Err(LoadError::MissingColumn(col.to_string())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> LoadResult<FilmDataset> {
    let bytes = std::fs::read(path).map_err(io_error(path))?;
    let (text, encoding) = decode_text(bytes);
    let films = parse_csv(&text)?;
    Ok(FilmDataset::from_films(films, encoding))
}

/// Parse decoded CSV text.  Columns other than the required ones are ignored.
pub fn parse_csv(text: &str) -> LoadResult<Vec<FilmRecord>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    check_required(|col| headers.iter().any(|h| h == col))?;

    reader
        .deserialize::<RawFilm<String>>()
        .map(|row| Ok(row?.into_record()))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Title": "Enter the Anime", "Genre": "Documentary",
///     "Premiere": "05-Aug-19", "Runtime": 58, "IMDB Score": 2.5,
///     "Language": "English/Japanese" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> LoadResult<FilmDataset> {
    let bytes = std::fs::read(path).map_err(io_error(path))?;
    let (text, encoding) = decode_text(bytes);
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root.as_array().ok_or(LoadError::NotARecordArray)?;
    if let Some(first) = records.first() {
        let obj = first.as_object().ok_or(LoadError::NotARecordArray)?;
        check_required(|col| obj.contains_key(col))?;
    }

    let rows: Vec<RawFilm<JsonPremiere>> = serde_json::from_value(root)?;
    let films = rows.into_iter().map(RawFilm::into_record).collect();
    Ok(FilmDataset::from_films(films, encoding))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// `Premiere` may be a string column (parsed like CSV) or any temporal
/// column; numeric columns of any width are widened to `f64`.
fn load_parquet(path: &Path) -> LoadResult<FilmDataset> {
    let file = std::fs::File::open(path).map_err(io_error(path))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    check_required(|col| schema.index_of(col).is_ok())?;

    let reader = builder.build()?;
    let mut films = Vec::new();

    for batch in reader {
        let batch = batch?;
        let titles = string_column(&batch, COL_TITLE)?;
        let genres = string_column(&batch, COL_GENRE)?;
        let languages = string_column(&batch, COL_LANGUAGE)?;
        let premieres = premiere_column(&batch)?;
        let scores = f64_column(&batch, COL_IMDB_SCORE)?;
        let runtimes = f64_column(&batch, COL_RUNTIME)?;

        for row in 0..batch.num_rows() {
            films.push(FilmRecord {
                title: titles[row].clone().unwrap_or_default(),
                genre: genres[row].clone().unwrap_or_default(),
                language: languages[row].clone().unwrap_or_default(),
                premiere: premieres[row],
                imdb_score: scores[row],
                runtime: runtimes[row],
            });
        }
    }

    Ok(FilmDataset::from_films(films, TextEncoding::Native))
}

// -- Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> LoadResult<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

fn unsupported(name: &str, col: &ArrayRef) -> LoadError {
    LoadError::UnsupportedColumnType {
        column: name.to_string(),
        data_type: col.data_type().clone(),
    }
}

fn strings_of(col: &ArrayRef) -> Option<Vec<Option<String>>> {
    let owned = |v: Option<&str>| v.map(str::to_string);
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().iter().map(owned).collect()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().iter().map(owned).collect()),
        DataType::Utf8View => Some(col.as_string_view().iter().map(owned).collect()),
        _ => None,
    }
}

fn string_column(batch: &RecordBatch, name: &str) -> LoadResult<Vec<Option<String>>> {
    let col = column(batch, name)?;
    strings_of(col).ok_or_else(|| unsupported(name, col))
}

/// Numeric column widened to `f64`; nulls become `NaN`.
fn f64_column(batch: &RecordBatch, name: &str) -> LoadResult<Vec<f64>> {
    let col = column(batch, name)?;
    if !col.data_type().is_numeric() {
        return Err(unsupported(name, col));
    }
    let widened = arrow::compute::cast(col, &DataType::Float64)?;
    Ok(widened
        .as_primitive::<Float64Type>()
        .iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn premiere_column(batch: &RecordBatch) -> LoadResult<Vec<Option<NaiveDate>>> {
    let col = column(batch, COL_PREMIERE)?;
    if let Some(text) = strings_of(col) {
        return Ok(text
            .into_iter()
            .map(|v| v.as_deref().and_then(parse_premiere))
            .collect());
    }
    if !col.data_type().is_temporal() {
        return Err(unsupported(COL_PREMIERE, col));
    }
    let dates = arrow::compute::cast(col, &DataType::Date32)?;
    let dates = dates.as_primitive::<Date32Type>();
    Ok((0..dates.len())
        .map(|i| {
            if dates.is_null(i) {
                None
            } else {
                dates.value_as_date(i)
            }
        })
        .collect())
}
