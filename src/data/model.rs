use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Column names of the source table
// ---------------------------------------------------------------------------

pub const COL_TITLE: &str = "Title";
pub const COL_GENRE: &str = "Genre";
pub const COL_PREMIERE: &str = "Premiere";
pub const COL_RUNTIME: &str = "Runtime";
pub const COL_IMDB_SCORE: &str = "IMDB Score";
pub const COL_LANGUAGE: &str = "Language";

/// Columns every input file must provide, in display order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_TITLE,
    COL_GENRE,
    COL_PREMIERE,
    COL_RUNTIME,
    COL_IMDB_SCORE,
    COL_LANGUAGE,
];

/// Label shown for a missing cell.
pub const MISSING_LABEL: &str = "<null>";

// ---------------------------------------------------------------------------
// TextEncoding – how the source bytes were decoded
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    /// Binary formats (Parquet) carry their own string encoding.
    Native,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "UTF-8"),
            TextEncoding::Latin1 => write!(f, "Latin-1"),
            TextEncoding::Native => write!(f, "native"),
        }
    }
}

// ---------------------------------------------------------------------------
// FilmRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single film (one row of the source table).
///
/// Numeric cells that were empty in the source are stored as `NaN`, the same
/// way a dataframe marks missing floats.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmRecord {
    pub title: String,
    pub genre: String,
    pub language: String,
    /// `None` when the source value did not match the expected date format.
    pub premiere: Option<NaiveDate>,
    pub imdb_score: f64,
    /// Minutes.
    pub runtime: f64,
}

impl FilmRecord {
    pub fn premiere_label(&self) -> String {
        self.premiere
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| MISSING_LABEL.to_string())
    }
}

/// Format a possibly-missing number for tables.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        MISSING_LABEL.to_string()
    } else if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

// ---------------------------------------------------------------------------
// FilmDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed selection values.
///
/// Built once by the loader and never mutated afterwards; every derived view
/// borrows from it.
#[derive(Debug, Clone)]
pub struct FilmDataset {
    /// All films in file order.
    pub films: Vec<FilmRecord>,
    /// Distinct genres in first-seen order.
    pub genres: Vec<String>,
    /// Distinct languages in first-seen order.
    pub languages: Vec<String>,
    /// Encoding the source text was decoded with.
    pub encoding: TextEncoding,
}

impl FilmDataset {
    /// Build the distinct-value indices from the loaded films.
    pub fn from_films(films: Vec<FilmRecord>, encoding: TextEncoding) -> Self {
        let genres = distinct_in_order(films.iter().map(|f| f.genre.as_str()));
        let languages = distinct_in_order(films.iter().map(|f| f.language.as_str()));
        FilmDataset {
            films,
            genres,
            languages,
            encoding,
        }
    }

    /// Number of films.
    pub fn len(&self) -> usize {
        self.films.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    /// Number of films whose premiere could not be parsed.
    pub fn missing_premieres(&self) -> usize {
        self.films.iter().filter(|f| f.premiere.is_none()).count()
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn film(title: &str, genre: &str, language: &str, score: f64) -> FilmRecord {
        FilmRecord {
            title: title.to_string(),
            genre: genre.to_string(),
            language: language.to_string(),
            premiere: None,
            imdb_score: score,
            runtime: 90.0,
        }
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let ds = FilmDataset::from_films(
            vec![
                film("a", "Drama", "English", 7.0),
                film("b", "Comedy", "French", 6.0),
                film("c", "Drama", "Spanish", 5.0),
                film("d", "Action", "English", 4.0),
            ],
            TextEncoding::Utf8,
        );
        assert_eq!(ds.genres, vec!["Drama", "Comedy", "Action"]);
        assert_eq!(ds.languages, vec!["English", "French", "Spanish"]);
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(f64::NAN), MISSING_LABEL);
        assert_eq!(format_number(94.0), "94");
        assert_eq!(format_number(6.25), "6.25");
    }
}
