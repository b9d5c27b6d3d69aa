use std::fmt;

use super::model::{FilmDataset, FilmRecord};

// ---------------------------------------------------------------------------
// Dimensions the user can filter on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Genre,
    Language,
}

impl Dimension {
    /// Label of the "no filter" option.
    pub fn all_label(self) -> &'static str {
        match self {
            Dimension::Genre => "Tous",
            Dimension::Language => "Toutes",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Dimension::Genre => "Sélectionnez un genre :",
            Dimension::Language => "Sélectionnez une langue :",
        }
    }

    /// Distinct values the selector offers, in first-seen order.
    pub fn values(self, dataset: &FilmDataset) -> &[String] {
        match self {
            Dimension::Genre => &dataset.genres,
            Dimension::Language => &dataset.languages,
        }
    }

    fn value_of(self, film: &FilmRecord) -> &str {
        match self {
            Dimension::Genre => &film.genre,
            Dimension::Language => &film.language,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection – one selector's current value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// The sentinel option: no filtering on this dimension.
    #[default]
    All,
    /// Keep rows whose value equals this string exactly.
    Only(String),
}

impl Selection {
    pub fn only(value: impl Into<String>) -> Self {
        Selection::Only(value.into())
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn label(&self, dimension: Dimension) -> &str {
        match self {
            Selection::All => dimension.all_label(),
            Selection::Only(v) => v,
        }
    }
}

// ---------------------------------------------------------------------------
// FilmFilter – both selections together
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmFilter {
    pub genre: Selection,
    pub language: Selection,
}

impl FilmFilter {
    pub fn selection_mut(&mut self, dimension: Dimension) -> &mut Selection {
        match dimension {
            Dimension::Genre => &mut self.genre,
            Dimension::Language => &mut self.language,
        }
    }

    /// A film passes when every dimension either selects "all" or matches exactly.
    pub fn matches(&self, film: &FilmRecord) -> bool {
        self.genre.accepts(Dimension::Genre.value_of(film))
            && self.language.accepts(Dimension::Language.value_of(film))
    }
}

impl fmt::Display for FilmFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "genre {} et la langue {}",
            self.genre.label(Dimension::Genre),
            self.language.label(Dimension::Language)
        )
    }
}

/// Return indices of films that pass the filter, in dataset order.
pub fn filtered_indices(dataset: &FilmDataset, filter: &FilmFilter) -> Vec<usize> {
    dataset
        .films
        .iter()
        .enumerate()
        .filter(|(_, film)| filter.matches(film))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TextEncoding;
    use crate::data::model::tests::film;

    fn dataset() -> FilmDataset {
        FilmDataset::from_films(
            vec![
                film("a", "Drama", "English", 7.5),
                film("b", "Comedy", "English", 8.2),
                film("c", "Drama", "Hindi", 6.1),
                film("d", "Documentary", "Spanish", 7.0),
                film("e", "Comedy", "Hindi", 5.4),
            ],
            TextEncoding::Utf8,
        )
    }

    fn all_filters(ds: &FilmDataset) -> Vec<FilmFilter> {
        let genres = std::iter::once(Selection::All)
            .chain(ds.genres.iter().map(Selection::only))
            .collect::<Vec<_>>();
        let languages = std::iter::once(Selection::All)
            .chain(ds.languages.iter().map(Selection::only))
            .collect::<Vec<_>>();
        genres
            .iter()
            .flat_map(|g| {
                languages
                    .iter()
                    .map(move |l| FilmFilter {
                        genre: g.clone(),
                        language: l.clone(),
                    })
            })
            .collect()
    }

    fn selecting(genre: Selection, language: Selection) -> FilmFilter {
        FilmFilter { genre, language }
    }

    #[test]
    fn default_filter_keeps_everything() {
        let ds = dataset();
        assert_eq!(filtered_indices(&ds, &FilmFilter::default()), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn every_kept_row_satisfies_the_predicate() {
        let ds = dataset();
        for filter in all_filters(&ds) {
            let idx = filtered_indices(&ds, &filter);
            assert!(idx.len() <= ds.len());
            for &i in &idx {
                let film = &ds.films[i];
                assert!(filter.genre.accepts(&film.genre));
                assert!(filter.language.accepts(&film.language));
            }
            // Rows left out must fail the predicate.
            let rejected = (0..ds.len()).filter(|i| !idx.contains(i));
            for i in rejected {
                assert!(!filter.matches(&ds.films[i]));
            }
        }
    }

    #[test]
    fn narrowing_never_grows_the_subset() {
        let ds = dataset();
        for filter in all_filters(&ds) {
            let n = filtered_indices(&ds, &filter).len();
            let mut wider = filter.clone();
            wider.genre = Selection::All;
            assert!(filtered_indices(&ds, &wider).len() >= n);
            let mut wider = filter.clone();
            wider.language = Selection::All;
            assert!(filtered_indices(&ds, &wider).len() >= n);
        }
    }

    #[test]
    fn genre_and_language_combine() {
        let ds = dataset();
        let filter = selecting(Selection::only("Comedy"), Selection::only("Hindi"));
        assert_eq!(filtered_indices(&ds, &filter), vec![4]);
    }

    #[test]
    fn match_is_exact() {
        let ds = dataset();
        let filter = selecting(Selection::only("drama"), Selection::All);
        assert!(filtered_indices(&ds, &filter).is_empty());
        let filter = selecting(Selection::only("Dram"), Selection::All);
        assert!(filtered_indices(&ds, &filter).is_empty());
    }

    #[test]
    fn heading_uses_sentinel_labels() {
        let filter = selecting(Selection::All, Selection::only("Hindi"));
        assert_eq!(filter.to_string(), "genre Tous et la langue Hindi");
        assert_eq!(Selection::All.label(Dimension::Language), "Toutes");
    }
}
