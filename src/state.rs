use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::FilmFilter;
use crate::data::loader::load_file;
use crate::data::model::FilmDataset;
use crate::data::stats::DashboardView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is only ever replaced wholesale (File → Open…); the derived
/// views are rebuilt from it and `filter` on every frame.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset, immutable until the next load.
    pub dataset: FilmDataset,

    /// Current genre / language selections.
    pub filter: FilmFilter,

    /// Colour per genre.
    pub genre_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, dataset: FilmDataset) -> Self {
        Self {
            config,
            genre_colors: ColorMap::new(&dataset.genres),
            dataset,
            filter: FilmFilter::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset both selections to "all".
    pub fn set_dataset(&mut self, dataset: FilmDataset) {
        self.genre_colors = ColorMap::new(&dataset.genres);
        self.dataset = dataset;
        self.filter = FilmFilter::default();
        self.status_message = None;
    }

    /// Replace the dataset with the contents of `path`.  On error the current
    /// dataset stays.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let dataset =
            load_file(path).with_context(|| format!("loading {}", path.display()))?;
        log_loaded(&dataset);
        self.set_dataset(dataset);
        Ok(())
    }

    /// Derive every view for the current selections.
    pub fn view(&self) -> DashboardView<'_> {
        DashboardView::compute(
            &self.dataset,
            &self.filter,
            self.config.top_n,
            self.config.histogram_bins,
        )
    }
}

pub fn log_loaded(dataset: &FilmDataset) {
    log::info!(
        "Loaded {} films ({}) with {} genres and {} languages",
        dataset.len(),
        dataset.encoding,
        dataset.genres.len(),
        dataset.languages.len()
    );
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::filter::Selection;
    use crate::data::model::TextEncoding;
    use crate::data::model::tests::film;

    fn state() -> AppState {
        let dataset = FilmDataset::from_films(
            vec![
                film("a", "Drama", "English", 7.5),
                film("b", "Comedy", "Hindi", 8.2),
            ],
            TextEncoding::Utf8,
        );
        AppState::new(DashboardConfig::default(), dataset)
    }

    #[test]
    fn opening_a_file_resets_selections() {
        let mut state = state();
        state.filter.genre = Selection::only("Comedy");
        assert_eq!(state.view().films.len(), 1);

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Title,Genre,Premiere,Runtime,IMDB Score,Language").unwrap();
        writeln!(file, "X,Horror,05-Oct-20,90,4.0,Korean").unwrap();
        state.open(file.path()).unwrap();

        assert_eq!(state.filter, FilmFilter::default());
        assert_eq!(state.dataset.genres, vec!["Horror"]);
        assert_eq!(state.view().films.len(), 1);
    }

    #[test]
    fn failed_open_keeps_the_dataset() {
        let mut state = state();
        state.filter.language = Selection::only("Hindi");
        let err = state.open(Path::new("/nonexistent/films.csv")).unwrap_err();

        assert!(format!("{err:#}").contains("loading /nonexistent/films.csv"));
        assert_eq!(state.dataset.len(), 2);
        assert_eq!(state.filter.language, Selection::only("Hindi"));
    }
}
