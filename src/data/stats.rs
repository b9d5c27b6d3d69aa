use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::filter::{FilmFilter, filtered_indices};
use super::model::{FilmDataset, FilmRecord};

// ---------------------------------------------------------------------------
// Describe – count / mean / std / quartiles
// ---------------------------------------------------------------------------

/// Descriptive statistics of one numeric column.
///
/// Missing (`NaN`) values are skipped.  With no values every field but
/// `count` is `NaN`; with one value `std` is `NaN` (sample deviation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn describe(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        if n == 0 {
            return ColumnSummary {
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                q50: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        ColumnSummary {
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        }
    }

    /// `(label, value)` rows in display order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Linear interpolation between the two closest ranks of a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub imdb_score: ColumnSummary,
    pub runtime: ColumnSummary,
}

impl Summary {
    pub fn of(films: &[&FilmRecord]) -> Self {
        Summary {
            imdb_score: ColumnSummary::describe(films.iter().map(|f| f.imdb_score)),
            runtime: ColumnSummary::describe(films.iter().map(|f| f.runtime)),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-N
// ---------------------------------------------------------------------------

/// The `n` films with the highest IMDB score, best first.
///
/// Equal scores keep their dataset order.  Films without a score are not
/// ranked.
pub fn top_by_score<'a>(films: &[&'a FilmRecord], n: usize) -> Vec<&'a FilmRecord> {
    let mut ranked: Vec<&FilmRecord> = films
        .iter()
        .copied()
        .filter(|f| !f.imdb_score.is_nan())
        .collect();
    // `sort_by` is stable, so ties stay in first-encountered order.
    ranked.sort_by(|a, b| b.imdb_score.total_cmp(&a.imdb_score));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Grouping by premiere date
// ---------------------------------------------------------------------------

/// Mean IMDB score per distinct premiere date, ascending by date.
///
/// Films without a parsed premiere are left out of the grouping.
pub fn score_by_premiere(films: &[&FilmRecord]) -> Vec<(NaiveDate, f64)> {
    let mut groups: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for film in films {
        let Some(date) = film.premiere else {
            continue;
        };
        let entry = groups.entry(date).or_insert((0.0, 0));
        if !film.imdb_score.is_nan() {
            entry.0 += film.imdb_score;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(date, (sum, n))| {
            let mean = if n == 0 { f64::NAN } else { sum / n as f64 };
            (date, mean)
        })
        .collect()
}

/// Running total of releases per distinct premiere date, ascending by date.
///
/// Films without a parsed premiere are left out, so the last total equals the
/// number of dated films.
pub fn cumulative_releases(films: &[&FilmRecord]) -> Vec<(NaiveDate, usize)> {
    let mut per_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in films.iter().filter_map(|f| f.premiere) {
        *per_date.entry(date).or_default() += 1;
    }
    per_date
        .into_iter()
        .scan(0usize, |total, (date, count)| {
            *total += count;
            Some((date, *total))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram; `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin the non-missing values over their own `[min, max]` range.
    ///
    /// A single distinct value is centred in `[v - 0.5, v + 0.5]`; no values
    /// at all give empty bins over `[0, 1]`.  The last bin is closed on the
    /// right so the maximum is counted.
    pub fn new(values: impl IntoIterator<Item = f64>, bins: usize) -> Self {
        let bins = bins.max(1);
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();

        let (lo, hi) = match values.iter().copied().reduce(f64::min).zip(
            values.iter().copied().reduce(f64::max),
        ) {
            None => (0.0, 1.0),
            Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
            Some(range) => range,
        };

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// `(bin centre, count)` pairs.
    pub fn bars(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| ((edge[0] + edge[1]) / 2.0, count))
    }
}

// ---------------------------------------------------------------------------
// DashboardView – every derived view for one pair of selections
// ---------------------------------------------------------------------------

/// Everything the presenter shows below the selectors, recomputed from the
/// immutable dataset and the current filter on every frame.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub films: Vec<&'a FilmRecord>,
    pub summary: Summary,
    pub top: Vec<&'a FilmRecord>,
    pub score_evolution: Vec<(NaiveDate, f64)>,
    pub runtime_histogram: Histogram,
    pub cumulative_releases: Vec<(NaiveDate, usize)>,
}

impl<'a> DashboardView<'a> {
    pub fn compute(
        dataset: &'a FilmDataset,
        filter: &FilmFilter,
        top_n: usize,
        histogram_bins: usize,
    ) -> Self {
        let films: Vec<&FilmRecord> = filtered_indices(dataset, filter)
            .into_iter()
            .map(|i| &dataset.films[i])
            .collect();

        DashboardView {
            summary: Summary::of(&films),
            top: top_by_score(&films, top_n),
            score_evolution: score_by_premiere(&films),
            runtime_histogram: Histogram::new(films.iter().map(|f| f.runtime), histogram_bins),
            cumulative_releases: cumulative_releases(&films),
            films,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Selection;
    use crate::data::loader::parse_csv;
    use crate::data::model::TextEncoding;
    use crate::data::model::tests::film;

    fn dated(title: &str, date: Option<(i32, u32, u32)>, score: f64) -> FilmRecord {
        let mut f = film(title, "Drama", "English", score);
        f.premiere = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        f
    }

    fn refs(films: &[FilmRecord]) -> Vec<&FilmRecord> {
        films.iter().collect()
    }

    fn total(h: &Histogram) -> usize {
        h.counts.iter().sum()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_matches_reference_values() {
        let s = ColumnSummary::describe([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.count, 4);
        assert!(close(s.mean, 2.5));
        assert!(close(s.std, 1.2909944487358056));
        assert_eq!(s.min, 1.0);
        assert!(close(s.q25, 1.75));
        assert!(close(s.q50, 2.5));
        assert!(close(s.q75, 3.25));
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn describe_skips_missing_and_tolerates_empty() {
        let s = ColumnSummary::describe([f64::NAN, 5.0]);
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, 5.0);
        assert!(s.std.is_nan());

        let empty = ColumnSummary::describe(std::iter::empty());
        assert_eq!(empty.count, 0);
        assert!(empty.rows().iter().skip(1).all(|(_, v)| v.is_nan()));
    }

    #[test]
    fn unfiltered_summary_matches_independent_computation() {
        let csv = "Title,Genre,Premiere,Runtime,IMDB Score,Language\n\
                   A,Drama,05-Oct-20,97,6.4,English\n\
                   B,Comedy,12-Mar-21,112,5.8,Hindi\n\
                   C,Drama,31-Feb-20,58,7.9,English\n\
                   D,Documentary,01-Jan-19,84,7.1,Spanish\n";
        let ds = FilmDataset::from_films(parse_csv(csv).unwrap(), TextEncoding::Utf8);
        let view = DashboardView::compute(&ds, &FilmFilter::default(), 5, 20);

        let scores = [6.4, 5.8, 7.9, 7.1];
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        assert!(close(view.summary.imdb_score.mean, mean));
        assert_eq!(view.summary.imdb_score.min, 5.8);
        assert_eq!(view.summary.imdb_score.max, 7.9);
        assert_eq!(view.summary.runtime.min, 58.0);
        assert_eq!(view.summary.runtime.max, 112.0);
        assert!(close(view.summary.runtime.mean, (97.0 + 112.0 + 58.0 + 84.0) / 4.0));
    }

    #[test]
    fn top_n_is_sorted_and_stable() {
        let films = vec![
            film("a", "Drama", "English", 6.0),
            film("b", "Drama", "English", 8.0),
            film("c", "Drama", "English", 7.0),
            film("d", "Drama", "English", 8.0),
            film("e", "Drama", "English", f64::NAN),
            film("f", "Drama", "English", 5.0),
            film("g", "Drama", "English", 9.0),
        ];
        let top = top_by_score(&refs(&films), 5);
        let titles: Vec<&str> = top.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["g", "b", "d", "c", "a"]);
    }

    #[test]
    fn top_n_with_fewer_rows_returns_all() {
        let films = vec![film("a", "Drama", "English", 6.0), film("b", "Drama", "English", 7.0)];
        let top = top_by_score(&refs(&films), 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].title, "b");
        assert!(top_by_score(&[], 5).is_empty());
    }

    #[test]
    fn comedy_scenario() {
        let ds = FilmDataset::from_films(
            vec![
                film("Drama film", "Drama", "English", 7.5),
                film("Comedy film", "Comedy", "English", 8.2),
            ],
            TextEncoding::Utf8,
        );
        let filter = FilmFilter {
            genre: Selection::only("Comedy"),
            language: Selection::All,
        };
        let view = DashboardView::compute(&ds, &filter, 5, 20);

        assert_eq!(view.films.len(), 1);
        assert_eq!(view.films[0].imdb_score, 8.2);
        assert_eq!(view.top.len(), 1);
        assert_eq!(view.top[0].title, "Comedy film");
    }

    #[test]
    fn evolution_groups_by_date_and_drops_missing() {
        let films = vec![
            dated("a", Some((2020, 10, 5)), 6.0),
            dated("b", Some((2019, 1, 1)), 7.0),
            dated("c", Some((2020, 10, 5)), 8.0),
            dated("d", None, 9.0),
        ];
        let series = score_by_premiere(&refs(&films));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(series[0].1, 7.0);
        assert_eq!(series[1].1, 7.0);
    }

    #[test]
    fn cumulative_is_non_decreasing_and_counts_dated_rows() {
        let films = vec![
            dated("a", Some((2021, 3, 1)), 6.0),
            dated("b", Some((2019, 1, 1)), 7.0),
            dated("c", Some((2021, 3, 1)), 8.0),
            dated("d", None, 9.0),
            dated("e", Some((2020, 6, 15)), 5.0),
        ];
        let cumulative = cumulative_releases(&refs(&films));
        let totals: Vec<usize> = cumulative.iter().map(|(_, n)| *n).collect();
        assert_eq!(totals, vec![1, 2, 4]);
        assert!(cumulative.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 <= w[1].1));
        let dated_rows = films.iter().filter(|f| f.premiere.is_some()).count();
        assert_eq!(*totals.last().unwrap(), dated_rows);
    }

    #[test]
    fn histogram_bins_cover_the_range() {
        let h = Histogram::new([10.0, 20.0, 30.0, 40.0, f64::NAN], 3);
        assert_eq!(h.edges, vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(h.counts, vec![1, 1, 2]);
        assert_eq!(total(&h), 4);
        let centres: Vec<f64> = h.bars().map(|(c, _)| c).collect();
        assert_eq!(centres, vec![15.0, 25.0, 35.0]);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        let single = Histogram::new([90.0, 90.0], 20);
        assert_eq!(single.counts.len(), 20);
        assert_eq!(total(&single), 2);
        assert!(close(single.edges[0], 89.5));
        assert!(close(single.edges[20], 90.5));

        let empty = Histogram::new(std::iter::empty(), 20);
        assert_eq!(total(&empty), 0);
        assert!(close(empty.bin_width(), 0.05));
    }

    #[test]
    fn empty_subset_does_not_fail() {
        let ds = FilmDataset::from_films(
            vec![film("a", "Drama", "English", 7.0)],
            TextEncoding::Utf8,
        );
        let filter = FilmFilter {
            genre: Selection::only("Horror"),
            language: Selection::All,
        };
        let view = DashboardView::compute(&ds, &filter, 5, 20);

        assert!(view.is_empty());
        assert!(view.top.is_empty());
        assert!(view.score_evolution.is_empty());
        assert!(view.cumulative_releases.is_empty());
        assert_eq!(view.summary.imdb_score.count, 0);
        assert!(view.summary.runtime.mean.is_nan());
        assert_eq!(total(&view.runtime_histogram), 0);
    }
}
