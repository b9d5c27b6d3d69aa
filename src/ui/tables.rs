use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::data::model::{FilmDataset, FilmRecord, REQUIRED_COLUMNS, format_number};
use crate::data::stats::Summary;

const HEADER_HEIGHT: f32 = 22.0;
const ROW_HEIGHT: f32 = 18.0;
const RAW_TABLE_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

/// Every loaded film in file order, genre cells tinted by the genre colour.
pub fn raw_table(ui: &mut Ui, dataset: &FilmDataset, colors: &ColorMap) {
    ui.push_id("raw_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(RAW_TABLE_HEIGHT)
            .column(Column::auto().at_least(36.0))
            .column(Column::initial(260.0).at_least(120.0).clip(true))
            .columns(Column::auto().at_least(80.0), REQUIRED_COLUMNS.len() - 1)
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|_| {});
                for name in REQUIRED_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                    let idx = row.index();
                    let film = &dataset.films[idx];
                    row.col(|ui: &mut Ui| {
                        ui.weak(idx.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&film.title);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(RichText::new(&film.genre).color(colors.color_for(&film.genre)));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(film.premiere_label());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format_number(film.runtime));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format_number(film.imdb_score));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&film.language);
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// `describe()`-style table: one row per statistic, one column per field.
pub fn summary_table(ui: &mut Ui, summary: &Summary) {
    egui::Grid::new("summary_table")
        .striped(true)
        .num_columns(3)
        .min_col_width(90.0)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            ui.strong("IMDB Score");
            ui.strong("Runtime");
            ui.end_row();

            let scores = summary.imdb_score.rows();
            let runtimes = summary.runtime.rows();
            for ((label, score), (_, runtime)) in scores.into_iter().zip(runtimes) {
                ui.strong(label);
                ui.label(format_stat(score));
                ui.label(format_stat(runtime));
                ui.end_row();
            }
        });
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

// ---------------------------------------------------------------------------
// Best-rated films
// ---------------------------------------------------------------------------

/// Title → score table for the top-N films, best first.
pub fn top_table(ui: &mut Ui, top: &[&FilmRecord]) {
    egui::Grid::new("top_table")
        .striped(true)
        .num_columns(2)
        .min_col_width(90.0)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Title");
            ui.strong("IMDB Score");
            ui.end_row();

            for film in top {
                ui.label(&film.title);
                ui.label(format!("{:.1}", film.imdb_score));
                ui.end_row();
            }
        });
}
