use eframe::egui::{self, ScrollArea, Ui};

use crate::data::filter::Dimension;
use crate::state::AppState;
use crate::ui::{EMPTY_SELECTION, panels, plot, tables};

pub const TITLE: &str = "Tableau de bord des films Netflix";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FilmDashboardApp {
    pub state: AppState,
}

impl FilmDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for FilmDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: the dashboard, top to bottom ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard(ui, &mut self.state);
                });
        });
    }
}

/// One full pass over the dashboard.  Every derived view is rebuilt here from
/// the dataset and the selections made above it.
fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading(TITLE);
    ui.add_space(8.0);

    section(ui, "Données brutes");
    tables::raw_table(ui, &state.dataset, &state.genre_colors);
    ui.add_space(8.0);

    panels::selector(ui, state, Dimension::Genre);
    panels::selector(ui, state, Dimension::Language);

    let view = state.view();

    section(ui, &format!("Statistiques pour le {} :", state.filter));
    tables::summary_table(ui, &view.summary);

    section(ui, &format!("Top {} des films par score IMDB", state.config.top_n));
    if view.is_empty() {
        ui.weak(EMPTY_SELECTION);
    } else {
        tables::top_table(ui, &view.top);
    }

    section(ui, "L'évolution pour le score IMDB");
    if view.is_empty() {
        ui.weak(EMPTY_SELECTION);
    } else {
        plot::score_evolution_chart(ui, &view.score_evolution);
    }

    section(ui, "La distribution des durées");
    plot::runtime_histogram_chart(ui, &view.runtime_histogram);

    section(
        ui,
        "La distribution des films par date de sortie au fil du temps (cumulatif)",
    );
    if view.is_empty() {
        ui.weak(EMPTY_SELECTION);
    } else {
        plot::cumulative_releases_chart(ui, &view.cumulative_releases);
    }
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.strong(title);
    ui.separator();
}
