use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::{Dimension, Selection, filtered_indices};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Selection controls
// ---------------------------------------------------------------------------

/// Drop-down listing the "all" sentinel followed by the dimension's distinct
/// values.
pub fn selector(ui: &mut Ui, state: &mut AppState, dimension: Dimension) {
    ui.label(dimension.prompt());

    let values = dimension.values(&state.dataset);
    let colors = &state.genre_colors;
    let current = state.filter.selection_mut(dimension);
    let before = current.clone();

    egui::ComboBox::from_id_salt(dimension.prompt())
        .selected_text(current.label(dimension).to_string())
        .width(280.0)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(current, Selection::All, dimension.all_label());
            for value in values {
                let mut text = RichText::new(value);
                if dimension == Dimension::Genre {
                    text = text.color(colors.color_for(value));
                }
                ui.selectable_value(current, Selection::only(value), text);
            }
        });

    if *current != before {
        log::debug!("{dimension:?} selection changed to {:?}", current);
    }
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Fichier", |ui: &mut Ui| {
            if ui.button("Ouvrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let visible = filtered_indices(&state.dataset, &state.filter).len();
        ui.label(format!(
            "{} films chargés, {} affichés",
            state.dataset.len(),
            visible
        ));

        ui.separator();
        ui.label(format!("Encodage : {}", state.dataset.encoding));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Ouvrir un jeu de données")
        .add_filter("Formats pris en charge", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Erreur : {e:#}"));
        }
    }
}
