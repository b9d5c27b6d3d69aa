use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoint, PlotPoints, PlotUi};

use crate::data::stats::Histogram;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Date axis helpers
// ---------------------------------------------------------------------------

/// Dates are plotted as day numbers so the axis stays linear in time.
fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

fn date_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    x_to_date(mark.value)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn date_label(name: &str, point: &PlotPoint) -> String {
    let date = x_to_date(point.x)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    if name.is_empty() {
        format!("{date}\n{:.2}", point.y)
    } else {
        format!("{name}\n{date}\n{:.2}", point.y)
    }
}

/// Chart with a date x axis.  Scrolling stays with the page.
fn show_date_plot(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    add_contents: impl FnOnce(&mut PlotUi),
) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(egui_plot::Legend::default())
        .x_axis_formatter(date_axis)
        .label_formatter(date_label)
        .y_axis_label(y_label.to_string())
        .allow_scroll(false)
        .show(ui, add_contents);
}

// ---------------------------------------------------------------------------
// IMDB score evolution (line chart)
// ---------------------------------------------------------------------------

/// Mean score per premiere date.  Dates whose films all lack a score are
/// skipped.
pub fn score_evolution_chart(ui: &mut Ui, series: &[(NaiveDate, f64)]) {
    let points: PlotPoints = series
        .iter()
        .filter(|(_, score)| !score.is_nan())
        .map(|&(date, score)| [date_to_x(date), score])
        .collect();

    show_date_plot(ui, "score_evolution", "IMDB Score", |plot_ui| {
        plot_ui.line(
            Line::new(points)
                .name("IMDB Score")
                .color(Color32::LIGHT_BLUE)
                .width(1.5),
        );
    });
}

// ---------------------------------------------------------------------------
// Runtime distribution (histogram)
// ---------------------------------------------------------------------------

pub fn runtime_histogram_chart(ui: &mut Ui, histogram: &Histogram) {
    let width = histogram.bin_width();
    let bars: Vec<Bar> = histogram
        .bars()
        .map(|(centre, count)| {
            Bar::new(centre, count as f64)
                .width(width)
                .stroke(Stroke::new(1.0, Color32::BLACK))
        })
        .collect();

    Plot::new("runtime_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Durée des films")
        .y_axis_label("Fréquence des films")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(31, 119, 180)));
        });
}

// ---------------------------------------------------------------------------
// Cumulative releases (area chart)
// ---------------------------------------------------------------------------

pub fn cumulative_releases_chart(ui: &mut Ui, series: &[(NaiveDate, usize)]) {
    let points: PlotPoints = series
        .iter()
        .map(|&(date, total)| [date_to_x(date), total as f64])
        .collect();

    show_date_plot(ui, "cumulative_releases", "Cumulative Count", |plot_ui| {
        plot_ui.line(
            Line::new(points)
                .name("Cumulative Count")
                .color(Color32::from_rgb(92, 140, 97))
                .fill(0.0),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips() {
        let date = NaiveDate::from_ymd_opt(2020, 10, 5).unwrap();
        assert_eq!(x_to_date(date_to_x(date)), Some(date));
        assert_eq!(x_to_date(date_to_x(date) + 0.4), Some(date));
        let mark = GridMark {
            value: date_to_x(date),
            step_size: 1.0,
        };
        assert_eq!(date_axis(mark, &(0.0..=1.0)), "2020-10-05");
    }
}
