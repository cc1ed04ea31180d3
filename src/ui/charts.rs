use std::f64::consts::TAU;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Corner, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::aggregate::breakdown::CategoryCount;
use crate::aggregate::histogram::PriceHistogram;
use crate::aggregate::scatter::PriceOdometerScatter;
use crate::aggregate::trend::DailyTrendPoint;
use crate::color::CategoryPalette;
use crate::data::model::{CategoryColumn, HistogramGrouping};
use crate::state::AppState;

const DONUT_HOLE: f64 = 0.4;
const ARC_STEPS_PER_TURN: f64 = 96.0;

// ---------------------------------------------------------------------------
// Category donuts
// ---------------------------------------------------------------------------

/// One donut per categorical column, side by side.
pub fn category_row(ui: &mut Ui, breakdowns: &[(CategoryColumn, Vec<CategoryCount>)]) {
    ui.columns(breakdowns.len().max(1), |cols| {
        for (col_ui, (column, counts)) in cols.iter_mut().zip(breakdowns) {
            col_ui.strong(column.title());
            donut(col_ui, *column, counts);
        }
    });
}

fn donut(ui: &mut Ui, column: CategoryColumn, counts: &[CategoryCount]) {
    let palette = CategoryPalette::new(counts.iter().map(|c| c.value.as_str()));

    Plot::new(("donut", column.column_name()))
        .height(220.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.0)
        .include_x(1.0)
        .include_y(-1.0)
        .include_y(1.0)
        .show(ui, |plot_ui| {
            let mut angle = TAU / 4.0;
            for slice in counts {
                let sweep = TAU * slice.percent / 100.0;
                let polygon = Polygon::new(PlotPoints::from(ring_segment(angle, angle - sweep)))
                    .fill_color(palette.color_for(&slice.value))
                    .name(format!("{}: {} ({:.1}%)", slice.value, slice.count, slice.percent));
                plot_ui.polygon(polygon);
                angle -= sweep;
            }
        });
}

/// Outline of a ring segment between two angles (clockwise when `to < from`).
fn ring_segment(from: f64, to: f64) -> Vec<[f64; 2]> {
    let steps = ((from - to).abs() / TAU * ARC_STEPS_PER_TURN).ceil().max(1.0) as usize;
    let at = |i: usize| from + (to - from) * i as f64 / steps as f64;

    let outer = (0..=steps).map(|i| [at(i).cos(), at(i).sin()]);
    let inner = (0..=steps)
        .rev()
        .map(|i| [DONUT_HOLE * at(i).cos(), DONUT_HOLE * at(i).sin()]);
    outer.chain(inner).collect()
}

// ---------------------------------------------------------------------------
// Price histogram
// ---------------------------------------------------------------------------

/// Histogram panel with its normalise checkbox and grouping radio row.
pub fn histogram_panel(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Distribution of Prices");

    let mut normalize = state.histogram.normalize;
    if ui.checkbox(&mut normalize, "Normalize Histogram").changed() {
        state.set_normalize(normalize);
    }

    let mut grouping = state.histogram.grouping;
    ui.horizontal(|ui: &mut Ui| {
        for choice in HistogramGrouping::ALL {
            ui.radio_value(&mut grouping, choice, choice.label());
        }
    });
    if grouping != state.histogram.grouping {
        state.set_grouping(grouping);
    }

    if let Some(session) = &state.session {
        price_histogram_plot(ui, &session.charts.histogram);
    }
}

fn price_histogram_plot(ui: &mut Ui, hist: &PriceHistogram) {
    if hist.is_empty() {
        ui.weak("No priced listings in the current selection.");
    }
    let palette = CategoryPalette::new(hist.series.iter().filter_map(|s| s.label.as_deref()));

    let mut plot = Plot::new("price_histogram")
        .height(300.0)
        .show_grid(false)
        .y_axis_label(if hist.normalized { "percent" } else { "count" });
    if hist.show_legend() {
        plot = plot.legend(Legend::default().position(Corner::RightTop));
    }

    plot.show(ui, |plot_ui| {
        let mut charts: Vec<BarChart> = Vec::with_capacity(hist.series.len());
        for series in &hist.series {
            let bars: Vec<Bar> = series
                .heights
                .iter()
                .enumerate()
                .map(|(i, &h)| Bar::new(hist.bin_center(i), h).width(hist.bin_width))
                .collect();

            let mut chart = BarChart::new(bars);
            chart = match &series.label {
                Some(label) => chart.name(label).color(palette.color_for(label)),
                None => chart.color(Color32::LIGHT_BLUE),
            };
            let below: Vec<&BarChart> = charts.iter().collect();
            charts.push(chart.stack_on(&below));
        }
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

// ---------------------------------------------------------------------------
// Price vs. odometer
// ---------------------------------------------------------------------------

pub fn scatter_panel(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Price vs. Odometer");

    let mut regression = state.regression;
    if ui.checkbox(&mut regression, "Add Regression Line").changed() {
        state.set_regression(regression);
    }

    if let Some(session) = &state.session {
        scatter_plot(ui, &session.charts.scatter);
    }
}

fn scatter_plot(ui: &mut Ui, scatter: &PriceOdometerScatter) {
    Plot::new("price_vs_odometer")
        .height(340.0)
        .show_grid(false)
        .x_axis_label("Odometer")
        .y_axis_label("Price")
        .legend(Legend::default().position(Corner::RightTop))
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(scatter.points.clone()))
                    .radius(5.0)
                    .color(Color32::LIGHT_BLUE)
                    .name("listings"),
            );
            if let Some(line) = &scatter.regression {
                plot_ui.line(
                    Line::new(PlotPoints::from(line.endpoints().to_vec()))
                        .color(Color32::from_rgb(239, 85, 59))
                        .width(2.0)
                        .name(format!(
                            "OLS: price = {:.2} × odometer + {:.0}  (R² = {:.3})",
                            line.slope, line.intercept, line.r_squared
                        )),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Daily trend
// ---------------------------------------------------------------------------

pub fn trend_panel(ui: &mut Ui, trend: &[DailyTrendPoint]) {
    ui.strong("Total Days Vehicles Were Listed Each Day");

    let points: Vec<[f64; 2]> = trend
        .iter()
        .map(|p| [p.day.num_days_from_ce() as f64, p.total_days_listed as f64])
        .collect();

    Plot::new("daily_trend")
        .height(300.0)
        .show_grid(false)
        .y_axis_label("days_listed")
        .x_axis_formatter(|mark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::from(points)).width(1.5));
        });
}

/// Notice shown above the charts when the filters leave nothing.
pub fn empty_notice(ui: &mut Ui, message: &str) {
    ui.label(RichText::new(message).italics().color(Color32::YELLOW));
}
